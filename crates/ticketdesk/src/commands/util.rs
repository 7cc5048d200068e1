//! Shared helpers for command handlers.

use std::io::IsTerminal;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use ticketdesk_core::{CoreError, User};

use crate::config::Session;
use crate::error::CliError;

/// Prompt for confirmation, auto-approving if `--yes` was passed.
///
/// Without a terminal there is nobody to ask, so the operation is refused.
pub fn confirm(message: &str, action: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: action.into(),
        });
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    Ok(confirmed)
}

/// The signed-in user: the profile's identity, else the token's claims.
pub fn signed_in_user(session: &Session) -> Option<User> {
    ticketdesk_config::profile_user(&session.profile).or_else(|| session.service.token_user())
}

/// Gate ticket commands on the user's role.
///
/// A missing or unusable token is reported before the missing user, so
/// the error points at `token set` rather than at the profile.
pub fn require_ticket_access(session: &Session) -> Result<User, CliError> {
    let Some(user) = signed_in_user(session) else {
        session.service.validated_token()?;
        return Err(CoreError::NoUser.into());
    };
    if !user.role.can_manage_tickets() {
        return Err(CoreError::role_denied(&user.role).into());
    }
    tracing::debug!(user = %user.username, role = %user.role, "ticket access granted");
    Ok(user)
}

/// Spinner on stderr while a request is in flight. Hidden when stderr is
/// not a terminal or `--quiet` is set.
pub fn spinner(message: &str, quiet: bool) -> ProgressBar {
    if quiet || !std::io::stderr().is_terminal() {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        bar.set_style(style);
    }
    bar.set_message(message.to_owned());
    bar.enable_steady_tick(Duration::from_millis(100));
    bar
}

//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` variants into user-facing errors
//! with actionable help text and a process exit code.

use miette::Diagnostic;
use thiserror::Error;

use ticketdesk_config::ConfigError;
use ticketdesk_core::{AuthFailure, CoreError};

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const PERMISSION: i32 = 5;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach the ticket API at {url}")]
    #[diagnostic(
        code(ticketdesk::connection_failed),
        help(
            "Check that the API is running and reachable.\n\
             {reason}\n\
             Override the URL with --api-url or `api_url` in your profile."
        )
    )]
    ConnectionFailed { url: String, reason: String },

    #[error("Request to {url} timed out")]
    #[diagnostic(
        code(ticketdesk::timeout),
        help("Increase the timeout with --timeout or check API responsiveness.")
    )]
    Timeout { url: String },

    // ── Authentication ───────────────────────────────────────────────
    #[error("{message}")]
    #[diagnostic(
        code(ticketdesk::auth_failed),
        help(
            "Store a fresh token with: ticketdesk token set --profile {profile}\n\
             Or point `token_env` in the profile at an environment variable."
        )
    )]
    AuthFailed { message: String, profile: String },

    #[error("{message}")]
    #[diagnostic(
        code(ticketdesk::permission_denied),
        help("Ticket management is limited to the admin, manager and operator roles.")
    )]
    PermissionDenied { message: String },

    // ── Tickets ──────────────────────────────────────────────────────
    #[error("Ticket '{id}' not found")]
    #[diagnostic(
        code(ticketdesk::not_found),
        help("Run: ticketdesk tickets list --all-history to see available tickets")
    )]
    NotFound { id: String },

    #[error("{message}")]
    #[diagnostic(code(ticketdesk::request_failed))]
    RequestFailed {
        message: String,
        #[help]
        detail: Option<String>,
    },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(ticketdesk::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(ticketdesk::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: ticketdesk config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("{message}")]
    #[diagnostic(
        code(ticketdesk::config),
        help("Inspect the file with: ticketdesk config show")
    )]
    Config { message: String },

    #[error("Could not access the token store: {message}")]
    #[diagnostic(
        code(ticketdesk::token_store),
        help("Set `token_store = \"file\"` in the profile if no system keyring is available.")
    )]
    TokenStore { message: String },

    // ── Interactive ──────────────────────────────────────────────────
    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(ticketdesk::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── IO ───────────────────────────────────────────────────────────
    #[error(transparent)]
    #[diagnostic(code(ticketdesk::io))]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::AuthFailed { .. } => exit_code::AUTH,
            Self::PermissionDenied { .. } => exit_code::PERMISSION,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Validation { .. } | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }

    /// Attach the active profile name to an authentication failure.
    pub fn for_profile(self, name: &str) -> Self {
        match self {
            Self::AuthFailed { message, .. } => Self::AuthFailed {
                message,
                profile: name.into(),
            },
            other => other,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        let message = err.user_message();
        match err {
            CoreError::Auth { kind } => {
                let message = if kind == AuthFailure::Missing {
                    "No token stored for this profile".into()
                } else {
                    message
                };
                CliError::AuthFailed {
                    message,
                    profile: "default".into(),
                }
            }
            CoreError::NoUser => CliError::PermissionDenied { message },
            CoreError::Forbidden { detail } => CliError::PermissionDenied {
                message: format!("Access denied: {detail}"),
            },
            CoreError::NotFound { id } => CliError::NotFound { id },
            CoreError::Timeout { url } => CliError::Timeout { url },
            CoreError::ConnectionFailed { url, reason } => {
                CliError::ConnectionFailed { url, reason }
            }
            CoreError::Fetch { message: detail }
            | CoreError::Delete {
                message: detail, ..
            }
            | CoreError::Resolve {
                message: detail, ..
            } => CliError::RequestFailed {
                message,
                detail: Some(detail),
            },
            CoreError::Config { message } => CliError::Config { message },
            CoreError::Storage { message } => CliError::TokenStore { message },
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::UnknownProfile { name } => CliError::ProfileNotFound {
                name,
                available: "(see ticketdesk config show)".into(),
            },
            ConfigError::Io(e) => CliError::Io(e),
            other => CliError::Config {
                message: other.to_string(),
            },
        }
    }
}

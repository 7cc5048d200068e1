//! Bearer token management for the active profile.

use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;

use ticketdesk_core::{TokenClaims, decode_claims};

use crate::cli::{GlobalOpts, TokenArgs, TokenCommand};
use crate::config::Session;
use crate::error::CliError;
use crate::output;

#[derive(Debug, Serialize)]
struct TokenStatus {
    profile: String,
    stored: bool,
    username: Option<String>,
    role: Option<String>,
    expires_at: Option<DateTime<Utc>>,
    expired: bool,
}

impl TokenStatus {
    fn new(profile: &str, claims: Option<&TokenClaims>, now: DateTime<Utc>) -> Self {
        let expires_at = claims.and_then(TokenClaims::expires_at);
        Self {
            profile: profile.to_owned(),
            stored: claims.is_some(),
            username: claims.and_then(|c| c.username.clone()),
            role: claims.and_then(|c| c.role.clone()),
            expires_at,
            expired: expires_at.is_some_and(|at| at <= now),
        }
    }

    fn detail(&self, now: DateTime<Utc>) -> String {
        if !self.stored {
            return format!("No token stored for profile '{}'", self.profile);
        }
        let expiry = match self.expires_at {
            None => "never (no exp claim)".to_owned(),
            Some(at) if self.expired => format!("{at} (expired)"),
            Some(at) => {
                let left = (at - now).to_std().unwrap_or_default();
                let left = std::time::Duration::from_secs(left.as_secs());
                format!("{at} (in {})", humantime::format_duration(left))
            }
        };
        [
            format!("Profile:  {}", self.profile),
            format!("User:     {}", self.username.as_deref().unwrap_or("-")),
            format!("Role:     {}", self.role.as_deref().unwrap_or("-")),
            format!("Expires:  {expiry}"),
        ]
        .join("\n")
    }
}

fn read_token(arg: Option<String>) -> Result<SecretString, CliError> {
    let raw = match arg {
        Some(token) => token,
        None => rpassword::prompt_password("Bearer token: ")?,
    };
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(CliError::Validation {
            field: "token".into(),
            reason: "token cannot be empty".into(),
        });
    }
    Ok(SecretString::from(raw.to_owned()))
}

pub fn handle(session: &Session, args: TokenArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let tokens = session.tokens();
    let profile = &session.profile_name;
    let now = Utc::now();

    match args.command {
        TokenCommand::Set { token } => {
            let token = read_token(token)?;
            let claims = decode_claims(token.expose_secret()).map_err(|e| {
                CliError::Validation {
                    field: "token".into(),
                    reason: e.to_string(),
                }
            })?;
            if claims.expires_at().is_some_and(|at| at <= now) {
                eprintln!("⚠ This token has already expired; requests will ask for a new one.");
            }
            if let Some(ref var) = session.profile.token_env {
                if std::env::var_os(var).is_some() {
                    eprintln!("⚠ ${var} is set and takes precedence over the stored token.");
                }
            }

            tokens
                .set(&token)
                .map_err(|e| CliError::TokenStore {
                    message: e.to_string(),
                })?;
            tracing::info!(profile = %profile, "stored bearer token");
            if !global.quiet {
                eprintln!("✓ Token stored for profile '{profile}'");
            }
            Ok(())
        }

        TokenCommand::Clear => {
            tokens.clear().map_err(|e| CliError::TokenStore {
                message: e.to_string(),
            })?;
            if !global.quiet {
                eprintln!("✓ Token cleared for profile '{profile}'");
            }
            Ok(())
        }

        TokenCommand::Status => {
            let stored = tokens.get().map_err(|e| CliError::TokenStore {
                message: e.to_string(),
            })?;
            let claims = match stored {
                Some(token) => Some(decode_claims(token.expose_secret()).map_err(|e| {
                    CliError::Validation {
                        field: "stored token".into(),
                        reason: e.to_string(),
                    }
                })?),
                None => None,
            };

            let status = TokenStatus::new(profile, claims.as_ref(), now);
            let out = output::render_single(
                &global.output,
                &status,
                |s| s.detail(now),
                |s| s.username.clone().unwrap_or_default(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn whole_second_now() -> DateTime<Utc> {
        DateTime::from_timestamp(Utc::now().timestamp(), 0).unwrap()
    }

    fn claims(exp: Option<DateTime<Utc>>) -> TokenClaims {
        TokenClaims {
            exp: exp.map(|at| at.timestamp()),
            username: Some("jdoe".into()),
            name: None,
            role: Some("operator".into()),
        }
    }

    #[test]
    fn status_reports_time_left() {
        let now = whole_second_now();
        let c = claims(Some(now + Duration::minutes(90)));
        let status = TokenStatus::new("default", Some(&c), now);
        assert!(!status.expired);
        let text = status.detail(now);
        assert!(text.contains("jdoe"));
        assert!(text.contains("in 1h 30m"), "{text}");
    }

    #[test]
    fn status_flags_expired_tokens() {
        let now = Utc::now();
        let c = claims(Some(now - Duration::minutes(1)));
        let status = TokenStatus::new("default", Some(&c), now);
        assert!(status.expired);
        assert!(status.detail(now).contains("(expired)"));
    }

    #[test]
    fn status_without_token() {
        let status = TokenStatus::new("lab", None, Utc::now());
        assert!(!status.stored);
        assert_eq!(status.detail(Utc::now()), "No token stored for profile 'lab'");
    }
}

// ── Core error types ──
//
// User-facing errors from ticketdesk-core. Consumers never see HTTP
// status codes or JSON parse failures directly: `TicketService`
// classifies transport errors per operation, and the view matches on
// the variant to pick its message.

use thiserror::Error;

/// Why the bearer token could not be used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthFailure {
    /// Nothing in the token store.
    Missing,
    /// Not three segments, or the payload does not decode.
    Malformed,
    /// Embedded expiry has passed.
    Expired,
}

/// Unified error type for the core crate.
#[derive(Debug, Clone, Error)]
pub enum CoreError {
    // ── Authentication / authorization ───────────────────────────────
    #[error("Authentication required: {}", auth_reason(*kind))]
    Auth { kind: AuthFailure },

    #[error("No user is signed in")]
    NoUser,

    #[error("Access denied: {detail}")]
    Forbidden { detail: String },

    // ── Operation errors ─────────────────────────────────────────────
    #[error("Failed to fetch tickets: {message}")]
    Fetch { message: String },

    #[error("Ticket not found: {id}")]
    NotFound { id: String },

    #[error("Failed to delete ticket {id}: {message}")]
    Delete { id: String, message: String },

    #[error("Failed to resolve ticket {id}: {message}")]
    Resolve { id: String, message: String },

    #[error("Cannot reach ticket API at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Request to {url} timed out")]
    Timeout { url: String },

    // ── Configuration / storage ──────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Token storage error: {message}")]
    Storage { message: String },
}

fn auth_reason(kind: AuthFailure) -> &'static str {
    match kind {
        AuthFailure::Missing => "no token stored",
        AuthFailure::Malformed => "token is malformed",
        AuthFailure::Expired => "token has expired",
    }
}

impl CoreError {
    /// Local role check failed. Reported the same way as a server 403.
    pub fn role_denied(role: impl std::fmt::Display) -> Self {
        Self::Forbidden {
            detail: format!("role '{role}' may not manage tickets"),
        }
    }

    /// Message shown in the view's error state or notice.
    pub fn user_message(&self) -> String {
        match self {
            Self::Auth {
                kind: AuthFailure::Expired | AuthFailure::Malformed,
            } => "Your session has expired or is invalid. Please log in again.".into(),
            Self::Auth {
                kind: AuthFailure::Missing,
            } => "You are not logged in. Please log in to view tickets.".into(),
            Self::NoUser => "No user is signed in.".into(),
            Self::Forbidden { detail } => format!("Access denied: {detail}"),
            Self::Fetch { .. } | Self::ConnectionFailed { .. } | Self::Timeout { .. } => {
                "Failed to load tickets. Please try again later.".into()
            }
            Self::NotFound { id } => format!("Ticket {id} no longer exists."),
            Self::Delete { .. } => "Failed to delete ticket. Please try again.".into(),
            Self::Resolve { .. } => "Failed to resolve ticket. Please try again.".into(),
            Self::Config { message } => format!("Configuration problem: {message}"),
            Self::Storage { message } => format!("Could not read the stored token: {message}"),
        }
    }

    /// `true` for failures a fresh login would fix.
    pub fn needs_login(&self) -> bool {
        matches!(self, Self::Auth { .. })
    }
}

impl From<ticketdesk_api::Error> for CoreError {
    /// Context-free conversion, used where no ticket operation is in flight.
    fn from(err: ticketdesk_api::Error) -> Self {
        use ticketdesk_api::Error as Api;
        match err {
            Api::MalformedToken { .. } => Self::Auth {
                kind: AuthFailure::Malformed,
            },
            Api::TokenExpired { .. } => Self::Auth {
                kind: AuthFailure::Expired,
            },
            Api::Forbidden { detail } => Self::Forbidden { detail },
            Api::InvalidUrl(e) => Self::Config {
                message: format!("Invalid URL: {e}"),
            },
            Api::Tls(msg) => Self::Config {
                message: format!("TLS error: {msg}"),
            },
            Api::TokenStore(message) => Self::Storage { message },
            Api::Transport(ref e) if e.is_timeout() => Self::Timeout {
                url: request_url(e),
            },
            Api::Transport(ref e) if e.is_connect() => Self::ConnectionFailed {
                url: request_url(e),
                reason: e.to_string(),
            },
            other => Self::Fetch {
                message: other.to_string(),
            },
        }
    }
}

fn request_url(err: &reqwest::Error) -> String {
    err.url().map_or_else(|| "<unknown>".into(), ToString::to_string)
}

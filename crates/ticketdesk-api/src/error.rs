use thiserror::Error;

/// Top-level error type for the `ticketdesk-api` crate.
///
/// Covers every failure mode of the ticket API surface: bearer token
/// inspection, transport, and HTTP status handling. `ticketdesk-core`
/// maps these into the operation-specific error taxonomy.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Token is not a three-segment JWT or its payload cannot be decoded.
    #[error("Malformed authentication token: {reason}")]
    MalformedToken { reason: String },

    /// Token's embedded `exp` claim is in the past.
    #[error("Authentication token expired at {expired_at}")]
    TokenExpired {
        expired_at: chrono::DateTime<chrono::Utc>,
    },

    /// Server rejected the bearer token (HTTP 401).
    #[error("Unauthorized -- the server rejected the bearer token")]
    Unauthorized,

    /// Server denied access to the resource (HTTP 403).
    #[error("Access denied: {detail}")]
    Forbidden { detail: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS handshake or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    /// Token store backend failed (keyring, file, lock).
    #[error("Token storage error: {0}")]
    TokenStore(String),

    // ── Ticket API ──────────────────────────────────────────────────
    /// Non-success response from the ticket API.
    #[error("Ticket API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Transport(e) => e.status() == Some(reqwest::StatusCode::NOT_FOUND),
            Self::Api { status: 404, .. } => true,
            _ => false,
        }
    }
}

// ── Runtime connection configuration ──
//
// These types describe *how* to reach the ticket API. They carry
// connection tuning only and never touch disk. The CLI/TUI builds a
// `ServiceConfig` and hands it to `TicketService`.

use std::time::Duration;

use url::Url;

/// Base URL used when nothing else is configured.
pub const DEFAULT_API_URL: &str = "http://localhost:3000/api";

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(std::path::PathBuf),
    /// Skip verification (self-signed development backends).
    DangerAcceptInvalid,
}

impl From<&TlsVerification> for ticketdesk_api::TlsMode {
    fn from(tls: &TlsVerification) -> Self {
        match tls {
            TlsVerification::SystemDefaults => Self::System,
            TlsVerification::CustomCa(path) => Self::CustomCa(path.clone()),
            TlsVerification::DangerAcceptInvalid => Self::DangerAcceptInvalid,
        }
    }
}

/// Configuration for talking to one ticket API.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// API base URL (e.g., `http://localhost:3000/api`).
    pub url: Url,
    /// TLS verification strategy.
    pub tls: TlsVerification,
    /// Request timeout. A hung request fails instead of loading forever.
    pub timeout: Duration,
}

impl ServiceConfig {
    pub fn transport(&self) -> ticketdesk_api::TransportConfig {
        ticketdesk_api::TransportConfig {
            tls: (&self.tls).into(),
            timeout: self.timeout,
        }
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            url: Url::parse(DEFAULT_API_URL).expect("default API URL is valid"),
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
        }
    }
}

//! Business logic between `ticketdesk-api` and the UI consumers (CLI / TUI).
//!
//! - **[`TicketService`]**: Data access: validates the stored bearer token,
//!   fetches tickets with server-side filters, and issues delete / resolve
//!   requests. Failures come back as tagged [`CoreError`] variants.
//!
//! - **[`TicketBoard`]**: View state machine for ticket management:
//!   `Loading → Error | Ready`, the derived date/hour subset, and the local
//!   patches applied after a successful mutation.
//!
//! - **[`ViewFilter`]**: Client-side calendar date / hour / history filter.
//!
//! - **Domain model** ([`model`]): `Ticket`, `Severity`, `TicketStatus`,
//!   `User`, `Role`.

pub mod board;
pub mod config;
pub mod convert;
pub mod error;
pub mod filter;
pub mod metrics;
pub mod model;
pub mod service;

// ── Primary re-exports ──────────────────────────────────────────────
pub use board::{BoardState, ResolveDraft, TicketBoard};
pub use config::{DEFAULT_API_URL, ServiceConfig, TlsVerification};
pub use error::{AuthFailure, CoreError};
pub use filter::{HourFilter, ViewFilter};
pub use metrics::TicketMetrics;
pub use model::{CreatedBy, Role, Severity, Ticket, TicketStatus, User};
pub use service::TicketService;

// Re-export the API surface consumers need without a direct dependency.
pub use ticketdesk_api::{
    Error as ApiError, MemoryTokenStore, TOKEN_KEY, TicketQuery, TokenClaims, TokenStore,
    decode_claims,
};

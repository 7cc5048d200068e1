// ticketdesk-api: Async Rust client for the alarm-notification ticket API

pub mod auth;
pub mod client;
pub mod error;
pub mod transport;
pub mod types;

pub use auth::{MemoryTokenStore, TOKEN_KEY, TokenClaims, TokenStore, decode_claims, inspect_token};
pub use client::TicketClient;
pub use error::Error;
pub use transport::{TlsMode, TransportConfig};
pub use types::{CreatedByResponse, ResolveRequest, TicketQuery, TicketResponse};

// ── Domain model ──
//
// Canonical types consumed by the CLI and TUI. Wire shapes live in
// `ticketdesk_api::types`; `crate::convert` bridges the two.

pub mod ticket;
pub mod user;

pub use ticket::{CreatedBy, Severity, Ticket, TicketStatus};
pub use user::{Role, User};

//! Data bridge: runs `TicketService` calls off the UI loop.
//!
//! Each request is its own spawned task. Results come back through the
//! action channel; send errors mean the app is shutting down and are
//! ignored.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info, warn};

use ticketdesk_core::{TicketQuery, TicketService};

use crate::action::Action;

/// Fetch the full ticket list, tagged with the board's load generation.
pub fn spawn_load(service: Arc<TicketService>, generation: u64, tx: UnboundedSender<Action>) {
    tokio::spawn(async move {
        debug!(generation, "fetching tickets");
        let result = service.get_all_tickets(&TicketQuery::default()).await;
        match result {
            Ok(ref tickets) => info!(generation, count = tickets.len(), "tickets loaded"),
            Err(ref e) => warn!(generation, error = %e, "ticket load failed"),
        }
        let _ = tx.send(Action::TicketsLoaded { generation, result });
    });
}

pub fn spawn_delete(service: Arc<TicketService>, id: String, tx: UnboundedSender<Action>) {
    tokio::spawn(async move {
        match service.delete_ticket(&id).await {
            Ok(()) => {
                info!(ticket = %id, "ticket deleted");
                let _ = tx.send(Action::TicketDeleted(id));
            }
            Err(error) => {
                warn!(ticket = %id, error = %error, "delete failed");
                let _ = tx.send(Action::DeleteFailed { id, error });
            }
        }
    });
}

/// Resolve `id`. The local patch is stamped with the time the server
/// acknowledged the request.
pub fn spawn_resolve(
    service: Arc<TicketService>,
    id: String,
    notes: Option<String>,
    tx: UnboundedSender<Action>,
) {
    tokio::spawn(async move {
        match service.resolve_ticket(&id, notes.as_deref()).await {
            Ok(_) => {
                info!(ticket = %id, "ticket resolved");
                let _ = tx.send(Action::TicketResolved { id, at: Utc::now() });
            }
            Err(error) => {
                warn!(ticket = %id, error = %error, "resolve failed");
                let _ = tx.send(Action::ResolveFailed { id, error });
            }
        }
    });
}

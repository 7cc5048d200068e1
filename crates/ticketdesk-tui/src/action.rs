//! All possible UI actions. Actions are the sole mechanism for state mutation.

use std::fmt;

use chrono::{DateTime, Utc};

use ticketdesk_core::{CoreError, Ticket, User};

/// Destructive operations that need a y/n before they run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmAction {
    DeleteTicket { id: String, subject: String },
}

impl fmt::Display for ConfirmAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DeleteTicket { subject, .. } => {
                write!(f, "Delete \"{subject}\"? This cannot be undone.")
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Warning,
}

/// A toast notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub level: NotificationLevel,
}

impl Notification {
    pub fn success(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Success,
        }
    }

    pub fn warning(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Warning,
        }
    }

    pub fn info(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Info,
        }
    }
}

#[derive(Debug, Clone)]
pub enum Action {
    // ── Lifecycle ─────────────────────────────────────────────────
    Quit,
    Tick,
    Render,
    Resize(u16, u16),

    // ── Overlays ──────────────────────────────────────────────────
    ToggleHelp,
    ShowConfirm(ConfirmAction),
    ConfirmYes,
    ConfirmNo,
    Notify(Notification),
    /// Blocking error notice; only Enter/Esc dismiss it.
    ShowNotice(String),
    DismissNotice,

    // ── Loading ───────────────────────────────────────────────────
    /// Re-resolve the signed-in user and load tickets for them.
    Reload,
    /// Start a load for this identity (`None` = nobody signed in).
    LoadFor(Option<User>),
    /// Issue the list request tagged with `generation`.
    FetchTickets { generation: u64 },
    TicketsLoaded {
        generation: u64,
        result: Result<Vec<Ticket>, CoreError>,
    },

    // ── Delete ────────────────────────────────────────────────────
    TicketDeleted(String),
    DeleteFailed { id: String, error: CoreError },

    // ── Resolve ───────────────────────────────────────────────────
    ResolveTicket { id: String, notes: Option<String> },
    TicketResolved { id: String, at: DateTime<Utc> },
    ResolveFailed { id: String, error: CoreError },
}

// ── Ticket counts for the metrics cards ──

use serde::Serialize;

use crate::model::{Severity, Ticket, TicketStatus};

/// Headline counts over a set of tickets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TicketMetrics {
    pub total: usize,
    pub critical: usize,
    /// Pending or failed deliveries.
    pub open: usize,
    pub resolved: usize,
}

impl TicketMetrics {
    pub fn from_tickets<'a>(tickets: impl IntoIterator<Item = &'a Ticket>) -> Self {
        tickets.into_iter().fold(Self::default(), |mut m, t| {
            m.total += 1;
            if t.severity == Severity::Critical {
                m.critical += 1;
            }
            if t.status.is_open() {
                m.open += 1;
            }
            if t.status == TicketStatus::Resolved {
                m.resolved += 1;
            }
            m
        })
    }
}

/// Trend text comparing a filtered count with the unfiltered one.
///
/// `None` when both counts are the same, so the card omits the line.
pub fn trend(shown: usize, overall: usize) -> Option<String> {
    (shown != overall).then(|| format!("{shown} of {overall} overall"))
}

//! Severity / status badges for the ticket table.

use ratatui::style::{Modifier, Style};
use ratatui::text::Span;

use ticketdesk_core::{Severity, TicketStatus};

use crate::theme;

pub fn severity_span(severity: Severity) -> Span<'static> {
    let symbol = match severity {
        Severity::Critical => "▲",
        Severity::Major => "◆",
        Severity::Minor => "▽",
    };
    let mut style = Style::default().fg(theme::severity_color(severity));
    if severity == Severity::Critical {
        style = style.add_modifier(Modifier::BOLD);
    }
    Span::styled(format!("{symbol} {severity}"), style)
}

pub fn status_span(status: TicketStatus) -> Span<'static> {
    let symbol = match status {
        TicketStatus::Sent => "●",
        TicketStatus::Failed => "✗",
        TicketStatus::Pending => "◐",
        TicketStatus::Resolved => "✓",
    };
    Span::styled(
        format!("{symbol} {status}"),
        Style::default().fg(theme::status_color(status)),
    )
}

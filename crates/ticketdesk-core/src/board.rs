// ── Ticket management view state ──
//
// Frontend-agnostic state machine behind the ticket management view:
// loading → {error | ready}, the derived date/hour subset, and the local
// patches applied after a mutation succeeds. The TUI drives it from
// actions; tests drive it directly.

use chrono::{DateTime, TimeZone, Utc};
use tracing::debug;

use crate::error::CoreError;
use crate::filter::ViewFilter;
use crate::metrics::TicketMetrics;
use crate::model::{Ticket, TicketStatus, User};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardState {
    Loading,
    Error(String),
    Ready,
}

/// Notes being collected for a resolve. Stays open while the request is
/// in flight and after a failure, so the text is never lost.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolveDraft {
    pub ticket_id: String,
    pub notes: String,
    pub submitting: bool,
    pub error: Option<String>,
}

impl ResolveDraft {
    fn new(ticket_id: String) -> Self {
        Self {
            ticket_id,
            ..Self::default()
        }
    }

    /// Trimmed notes, or `None` when nothing was typed.
    pub fn submitted_notes(&self) -> Option<String> {
        let trimmed = self.notes.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_owned())
    }
}

#[derive(Debug)]
pub struct TicketBoard {
    state: BoardState,
    tickets: Vec<Ticket>,
    pub filter: ViewFilter,
    /// Bumped on every load; results tagged with an older value are stale.
    generation: u64,
    resolve: Option<ResolveDraft>,
}

impl TicketBoard {
    pub fn new(filter: ViewFilter) -> Self {
        Self {
            state: BoardState::Loading,
            tickets: Vec::new(),
            filter,
            generation: 0,
            resolve: None,
        }
    }

    // ── Loading ──────────────────────────────────────────────────────

    /// Enter `Loading` for `user`, or `Error` if nobody is signed in or
    /// the role may not manage tickets.
    ///
    /// Returns the generation the caller must pass to [`Self::finish_load`]
    /// when a fetch should be issued.
    pub fn begin_load(&mut self, user: Option<&User>) -> Option<u64> {
        self.generation += 1;

        let denied = match user {
            None => Some(CoreError::NoUser),
            Some(u) if !u.role.can_manage_tickets() => Some(CoreError::role_denied(&u.role)),
            Some(_) => None,
        };

        if let Some(err) = denied {
            self.tickets.clear();
            self.state = BoardState::Error(err.user_message());
            return None;
        }

        self.state = BoardState::Loading;
        Some(self.generation)
    }

    /// Apply a fetch result. Results from a superseded load are dropped
    /// and `false` is returned.
    pub fn finish_load(&mut self, generation: u64, result: Result<Vec<Ticket>, CoreError>) -> bool {
        if generation != self.generation {
            debug!(generation, current = self.generation, "dropping stale ticket load");
            return false;
        }

        match result {
            Ok(tickets) => {
                self.tickets = tickets;
                self.state = BoardState::Ready;
            }
            Err(err) => {
                self.tickets.clear();
                self.state = BoardState::Error(err.user_message());
            }
        }
        true
    }

    pub fn state(&self) -> &BoardState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        self.state == BoardState::Loading
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn tickets(&self) -> &[Ticket] {
        &self.tickets
    }

    pub fn find(&self, id: &str) -> Option<&Ticket> {
        self.tickets.iter().find(|t| t.id == id)
    }

    /// Tickets passing the current filter, in fetched order.
    pub fn visible<Tz: TimeZone>(&self, tz: &Tz) -> Vec<&Ticket> {
        self.filter.apply(&self.tickets, tz)
    }

    /// Counts over the visible subset and over everything fetched.
    pub fn metrics<Tz: TimeZone>(&self, tz: &Tz) -> (TicketMetrics, TicketMetrics) {
        (
            TicketMetrics::from_tickets(self.visible(tz)),
            TicketMetrics::from_tickets(&self.tickets),
        )
    }

    // ── Local patches ────────────────────────────────────────────────

    /// Drop the ticket with `id` after a successful delete.
    ///
    /// Exactly the entries with that id are removed; every other ticket
    /// keeps its position. Returns how many were removed.
    pub fn remove_ticket(&mut self, id: &str) -> usize {
        let before = self.tickets.len();
        self.tickets.retain(|t| t.id != id);
        before - self.tickets.len()
    }

    /// Mark `id` resolved at `at` with `notes` after a successful resolve.
    ///
    /// Only that ticket changes: status becomes `Resolved`, `resolved_at`
    /// is set, and `notes` replaces the previous notes.
    pub fn mark_resolved(&mut self, id: &str, notes: Option<String>, at: DateTime<Utc>) -> bool {
        let Some(ticket) = self.tickets.iter_mut().find(|t| t.id == id) else {
            return false;
        };
        ticket.status = TicketStatus::Resolved;
        ticket.resolved_at = Some(at);
        ticket.notes = notes;
        true
    }

    // ── Resolve modal ────────────────────────────────────────────────

    /// Open the notes modal for a known ticket.
    pub fn open_resolve(&mut self, id: &str) -> bool {
        if self.find(id).is_none() {
            return false;
        }
        self.resolve = Some(ResolveDraft::new(id.to_owned()));
        true
    }

    pub fn resolve_draft(&self) -> Option<&ResolveDraft> {
        self.resolve.as_ref()
    }

    pub fn resolve_draft_mut(&mut self) -> Option<&mut ResolveDraft> {
        self.resolve.as_mut()
    }

    pub fn cancel_resolve(&mut self) {
        self.resolve = None;
    }

    /// Start submitting the open draft. Returns `(id, notes)` for the
    /// request, or `None` when no draft is open or one is already in flight.
    pub fn submit_resolve(&mut self) -> Option<(String, Option<String>)> {
        let draft = self.resolve.as_mut().filter(|d| !d.submitting)?;
        draft.submitting = true;
        draft.error = None;
        Some((draft.ticket_id.clone(), draft.submitted_notes()))
    }

    /// Resolve request for `id` succeeded: patch the ticket with the
    /// draft's notes, then close and clear the modal.
    pub fn resolve_succeeded(&mut self, id: &str, at: DateTime<Utc>) -> bool {
        let notes = match self.resolve.take() {
            Some(draft) if draft.ticket_id == id => draft.submitted_notes(),
            other => {
                self.resolve = other;
                None
            }
        };
        self.mark_resolved(id, notes, at)
    }

    /// Resolve request failed: keep the modal open with its notes and
    /// return the message for the blocking notice.
    pub fn resolve_failed(&mut self, err: &CoreError) -> String {
        let message = err.user_message();
        if let Some(draft) = self.resolve.as_mut() {
            draft.submitting = false;
            draft.error = Some(message.clone());
        }
        message
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::AuthFailure;
    use crate::filter::HourFilter;
    use crate::model::{CreatedBy, Role, Severity};
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn ticket(id: &str, hour: u32) -> Ticket {
        Ticket {
            id: id.into(),
            alarm_id: format!("alarm-{id}"),
            site_id: "s-1".into(),
            site_name: "Harbor".into(),
            severity: Severity::Major,
            alarm_type: "door".into(),
            description: String::new(),
            recipients: vec!["ops@example.com".into()],
            email_sent_at: Utc.with_ymd_and_hms(2024, 1, 15, hour, 0, 0).unwrap(),
            email_subject: String::new(),
            status: TicketStatus::Pending,
            created_by: CreatedBy {
                username: "system".into(),
                display_name: None,
            },
            resolved_at: None,
            notes: Some("old".into()),
        }
    }

    fn user(role: Role) -> User {
        User {
            username: "jdoe".into(),
            display_name: None,
            role,
        }
    }

    fn ready_board() -> TicketBoard {
        let mut board =
            TicketBoard::new(ViewFilter::for_date(NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()));
        let generation = board.begin_load(Some(&user(Role::Operator))).unwrap();
        board.finish_load(
            generation,
            Ok(vec![ticket("a", 8), ticket("b", 14), ticket("c", 8)]),
        );
        board
    }

    #[test]
    fn starts_loading_then_ready() {
        let mut board = TicketBoard::new(ViewFilter::for_date(NaiveDate::MIN));
        assert!(board.is_loading());
        let generation = board.begin_load(Some(&user(Role::Admin))).unwrap();
        assert!(board.finish_load(generation, Ok(Vec::new())));
        assert_eq!(board.state(), &BoardState::Ready);
        assert!(board.tickets().is_empty());
    }

    #[test]
    fn missing_user_and_viewer_role_never_fetch() {
        let mut board = TicketBoard::new(ViewFilter::for_date(NaiveDate::MIN));
        assert_eq!(board.begin_load(None), None);
        assert!(matches!(board.state(), BoardState::Error(_)));

        assert_eq!(board.begin_load(Some(&user(Role::Viewer))), None);
        let BoardState::Error(message) = board.state() else {
            panic!("expected error state");
        };
        assert!(message.contains("viewer"));
    }

    #[test]
    fn fetch_failure_enters_error_with_classified_message() {
        let mut board = TicketBoard::new(ViewFilter::for_date(NaiveDate::MIN));
        let generation = board.begin_load(Some(&user(Role::Manager))).unwrap();
        let err = CoreError::Auth {
            kind: AuthFailure::Expired,
        };
        let expected = err.user_message();
        board.finish_load(generation, Err(err));
        assert_eq!(board.state(), &BoardState::Error(expected));
    }

    #[test]
    fn stale_results_are_dropped() {
        let mut board = TicketBoard::new(ViewFilter::for_date(NaiveDate::MIN));
        let first = board.begin_load(Some(&user(Role::Admin))).unwrap();
        let second = board.begin_load(Some(&user(Role::Admin))).unwrap();

        assert!(board.finish_load(second, Ok(vec![ticket("new", 1)])));
        assert!(!board.finish_load(first, Ok(vec![ticket("old", 1)])));
        assert_eq!(board.tickets()[0].id, "new");
    }

    #[test]
    fn visible_follows_filter() {
        let mut board = ready_board();
        board.filter.hour = HourFilter::Hour(8);
        let ids: Vec<&str> = board.visible(&Utc).iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);

        board.filter.show_all_history = true;
        assert_eq!(board.visible(&Utc).len(), 3);
    }

    #[test]
    fn remove_ticket_removes_only_matching_id() {
        let mut board = ready_board();
        assert_eq!(board.remove_ticket("b"), 1);
        let ids: Vec<&str> = board.tickets().iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);
        assert_eq!(board.remove_ticket("zzz"), 0);
        assert_eq!(board.tickets().len(), 2);
    }

    #[test]
    fn mark_resolved_touches_one_ticket() {
        let mut board = ready_board();
        let before = board.tickets().to_vec();
        let at = Utc.with_ymd_and_hms(2024, 1, 15, 16, 0, 0).unwrap();

        assert!(board.mark_resolved("b", Some("replaced fuse".into()), at));

        let b = board.find("b").unwrap();
        assert_eq!(b.status, TicketStatus::Resolved);
        assert_eq!(b.resolved_at, Some(at));
        assert_eq!(b.notes.as_deref(), Some("replaced fuse"));
        assert_eq!(board.find("a"), before.iter().find(|t| t.id == "a"));
        assert_eq!(board.find("c"), before.iter().find(|t| t.id == "c"));
    }

    #[test]
    fn resolve_success_closes_and_clears_modal() {
        let mut board = ready_board();
        assert!(board.open_resolve("a"));
        board.resolve_draft_mut().unwrap().notes = "  rebooted  ".into();

        let (id, notes) = board.submit_resolve().unwrap();
        assert_eq!(id, "a");
        assert_eq!(notes.as_deref(), Some("rebooted"));
        assert!(board.submit_resolve().is_none(), "double submit");

        let at = Utc.with_ymd_and_hms(2024, 1, 15, 9, 0, 0).unwrap();
        assert!(board.resolve_succeeded("a", at));
        assert!(board.resolve_draft().is_none());
        assert_eq!(board.find("a").unwrap().notes.as_deref(), Some("rebooted"));
    }

    #[test]
    fn resolve_failure_keeps_modal_and_notes() {
        let mut board = ready_board();
        board.open_resolve("c");
        board.resolve_draft_mut().unwrap().notes = "tried".into();
        board.submit_resolve().unwrap();

        let message = board.resolve_failed(&CoreError::Resolve {
            id: "c".into(),
            message: "HTTP 500".into(),
        });

        let draft = board.resolve_draft().unwrap();
        assert_eq!(draft.notes, "tried");
        assert!(!draft.submitting);
        assert_eq!(draft.error.as_deref(), Some(message.as_str()));
        assert_eq!(board.find("c").unwrap().status, TicketStatus::Pending);
    }

    #[test]
    fn open_resolve_requires_known_ticket() {
        let mut board = ready_board();
        assert!(!board.open_resolve("nope"));
        assert!(board.resolve_draft().is_none());
    }

    #[test]
    fn metrics_split_visible_and_overall() {
        let mut board = ready_board();
        board.filter.hour = HourFilter::Hour(14);
        let (visible, overall) = board.metrics(&Utc);
        assert_eq!(visible.total, 1);
        assert_eq!(overall.total, 3);
        assert_eq!(overall.open, 3);
    }
}

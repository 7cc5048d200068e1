//! Ticket management screen: metrics cards, calendar filter, ticket table,
//! and the resolve-notes modal.

use std::time::{Duration, Instant};

use chrono::Local;
use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table, TableState, Wrap};
use throbber_widgets_tui::{Throbber, ThrobberState};
use tui_input::{Input, InputRequest};

use ticketdesk_core::metrics::trend;
use ticketdesk_core::{BoardState, Ticket, TicketBoard, User, ViewFilter};

use crate::action::{Action, ConfirmAction, Notification};
use crate::component::Component;
use crate::theme;
use crate::widgets::metrics_card::{CARD_HEIGHT, MetricsCard};
use crate::widgets::ticket_cells;

const PAGE: isize = 10;

pub struct TicketsScreen {
    board: TicketBoard,
    user: Option<User>,
    table_state: TableState,
    notes: Input,
    throbber_state: ThrobberState,
    loaded_at: Option<Instant>,
}

impl TicketsScreen {
    pub fn new() -> Self {
        Self {
            board: TicketBoard::new(ViewFilter::today(&Local)),
            user: None,
            table_state: TableState::default(),
            notes: Input::default(),
            throbber_state: ThrobberState::default(),
            loaded_at: None,
        }
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    fn visible(&self) -> Vec<&Ticket> {
        self.board.visible(&Local)
    }

    fn selected_index(&self) -> usize {
        self.table_state.selected().unwrap_or(0)
    }

    fn selected_ticket(&self) -> Option<&Ticket> {
        self.visible().get(self.selected_index()).copied()
    }

    fn select(&mut self, idx: usize) {
        let len = self.visible().len();
        let clamped = if len == 0 { 0 } else { idx.min(len - 1) };
        self.table_state.select(Some(clamped));
    }

    fn move_selection(&mut self, delta: isize) {
        let len = self.visible().len();
        if len == 0 {
            return;
        }
        let next = self.selected_index().saturating_add_signed(delta).min(len - 1);
        self.select(next);
    }

    /// The visible subset changed under the cursor: keep it in range.
    fn clamp_selection(&mut self) {
        self.select(self.selected_index());
    }

    fn filter_changed(&mut self) {
        self.table_state.select(Some(0));
    }

    // ── Key handling ─────────────────────────────────────────────────

    fn handle_modal_key(&mut self, key: KeyEvent) -> Option<Action> {
        if self.board.resolve_draft().is_some_and(|d| d.submitting) {
            return None;
        }

        let request = match (key.modifiers, key.code) {
            (_, KeyCode::Esc) => {
                self.board.cancel_resolve();
                self.notes.reset();
                return None;
            }
            (_, KeyCode::Enter) => {
                return self
                    .board
                    .submit_resolve()
                    .map(|(id, notes)| Action::ResolveTicket { id, notes });
            }
            (KeyModifiers::CONTROL, KeyCode::Char('u')) => InputRequest::DeleteLine,
            (KeyModifiers::CONTROL, KeyCode::Char('w')) => InputRequest::DeletePrevWord,
            (KeyModifiers::NONE | KeyModifiers::SHIFT, KeyCode::Char(c)) => {
                InputRequest::InsertChar(c)
            }
            (_, KeyCode::Backspace) => InputRequest::DeletePrevChar,
            (_, KeyCode::Delete) => InputRequest::DeleteNextChar,
            (_, KeyCode::Left) => InputRequest::GoToPrevChar,
            (_, KeyCode::Right) => InputRequest::GoToNextChar,
            (_, KeyCode::Home) => InputRequest::GoToStart,
            (_, KeyCode::End) => InputRequest::GoToEnd,
            _ => return None,
        };

        self.notes.handle(request);
        if let Some(draft) = self.board.resolve_draft_mut() {
            draft.notes = self.notes.value().to_owned();
        }
        None
    }

    fn handle_board_key(&mut self, key: KeyEvent) -> Option<Action> {
        match (key.modifiers, key.code) {
            (_, KeyCode::Char('j') | KeyCode::Down) => self.move_selection(1),
            (_, KeyCode::Char('k') | KeyCode::Up) => self.move_selection(-1),
            (KeyModifiers::CONTROL, KeyCode::Char('d')) => self.move_selection(PAGE),
            (KeyModifiers::CONTROL, KeyCode::Char('u')) => self.move_selection(-PAGE),
            (_, KeyCode::Char('g') | KeyCode::Home) => self.select(0),
            (_, KeyCode::Char('G') | KeyCode::End) => self.select(usize::MAX),

            (_, KeyCode::Char('h') | KeyCode::Left) => {
                self.board.filter.prev_day();
                self.filter_changed();
            }
            (_, KeyCode::Char('l') | KeyCode::Right) => {
                self.board.filter.next_day();
                self.filter_changed();
            }
            (_, KeyCode::Char('t')) => {
                self.board.filter.date = Local::now().date_naive();
                self.filter_changed();
            }
            (_, KeyCode::Char('[')) => {
                self.board.filter.hour = self.board.filter.hour.prev();
                self.filter_changed();
            }
            (_, KeyCode::Char(']')) => {
                self.board.filter.hour = self.board.filter.hour.next();
                self.filter_changed();
            }
            (_, KeyCode::Char('a')) => {
                self.board.filter.toggle_history();
                self.filter_changed();
            }

            (_, KeyCode::Char('R')) => return Some(Action::Reload),

            (_, KeyCode::Char('d')) if *self.board.state() == BoardState::Ready => {
                let ticket = self.selected_ticket()?;
                return Some(Action::ShowConfirm(ConfirmAction::DeleteTicket {
                    id: ticket.id.clone(),
                    subject: ticket.email_subject.clone(),
                }));
            }
            (_, KeyCode::Char('r')) if *self.board.state() == BoardState::Ready => {
                let ticket = self.selected_ticket()?;
                if ticket.is_resolved() {
                    return Some(Action::Notify(Notification::info("Ticket is already resolved")));
                }
                let id = ticket.id.clone();
                if self.board.open_resolve(&id) {
                    self.notes.reset();
                }
            }
            _ => {}
        }
        None
    }

    // ── Rendering ────────────────────────────────────────────────────

    fn render_cards(&self, frame: &mut Frame, area: Rect) {
        let (shown, overall) = self.board.metrics(&Local);
        let specs = [
            ("Tickets", "▤", shown.total, overall.total, theme::NEON_CYAN),
            ("Critical", "▲", shown.critical, overall.critical, theme::ERROR_RED),
            ("Open", "◐", shown.open, overall.open, theme::ELECTRIC_YELLOW),
            ("Resolved", "✓", shown.resolved, overall.resolved, theme::SUCCESS_GREEN),
        ];

        let columns = Layout::horizontal([Constraint::Ratio(1, 4); 4]).split(area);
        for ((title, icon, value, total, color), slot) in specs.into_iter().zip(columns.iter()) {
            let trend = trend(value, total);
            let value = value.to_string();
            frame.render_widget(
                MetricsCard {
                    title,
                    value: &value,
                    icon,
                    trend: trend.as_deref(),
                    color,
                },
                *slot,
            );
        }
    }

    fn render_filter_bar(&self, frame: &mut Frame, area: Rect) {
        let filter = &self.board.filter;
        let active = Style::default().fg(theme::NEON_CYAN);
        let muted = theme::key_hint();
        let calendar = if filter.show_all_history { muted } else { active };

        let mut spans = vec![
            Span::styled(" Date ", theme::key_hint()),
            Span::styled(format!("‹ {} ›", filter.date.format("%a %Y-%m-%d")), calendar),
            Span::styled("   Hour ", theme::key_hint()),
            Span::styled(format!("‹ {} ›", filter.hour), calendar),
            Span::styled("   History ", theme::key_hint()),
        ];
        spans.push(if filter.show_all_history {
            Span::styled("all", Style::default().fg(theme::ELECTRIC_PURPLE).add_modifier(Modifier::BOLD))
        } else {
            Span::styled("off", muted)
        });

        if let Some(at) = self.loaded_at {
            let age = Duration::from_secs(at.elapsed().as_secs());
            spans.push(Span::styled(
                format!("   loaded {} ago", humantime::format_duration(age)),
                muted,
            ));
        }

        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    fn render_table(&self, frame: &mut Frame, area: Rect) {
        let visible = self.visible();
        if visible.is_empty() {
            let msg = if self.board.tickets().is_empty() {
                "  No tickets yet."
            } else {
                "  No tickets match this date and hour. Press a to show all history."
            };
            frame.render_widget(
                Paragraph::new(Span::styled(msg, theme::key_hint())),
                area,
            );
            return;
        }

        let header = Row::new(
            ["Sent", "Site", "Severity", "Alarm", "Status", "Recipients", "Subject"]
                .into_iter()
                .map(|h| Cell::from(h).style(theme::table_header())),
        );

        let rows = visible.iter().map(|t| {
            Row::new(vec![
                Cell::from(
                    t.email_sent_at
                        .with_timezone(&Local)
                        .format("%m-%d %H:%M")
                        .to_string(),
                ),
                Cell::from(t.site_name.clone()),
                Cell::from(ticket_cells::severity_span(t.severity)),
                Cell::from(t.alarm_type.clone()),
                Cell::from(ticket_cells::status_span(t.status)),
                Cell::from(t.recipients_label()),
                Cell::from(t.email_subject.clone()),
            ])
            .style(theme::table_row())
        });

        let widths = [
            Constraint::Length(11),
            Constraint::Min(12),
            Constraint::Length(10),
            Constraint::Length(14),
            Constraint::Length(10),
            Constraint::Min(16),
            Constraint::Min(20),
        ];

        let table = Table::new(rows, widths)
            .header(header)
            .row_highlight_style(theme::table_selected());

        let mut state = self.table_state.clone();
        frame.render_stateful_widget(table, area, &mut state);
    }

    fn render_loading(&self, frame: &mut Frame, area: Rect) {
        let throbber = Throbber::default()
            .label("  Loading tickets...")
            .style(Style::default().fg(theme::NEON_CYAN))
            .throbber_style(Style::default().fg(theme::ELECTRIC_PURPLE));
        frame.render_stateful_widget(throbber, area, &mut self.throbber_state.clone());
    }

    fn render_error(frame: &mut Frame, area: Rect, message: &str) {
        let text = vec![
            Line::from(""),
            Line::from(Span::styled(
                format!("  ✗ {message}"),
                Style::default().fg(theme::ERROR_RED),
            )),
            Line::from(""),
            Line::from(vec![
                Span::styled("  Store a token with ", theme::key_hint()),
                Span::styled("ticketdesk token set", theme::key_hint_key()),
                Span::styled(", then press ", theme::key_hint()),
                Span::styled("R", theme::key_hint_key()),
                Span::styled(" to retry.", theme::key_hint()),
            ]),
        ];
        frame.render_widget(Paragraph::new(text).wrap(Wrap { trim: false }), area);
    }

    fn render_resolve_modal(&self, frame: &mut Frame, area: Rect) {
        let Some(draft) = self.board.resolve_draft() else {
            return;
        };
        let subject = self
            .board
            .find(&draft.ticket_id)
            .map_or(draft.ticket_id.as_str(), |t| t.email_subject.as_str());

        let width = 64u16.min(area.width.saturating_sub(4));
        let height = 8u16.min(area.height);
        let x = area.x + area.width.saturating_sub(width) / 2;
        let y = area.y + area.height.saturating_sub(height) / 2;
        let modal = Rect::new(x, y, width, height);

        frame.render_widget(
            Block::default().style(Style::default().bg(theme::BG_DARK)),
            modal,
        );
        let block = Block::default()
            .title(" Resolve Ticket ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_focused());
        let inner = block.inner(modal);
        frame.render_widget(block, modal);

        let rows = Layout::vertical([
            Constraint::Length(1), // subject
            Constraint::Length(1), // label
            Constraint::Length(1), // input
            Constraint::Length(1), // status / error
            Constraint::Min(0),
            Constraint::Length(1), // hints
        ])
        .split(inner);

        frame.render_widget(
            Paragraph::new(Span::styled(
                format!(" {subject}"),
                Style::default().fg(theme::DIM_WHITE),
            )),
            rows[0],
        );
        frame.render_widget(
            Paragraph::new(Span::styled(" Notes (optional)", theme::key_hint())),
            rows[1],
        );

        let field_width = rows[2].width.saturating_sub(2).max(1);
        let scroll = self.notes.visual_scroll(usize::from(field_width));
        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled(" ›", Style::default().fg(theme::ELECTRIC_PURPLE)),
                Span::styled(self.notes.value(), Style::default().fg(theme::NEON_CYAN)),
            ]))
            .scroll((0, u16::try_from(scroll).unwrap_or(u16::MAX))),
            rows[2],
        );

        if draft.submitting {
            let throbber = Throbber::default()
                .label(" Resolving...")
                .style(Style::default().fg(theme::NEON_CYAN))
                .throbber_style(Style::default().fg(theme::ELECTRIC_PURPLE));
            frame.render_stateful_widget(throbber, rows[3], &mut self.throbber_state.clone());
        } else {
            let cursor = self.notes.visual_cursor().saturating_sub(scroll);
            let cursor_x = rows[2].x + 2 + u16::try_from(cursor).unwrap_or(field_width);
            frame.set_cursor_position((cursor_x.min(rows[2].right().saturating_sub(1)), rows[2].y));

            if let Some(ref err) = draft.error {
                frame.render_widget(
                    Paragraph::new(Span::styled(
                        format!(" ✗ {err}"),
                        Style::default().fg(theme::ERROR_RED),
                    )),
                    rows[3],
                );
            }
        }

        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled(" Enter ", theme::key_hint_key()),
                Span::styled("resolve  ", theme::key_hint()),
                Span::styled("Esc ", theme::key_hint_key()),
                Span::styled("cancel", theme::key_hint()),
            ])),
            rows[5],
        );
    }
}

impl Component for TicketsScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if self.board.resolve_draft().is_some() {
            return Ok(self.handle_modal_key(key));
        }
        Ok(self.handle_board_key(key))
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::Tick => {
                if self.board.is_loading() || self.board.resolve_draft().is_some_and(|d| d.submitting) {
                    self.throbber_state.calc_next();
                }
            }

            Action::LoadFor(user) => {
                self.user.clone_from(user);
                if let Some(generation) = self.board.begin_load(user.as_ref()) {
                    return Ok(Some(Action::FetchTickets { generation }));
                }
            }

            Action::TicketsLoaded { generation, result } => {
                if self.board.finish_load(*generation, result.clone()) {
                    self.loaded_at = Some(Instant::now());
                    self.clamp_selection();
                    if result.as_ref().is_err_and(ticketdesk_core::CoreError::needs_login) {
                        return Ok(Some(Action::Notify(Notification::warning(
                            "Sign in with `ticketdesk token set`, then press R",
                        ))));
                    }
                }
            }

            Action::TicketDeleted(id) => {
                if self.board.remove_ticket(id) > 0 {
                    self.clamp_selection();
                    return Ok(Some(Action::Notify(Notification::success("Ticket deleted"))));
                }
            }

            Action::DeleteFailed { error, .. } => {
                return Ok(Some(Action::ShowNotice(error.user_message())));
            }

            Action::TicketResolved { id, at } => {
                if self.board.resolve_succeeded(id, *at) {
                    self.notes.reset();
                    return Ok(Some(Action::Notify(Notification::success("Ticket resolved"))));
                }
            }

            Action::ResolveFailed { error, .. } => {
                let message = self.board.resolve_failed(error);
                return Ok(Some(Action::ShowNotice(message)));
            }

            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let layout = Layout::vertical([
            Constraint::Length(CARD_HEIGHT),
            Constraint::Min(3),
        ])
        .split(area);

        self.render_cards(frame, layout[0]);

        let visible_count = self.visible().len();
        let title = match self.board.state() {
            BoardState::Ready => format!(" Tickets ({visible_count}) "),
            _ => " Tickets ".to_owned(),
        };
        let block = Block::default()
            .title(title)
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(if self.captures_input() {
                theme::border_default()
            } else {
                theme::border_focused()
            });
        let inner = block.inner(layout[1]);
        frame.render_widget(block, layout[1]);

        let body = Layout::vertical([
            Constraint::Length(1), // filter line
            Constraint::Min(1),    // table
        ])
        .split(inner);

        self.render_filter_bar(frame, body[0]);
        match self.board.state() {
            BoardState::Loading => self.render_loading(frame, body[1]),
            BoardState::Error(message) => Self::render_error(frame, body[1], message),
            BoardState::Ready => self.render_table(frame, body[1]),
        }

        self.render_resolve_modal(frame, area);
    }

    fn captures_input(&self) -> bool {
        self.board.resolve_draft().is_some()
    }

    fn hints(&self) -> &'static str {
        if self.captures_input() {
            "Enter resolve  Esc cancel"
        } else {
            "j/k move  h/l day  t today  [/] hour  a history  r resolve  d delete  R reload"
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};
    use pretty_assertions::assert_eq;
    use ticketdesk_core::{CoreError, CreatedBy, Role, Severity, TicketStatus};

    fn ticket(id: &str, sent: DateTime<Utc>) -> Ticket {
        Ticket {
            id: id.into(),
            alarm_id: format!("alarm-{id}"),
            site_id: "s-1".into(),
            site_name: "Harbor".into(),
            severity: Severity::Major,
            alarm_type: "door".into(),
            description: String::new(),
            recipients: vec![],
            email_sent_at: sent,
            email_subject: format!("Alarm {id}"),
            status: TicketStatus::Pending,
            created_by: CreatedBy {
                username: "system".into(),
                display_name: None,
            },
            resolved_at: None,
            notes: None,
        }
    }

    fn operator() -> User {
        User {
            username: "jdoe".into(),
            display_name: None,
            role: Role::Operator,
        }
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(screen: &mut TicketsScreen, text: &str) {
        for c in text.chars() {
            screen.handle_key_event(key(KeyCode::Char(c))).unwrap();
        }
    }

    /// A screen in `Ready` with three tickets from 2024, history on so the
    /// local time zone does not matter.
    fn ready_screen() -> TicketsScreen {
        let mut screen = TicketsScreen::new();
        let generation = match screen.update(&Action::LoadFor(Some(operator()))).unwrap() {
            Some(Action::FetchTickets { generation }) => generation,
            other => panic!("expected a fetch, got {other:?}"),
        };
        let at = Utc.with_ymd_and_hms(2024, 1, 15, 8, 30, 0).unwrap();
        let tickets = vec![ticket("a", at), ticket("b", at), ticket("c", at)];
        screen
            .update(&Action::TicketsLoaded {
                generation,
                result: Ok(tickets),
            })
            .unwrap();
        screen.handle_key_event(key(KeyCode::Char('a'))).unwrap();
        screen
    }

    #[test]
    fn loading_without_a_user_is_an_error() {
        let mut screen = TicketsScreen::new();
        assert!(screen.update(&Action::LoadFor(None)).unwrap().is_none());
        assert!(matches!(screen.board.state(), BoardState::Error(_)));
    }

    #[test]
    fn stale_load_results_are_dropped() {
        let mut screen = TicketsScreen::new();
        screen.update(&Action::LoadFor(Some(operator()))).unwrap();
        screen.update(&Action::LoadFor(Some(operator()))).unwrap();

        screen
            .update(&Action::TicketsLoaded {
                generation: 1,
                result: Ok(vec![ticket("old", Utc::now())]),
            })
            .unwrap();
        assert!(screen.board.is_loading());
    }

    #[test]
    fn expired_token_raises_a_warning() {
        let mut screen = TicketsScreen::new();
        screen.update(&Action::LoadFor(Some(operator()))).unwrap();
        let generation = screen.board.generation();
        let follow_up = screen
            .update(&Action::TicketsLoaded {
                generation,
                result: Err(CoreError::Auth {
                    kind: ticketdesk_core::AuthFailure::Expired,
                }),
            })
            .unwrap();
        assert!(matches!(follow_up, Some(Action::Notify(_))));
        assert!(matches!(screen.board.state(), BoardState::Error(_)));
    }

    #[test]
    fn navigation_clamps_to_visible_rows() {
        let mut screen = ready_screen();
        screen.handle_key_event(key(KeyCode::Char('G'))).unwrap();
        assert_eq!(screen.selected_ticket().unwrap().id, "c");
        screen.handle_key_event(key(KeyCode::Char('j'))).unwrap();
        assert_eq!(screen.selected_ticket().unwrap().id, "c");
        screen.handle_key_event(key(KeyCode::Char('g'))).unwrap();
        screen.handle_key_event(key(KeyCode::Char('k'))).unwrap();
        assert_eq!(screen.selected_ticket().unwrap().id, "a");
    }

    #[test]
    fn delete_asks_for_confirmation_first() {
        let mut screen = ready_screen();
        screen.handle_key_event(key(KeyCode::Char('j'))).unwrap();
        let action = screen.handle_key_event(key(KeyCode::Char('d'))).unwrap();
        match action {
            Some(Action::ShowConfirm(ConfirmAction::DeleteTicket { id, .. })) => assert_eq!(id, "b"),
            other => panic!("expected confirm, got {other:?}"),
        }
        assert_eq!(screen.board.tickets().len(), 3);
    }

    #[test]
    fn deleted_ticket_leaves_the_table() {
        let mut screen = ready_screen();
        screen.handle_key_event(key(KeyCode::Char('G'))).unwrap();
        screen.update(&Action::TicketDeleted("c".into())).unwrap();

        let ids: Vec<_> = screen.board.tickets().iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, ["a", "b"]);
        assert_eq!(screen.selected_ticket().unwrap().id, "b");
    }

    #[test]
    fn failed_delete_shows_a_notice_and_keeps_state() {
        let mut screen = ready_screen();
        let follow_up = screen
            .update(&Action::DeleteFailed {
                id: "a".into(),
                error: CoreError::Delete {
                    id: "a".into(),
                    message: "HTTP 500".into(),
                },
            })
            .unwrap();
        assert!(matches!(follow_up, Some(Action::ShowNotice(_))));
        assert_eq!(screen.board.tickets().len(), 3);
    }

    #[test]
    fn resolve_modal_collects_notes_and_submits() {
        let mut screen = ready_screen();
        screen.handle_key_event(key(KeyCode::Char('r'))).unwrap();
        assert!(screen.captures_input());

        // `q` and `d` are text while the modal is open
        type_text(&mut screen, " fixed door q ");
        let action = screen.handle_key_event(key(KeyCode::Enter)).unwrap();
        match action {
            Some(Action::ResolveTicket { id, notes }) => {
                assert_eq!(id, "a");
                assert_eq!(notes.as_deref(), Some("fixed door q"));
            }
            other => panic!("expected resolve request, got {other:?}"),
        }

        let at = Utc.with_ymd_and_hms(2024, 1, 15, 9, 0, 0).unwrap();
        screen
            .update(&Action::TicketResolved { id: "a".into(), at })
            .unwrap();
        assert!(!screen.captures_input());
        assert_eq!(screen.notes.value(), "");
        let a = screen.board.find("a").unwrap();
        assert_eq!(a.status, TicketStatus::Resolved);
        assert_eq!(a.notes.as_deref(), Some("fixed door q"));
    }

    #[test]
    fn resolve_failure_keeps_modal_open_with_notes() {
        let mut screen = ready_screen();
        screen.handle_key_event(key(KeyCode::Char('r'))).unwrap();
        type_text(&mut screen, "tried");
        screen.handle_key_event(key(KeyCode::Enter)).unwrap();

        let follow_up = screen
            .update(&Action::ResolveFailed {
                id: "a".into(),
                error: CoreError::Resolve {
                    id: "a".into(),
                    message: "HTTP 500".into(),
                },
            })
            .unwrap();
        assert!(matches!(follow_up, Some(Action::ShowNotice(_))));
        assert!(screen.captures_input());
        assert_eq!(screen.notes.value(), "tried");
        assert_eq!(screen.board.find("a").unwrap().status, TicketStatus::Pending);
    }

    #[test]
    fn escape_cancels_the_modal() {
        let mut screen = ready_screen();
        screen.handle_key_event(key(KeyCode::Char('r'))).unwrap();
        type_text(&mut screen, "draft");
        screen.handle_key_event(key(KeyCode::Esc)).unwrap();
        assert!(!screen.captures_input());
        assert_eq!(screen.notes.value(), "");
    }

    #[test]
    fn hour_keys_cycle_through_all() {
        let mut screen = ready_screen();
        screen.handle_key_event(key(KeyCode::Char(']'))).unwrap();
        assert_eq!(screen.board.filter.hour.to_string(), "00:00");
        screen.handle_key_event(key(KeyCode::Char('['))).unwrap();
        screen.handle_key_event(key(KeyCode::Char('['))).unwrap();
        assert_eq!(screen.board.filter.hour.to_string(), "23:00");
    }
}

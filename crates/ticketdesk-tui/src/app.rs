//! Application core: event loop, action dispatch, and the overlays drawn
//! above the ticket screen (help, delete confirmation, error notice, toast).

use std::sync::Arc;
use std::time::{Duration, Instant};

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph, Wrap};
use tokio::sync::mpsc;
use tracing::{debug, info};

use ticketdesk_core::{TicketService, User};

use crate::action::{Action, ConfirmAction, Notification, NotificationLevel};
use crate::component::Component;
use crate::data_bridge;
use crate::event::{Event, EventReader};
use crate::screens::tickets::TicketsScreen;
use crate::theme;
use crate::tui::Tui;

const TOAST_TTL: Duration = Duration::from_secs(3);

/// What the app runs as: the profile, its configured identity, and the
/// service bound to its token store.
pub struct Session {
    pub profile_name: String,
    /// Identity from the profile; falls back to the token's claims.
    pub profile_user: Option<User>,
    pub service: Arc<TicketService>,
}

impl Session {
    fn current_user(&self) -> Option<User> {
        self.profile_user
            .clone()
            .or_else(|| self.service.token_user())
    }
}

pub struct App {
    session: Session,
    screen: TicketsScreen,
    running: bool,
    help_visible: bool,
    /// Pending confirmation dialog (blocks other input while active).
    pending_confirm: Option<ConfirmAction>,
    /// Blocking error notice; only Enter/Esc get through.
    notice: Option<String>,
    notification: Option<(Notification, Instant)>,
    action_tx: mpsc::UnboundedSender<Action>,
    action_rx: mpsc::UnboundedReceiver<Action>,
}

impl App {
    pub fn new(session: Session) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        Self {
            session,
            screen: TicketsScreen::new(),
            running: true,
            help_visible: false,
            pending_confirm: None,
            notice: None,
            notification: None,
            action_tx,
            action_rx,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut tui = Tui::new()?;
        tui.enter()?;
        self.screen.init(self.action_tx.clone())?;

        // Mount: resolve the user and start the first load
        self.action_tx.send(Action::Reload)?;

        let mut events = EventReader::new(
            Duration::from_millis(250), // 4 Hz tick
            Duration::from_millis(33),  // ~30 FPS render
        );

        info!("TUI event loop started");

        while self.running {
            let Some(event) = events.next().await else {
                break;
            };

            match event {
                Event::Key(key) => {
                    if let Some(action) = self.handle_key_event(key)? {
                        self.action_tx.send(action)?;
                    }
                }
                Event::Resize(w, h) => self.action_tx.send(Action::Resize(w, h))?,
                Event::Tick => self.action_tx.send(Action::Tick)?,
                Event::Render => self.action_tx.send(Action::Render)?,
            }

            while let Ok(action) = self.action_rx.try_recv() {
                self.process_action(&action)?;

                if let Action::Render = action {
                    tui.draw(|frame| self.render(frame))?;
                }
            }
        }

        events.stop();
        info!("TUI event loop ended");
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if key.modifiers == KeyModifiers::CONTROL && key.code == KeyCode::Char('c') {
            return Ok(Some(Action::Quit));
        }

        if self.notice.is_some() {
            return Ok(match key.code {
                KeyCode::Enter | KeyCode::Esc => Some(Action::DismissNotice),
                _ => None,
            });
        }

        if self.pending_confirm.is_some() {
            return Ok(match key.code {
                KeyCode::Char('y' | 'Y') => Some(Action::ConfirmYes),
                KeyCode::Char('n' | 'N') | KeyCode::Esc => Some(Action::ConfirmNo),
                _ => None,
            });
        }

        if self.help_visible {
            return Ok(match key.code {
                KeyCode::Esc | KeyCode::Char('?') => Some(Action::ToggleHelp),
                _ => None,
            });
        }

        // The notes field gets every key, `q` included
        if self.screen.captures_input() {
            return self.screen.handle_key_event(key);
        }

        match (key.modifiers, key.code) {
            (KeyModifiers::NONE, KeyCode::Char('q')) => return Ok(Some(Action::Quit)),
            (KeyModifiers::NONE, KeyCode::Char('?')) => return Ok(Some(Action::ToggleHelp)),
            _ => {}
        }

        self.screen.handle_key_event(key)
    }

    fn process_action(&mut self, action: &Action) -> Result<()> {
        match action {
            Action::Quit => self.running = false,

            Action::Render | Action::Resize(..) => {}

            Action::Tick => {
                if self
                    .notification
                    .as_ref()
                    .is_some_and(|(_, shown)| shown.elapsed() > TOAST_TTL)
                {
                    self.notification = None;
                }
                self.forward(action)?;
            }

            Action::ToggleHelp => self.help_visible = !self.help_visible,

            Action::ShowConfirm(confirm) => self.pending_confirm = Some(confirm.clone()),
            Action::ConfirmYes => {
                if let Some(confirm) = self.pending_confirm.take() {
                    self.execute_confirm(confirm);
                }
            }
            Action::ConfirmNo => self.pending_confirm = None,

            Action::Notify(notification) => {
                self.notification = Some((notification.clone(), Instant::now()));
            }
            Action::ShowNotice(message) => self.notice = Some(message.clone()),
            Action::DismissNotice => self.notice = None,

            Action::Reload => {
                let user = self.session.current_user();
                debug!(user = ?user.as_ref().map(User::label), "reloading tickets");
                self.action_tx.send(Action::LoadFor(user))?;
            }

            Action::FetchTickets { generation } => {
                data_bridge::spawn_load(
                    Arc::clone(&self.session.service),
                    *generation,
                    self.action_tx.clone(),
                );
            }

            Action::ResolveTicket { id, notes } => {
                data_bridge::spawn_resolve(
                    Arc::clone(&self.session.service),
                    id.clone(),
                    notes.clone(),
                    self.action_tx.clone(),
                );
            }

            Action::LoadFor(_)
            | Action::TicketsLoaded { .. }
            | Action::TicketDeleted(_)
            | Action::DeleteFailed { .. }
            | Action::TicketResolved { .. }
            | Action::ResolveFailed { .. } => self.forward(action)?,
        }
        Ok(())
    }

    /// Hand an action to the screen and queue whatever it answers with.
    fn forward(&mut self, action: &Action) -> Result<()> {
        if let Some(follow_up) = self.screen.update(action)? {
            self.action_tx.send(follow_up)?;
        }
        Ok(())
    }

    fn execute_confirm(&self, confirm: ConfirmAction) {
        match confirm {
            ConfirmAction::DeleteTicket { id, .. } => {
                data_bridge::spawn_delete(
                    Arc::clone(&self.session.service),
                    id,
                    self.action_tx.clone(),
                );
            }
        }
    }

    // ── Rendering ─────────────────────────────────────────────────────

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        let layout = Layout::vertical([
            Constraint::Min(1),    // screen
            Constraint::Length(1), // status bar
        ])
        .split(area);

        self.screen.render(frame, layout[0]);
        self.render_status_bar(frame, layout[1]);

        // Overlays, last drawn is topmost
        if let Some((ref notif, _)) = self.notification {
            Self::render_notification(frame, area, notif);
        }
        if let Some(ref confirm) = self.pending_confirm {
            Self::render_confirm_dialog(frame, area, confirm);
        }
        if let Some(ref message) = self.notice {
            Self::render_notice(frame, area, message);
        }
        if self.help_visible {
            Self::render_help_overlay(frame, area);
        }
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let who = match self.screen.user() {
            Some(user) => Span::styled(
                format!("● {} ({})", user.label(), user.role),
                Style::default().fg(theme::SUCCESS_GREEN),
            ),
            None => Span::styled("○ not signed in", Style::default().fg(theme::ERROR_RED)),
        };

        let line = Line::from(vec![
            Span::raw(" "),
            who,
            Span::styled(format!(" · {}", self.session.profile_name), theme::key_hint()),
            Span::styled(format!(" │ {}", self.screen.hints()), theme::key_hint()),
            Span::styled("  ? help  q quit", theme::key_hint()),
        ]);
        frame.render_widget(Paragraph::new(line), area);
    }

    fn centered(area: Rect, width: u16, height: u16) -> Rect {
        let width = width.min(area.width.saturating_sub(4));
        let height = height.min(area.height);
        let x = area.width.saturating_sub(width) / 2;
        let y = area.height.saturating_sub(height) / 2;
        Rect::new(area.x + x, area.y + y, width, height)
    }

    fn render_help_overlay(frame: &mut Frame, area: Rect) {
        let help_area = Self::centered(area, 56, 20);

        frame.render_widget(
            Block::default().style(Style::default().bg(theme::BG_DARK)),
            help_area,
        );

        let block = Block::default()
            .title(" Keyboard Shortcuts ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_focused());
        let inner = block.inner(help_area);
        frame.render_widget(block, help_area);

        let entry = |keys: &'static str, what: &'static str| {
            Line::from(vec![
                Span::styled(format!("  {keys:<10}"), theme::key_hint_key()),
                Span::styled(what, theme::key_hint()),
            ])
        };
        let heading = |title: &'static str| {
            Line::from(Span::styled(
                format!("  {title}"),
                Style::default().fg(theme::NEON_CYAN),
            ))
        };

        let help_text = vec![
            Line::from(""),
            heading("Tickets"),
            entry("j/k ↑/↓", "Move up/down"),
            entry("g/G", "Top / bottom"),
            entry("Ctrl+d/u", "Page down / up"),
            entry("r", "Resolve with notes"),
            entry("d", "Delete (asks first)"),
            entry("R", "Reload"),
            Line::from(""),
            heading("Filter"),
            entry("h/l ←/→", "Previous / next day"),
            entry("t", "Today"),
            entry("[ / ]", "Hour down / up (all, 0-23)"),
            entry("a", "Toggle all history"),
            Line::from(""),
            heading("Global"),
            entry("?", "This help"),
            entry("q", "Quit"),
        ];
        frame.render_widget(Paragraph::new(help_text), inner);
    }

    fn render_confirm_dialog(frame: &mut Frame, area: Rect, confirm: &ConfirmAction) {
        let dialog_area = Self::centered(area, 56, 5);

        frame.render_widget(
            Block::default().style(Style::default().bg(theme::BG_DARK)),
            dialog_area,
        );

        let block = Block::default()
            .title(" Confirm ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(theme::ELECTRIC_YELLOW));
        let inner = block.inner(dialog_area);
        frame.render_widget(block, dialog_area);

        let text = vec![
            Line::from(Span::styled(
                format!("  {confirm}"),
                Style::default().fg(theme::DIM_WHITE),
            )),
            Line::from(""),
            Line::from(vec![
                Span::styled("  y ", theme::key_hint_key()),
                Span::styled("confirm    ", theme::key_hint()),
                Span::styled("n ", theme::key_hint_key()),
                Span::styled("cancel", theme::key_hint()),
            ]),
        ];
        frame.render_widget(Paragraph::new(text), inner);
    }

    fn render_notice(frame: &mut Frame, area: Rect, message: &str) {
        let notice_area = Self::centered(area, 56, 6);

        frame.render_widget(
            Block::default().style(Style::default().bg(theme::BG_DARK)),
            notice_area,
        );

        let block = Block::default()
            .title(" Error ")
            .title_style(Style::default().fg(theme::ERROR_RED))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(theme::ERROR_RED));
        let inner = block.inner(notice_area);
        frame.render_widget(block, notice_area);

        let text = vec![
            Line::from(Span::styled(
                format!(" ✗ {message}"),
                Style::default().fg(theme::DIM_WHITE),
            )),
            Line::from(""),
            Line::from(vec![
                Span::styled(" Enter ", theme::key_hint_key()),
                Span::styled("dismiss", theme::key_hint()),
            ]),
        ];
        frame.render_widget(Paragraph::new(text).wrap(Wrap { trim: false }), inner);
    }

    /// Toast in the bottom-right corner, above the status bar.
    fn render_notification(frame: &mut Frame, area: Rect, notif: &Notification) {
        let msg_len = u16::try_from(notif.message.chars().count()).unwrap_or(u16::MAX);
        let width = msg_len.saturating_add(6).clamp(20, 60).min(area.width);
        let height = 3u16;

        let x = area.width.saturating_sub(width + 1);
        let y = area.height.saturating_sub(height + 2);
        let toast_area = Rect::new(area.x + x, area.y + y, width, height.min(area.height));

        let (border_color, icon) = match notif.level {
            NotificationLevel::Success => (theme::SUCCESS_GREEN, "✓"),
            NotificationLevel::Warning => (theme::ELECTRIC_YELLOW, "!"),
            NotificationLevel::Info => (theme::NEON_CYAN, "·"),
        };

        frame.render_widget(
            Block::default().style(Style::default().bg(theme::BG_DARK)),
            toast_area,
        );

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(border_color));
        let inner = block.inner(toast_area);
        frame.render_widget(block, toast_area);

        let line = Line::from(vec![
            Span::styled(format!(" {icon} "), Style::default().fg(border_color)),
            Span::styled(notif.message.as_str(), Style::default().fg(theme::DIM_WHITE)),
        ]);
        frame.render_widget(Paragraph::new(line), inner);
    }
}

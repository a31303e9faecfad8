use std::io;
use std::time::Duration;

use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures::StreamExt;
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame, Terminal,
};

use super::events::{Action, AppEvent, Focus, Notification, NotificationLevel};
use super::layout::AppLayout;
use super::theme;
use super::views::grid::{GridResult, GridState};
use super::views::history::{HistoryResult, HistoryState};
use super::views::library::{LibraryResult, LibraryState};
use crate::core::collaborators::Answered;
use crate::core::print::Printer;
use crate::core::promo::ViewRange;
use crate::core::report::render_report;
use crate::core::workspace::{Workspace, ARCHIVE_PROMPT, RESTORE_PROMPT};

/// A destructive action waiting for a yes/no answer.
#[derive(Debug, Clone, PartialEq, Eq)]
enum PendingConfirm {
    Archive,
    Restore { session_id: String, name: String },
}

impl PendingConfirm {
    fn message(&self) -> &'static str {
        match self {
            PendingConfirm::Archive => ARCHIVE_PROMPT,
            PendingConfirm::Restore { .. } => RESTORE_PROMPT,
        }
    }
}

/// Full-year view is showing; print fires when the countdown reaches zero.
#[derive(Debug, Clone, Copy)]
struct PendingPrint {
    previous_view: ViewRange,
    ticks_left: u32,
}

/// Central application state (Elm architecture).
pub struct AppState {
    /// Whether the app is still running.
    pub running: bool,
    /// Currently focused top-level view.
    pub focus: Focus,
    workspace: Workspace,
    grid: GridState,
    library: LibraryState,
    history: HistoryState,
    /// Active notifications (max 3 visible).
    pub notifications: Vec<Notification>,
    /// Monotonic counter for notification IDs.
    notification_counter: u64,
    /// Whether the help modal is open.
    pub show_help: bool,
    confirm: Option<PendingConfirm>,
    pending_print: Option<PendingPrint>,
    printer: Box<dyn Printer>,
    print_delay_ticks: u32,
}

impl AppState {
    pub fn new(
        workspace: Workspace,
        printer: Box<dyn Printer>,
        tick_rate: Duration,
        print_delay: Duration,
    ) -> Self {
        let tick_ms = tick_rate.as_millis().max(1);
        let print_delay_ticks = print_delay.as_millis().div_ceil(tick_ms).max(1);

        let mut state = Self {
            running: true,
            focus: Focus::Grid,
            workspace,
            grid: GridState::new(),
            library: LibraryState::new(),
            history: HistoryState::new(),
            notifications: Vec::new(),
            notification_counter: 0,
            show_help: false,
            confirm: None,
            pending_print: None,
            printer,
            print_delay_ticks: u32::try_from(print_delay_ticks).unwrap_or(u32::MAX),
        };
        state.surface_failures();
        state
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn view(&self) -> ViewRange {
        self.grid.view()
    }

    // ── Elm event loop ──────────────────────────────────────────────────

    /// Main event loop: render → select → update → loop.
    pub async fn run(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
        tick_rate: Duration,
    ) -> io::Result<()> {
        let mut tick_interval = tokio::time::interval(tick_rate);
        let mut event_stream = EventStream::new();

        while self.running {
            terminal.draw(|frame| self.render(frame))?;

            tokio::select! {
                _ = tick_interval.tick() => {
                    self.on_tick();
                }
                Some(Ok(crossterm_event)) = event_stream.next() => {
                    self.handle_event(AppEvent::Input(crossterm_event));
                }
            }
        }

        Ok(())
    }

    // ── Event handling ──────────────────────────────────────────────────

    pub fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Input(crossterm_event) => {
                self.handle_input(&crossterm_event);
                self.surface_failures();
            }
            AppEvent::Action(action) => {
                self.handle_action(action);
                self.surface_failures();
            }
            AppEvent::Tick => self.on_tick(),
            AppEvent::Notification(notification) => {
                self.push_notification(notification.message, notification.level);
            }
            AppEvent::Quit => {
                self.running = false;
            }
        }
    }

    fn handle_input(&mut self, event: &Event) {
        // Priority 1: Help modal
        if self.show_help {
            if let Some(action) = self.map_help_input(event) {
                self.handle_action(action);
            }
            return;
        }

        // Priority 2: Confirmation modal
        if self.confirm.is_some() {
            self.handle_confirm_input(event);
            return;
        }

        // Priority 3: Focused view
        if self.dispatch_view_input(event) {
            return;
        }

        // Priority 4: Global keybindings
        if let Some(action) = self.map_input_to_action(event) {
            self.handle_action(action);
        }
    }

    /// Dispatch input to the currently focused view. Returns true if consumed.
    fn dispatch_view_input(&mut self, event: &Event) -> bool {
        match self.focus {
            Focus::Grid => match self.grid.handle_input(event, &mut self.workspace) {
                Some(GridResult::Consumed) => true,
                Some(GridResult::Captured(pkg)) => {
                    self.push_notification(format!("Saved '{pkg}' to library"), NotificationLevel::Info);
                    true
                }
                None => false,
            },
            Focus::Library => match self.library.handle_input(event, &mut self.workspace) {
                Some(LibraryResult::Consumed) => true,
                Some(LibraryResult::Notify(level, message)) => {
                    self.push_notification(message, level);
                    true
                }
                None => false,
            },
            Focus::History => match self.history.handle_input(event, &self.workspace) {
                Some(HistoryResult::Consumed) => true,
                Some(HistoryResult::Restore(session_id)) => {
                    if let Some(session) = self.workspace.history().get(&session_id) {
                        self.confirm = Some(PendingConfirm::Restore {
                            name: session.name.clone(),
                            session_id,
                        });
                    }
                    true
                }
                None => false,
            },
        }
    }

    fn handle_confirm_input(&mut self, event: &Event) {
        let Event::Key(KeyEvent {
            code,
            kind: KeyEventKind::Press,
            ..
        }) = event
        else {
            return;
        };
        let answer = match code {
            KeyCode::Char('y') | KeyCode::Char('Y') => true,
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => false,
            _ => return,
        };
        let Some(pending) = self.confirm.take() else {
            return;
        };

        match pending {
            PendingConfirm::Archive => {
                if let Some(session) = self.workspace.archive_and_reset(&Answered(answer)) {
                    let message = format!("Archived as '{}'", session.name);
                    self.push_notification(message, NotificationLevel::Success);
                }
            }
            PendingConfirm::Restore { session_id, name } => {
                if self.workspace.restore_session(&session_id, &Answered(answer)) {
                    self.push_notification(format!("Restored '{name}'"), NotificationLevel::Success);
                    self.focus = Focus::Grid;
                }
            }
        }
    }

    // ── Input mapping ───────────────────────────────────────────────────

    /// Map help modal input to action.
    fn map_help_input(&self, event: &Event) -> Option<Action> {
        let Event::Key(KeyEvent {
            code,
            kind: KeyEventKind::Press,
            ..
        }) = event
        else {
            return None;
        };
        match code {
            KeyCode::Esc | KeyCode::Char('?') => Some(Action::CloseHelp),
            _ => None,
        }
    }

    fn map_input_to_action(&self, event: &Event) -> Option<Action> {
        let Event::Key(KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            ..
        }) = *event
        else {
            return None;
        };

        match (modifiers, code) {
            // Ctrl+C → quit
            (KeyModifiers::CONTROL, KeyCode::Char('c')) => Some(Action::Quit),
            (KeyModifiers::NONE | KeyModifiers::SHIFT, _) => match code {
                KeyCode::Char('q') => Some(Action::Quit),
                KeyCode::Char('?') => Some(Action::ShowHelp),
                KeyCode::Tab => Some(Action::TabNext),
                KeyCode::BackTab => Some(Action::TabPrev),
                KeyCode::Char('1') => Some(Action::FocusGrid),
                KeyCode::Char('2') => Some(Action::FocusLibrary),
                KeyCode::Char('3') => Some(Action::FocusHistory),
                KeyCode::Char('v') => Some(Action::CycleView),
                KeyCode::Char('P') => Some(Action::Print),
                KeyCode::Char('R') => Some(Action::ArchiveAndReset),
                _ => None,
            },
            _ => None,
        }
    }

    fn handle_action(&mut self, action: Action) {
        match action {
            Action::Quit => self.running = false,
            Action::FocusGrid => self.focus = Focus::Grid,
            Action::FocusLibrary => self.focus = Focus::Library,
            Action::FocusHistory => self.focus = Focus::History,
            Action::TabNext => self.focus = self.focus.next(),
            Action::TabPrev => self.focus = self.focus.prev(),
            Action::ShowHelp => self.show_help = true,
            Action::CloseHelp => self.show_help = false,
            Action::CycleView => {
                if self.pending_print.is_none() {
                    self.grid.set_view(self.grid.view().next());
                }
            }
            Action::Print => self.request_print(),
            Action::ArchiveAndReset => self.confirm = Some(PendingConfirm::Archive),
        }
    }

    // ── Printing ────────────────────────────────────────────────────────

    fn request_print(&mut self) {
        if self.pending_print.is_some() {
            log::debug!("Print already pending, ignoring request");
            return;
        }
        self.pending_print = Some(PendingPrint {
            previous_view: self.grid.view(),
            ticks_left: self.print_delay_ticks,
        });
        self.grid.set_view(ViewRange::FullYear);
        self.focus = Focus::Grid;
    }

    fn fire_print(&mut self, previous_view: ViewRange) {
        let report = render_report(
            self.workspace.chains(),
            self.workspace.plan(),
            ViewRange::FullYear.months(),
        );
        match self.printer.print(&report) {
            Ok(path) => self.push_notification(
                format!("Printed to {}", path.display()),
                NotificationLevel::Success,
            ),
            Err(e) => {
                log::error!("Print failed: {e}");
                self.push_notification(format!("Print failed: {e}"), NotificationLevel::Error);
            }
        }
        self.grid.set_view(previous_view);
    }

    // ── Notifications ───────────────────────────────────────────────────

    /// Push a notification (dedup by message, max 3).
    pub fn push_notification(&mut self, message: String, level: NotificationLevel) {
        if self.notifications.iter().any(|n| n.message == message) {
            return;
        }

        self.notification_counter += 1;
        self.notifications.push(Notification {
            id: self.notification_counter,
            message,
            level,
            ttl_ticks: 100,
        });

        while self.notifications.len() > 3 {
            self.notifications.remove(0);
        }
    }

    /// Turn recorded persistence failures into error notifications.
    fn surface_failures(&mut self) {
        for failure in self.workspace.take_failures() {
            self.push_notification(format!("Save failed: {failure}"), NotificationLevel::Error);
        }
    }

    /// Tick: decrement notification TTLs, dismiss expired, advance a pending print.
    fn on_tick(&mut self) {
        for n in &mut self.notifications {
            n.ttl_ticks = n.ttl_ticks.saturating_sub(1);
        }
        self.notifications.retain(|n| n.ttl_ticks > 0);

        if let Some(pending) = &mut self.pending_print {
            pending.ticks_left = pending.ticks_left.saturating_sub(1);
            if pending.ticks_left == 0 {
                let previous = pending.previous_view;
                self.pending_print = None;
                self.fire_print(previous);
            }
        }
    }

    // ── Rendering ───────────────────────────────────────────────────────

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();
        let layout = AppLayout::compute(area);

        self.render_tabs(frame, layout.header);
        self.render_content(frame, layout.main);
        self.render_status_bar(frame, layout.status);

        // Overlays
        self.render_notifications(frame, area);

        if let Some(pending) = &self.confirm {
            self.render_confirm(frame, area, pending);
        }

        if self.show_help {
            self.render_help_modal(frame, area);
        }
    }

    fn render_tabs(&self, frame: &mut Frame, area: Rect) {
        let mut spans = vec![Span::raw(" ")];
        for (i, focus) in Focus::ALL.iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled(" │ ", theme::dim()));
            }
            let style = if *focus == self.focus { theme::highlight() } else { theme::muted() };
            spans.push(Span::styled(format!("{} ", i + 1), theme::key_hint()));
            spans.push(Span::styled(focus.label(), style));
        }
        spans.push(Span::raw("   "));
        spans.push(Span::styled("View: ", theme::muted()));
        spans.push(Span::styled(self.grid.view().label(), theme::heading()));

        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    fn render_content(&self, frame: &mut Frame, area: Rect) {
        match self.focus {
            Focus::Grid => self.grid.render(frame, area, &self.workspace),
            Focus::Library => self.library.render(frame, area, &self.workspace),
            Focus::History => self.history.render(frame, area, &self.workspace),
        }
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let editing = (self.focus == Focus::Grid && self.grid.is_editing())
            || (self.focus == Focus::Library && self.library.is_form_open());
        let mode_indicator = if editing {
            Span::styled(" EDIT ", theme::insert_badge())
        } else {
            Span::raw("")
        };

        let print_status = if self.pending_print.is_some() {
            Span::styled("printing…", Style::default().fg(theme::PRIMARY_LIGHT))
        } else {
            Span::styled("ready", Style::default().fg(theme::TEXT_MUTED))
        };

        let status = Line::from(vec![
            Span::styled(" PROMO TRACKER ", theme::brand_badge()),
            Span::raw(" "),
            mode_indicator,
            Span::raw(" "),
            Span::styled(
                self.focus.label(),
                Style::default()
                    .fg(theme::PRIMARY_LIGHT)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(" │ "),
            print_status,
            Span::raw(" │ "),
            Span::styled("v", theme::key_hint()),
            Span::raw(":view "),
            Span::styled("P", theme::key_hint()),
            Span::raw(":print "),
            Span::styled("R", theme::key_hint()),
            Span::raw(":archive "),
            Span::styled("?", theme::key_hint()),
            Span::raw(":help "),
            Span::styled("q", theme::key_hint()),
            Span::raw(":quit"),
        ]);

        frame.render_widget(Paragraph::new(status), area);
    }

    fn render_notifications(&self, frame: &mut Frame, area: Rect) {
        if self.notifications.is_empty() {
            return;
        }

        let max_width = 50.min(area.width.saturating_sub(2));
        let height = self.notifications.len() as u16;
        let x = area.width.saturating_sub(max_width + 1);
        let y = 1;

        let notification_area = Rect::new(x, y, max_width, height);

        let lines: Vec<Line> = self
            .notifications
            .iter()
            .map(|n| {
                let (prefix, color) = match n.level {
                    NotificationLevel::Info => ("ℹ", theme::INFO),
                    NotificationLevel::Success => ("✓", theme::SUCCESS),
                    NotificationLevel::Warning => ("⚠", theme::WARNING),
                    NotificationLevel::Error => ("✗", theme::ERROR),
                };
                Line::from(vec![
                    Span::styled(
                        format!(" {prefix} "),
                        Style::default().fg(color).add_modifier(Modifier::BOLD),
                    ),
                    Span::raw(n.message.as_str()),
                ])
            })
            .collect();

        frame.render_widget(Clear, notification_area);
        frame.render_widget(Paragraph::new(lines), notification_area);
    }

    fn render_confirm(&self, frame: &mut Frame, area: Rect, pending: &PendingConfirm) {
        let modal_area = centered_rect(44, 30, area);

        let mut lines = vec![
            Line::raw(""),
            Line::from(Span::styled(format!("  {}", pending.message()), theme::title())),
            Line::raw(""),
        ];
        if let PendingConfirm::Restore { name, .. } = pending {
            lines.push(Line::from(vec![
                Span::raw("  "),
                Span::styled(name.clone(), theme::heading()),
                Span::styled(" replaces the current plan.", theme::muted()),
            ]));
            lines.push(Line::raw(""));
        }
        lines.push(Line::from(vec![
            Span::raw("  "),
            Span::styled("[Y]", Style::default().fg(theme::ERROR).add_modifier(Modifier::BOLD)),
            Span::raw("es  "),
            Span::styled("[N]", Style::default().fg(theme::SUCCESS).add_modifier(Modifier::BOLD)),
            Span::raw("o"),
        ]));

        let block = Block::default()
            .title(" Confirm ")
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::ERROR));

        frame.render_widget(Clear, modal_area);
        frame.render_widget(Paragraph::new(lines).block(block), modal_area);
    }

    fn render_help_modal(&self, frame: &mut Frame, area: Rect) {
        let modal = centered_rect(60, 80, area);

        let keybindings = [
            ("Global:", ""),
            ("q", "Quit application"),
            ("?", "Toggle this help"),
            ("Tab / Shift+Tab", "Next / previous view"),
            ("1-3", "Plan / Library / History"),
            ("v", "Cycle JAN-JUN / JUL-DEC / FULL YEAR"),
            ("P", "Print full year"),
            ("R", "Archive plan and start fresh"),
            ("Ctrl+C", "Force quit"),
            ("", ""),
            ("Plan:", ""),
            ("h/j/k/l", "Move between cells"),
            ("Enter / i", "Edit cell"),
            ("Esc / Enter", "Finish editing (Esc for notes)"),
            ("o / Space", "Status and library options"),
            ("n", "Add row to chain"),
            ("x", "Remove row (chains with 2+ rows)"),
            ("", ""),
            ("Library:", ""),
            ("a", "Add promotion"),
            ("d", "Delete selected"),
            ("j/k", "Select"),
            ("", ""),
            ("History:", ""),
            ("j/k", "Select version"),
            ("Enter", "Restore version"),
        ];

        let mut lines = vec![
            Line::raw(""),
            Line::from(Span::styled(" Keybindings", theme::title())),
            Line::raw(""),
        ];

        for (key, desc) in keybindings {
            if key.is_empty() {
                lines.push(Line::raw(""));
            } else if desc.is_empty() {
                lines.push(Line::from(Span::styled(format!("  {key}"), theme::title())));
            } else {
                lines.push(Line::from(vec![
                    Span::raw("  "),
                    Span::styled(
                        format!("{:<18}", key),
                        Style::default()
                            .fg(theme::PRIMARY_LIGHT)
                            .add_modifier(Modifier::BOLD),
                    ),
                    Span::raw(desc),
                ]));
            }
        }

        lines.push(Line::raw(""));
        lines.push(Line::from(vec![
            Span::raw("  Press "),
            Span::styled("?", theme::highlight()),
            Span::raw(" or "),
            Span::styled("Esc", theme::highlight()),
            Span::raw(" to close"),
        ]));

        let block = Block::default()
            .title(" Help ")
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::ACCENT));

        frame.render_widget(Clear, modal);
        frame.render_widget(Paragraph::new(lines).block(block), modal);
    }
}

/// Calculate a centered rect using percentage of parent area.
pub(super) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::vertical([
        Constraint::Percentage((100 - percent_y) / 2),
        Constraint::Percentage(percent_y),
        Constraint::Percentage((100 - percent_y) / 2),
    ])
    .split(area);

    Layout::horizontal([
        Constraint::Percentage((100 - percent_x) / 2),
        Constraint::Percentage(percent_x),
        Constraint::Percentage((100 - percent_x) / 2),
    ])
    .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::path::PathBuf;
    use std::rc::Rc;

    use chrono::{Local, TimeZone};

    use super::*;
    use crate::core::collaborators::{FixedClock, SequentialIds};
    use crate::core::print::PrintError;
    use crate::core::promo::{CellEdit, ChainConfig, Month};
    use crate::core::storage::StorageError;
    use crate::core::workspace::{StateChange, StateObserver};

    #[derive(Clone, Default)]
    struct RecordingPrinter(Rc<RefCell<Vec<String>>>);

    impl Printer for RecordingPrinter {
        fn print(&self, report: &str) -> Result<PathBuf, PrintError> {
            self.0.borrow_mut().push(report.to_string());
            Ok(PathBuf::from("/tmp/promo-plan.txt"))
        }
    }

    struct FailingObserver;

    impl StateObserver for FailingObserver {
        fn on_change(&mut self, _change: StateChange<'_>) -> Result<(), StorageError> {
            Err(StorageError::write(
                "promo_planning_data",
                io::Error::new(io::ErrorKind::Other, "disk full"),
            ))
        }
    }

    fn workspace() -> Workspace {
        Workspace::empty(
            ChainConfig::defaults(),
            Box::new(SequentialIds::new("id")),
            Box::new(FixedClock(Local.with_ymd_and_hms(2026, 10, 14, 9, 0, 0).unwrap())),
        )
    }

    /// 50 ms ticks with a 100 ms print delay: prints on the second tick.
    fn app_with(ws: Workspace) -> (AppState, RecordingPrinter) {
        let printer = RecordingPrinter::default();
        let app = AppState::new(
            ws,
            Box::new(printer.clone()),
            Duration::from_millis(50),
            Duration::from_millis(100),
        );
        (app, printer)
    }

    fn key(app: &mut AppState, code: KeyCode, modifiers: KeyModifiers) {
        app.handle_event(AppEvent::Input(Event::Key(KeyEvent::new(code, modifiers))));
    }

    fn press(app: &mut AppState, c: char) {
        let modifiers = if c.is_ascii_uppercase() { KeyModifiers::SHIFT } else { KeyModifiers::NONE };
        key(app, KeyCode::Char(c), modifiers);
    }

    #[test]
    fn test_print_switches_view_then_restores() {
        let (mut app, printer) = app_with(workspace());
        press(&mut app, 'v');
        assert_eq!(app.view(), ViewRange::SecondHalf);

        press(&mut app, 'P');
        assert_eq!(app.view(), ViewRange::FullYear);
        app.handle_event(AppEvent::Tick);
        assert!(printer.0.borrow().is_empty());
        app.handle_event(AppEvent::Tick);

        let reports = printer.0.borrow();
        assert_eq!(reports.len(), 1);
        assert!(reports[0].contains("DEC"));
        assert_eq!(app.view(), ViewRange::SecondHalf);
        assert!(app
            .notifications
            .iter()
            .any(|n| n.level == NotificationLevel::Success));
    }

    #[test]
    fn test_second_print_request_is_ignored() {
        let (mut app, printer) = app_with(workspace());
        press(&mut app, 'P');
        press(&mut app, 'P');
        press(&mut app, 'v');
        for _ in 0..5 {
            app.handle_event(AppEvent::Tick);
        }
        assert_eq!(printer.0.borrow().len(), 1);
        assert_eq!(app.view(), ViewRange::FirstHalf);
    }

    #[test]
    fn test_archive_requires_confirmation() {
        let (mut app, _) = app_with(workspace());
        press(&mut app, 'R');
        press(&mut app, 'n');
        assert!(app.workspace().history().is_empty());

        press(&mut app, 'R');
        // Unrelated keys leave the prompt open.
        press(&mut app, 'j');
        press(&mut app, 'y');
        assert_eq!(app.workspace().history().len(), 1);
        assert_eq!(app.workspace().history().sessions()[0].name, "Promo Plan - 10/14/2026");
    }

    #[test]
    fn test_restore_from_history_panel() {
        let mut ws = workspace();
        let row = ws.plan().rows("hucks")[0].id.clone();
        ws.update_cell("hucks", &row, Month::May, CellEdit::Pkg("Slurpee".into()));
        ws.archive_and_reset(&Answered(true));
        let (mut app, _) = app_with(ws);

        press(&mut app, '3');
        assert_eq!(app.focus, Focus::History);
        key(&mut app, KeyCode::Enter, KeyModifiers::NONE);
        press(&mut app, 'y');

        assert_eq!(app.focus, Focus::Grid);
        let entry = app.workspace().plan().row("hucks", &row).unwrap().entry(Month::May).clone();
        assert_eq!(entry.pkg, "Slurpee");
    }

    #[test]
    fn test_save_failures_become_notifications() {
        let mut ws = workspace();
        ws.attach(Box::new(FailingObserver));
        let (mut app, _) = app_with(ws);
        press(&mut app, 'n');
        assert!(app
            .notifications
            .iter()
            .any(|n| n.level == NotificationLevel::Error && n.message.contains("disk full")));
    }

    #[test]
    fn test_grid_capture_notifies() {
        let (mut app, _) = app_with(workspace());
        press(&mut app, 'i');
        for c in "Cola 2L".chars() {
            press(&mut app, c);
        }
        key(&mut app, KeyCode::Esc, KeyModifiers::NONE);
        assert_eq!(app.workspace().library().len(), 1);
        assert!(app.notifications.iter().any(|n| n.message.contains("Cola 2L")));
    }

    #[test]
    fn test_quit_and_help() {
        let (mut app, _) = app_with(workspace());
        press(&mut app, '?');
        assert!(app.show_help);
        press(&mut app, 'q');
        assert!(app.running);
        key(&mut app, KeyCode::Esc, KeyModifiers::NONE);
        assert!(!app.show_help);
        press(&mut app, 'q');
        assert!(!app.running);
    }

    #[test]
    fn test_tab_cycles_focus() {
        let (mut app, _) = app_with(workspace());
        key(&mut app, KeyCode::Tab, KeyModifiers::NONE);
        assert_eq!(app.focus, Focus::Library);
        key(&mut app, KeyCode::BackTab, KeyModifiers::SHIFT);
        assert_eq!(app.focus, Focus::Grid);
    }

    #[test]
    fn test_notification_dedup_and_cap() {
        let (mut app, _) = app_with(workspace());
        app.push_notification("same".into(), NotificationLevel::Info);
        app.push_notification("same".into(), NotificationLevel::Info);
        assert_eq!(app.notifications.len(), 1);
        for i in 0..5 {
            app.push_notification(format!("n{i}"), NotificationLevel::Info);
        }
        assert_eq!(app.notifications.len(), 3);
        assert_eq!(app.notifications[2].message, "n4");
    }

    #[test]
    fn test_centered_rect() {
        let area = Rect::new(0, 0, 100, 50);
        let centered = centered_rect(50, 50, area);
        assert!(centered.x > 0);
        assert!(centered.y > 0);
        assert!(centered.x + centered.width <= area.width);
        assert!(centered.y + centered.height <= area.height);
    }
}

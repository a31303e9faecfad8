//! Archived plan versions, newest first. `Enter` asks to restore the selected one.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::core::promo::SavedSession;
use crate::core::workspace::Workspace;
use crate::tui::theme;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryResult {
    Consumed,
    /// Restore the session with this id (after confirmation).
    Restore(String),
}

#[derive(Debug, Default)]
pub struct HistoryState {
    selected: usize,
}

impl HistoryState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle_input(&mut self, event: &Event, ws: &Workspace) -> Option<HistoryResult> {
        let Event::Key(KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            ..
        }) = event
        else {
            return None;
        };

        let sessions = ws.history().sessions();
        self.selected = self.selected.min(sessions.len().saturating_sub(1));
        match code {
            KeyCode::Char('j') | KeyCode::Down => {
                if self.selected + 1 < sessions.len() {
                    self.selected += 1;
                }
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.selected = self.selected.saturating_sub(1);
            }
            KeyCode::Enter => {
                return sessions
                    .get(self.selected)
                    .map(|s| HistoryResult::Restore(s.id.clone()))
                    .or(Some(HistoryResult::Consumed));
            }
            _ => return None,
        }
        Some(HistoryResult::Consumed)
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, ws: &Workspace) {
        let block = theme::block_focused("History");
        let sessions = ws.history().sessions();

        let mut lines = Vec::new();
        if sessions.is_empty() {
            lines.push(Line::raw(""));
            lines.push(Line::from(Span::styled("  No previous versions", theme::muted())));
        }

        let visible = (block.inner(area).height as usize / 2).max(1);
        let offset = (self.selected + 1).saturating_sub(visible);
        for (i, session) in sessions.iter().enumerate().skip(offset).take(visible) {
            lines.extend(session_lines(session, i == self.selected));
        }

        frame.render_widget(Paragraph::new(lines).block(block), area);
    }
}

fn session_lines(session: &SavedSession, selected: bool) -> [Line<'static>; 2] {
    let cursor = if selected { "▸ " } else { "  " };
    let name_style = if selected { theme::highlight() } else { Style::default().fg(theme::TEXT) };
    [
        Line::from(vec![
            Span::styled(cursor, theme::highlight()),
            Span::styled(session.name.clone(), name_style),
        ]),
        Line::from(vec![
            Span::raw("    "),
            Span::styled(session.display_time(), theme::muted()),
            Span::styled(format!("  · {} rows", session.data.total_rows()), theme::dim()),
        ]),
    ]
}

//! Library manager: reusable promotion templates.
//!
//! Press `a` to add a template by hand, `d` to delete the selected card
//! (immediately, no confirmation). `j`/`k` move the selection.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::core::promo::{LibraryCandidate, LibraryPromotion, Rejected};
use crate::core::workspace::Workspace;
use crate::tui::app::centered_rect;
use crate::tui::events::NotificationLevel;
use crate::tui::theme;
use crate::tui::widgets::input_buffer::InputBuffer;

// ── Form ────────────────────────────────────────────────────────────────────

struct LibraryForm {
    labels: [&'static str; 4],
    values: [String; 4],
    focused: usize,
}

impl LibraryForm {
    const NAME: usize = 0;
    const PKG: usize = 1;

    fn new() -> Self {
        Self {
            labels: ["Name", "Pkg", "Cost", "SRP"],
            values: Default::default(),
            focused: 0,
        }
    }

    /// Name and pkg must be non-blank.
    fn is_valid(&self) -> bool {
        !self.values[Self::NAME].trim().is_empty() && !self.values[Self::PKG].trim().is_empty()
    }

    fn to_candidate(&self) -> LibraryCandidate {
        let [name, pkg, cost, srp] = self.values.clone();
        LibraryCandidate { name, pkg, cost, srp }
    }
}

// ── State ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LibraryResult {
    Consumed,
    Notify(NotificationLevel, String),
}

pub struct LibraryState {
    selected: usize,
    form: Option<LibraryForm>,
    input: InputBuffer,
}

impl Default for LibraryState {
    fn default() -> Self {
        Self::new()
    }
}

impl LibraryState {
    pub fn new() -> Self {
        Self {
            selected: 0,
            form: None,
            input: InputBuffer::new(),
        }
    }

    pub fn is_form_open(&self) -> bool {
        self.form.is_some()
    }

    // ── Input handling ──────────────────────────────────────────────────

    pub fn handle_input(&mut self, event: &Event, ws: &mut Workspace) -> Option<LibraryResult> {
        let Event::Key(KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            ..
        }) = event
        else {
            return None;
        };

        if self.form.is_some() {
            return self.handle_form_input(*code, *modifiers, ws);
        }

        let count = ws.library().len();
        match (*modifiers, *code) {
            (KeyModifiers::NONE, KeyCode::Char('j') | KeyCode::Down) => {
                if self.selected + 1 < count {
                    self.selected += 1;
                }
            }
            (KeyModifiers::NONE, KeyCode::Char('k') | KeyCode::Up) => {
                self.selected = self.selected.saturating_sub(1);
            }
            (KeyModifiers::NONE, KeyCode::Char('a')) => {
                self.form = Some(LibraryForm::new());
                self.input.clear();
            }
            (KeyModifiers::NONE, KeyCode::Char('d')) => {
                let Some(promo) = ws.library().entries().get(self.selected) else {
                    return Some(LibraryResult::Consumed);
                };
                let (id, name) = (promo.id.clone(), promo.name.clone());
                ws.delete_from_library(&id);
                self.selected = self.selected.min(ws.library().len().saturating_sub(1));
                return Some(LibraryResult::Notify(
                    NotificationLevel::Info,
                    format!("Deleted '{name}'"),
                ));
            }
            _ => return None,
        }
        Some(LibraryResult::Consumed)
    }

    fn handle_form_input(
        &mut self,
        code: KeyCode,
        modifiers: KeyModifiers,
        ws: &mut Workspace,
    ) -> Option<LibraryResult> {
        if modifiers == KeyModifiers::CONTROL && code == KeyCode::Char('c') {
            return None;
        }
        let mut form = self.form.take()?;

        match code {
            KeyCode::Esc => return Some(LibraryResult::Consumed),
            KeyCode::Tab | KeyCode::Down => {
                form.values[form.focused] = self.input.text().to_string();
                form.focused = (form.focused + 1) % form.labels.len();
                self.input = InputBuffer::with_text(&form.values[form.focused]);
            }
            KeyCode::BackTab | KeyCode::Up => {
                form.values[form.focused] = self.input.text().to_string();
                form.focused = (form.focused + form.labels.len() - 1) % form.labels.len();
                self.input = InputBuffer::with_text(&form.values[form.focused]);
            }
            KeyCode::Enter => {
                form.values[form.focused] = self.input.text().to_string();
                if !form.is_valid() {
                    self.form = Some(form);
                    return Some(LibraryResult::Consumed);
                }
                let candidate = form.to_candidate();
                let name = candidate.name.clone();
                self.input.clear();
                return Some(match ws.add_to_library(candidate) {
                    Ok(_) => {
                        self.selected = ws.library().len().saturating_sub(1);
                        LibraryResult::Notify(NotificationLevel::Success, format!("Added '{name}'"))
                    }
                    Err(Rejected::Duplicate) => LibraryResult::Notify(
                        NotificationLevel::Warning,
                        "Already in library".to_string(),
                    ),
                    Err(Rejected::KeyTooShort) => LibraryResult::Notify(
                        NotificationLevel::Warning,
                        "Pkg is too short".to_string(),
                    ),
                });
            }
            _ => {
                let key = KeyEvent::new(code, modifiers);
                self.input.handle_key(key);
            }
        }

        self.form = Some(form);
        Some(LibraryResult::Consumed)
    }

    // ── Rendering ───────────────────────────────────────────────────────

    pub fn render(&self, frame: &mut Frame, area: Rect, ws: &Workspace) {
        let block = theme::block_focused("Library");
        let entries = ws.library().entries();

        let mut lines = Vec::new();
        if entries.is_empty() {
            lines.push(Line::raw(""));
            lines.push(Line::from(Span::styled("  Your library is empty.", theme::muted())));
            lines.push(Line::from(vec![
                Span::raw("  Press "),
                Span::styled("a", theme::highlight()),
                Span::raw(" to add one, or type a pkg in the grid."),
            ]));
        }

        let visible = (block.inner(area).height as usize / 3).max(1);
        let offset = (self.selected + 1).saturating_sub(visible);
        for (i, promo) in entries.iter().enumerate().skip(offset).take(visible) {
            lines.extend(card_lines(promo, i == self.selected));
        }

        frame.render_widget(Paragraph::new(lines).block(block), area);

        if let Some(form) = &self.form {
            self.render_form_modal(frame, area, form);
        }
    }

    fn render_form_modal(&self, frame: &mut Frame, area: Rect, form: &LibraryForm) {
        let modal_area = centered_rect(50, 50, area);

        let mut lines = vec![
            Line::raw(""),
            Line::from(Span::styled("  New library promotion", theme::title())),
            Line::raw(""),
        ];

        for (i, label) in form.labels.iter().enumerate() {
            let is_focused = i == form.focused;
            let marker = if is_focused { "▸" } else { " " };
            let label_style = if is_focused { theme::highlight() } else { theme::muted() };
            let (display_val, val_style) = if is_focused {
                let (before, after) = self.input.split_at_cursor();
                (format!("{before}▎{after}"), Style::default().fg(theme::TEXT))
            } else if form.values[i].is_empty() {
                ("(empty)".to_string(), theme::dim())
            } else {
                (form.values[i].clone(), Style::default())
            };

            lines.push(Line::from(vec![
                Span::raw(format!("  {marker} ")),
                Span::styled(format!("{:<8}", format!("{label}:")), label_style),
                Span::styled(display_val, val_style),
            ]));
        }

        let mut pending = LibraryForm::new();
        pending.values = form.values.clone();
        pending.values[form.focused] = self.input.text().to_string();
        if !pending.is_valid() {
            lines.push(Line::raw(""));
            lines.push(Line::from(vec![
                Span::raw("  "),
                Span::styled("⚠ Name and pkg are required", Style::default().fg(theme::ERROR)),
            ]));
        }

        lines.push(Line::raw(""));
        lines.push(Line::from(vec![
            Span::raw("  "),
            Span::styled("Tab/↓↑", theme::key_hint()),
            Span::raw(":fields "),
            Span::styled("Enter", theme::key_hint()),
            Span::raw(":save "),
            Span::styled("Esc", theme::key_hint()),
            Span::raw(":cancel"),
        ]));

        let block = Block::default()
            .title(" Add to Library ")
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::ACCENT));

        frame.render_widget(Clear, modal_area);
        frame.render_widget(Paragraph::new(lines).block(block), modal_area);
    }
}

fn or_na(value: &str) -> &str {
    if value.trim().is_empty() {
        "N/A"
    } else {
        value
    }
}

/// Three lines per card: name, pkg / cost / srp, spacer.
fn card_lines(promo: &LibraryPromotion, selected: bool) -> Vec<Line<'static>> {
    let cursor = if selected { "▸ " } else { "  " };
    let name_style = if selected {
        theme::highlight()
    } else {
        Style::default().fg(theme::TEXT).add_modifier(Modifier::BOLD)
    };
    vec![
        Line::from(vec![
            Span::styled(cursor, theme::highlight()),
            Span::styled(or_na(&promo.name).to_string(), name_style),
        ]),
        Line::from(vec![
            Span::raw("    "),
            Span::styled("PKG ", theme::muted()),
            Span::raw(or_na(&promo.pkg).to_string()),
            Span::styled("  COST ", theme::muted()),
            Span::raw(or_na(&promo.cost).to_string()),
            Span::styled("  SRP ", theme::muted()),
            Span::raw(or_na(&promo.srp).to_string()),
        ]),
        Line::raw(""),
    ]
}

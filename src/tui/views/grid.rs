//! Plan grid: chains × rows × months, four field lines per row.
//!
//! Navigate with h/j/k/l, `Enter`/`i` to edit the cell under the cursor, `o`
//! or Space for the status / library options panel, `n` to add a row to the
//! current chain and `x` to remove the current row (only offered when the
//! chain has more than one). Every keystroke while editing is written
//! straight through to the workspace.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    layout::{Alignment, Constraint, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table},
    Frame,
};

use crate::core::promo::{CellEdit, Month, PromoEntry, PromotionStatus, ViewRange};
use crate::core::workspace::Workspace;
use crate::tui::app::centered_rect;
use crate::tui::theme;
use crate::tui::widgets::input_buffer::InputBuffer;

/// Pkg length (trimmed, in chars) above which leaving the field captures the
/// cell into the library.
const CAPTURE_MIN_CHARS: usize = 2;

/// Statuses offered by the options panel, with their shortcut keys.
const STATUS_OPTIONS: [(char, PromotionStatus); 3] = [
    ('a', PromotionStatus::Approved),
    ('w', PromotionStatus::Waiting),
    ('d', PromotionStatus::Denied),
];

// ── Grid lines ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridField {
    Pkg,
    Cost,
    Srp,
    Notes,
}

impl GridField {
    pub const ALL: [GridField; 4] = [GridField::Pkg, GridField::Cost, GridField::Srp, GridField::Notes];

    pub fn label(self) -> &'static str {
        match self {
            GridField::Pkg => "PKG",
            GridField::Cost => "COST",
            GridField::Srp => "SRP",
            GridField::Notes => "NOTES",
        }
    }

    fn text(self, entry: &PromoEntry) -> &str {
        match self {
            GridField::Pkg => &entry.pkg,
            GridField::Cost => &entry.cost,
            GridField::Srp => &entry.srp,
            GridField::Notes => &entry.notes,
        }
    }

    fn edit(self, text: &str) -> CellEdit {
        let text = text.to_string();
        match self {
            GridField::Pkg => CellEdit::Pkg(text),
            GridField::Cost => CellEdit::Cost(text),
            GridField::Srp => CellEdit::Srp(text),
            GridField::Notes => CellEdit::Notes(text),
        }
    }
}

/// One displayed line: a single field of a single plan row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridLine {
    pub chain_id: String,
    pub chain_name: String,
    pub row_id: String,
    /// 1-based position of the row within its chain.
    pub row_number: usize,
    pub rows_in_chain: usize,
    pub field: GridField,
}

/// Lines in display order: configured chains, their rows, then fields.
pub fn grid_lines(ws: &Workspace) -> Vec<GridLine> {
    let mut lines = Vec::new();
    for chain in ws.chains() {
        let rows = ws.plan().rows(&chain.id);
        for (index, row) in rows.iter().enumerate() {
            for field in GridField::ALL {
                lines.push(GridLine {
                    chain_id: chain.id.clone(),
                    chain_name: chain.name.clone(),
                    row_id: row.id.clone(),
                    row_number: index + 1,
                    rows_in_chain: rows.len(),
                    field,
                });
            }
        }
    }
    lines
}

// ── State ───────────────────────────────────────────────────────────────────

struct CellEditor {
    chain_id: String,
    row_id: String,
    month: Month,
    field: GridField,
    input: InputBuffer,
}

enum GridMode {
    Navigate,
    Editing(CellEditor),
    Options {
        chain_id: String,
        row_id: String,
        month: Month,
        selected: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridResult {
    Consumed,
    /// A pkg was captured into the library on leaving the field.
    Captured(String),
}

pub struct GridState {
    view: ViewRange,
    line: usize,
    column: usize,
    mode: GridMode,
}

impl Default for GridState {
    fn default() -> Self {
        Self::new()
    }
}

impl GridState {
    pub fn new() -> Self {
        Self {
            view: ViewRange::default(),
            line: 0,
            column: 0,
            mode: GridMode::Navigate,
        }
    }

    pub fn view(&self) -> ViewRange {
        self.view
    }

    pub fn set_view(&mut self, view: ViewRange) {
        self.view = view;
        self.column = self.column.min(view.months().len() - 1);
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.mode, GridMode::Editing(_))
    }

    /// The line under the cursor and the month of the cursor column.
    pub fn cursor(&self, ws: &Workspace) -> Option<(GridLine, Month)> {
        let lines = grid_lines(ws);
        let line = lines.get(self.line.min(lines.len().saturating_sub(1)))?.clone();
        Some((line, self.view.months()[self.column]))
    }

    // ── Input handling ──────────────────────────────────────────────────

    pub fn handle_input(&mut self, event: &Event, ws: &mut Workspace) -> Option<GridResult> {
        let Event::Key(key @ KeyEvent {
            kind: KeyEventKind::Press,
            ..
        }) = event
        else {
            return None;
        };

        if key.modifiers == KeyModifiers::CONTROL && key.code == KeyCode::Char('c') {
            return None;
        }

        match std::mem::replace(&mut self.mode, GridMode::Navigate) {
            GridMode::Navigate => self.handle_navigate(*key, ws),
            GridMode::Editing(editor) => Some(self.handle_editing(editor, *key, ws)),
            GridMode::Options {
                chain_id,
                row_id,
                month,
                selected,
            } => {
                self.handle_options(chain_id, row_id, month, selected, key.code, ws);
                Some(GridResult::Consumed)
            }
        }
    }

    fn handle_navigate(&mut self, key: KeyEvent, ws: &mut Workspace) -> Option<GridResult> {
        let line_count = grid_lines(ws).len();
        self.line = self.line.min(line_count.saturating_sub(1));
        let month_count = self.view.months().len();

        match (key.modifiers, key.code) {
            (KeyModifiers::NONE, KeyCode::Char('j') | KeyCode::Down) => {
                if self.line + 1 < line_count {
                    self.line += 1;
                }
            }
            (KeyModifiers::NONE, KeyCode::Char('k') | KeyCode::Up) => {
                self.line = self.line.saturating_sub(1);
            }
            (KeyModifiers::NONE, KeyCode::Char('l') | KeyCode::Right) => {
                if self.column + 1 < month_count {
                    self.column += 1;
                }
            }
            (KeyModifiers::NONE, KeyCode::Char('h') | KeyCode::Left) => {
                self.column = self.column.saturating_sub(1);
            }
            (KeyModifiers::NONE, KeyCode::Char('g')) => self.line = 0,
            (KeyModifiers::SHIFT, KeyCode::Char('G')) => self.line = line_count.saturating_sub(1),
            (KeyModifiers::NONE, KeyCode::Enter | KeyCode::Char('i')) => {
                let (line, month) = self.cursor(ws)?;
                let current = ws
                    .plan()
                    .row(&line.chain_id, &line.row_id)
                    .map(|r| line.field.text(r.entry(month)).to_string())
                    .unwrap_or_default();
                let mut input = InputBuffer::with_text(&current);
                if line.field == GridField::Notes {
                    input = input.multiline();
                }
                self.mode = GridMode::Editing(CellEditor {
                    chain_id: line.chain_id,
                    row_id: line.row_id,
                    month,
                    field: line.field,
                    input,
                });
            }
            (KeyModifiers::NONE, KeyCode::Char('o') | KeyCode::Char(' ')) => {
                let (line, month) = self.cursor(ws)?;
                self.mode = GridMode::Options {
                    chain_id: line.chain_id,
                    row_id: line.row_id,
                    month,
                    selected: 0,
                };
            }
            (KeyModifiers::NONE, KeyCode::Char('n')) => {
                let (line, _) = self.cursor(ws)?;
                let row_id = ws.add_row(&line.chain_id);
                if let Some(pos) = grid_lines(ws)
                    .iter()
                    .position(|l| l.row_id == row_id && l.field == GridField::Pkg)
                {
                    self.line = pos;
                }
            }
            (KeyModifiers::NONE, KeyCode::Char('x')) => {
                let (line, _) = self.cursor(ws)?;
                if line.rows_in_chain > 1 {
                    ws.remove_row(&line.chain_id, &line.row_id);
                    let remaining = grid_lines(ws).len();
                    self.line = self.line.min(remaining.saturating_sub(1));
                }
            }
            _ => return None,
        }
        Some(GridResult::Consumed)
    }

    fn handle_editing(&mut self, mut editor: CellEditor, key: KeyEvent, ws: &mut Workspace) -> GridResult {
        match key.code {
            KeyCode::Esc => return self.finish_edit(editor, ws),
            KeyCode::Enter if editor.field != GridField::Notes => return self.finish_edit(editor, ws),
            KeyCode::Tab => {
                let result = self.finish_edit(editor, ws);
                if self.line + 1 < grid_lines(ws).len() {
                    self.line += 1;
                }
                return result;
            }
            _ => {}
        }

        if editor.input.handle_key(key) {
            ws.update_cell(
                &editor.chain_id,
                &editor.row_id,
                editor.month,
                editor.field.edit(editor.input.text()),
            );
        }
        self.mode = GridMode::Editing(editor);
        GridResult::Consumed
    }

    /// Leave the cell. A pkg long enough is captured with the cell's current cost and srp.
    fn finish_edit(&mut self, editor: CellEditor, ws: &mut Workspace) -> GridResult {
        self.mode = GridMode::Navigate;
        if editor.field != GridField::Pkg {
            return GridResult::Consumed;
        }
        let pkg = editor.input.text().trim();
        if pkg.chars().count() <= CAPTURE_MIN_CHARS {
            return GridResult::Consumed;
        }
        let Some(entry) = ws
            .plan()
            .row(&editor.chain_id, &editor.row_id)
            .map(|r| r.entry(editor.month).clone())
        else {
            return GridResult::Consumed;
        };
        match ws.capture_to_library(&entry.pkg, &entry.cost, &entry.srp) {
            Ok(_) => GridResult::Captured(pkg.to_string()),
            Err(_) => GridResult::Consumed,
        }
    }

    fn handle_options(
        &mut self,
        chain_id: String,
        row_id: String,
        month: Month,
        selected: usize,
        code: KeyCode,
        ws: &mut Workspace,
    ) {
        let option_count = STATUS_OPTIONS.len() + ws.library().len();
        let choose = |index: usize, ws: &mut Workspace| {
            if let Some((_, status)) = STATUS_OPTIONS.get(index) {
                ws.update_cell(&chain_id, &row_id, month, CellEdit::Status(*status));
            } else {
                let promo_id = ws
                    .library()
                    .entries()
                    .get(index - STATUS_OPTIONS.len())
                    .map(|p| p.id.clone());
                if let Some(promo_id) = promo_id {
                    ws.apply_library_promo(&chain_id, &row_id, month, &promo_id);
                }
            }
        };

        match code {
            KeyCode::Esc | KeyCode::Char('o') => {}
            KeyCode::Char('j') | KeyCode::Down => {
                let selected = (selected + 1).min(option_count.saturating_sub(1));
                self.mode = GridMode::Options {
                    chain_id,
                    row_id,
                    month,
                    selected,
                };
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.mode = GridMode::Options {
                    chain_id,
                    row_id,
                    month,
                    selected: selected.saturating_sub(1),
                };
            }
            KeyCode::Enter => choose(selected, ws),
            KeyCode::Char(c) => match STATUS_OPTIONS.iter().position(|(key, _)| *key == c) {
                Some(index) => choose(index, ws),
                None => {
                    self.mode = GridMode::Options {
                        chain_id,
                        row_id,
                        month,
                        selected,
                    }
                }
            },
            _ => {
                self.mode = GridMode::Options {
                    chain_id,
                    row_id,
                    month,
                    selected,
                };
            }
        }
    }

    // ── Rendering ───────────────────────────────────────────────────────

    pub fn render(&self, frame: &mut Frame, area: Rect, ws: &Workspace) {
        let months = self.view.months();
        let lines = grid_lines(ws);
        let cursor_line = self.line.min(lines.len().saturating_sub(1));

        let block = theme::block_focused(self.view.label());
        let visible = block.inner(area).height.saturating_sub(1) as usize;
        let offset = (cursor_line + 1).saturating_sub(visible.max(1));

        let header = Row::new(
            ["", ""]
                .into_iter()
                .map(String::from)
                .chain(months.iter().map(|m| m.short().to_string()))
                .map(|h| Cell::from(Span::styled(h, theme::heading()))),
        );

        let rows: Vec<Row> = lines
            .iter()
            .enumerate()
            .skip(offset)
            .take(visible)
            .map(|(index, line)| self.render_line(ws, line, index == cursor_line, months))
            .collect();

        let mut widths = vec![Constraint::Length(12), Constraint::Length(6)];
        widths.extend(months.iter().map(|_| Constraint::Fill(1)));

        frame.render_widget(Table::new(rows, widths).header(header).block(block), area);

        if let GridMode::Options { month, selected, .. } = &self.mode {
            self.render_options(frame, area, ws, *month, *selected);
        }
    }

    fn render_line<'a>(&self, ws: &'a Workspace, line: &GridLine, on_cursor_line: bool, months: &[Month]) -> Row<'a> {
        let entity = if line.field != GridField::Pkg {
            Span::raw("")
        } else if line.row_number == 1 {
            Span::styled(line.chain_name.clone(), theme::title())
        } else {
            Span::styled(format!("  #{}", line.row_number), theme::muted())
        };

        let mut cells = vec![
            Cell::from(entity),
            Cell::from(Span::styled(line.field.label(), theme::muted())),
        ];

        let row = ws.plan().row(&line.chain_id, &line.row_id);
        for (col, month) in months.iter().enumerate() {
            let entry = row.map(|r| r.entry(*month)).unwrap_or(PromoEntry::empty_ref());
            let selected = on_cursor_line && col == self.column;
            let text = match &self.mode {
                GridMode::Editing(editor) if selected => {
                    let (before, after) = editor.input.split_at_cursor();
                    format!("{}▎{}", before.replace('\n', "⏎"), after.replace('\n', "⏎"))
                }
                _ => cell_text(line.field, entry),
            };
            let style = if text.is_empty() && !selected {
                theme::dim()
            } else {
                theme::status_cell(entry.status, selected)
            };
            cells.push(Cell::from(Span::styled(text, style)));
        }

        Row::new(cells)
    }

    fn render_options(&self, frame: &mut Frame, area: Rect, ws: &Workspace, month: Month, selected: usize) {
        let modal_area = centered_rect(40, 60, area);

        let mut lines = vec![
            Line::raw(""),
            Line::from(Span::styled("  Status", theme::heading())),
        ];
        for (i, (key, status)) in STATUS_OPTIONS.iter().enumerate() {
            let marker = if i == selected { "▸ " } else { "  " };
            lines.push(Line::from(vec![
                Span::raw(format!("  {marker}")),
                Span::styled(format!("[{key}] "), theme::key_hint()),
                Span::styled(status.label().to_uppercase(), theme::status_tint(*status)),
            ]));
        }

        lines.push(Line::raw(""));
        lines.push(Line::from(Span::styled("  Library", theme::heading())));
        if ws.library().is_empty() {
            lines.push(Line::from(Span::styled("    Your library is empty.", theme::dim())));
        }
        for (i, promo) in ws.library().entries().iter().enumerate() {
            let is_sel = i + STATUS_OPTIONS.len() == selected;
            let marker = if is_sel { "▸ " } else { "  " };
            let style = if is_sel { theme::highlight() } else { Style::default().fg(theme::TEXT) };
            lines.push(Line::from(vec![
                Span::raw(format!("  {marker}")),
                Span::styled(promo.name.clone(), style),
            ]));
        }

        lines.push(Line::raw(""));
        lines.push(Line::from(vec![
            Span::raw("  "),
            Span::styled("j/k", theme::key_hint()),
            Span::raw(":select "),
            Span::styled("Enter", theme::key_hint()),
            Span::raw(":apply "),
            Span::styled("Esc", theme::key_hint()),
            Span::raw(":close"),
        ]));

        let block = Block::default()
            .title(format!(" Options · {} ", month.name()))
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::ACCENT).add_modifier(Modifier::BOLD));

        frame.render_widget(Clear, modal_area);
        frame.render_widget(Paragraph::new(lines).block(block), modal_area);
    }
}

/// Single-line display text. Notes show their first line, with `…` if there is more.
fn cell_text(field: GridField, entry: &PromoEntry) -> String {
    let text = field.text(entry);
    let mut lines = text.lines();
    let first = lines.next().unwrap_or("").to_string();
    let mut shown = if lines.next().is_some() { format!("{first}…") } else { first };
    if field == GridField::Pkg {
        if let Some(marker) = entry.status.marker() {
            shown = if shown.is_empty() { format!("[{marker}]") } else { format!("{shown} [{marker}]") };
        }
    }
    shown
}

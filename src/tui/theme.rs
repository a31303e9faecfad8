//! Teal & Coral color theme for the Promo Tracker TUI.
//!
//! All color constants are RGB truecolor. Views import from here
//! instead of using inline `Color::*` literals.

use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders};

use crate::core::promo::PromotionStatus;

// ── Primary palette ─────────────────────────────────────────────────────────

/// Teal: primary accent and focused borders.
pub const PRIMARY: Color = Color::Rgb(0x00, 0x80, 0x80);
/// Light teal: selected cell background, insert badge.
pub const PRIMARY_LIGHT: Color = Color::Rgb(0x00, 0x96, 0x88);
/// Dark teal: cursor row background.
pub const PRIMARY_DARK: Color = Color::Rgb(0x00, 0x4D, 0x40);

// ── Accent ──────────────────────────────────────────────────────────────────

/// Coral: calls to action.
pub const ACCENT: Color = Color::Rgb(0xFF, 0x7F, 0x50);

// ── Backgrounds ─────────────────────────────────────────────────────────────

/// Charcoal: base background.
pub const BG_BASE: Color = Color::Rgb(0x0A, 0x19, 0x19);

// ── Text ────────────────────────────────────────────────────────────────────

pub const TEXT: Color = Color::Rgb(0xE0, 0xE0, 0xE0);
/// Muted text: secondary labels, borders.
pub const TEXT_MUTED: Color = Color::Rgb(0x80, 0x80, 0x80);
/// Dim text: empty cells, faint hints.
pub const TEXT_DIM: Color = Color::Rgb(0x50, 0x50, 0x50);

// ── Semantic ────────────────────────────────────────────────────────────────

pub const ERROR: Color = Color::Rgb(0xEF, 0x53, 0x50);
pub const SUCCESS: Color = Color::Rgb(0x66, 0xBB, 0x6A);
pub const WARNING: Color = Color::Rgb(0xFF, 0xA7, 0x26);
pub const INFO: Color = Color::Rgb(0x42, 0xA5, 0xF5);

// ── Style helpers ───────────────────────────────────────────────────────────

/// Primary-colored bold text (titles, active items).
pub fn title() -> Style {
    Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
}

/// Section header style.
pub fn heading() -> Style {
    Style::default().fg(PRIMARY).add_modifier(Modifier::BOLD)
}

pub fn border_focused() -> Style {
    Style::default().fg(PRIMARY)
}

/// Highlighted/selected item.
pub fn highlight() -> Style {
    Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
}

pub fn muted() -> Style {
    Style::default().fg(TEXT_MUTED)
}

pub fn dim() -> Style {
    Style::default().fg(TEXT_DIM)
}

/// Key hint style (e.g., "[q]:quit").
pub fn key_hint() -> Style {
    Style::default().fg(TEXT_DIM)
}

/// Status bar brand badge.
pub fn brand_badge() -> Style {
    Style::default()
        .fg(BG_BASE)
        .bg(ACCENT)
        .add_modifier(Modifier::BOLD)
}

/// Insert mode badge.
pub fn insert_badge() -> Style {
    Style::default()
        .fg(BG_BASE)
        .bg(PRIMARY_LIGHT)
        .add_modifier(Modifier::BOLD)
}

/// Foreground tint for a cell with the given approval state.
pub fn status_tint(status: PromotionStatus) -> Style {
    match status {
        PromotionStatus::None => Style::default().fg(TEXT),
        PromotionStatus::Waiting => Style::default().fg(WARNING),
        PromotionStatus::Approved => Style::default().fg(SUCCESS),
        PromotionStatus::Denied => Style::default().fg(ERROR).add_modifier(Modifier::CROSSED_OUT),
    }
}

/// Grid cell style: status tint, inverted when under the cursor.
pub fn status_cell(status: PromotionStatus, selected: bool) -> Style {
    let style = status_tint(status);
    if selected {
        style.bg(PRIMARY_DARK).add_modifier(Modifier::BOLD)
    } else {
        style
    }
}

// ── Block builders ──────────────────────────────────────────────────────────

/// A bordered block with focused styling.
pub fn block_focused(title: &str) -> Block<'_> {
    Block::default()
        .title(format!(" {title} "))
        .borders(Borders::ALL)
        .border_style(border_focused())
}

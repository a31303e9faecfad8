//! Root layout computation for tab bar + main content + status bar.

use ratatui::layout::{Constraint, Layout, Rect};

/// Computed layout regions for a single frame.
pub struct AppLayout {
    /// Tab bar and view selector (top row).
    pub header: Rect,
    /// Main content area.
    pub main: Rect,
    /// Status bar (bottom row).
    pub status: Rect,
}

impl AppLayout {
    pub fn compute(area: Rect) -> Self {
        let rows = Layout::vertical([
            Constraint::Length(1), // Tabs
            Constraint::Min(1),    // Focused view
            Constraint::Length(1), // Status bar
        ])
        .split(area);

        AppLayout {
            header: rows[0],
            main: rows[1],
            status: rows[2],
        }
    }
}

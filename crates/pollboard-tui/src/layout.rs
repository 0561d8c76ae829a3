// Screen layout: panel arrangement and sizing.
//
// +--------------------------------------------------+
// | Status Bar (1 row)                                |
// +-------------------------+------------------------+
// | Main Panel               | Create Form (40%)      |
// | (polls or poll detail)   | only while open        |
// +-------------------------+------------------------+
// | Help Bar (1 row)                                  |
// +--------------------------------------------------+

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Resolved screen areas.
#[derive(Debug, Clone)]
pub struct AppLayout {
    /// Connection indicator and signed-in user.
    pub status_bar: Rect,
    /// Poll collection or detail.
    pub main_panel: Rect,
    /// Creation form, when open.
    pub side_panel: Option<Rect>,
    /// Key hints.
    pub help_bar: Rect,
}

pub fn build_layout(area: Rect, form_open: bool) -> AppLayout {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // status bar
            Constraint::Min(3),    // middle
            Constraint::Length(1), // help bar
        ])
        .split(area);

    let middle = vertical[1];
    let (main_panel, side_panel) = if form_open {
        let horizontal = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(middle);
        (horizontal[0], Some(horizontal[1]))
    } else {
        (middle, None)
    };

    AppLayout {
        status_bar: vertical[0],
        main_panel,
        side_panel,
        help_bar: vertical[2],
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

pub mod confirm;
pub mod connect_popup;
pub mod connection_error;
pub mod host_key_prompt;
pub mod sidebar;
pub mod terminal;

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// A centered rectangle occupying `percent_x` × `percent_y` of `area`, for
/// modal popups (spec.md §2 Widgets row).
pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage((100 - percent_y) / 2), Constraint::Percentage(percent_y), Constraint::Percentage((100 - percent_y) / 2)])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage((100 - percent_x) / 2), Constraint::Percentage(percent_x), Constraint::Percentage((100 - percent_x) / 2)])
        .split(vertical[1])[1]
}

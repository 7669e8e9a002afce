//! Top-level frame layout: sidebar, tab/terminal view, status bar, and
//! whatever overlay is modal.

use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::Frame;

use super::state::{AppState, Overlay};
use super::ui::status_bar;
use super::widgets::{confirm, connect_popup, connection_error, host_key_prompt, sidebar, terminal};

pub fn draw(frame: &mut Frame, app: &AppState) {
    let area = frame.area();
    let rows = Layout::default().direction(Direction::Vertical).constraints([Constraint::Min(0), Constraint::Length(1)]).split(area);

    let columns = Layout::default().direction(Direction::Horizontal).constraints([Constraint::Length(app.sidebar_width), Constraint::Min(0)]).split(rows[0]);

    sidebar::render(frame, columns[0], app);
    terminal::render(frame, columns[1], app);
    status_bar::render(frame, rows[1], app);

    match &app.overlay {
        Some(Overlay::Connect(state)) => connect_popup::render(frame, area, state),
        Some(Overlay::HostKey(state)) => host_key_prompt::render(frame, area, state),
        Some(Overlay::Confirm(state)) => confirm::render(frame, area, state),
        Some(Overlay::ConnectionError(state)) => connection_error::render(frame, area, state),
        None => {}
    }
}

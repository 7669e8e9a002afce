//! A retriable session-error popup (spec.md §4.4 "offers Retry ... or
//! Cancel", §7 "an error with Retry/Cancel").

use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use crate::tui::state::ConnectionErrorState;
use crate::tui::ui::theme;

use super::centered_rect;

pub fn render(frame: &mut Frame, area: Rect, state: &ConnectionErrorState) {
    let theme = theme::current();
    let popup_area = centered_rect(55, 30, area);
    frame.render_widget(Clear, popup_area);

    let block = Block::default().borders(Borders::ALL).title("connection error").style(Style::default().fg(theme.danger));
    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let lines = vec![Line::from(state.message.as_str()), Line::from(""), Line::from("r: retry   c/Esc: cancel")];
    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), inner);
}

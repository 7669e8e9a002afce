//! The host catalog sidebar: a filterable list plus the active filter field
//! (spec.md §2 "sidebar filter").

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, Paragraph};
use ratatui::Frame;

use crate::tui::state::AppState;
use crate::tui::ui::theme;

pub fn render(frame: &mut Frame, area: Rect, app: &AppState) {
    let theme = theme::current();
    let chunks = Layout::default().direction(Direction::Vertical).constraints([Constraint::Length(1), Constraint::Min(0)]).split(area);

    let filter_style = if app.filter_active { Style::default().fg(theme.accent) } else { Style::default().fg(theme.foreground) };
    let filter_line = Paragraph::new(Line::from(vec![Span::raw("/"), Span::styled(app.filter.value(), filter_style)]));
    frame.render_widget(filter_line, chunks[0]);

    let visible = app.visible_hosts();
    let items: Vec<ListItem> = visible
        .iter()
        .enumerate()
        .map(|(index, host)| {
            let connected = app.tab_index_for_host(host.id).is_some();
            let marker = if connected { "● " } else { "  " };
            let label = format!("{}{} ({})", marker, host.name, host.hostname);
            let style = if index == app.selected_row {
                Style::default().bg(theme.accent).fg(theme.background).add_modifier(Modifier::BOLD)
            } else if connected {
                Style::default().fg(theme.success)
            } else {
                Style::default().fg(theme.foreground)
            };
            ListItem::new(label).style(style)
        })
        .collect();

    let list = List::new(items).block(Block::default().borders(Borders::ALL).title("hosts"));
    frame.render_widget(list, chunks[1]);
}

//! The connection popup: add or edit a host, choose its credential, and
//! connect (spec.md §2 "Connection popup", "identity chooser").

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

use crate::tui::state::{ConnectField, ConnectPopupState};
use crate::tui::ui::theme;

use super::centered_rect;

pub fn render(frame: &mut Frame, area: Rect, state: &ConnectPopupState) {
    let theme = theme::current();
    let popup_area = centered_rect(60, 60, area);
    frame.render_widget(Clear, popup_area);

    let title = if state.editing_host_id.is_some() { "edit host" } else { "new host" };
    let block = Block::default().borders(Borders::ALL).title(title).style(Style::default().fg(theme.foreground));
    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(inner);

    render_field(frame, rows[0], "name", state.name.value(), state.focus == ConnectField::Name, &theme);
    render_field(frame, rows[1], "hostname", state.hostname.value(), state.focus == ConnectField::Hostname, &theme);
    render_field(frame, rows[2], "port", state.port.value(), state.focus == ConnectField::Port, &theme);
    render_field(frame, rows[3], "mode", mode_label(state.mode), state.focus == ConnectField::Mode, &theme);

    let credential_label = state.selected_credential().map(|credential| credential.label.as_str()).unwrap_or("(no identities or keys configured)");
    render_field(frame, rows[4], "credential", credential_label, state.focus == ConnectField::Credential, &theme);

    let button_style = |focused: bool| if focused { Style::default().bg(theme.accent).fg(theme.background).add_modifier(Modifier::BOLD) } else { Style::default().fg(theme.foreground) };
    let buttons = Line::from(vec![
        Span::styled(" Connect ", button_style(state.focus == ConnectField::Connect)),
        Span::raw("  "),
        Span::styled(" Cancel ", button_style(state.focus == ConnectField::Cancel)),
    ]);
    frame.render_widget(Paragraph::new(buttons), rows[6]);

    if let Some(error) = &state.error {
        frame.render_widget(Paragraph::new(Span::styled(error.as_str(), Style::default().fg(theme.danger))), rows[7]);
    }
}

fn render_field(frame: &mut Frame, area: Rect, label: &str, value: &str, focused: bool, theme: &theme::Theme) {
    let label_style = Style::default().fg(theme.foreground);
    let value_style = if focused { Style::default().fg(theme.accent).add_modifier(Modifier::UNDERLINED) } else { Style::default().fg(theme.foreground) };
    let line = Line::from(vec![Span::styled(format!("{:<10}", label), label_style), Span::styled(value.to_string(), value_style)]);
    frame.render_widget(Paragraph::new(line), area);
}

fn mode_label(mode: crate::repository::ConnectionMode) -> &'static str {
    match mode {
        crate::repository::ConnectionMode::Ssh => "ssh",
        crate::repository::ConnectionMode::Telnet => "telnet",
    }
}

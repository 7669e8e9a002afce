//! Tab bar and the active tab's terminal view (spec.md §4.3 `Render`, §4.7
//! screen manager).

use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use crate::tui::state::{AppState, CaptureMode, Tab};
use crate::tui::ui::theme;

use super::centered_rect;

pub fn render(frame: &mut Frame, area: Rect, app: &AppState) {
    let chunks = Layout::default().direction(Direction::Vertical).constraints([Constraint::Length(1), Constraint::Min(0)]).split(area);

    render_tab_bar(frame, chunks[0], app);
    render_active_terminal(frame, chunks[1], app);
}

fn render_tab_bar(frame: &mut Frame, area: Rect, app: &AppState) {
    let theme = theme::current();
    let mut spans = Vec::new();

    for (index, tab) in app.tabs.iter().enumerate() {
        let label = format!(" {}:{} ", index + 1, tab.title);
        let style = if index == app.active_tab {
            Style::default().bg(theme.accent).fg(theme.background).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.foreground)
        };
        spans.push(Span::styled(label, style));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_active_terminal(frame: &mut Frame, area: Rect, app: &AppState) {
    let Some(tab) = app.active_tab() else {
        frame.render_widget(Paragraph::new("no open sessions — press 'n' to connect").alignment(Alignment::Center), area);
        return;
    };

    let border_style = match tab.capture {
        CaptureMode::Terminal => Style::default().fg(theme::current().accent),
        CaptureMode::Normal => Style::default().fg(theme::current().foreground),
    };
    let block = Block::default().borders(Borders::ALL).border_style(border_style);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let lines = tab.emulator.render();
    frame.render_widget(Paragraph::new(lines), inner);

    if !tab.progress_log.is_empty() {
        render_progress_popup(frame, inner, tab);
    }
}

/// The connection popup (spec.md §2 "Connection popup", §7 "connection
/// popup shows incremental log lines"): an overlay atop the terminal pane
/// listing the session's accumulated progress/error lines, scrolled to the
/// most recent that fit. Disappears once `Tab::clear_progress` empties the
/// log on `Connected`.
fn render_progress_popup(frame: &mut Frame, area: Rect, tab: &Tab) {
    let theme = theme::current();
    let popup_area = centered_rect(80, 60, area);
    frame.render_widget(Clear, popup_area);

    let block = Block::default().borders(Borders::ALL).title("connecting").style(Style::default().fg(theme.accent));
    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let visible = (inner.height as usize).max(1);
    let start = tab.progress_log.len().saturating_sub(visible);
    let lines: Vec<Line> = tab.progress_log[start..].iter().map(|line| Line::from(line.as_str())).collect();
    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), inner);
}

//! The bottom status line: current capture mode, active host, and the
//! keybindings available in that mode.

use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::tui::state::{AppState, CaptureMode};

use super::theme;

pub fn render(frame: &mut Frame, area: Rect, app: &AppState) {
    let theme = theme::current();

    let left = if let Some(message) = &app.status_message {
        Span::styled(message.clone(), Style::default().fg(theme.warning))
    } else if let Some(tab) = app.active_tab() {
        let mode_label = match tab.capture {
            CaptureMode::Terminal => "CAPTURE",
            CaptureMode::Normal => "NORMAL",
        };
        Span::styled(format!(" {} — {} ", mode_label, tab.title), Style::default().fg(theme.foreground).add_modifier(Modifier::BOLD))
    } else {
        Span::styled(" no sessions ", Style::default().fg(theme.foreground))
    };

    let hints = match app.active_tab().map(|tab| tab.capture) {
        Some(CaptureMode::Terminal) => "Ctrl+] release  Ctrl+Q quit",
        _ => "n new  e edit  d delete  Enter connect  Tab switch  Ctrl+] capture  Ctrl+Q quit",
    };

    let line = Line::from(vec![left, Span::raw("  "), Span::styled(hints, Style::default().fg(theme.accent))]);
    frame.render_widget(Paragraph::new(line).alignment(Alignment::Left), area);
}

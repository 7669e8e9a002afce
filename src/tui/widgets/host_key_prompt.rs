//! The host-key verification prompt (spec.md §4.4 `VerifyingHost`, §7
//! "host-key prompt").

use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use crate::tui::state::HostKeyPromptState;
use crate::tui::ui::theme;

use super::centered_rect;

pub fn render(frame: &mut Frame, area: Rect, state: &HostKeyPromptState) {
    let theme = theme::current();
    let popup_area = centered_rect(55, 45, area);
    frame.render_widget(Clear, popup_area);

    let block = Block::default().borders(Borders::ALL).title("unknown host key").style(Style::default().fg(theme.warning));
    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let save_marker = if state.save { "[x]" } else { "[ ]" };
    let lines = vec![
        Line::from(format!("The authenticity of {}:{} can't be established.", state.info.hostname, state.info.port)),
        Line::from(format!("{} key fingerprint is", state.info.key_type)),
        Line::from(Span::styled(state.info.fingerprint.clone(), Style::default().add_modifier(Modifier::BOLD))),
        Line::from(format!("(MD5 {})", state.info.md5_fingerprint)),
        Line::from(""),
        Line::from(format!("{} remember this host (toggle with 's')", save_marker)),
        Line::from(""),
        Line::from("y: accept   n/Esc: reject"),
    ];

    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), inner);
}

//! TUI bootstrap and teardown lifecycle.

use std::io;
use std::sync::Arc;

use crossbeam_channel::Receiver;
use crossterm::event::{DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use crate::events::Event;
use crate::log_debug;
use crate::repository::Repository;
use crate::ssh::SessionRegistry;
use crate::tui::state::AppState;

use super::events::run_app;

#[derive(Debug, Default)]
struct TerminalModeGuard {
    active: bool,
}

impl TerminalModeGuard {
    fn enter() -> io::Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture, EnableBracketedPaste)?;
        Ok(Self { active: true })
    }

    fn cleanup(&mut self) {
        if !self.active {
            return;
        }
        let _ = disable_raw_mode();
        let mut stdout = io::stdout();
        let _ = execute!(stdout, LeaveAlternateScreen, DisableMouseCapture, DisableBracketedPaste);
        self.active = false;
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        self.cleanup();
    }
}

/// Run the interactive connection manager until the user quits.
pub fn run(repository: Arc<dyn Repository>, registry: Arc<SessionRegistry>, events: Receiver<Event>) -> crate::Result<()> {
    log_debug!("Starting interactive session manager");

    let mut mode_guard = TerminalModeGuard::enter().map_err(crate::Error::Ui)?;
    let stdout = io::stdout();
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).map_err(crate::Error::Ui)?;

    let terminal_size = terminal.size().map(|size| (size.width, size.height)).unwrap_or((80, 24));
    let mut app = AppState::new(repository, registry, terminal_size).map_err(crate::Error::Ui)?;

    let result = run_app(&mut terminal, &mut app, &events);
    let show_cursor_result = terminal.show_cursor();

    mode_guard.cleanup();

    result?;
    show_cursor_result.map_err(crate::Error::Ui)?;

    log_debug!("Session manager exited");
    Ok(())
}

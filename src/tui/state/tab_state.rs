//! One open connection's tab: its emulator and the host id it's bound to
//! (spec.md §3 "Tab", §4.3 Emulator).

use crate::config;
use crate::repository::{Host, Id};
use crate::vt::Emulator;

/// Input routing mode for the active tab (spec.md §4.7 "Key capture modes").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureMode {
    Normal,
    Terminal,
}

/// Cap on the per-tab connection-progress log (SPEC_FULL.md §B "bounded
/// `Vec<String>` per session"); old lines fall off the front once exceeded.
const MAX_PROGRESS_LINES: usize = 50;

pub struct Tab {
    pub host_id: Id,
    pub title: String,
    pub emulator: Emulator,
    pub capture: CaptureMode,
    /// Incremental connection-progress log, rendered by the connection
    /// popup (spec.md §7 "connection popup shows incremental log lines")
    /// until the session reaches `Connected`, at which point it's cleared
    /// and the terminal view shows the live emulator instead.
    pub progress_log: Vec<String>,
}

impl Tab {
    pub fn new(host: &Host, width: u16, height: u16) -> Self {
        let mut emulator = Emulator::new(width.max(1) as usize, height.max(1) as usize);
        let history_buffer = config::CONFIG.read().unwrap_or_else(|poison| poison.into_inner()).settings.history_buffer;
        emulator.set_max_scrollback(history_buffer);

        Self {
            host_id: host.id,
            title: host.name.clone(),
            emulator,
            capture: CaptureMode::Terminal,
            progress_log: vec!["connecting...".to_string()],
        }
    }

    pub fn toggle_capture(&mut self) {
        self.capture = match self.capture {
            CaptureMode::Normal => CaptureMode::Terminal,
            CaptureMode::Terminal => CaptureMode::Normal,
        };
    }

    /// Append one progress/error/status line, evicting from the front once
    /// `MAX_PROGRESS_LINES` is exceeded.
    pub fn push_progress(&mut self, line: impl Into<String>) {
        self.progress_log.push(line.into());
        if self.progress_log.len() > MAX_PROGRESS_LINES {
            self.progress_log.remove(0);
        }
    }

    /// Dismiss the progress popup, e.g. on reaching `Connected`.
    pub fn clear_progress(&mut self) {
        self.progress_log.clear();
    }
}

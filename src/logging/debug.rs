//! File-backed debug logger, one line per call, gated by the global debug flag.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

use super::{LogError, LogFormatter, LogLevel};

#[derive(Clone)]
pub struct DebugLogger {
    formatter: LogFormatter,
    path: PathBuf,
}

impl DebugLogger {
    pub fn new(log_dir: PathBuf) -> Self {
        Self {
            formatter: LogFormatter::new(true, true),
            path: log_dir.join("haven-debug.log"),
        }
    }

    pub fn log(&self, level: LogLevel, message: &str) -> Result<(), LogError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let mut file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        writeln!(file, "{}", self.formatter.format(Some(level.as_str()), message))?;
        Ok(())
    }
}

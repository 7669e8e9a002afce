//! Per-session SSH transcript logger.
//!
//! Writes one file per session under `<log_dir>/ssh_sessions/<date>/<session>.log`,
//! buffering partial lines across writes the way session output actually arrives.

use chrono::Local;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;

use super::{LogError, LogFormatter};

pub struct SshLogger {
    formatter: LogFormatter,
    log_dir: PathBuf,
    buffer: Mutex<String>,
    session_name: Mutex<String>,
}

impl SshLogger {
    pub fn new(log_dir: PathBuf) -> Self {
        Self {
            formatter: LogFormatter::new(true, false),
            log_dir,
            buffer: Mutex::new(String::new()),
            session_name: Mutex::new("session".to_string()),
        }
    }

    pub fn set_session_name(&self, name: &str) {
        *self.session_name.lock().unwrap_or_else(|poison| poison.into_inner()) = name.replace('.', "_");
    }

    pub fn log(&self, chunk: &str) -> Result<(), LogError> {
        let mut buffer = self.buffer.lock().unwrap_or_else(|poison| poison.into_inner());
        buffer.push_str(chunk);

        let mut log_file = None;
        while let Some(newline_pos) = buffer.find('\n') {
            let line = buffer[..newline_pos].trim_end_matches('\r').to_string();
            *buffer = buffer[newline_pos + 1..].to_string();
            if line.is_empty() {
                continue;
            }
            if log_file.is_none() {
                log_file = Some(self.open_log_file()?);
            }
            if let Some(file) = log_file.as_mut() {
                writeln!(file, "{}", self.formatter.format(None, &line))?;
            }
        }

        Ok(())
    }

    fn open_log_file(&self) -> Result<std::fs::File, LogError> {
        let date = Local::now().format("%Y-%m-%d").to_string();
        let dir = self.log_dir.join("ssh_sessions").join(date);
        std::fs::create_dir_all(&dir)?;
        let name = self.session_name.lock().unwrap_or_else(|poison| poison.into_inner()).clone();
        OpenOptions::new().create(true).append(true).open(dir.join(format!("{}.log", name))).map_err(LogError::from)
    }
}

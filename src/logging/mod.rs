//! Logging facade: a debug log file, a per-session SSH transcript log, and the
//! global enable flags the `log_debug!`/`log_ssh!`/`debug_enabled!` macros read.

mod debug;
mod errors;
mod formatter;
mod ssh;

pub use debug::DebugLogger;
pub use errors::LogError;
pub use formatter::LogFormatter;
pub use ssh::SshLogger;

use once_cell::sync::OnceCell;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

static DEBUG_MODE: AtomicBool = AtomicBool::new(false);
static SSH_LOGGING: AtomicBool = AtomicBool::new(false);
static GLOBAL_LOGGER: OnceCell<Mutex<Logger>> = OnceCell::new();

#[derive(Debug, Clone, Copy)]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
}

impl LogLevel {
    fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warning => "WARN",
            LogLevel::Error => "ERROR",
        }
    }
}

#[derive(Clone)]
pub struct Logger {
    debug_logger: DebugLogger,
    ssh_logger: std::sync::Arc<SshLogger>,
}

impl Logger {
    pub fn new(log_dir: PathBuf) -> Self {
        Self {
            debug_logger: DebugLogger::new(log_dir.clone()),
            ssh_logger: std::sync::Arc::new(SshLogger::new(log_dir)),
        }
    }

    /// Install this logger as the process-wide instance. Called once at startup.
    pub fn install(self) {
        let _ = GLOBAL_LOGGER.set(Mutex::new(self));
    }

    pub fn global() -> &'static Mutex<Logger> {
        GLOBAL_LOGGER.get_or_init(|| Mutex::new(Logger::new(std::env::temp_dir())))
    }

    pub fn enable_debug(&self) {
        DEBUG_MODE.store(true, Ordering::SeqCst);
    }

    pub fn enable_ssh_logging(&self) {
        SSH_LOGGING.store(true, Ordering::SeqCst);
    }

    pub fn is_debug_enabled(&self) -> bool {
        DEBUG_MODE.load(Ordering::SeqCst)
    }

    pub fn is_ssh_logging_enabled(&self) -> bool {
        SSH_LOGGING.load(Ordering::SeqCst)
    }

    pub fn set_ssh_session_name(&self, name: &str) {
        self.ssh_logger.set_session_name(name);
    }

    /// The shared SSH transcript logger, handed to each session worker.
    pub fn ssh_logger(&self) -> std::sync::Arc<SshLogger> {
        self.ssh_logger.clone()
    }

    pub fn log(&self, level: LogLevel, message: &str) -> Result<(), LogError> {
        if !self.is_debug_enabled() {
            return Ok(());
        }
        self.debug_logger.log(level, message)
    }

    pub fn log_ssh(&self, message: &str) -> Result<(), LogError> {
        if !self.is_ssh_logging_enabled() {
            return Ok(());
        }
        self.ssh_logger.log(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_level_labels_are_stable() {
        assert_eq!(LogLevel::Debug.as_str(), "DEBUG");
        assert_eq!(LogLevel::Error.as_str(), "ERROR");
    }
}

//! Logging-related error types.

use std::{error::Error, fmt, io};

#[derive(Debug)]
pub enum LogError {
    Io(io::Error),
    DirectoryCreationError(String),
    LockPoisoned,
}

impl fmt::Display for LogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogError::Io(err) => write!(f, "I/O error: {}", err),
            LogError::DirectoryCreationError(msg) => write!(f, "failed to create log directory: {}", msg),
            LogError::LockPoisoned => write!(f, "logger lock poisoned"),
        }
    }
}

impl Error for LogError {}

impl From<io::Error> for LogError {
    fn from(err: io::Error) -> Self {
        LogError::Io(err)
    }
}

//! Configuration-related error types.

use std::{error::Error, fmt, io};

#[derive(Debug)]
pub enum ConfigError {
    Io(io::Error),
    Parse(serde_yml::Error),
    NoConfigDir,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(err) => write!(f, "I/O error: {}", err),
            ConfigError::Parse(err) => write!(f, "failed to parse configuration: {}", err),
            ConfigError::NoConfigDir => write!(f, "could not determine a configuration directory"),
        }
    }
}

impl Error for ConfigError {}

impl From<io::Error> for ConfigError {
    fn from(err: io::Error) -> Self {
        ConfigError::Io(err)
    }
}

impl From<serde_yml::Error> for ConfigError {
    fn from(err: serde_yml::Error) -> Self {
        ConfigError::Parse(err)
    }
}

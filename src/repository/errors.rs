//! Repository error type.

use std::{error::Error, fmt, io};

use super::entities::Id;

#[derive(Debug)]
pub enum RepositoryError {
    Io(io::Error),
    Serde(serde_json::Error),
    NotFound(Id),
    Crypto(String),
}

impl fmt::Display for RepositoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RepositoryError::Io(err) => write!(f, "I/O error: {}", err),
            RepositoryError::Serde(err) => write!(f, "serialization error: {}", err),
            RepositoryError::NotFound(id) => write!(f, "no record with id {}", id),
            RepositoryError::Crypto(msg) => write!(f, "credential encryption error: {}", msg),
        }
    }
}

impl Error for RepositoryError {}

impl From<io::Error> for RepositoryError {
    fn from(err: io::Error) -> Self {
        RepositoryError::Io(err)
    }
}

impl From<serde_json::Error> for RepositoryError {
    fn from(err: serde_json::Error) -> Self {
        RepositoryError::Serde(err)
    }
}

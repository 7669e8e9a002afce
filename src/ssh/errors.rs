//! SSH session error type (spec.md §7 error kinds: `NetworkDial`,
//! `SshHandshake`, `HostKeyRejected`, `Auth`, `PtyRequest`, `SessionIo`,
//! `CredentialMissing`).

use std::{error::Error, fmt, io};

use crate::repository::RepositoryError;

#[derive(Debug)]
pub enum SshError {
    Dial(io::Error),
    Handshake(russh::Error),
    HostKeyRejected,
    CredentialMissing(String),
    Auth(String),
    Pty(russh::Error),
    SessionIo(io::Error),
    Repository(RepositoryError),
}

impl fmt::Display for SshError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SshError::Dial(err) => write!(f, "failed to dial: {}", err),
            SshError::Handshake(err) => write!(f, "SSH handshake failed: {}", err),
            SshError::HostKeyRejected => write!(f, "host key rejected by user"),
            SshError::CredentialMissing(msg) => write!(f, "credential missing: {}", msg),
            SshError::Auth(msg) => write!(f, "authentication failed: {}", msg),
            SshError::Pty(err) => write!(f, "PTY request failed: {}", err),
            SshError::SessionIo(err) => write!(f, "session I/O error: {}", err),
            SshError::Repository(err) => write!(f, "repository error: {}", err),
        }
    }
}

impl Error for SshError {}

impl From<io::Error> for SshError {
    fn from(err: io::Error) -> Self {
        SshError::SessionIo(err)
    }
}

impl From<russh::Error> for SshError {
    fn from(err: russh::Error) -> Self {
        SshError::Handshake(err)
    }
}

impl From<RepositoryError> for SshError {
    fn from(err: RepositoryError) -> Self {
        SshError::Repository(err)
    }
}

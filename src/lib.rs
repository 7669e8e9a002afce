//! `haven`: an SSH connection manager with a tabbed terminal UI.
//!
//! The crate is split along the lines of spec.md §1's architecture diagram:
//! `vt` is the terminal emulator, `ssh` owns the session lifecycle and the
//! registry that multiplexes sessions by host id, `events` is the one-way
//! bridge from session workers back to the UI, `repository` is the
//! persistence layer, and `tui` is the synchronous ratatui front end that
//! ties all of it together. `config`, `logging`, and `cli` are the ambient
//! stack shared by every module above.

pub mod cli;
pub mod config;
pub mod events;
pub mod logging;
pub mod repository;
pub mod ssh;
pub mod tui;
#[macro_use]
pub mod utils;
pub mod vt;

use std::io;

pub type Result<T> = std::result::Result<T, Error>;

/// Crate-wide error type. Each variant corresponds to one failure kind
/// named across the module boundaries above; submodules keep their own
/// narrower error types and convert into this one only at the edges that
/// report to the user (mainly `main.rs` and the TUI's status line).
#[derive(Debug)]
pub enum Error {
    ConfigLoad(config::ConfigError),
    DatabaseOpen(repository::RepositoryError),
    CredentialMissing(String),
    NetworkDial(io::Error),
    SshHandshake(ssh::SshError),
    RepositoryIo(repository::RepositoryError),
    Logging(logging::LogError),
    Vt(String),
    Ui(io::Error),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::ConfigLoad(err) => write!(f, "failed to load configuration: {}", err),
            Error::DatabaseOpen(err) => write!(f, "failed to open database: {}", err),
            Error::CredentialMissing(msg) => write!(f, "credential missing: {}", msg),
            Error::NetworkDial(err) => write!(f, "network error: {}", err),
            Error::SshHandshake(err) => write!(f, "SSH error: {}", err),
            Error::RepositoryIo(err) => write!(f, "repository error: {}", err),
            Error::Logging(err) => write!(f, "logging error: {}", err),
            Error::Vt(msg) => write!(f, "terminal emulation error: {}", msg),
            Error::Ui(err) => write!(f, "UI error: {}", err),
        }
    }
}

impl std::error::Error for Error {}

impl From<config::ConfigError> for Error {
    fn from(err: config::ConfigError) -> Self {
        Error::ConfigLoad(err)
    }
}

impl From<repository::RepositoryError> for Error {
    fn from(err: repository::RepositoryError) -> Self {
        Error::DatabaseOpen(err)
    }
}

impl From<ssh::SshError> for Error {
    fn from(err: ssh::SshError) -> Self {
        Error::SshHandshake(err)
    }
}

impl From<logging::LogError> for Error {
    fn from(err: logging::LogError) -> Self {
        Error::Logging(err)
    }
}

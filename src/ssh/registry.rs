//! Process-wide session registry (spec.md §4.5): multiplexes `Id -> SessionHandle`,
//! keyed by host id, so the UI loop never holds a session directly. At most one
//! in-flight session per host id; `Initiate` on an id that already has one
//! replaces it after dropping the old handle's network handles first.

use std::collections::HashMap;
use std::io;
use std::sync::{Arc, Mutex};

use tokio::runtime::Handle;

use super::errors::SshError;
use super::session::{self, SessionHandle, SessionState};
use crate::logging::SshLogger;
use crate::repository::{Host, Id, Repository};

struct Entry {
    handle: SessionHandle,
    host: Host,
    size: (u16, u16),
}

/// Owns every live session and the bits needed to rebuild one on retry
/// (spec.md §4.5 "Retry rebuilds the session from scratch").
pub struct SessionRegistry {
    runtime: Handle,
    repository: Arc<dyn Repository>,
    ssh_logger: Arc<SshLogger>,
    entries: Mutex<HashMap<Id, Entry>>,
}

impl SessionRegistry {
    pub fn new(runtime: Handle, repository: Arc<dyn Repository>, ssh_logger: Arc<SshLogger>) -> Self {
        Self { runtime, repository, ssh_logger, entries: Mutex::new(HashMap::new()) }
    }

    /// Start a session for `host`, replacing and closing any prior session
    /// under the same host id.
    pub fn initiate(&self, host: Host, initial_size: (u16, u16)) {
        let host_id = host.id;
        let handle = session::spawn(&self.runtime, host.clone(), self.repository.clone(), self.ssh_logger.clone(), initial_size);

        let mut entries = self.entries.lock().unwrap_or_else(|poison| poison.into_inner());
        if let Some(previous) = entries.insert(host_id, Entry { handle, host, size: initial_size }) {
            previous.handle.close();
        }
    }

    /// Rebuild the session for `host_id` from scratch, reusing the last
    /// known terminal size.
    pub fn retry(&self, host_id: Id) -> Result<(), SshError> {
        let host = {
            let entries = self.entries.lock().unwrap_or_else(|poison| poison.into_inner());
            entries.get(&host_id).map(|entry| (entry.host.clone(), entry.size))
        };
        let (host, size) = host.ok_or_else(no_such_session)?;
        self.initiate(host, size);
        Ok(())
    }

    /// Resolve a pending host-key decision (spec.md §4.4 `VerifyingHost`).
    /// Returns `false`, never panics, if `host_id` has no outstanding
    /// decision.
    pub fn continue_after_host_key(&self, host_id: Id, save: bool) -> bool {
        let entries = self.entries.lock().unwrap_or_else(|poison| poison.into_inner());
        entries.get(&host_id).map(|entry| entry.handle.continue_after_host_key(save)).unwrap_or(false)
    }

    /// Reject a pending host-key decision, sending the session to `Error`
    /// instead of continuing the connection.
    pub fn reject_host_key(&self, host_id: Id) -> bool {
        let entries = self.entries.lock().unwrap_or_else(|poison| poison.into_inner());
        entries.get(&host_id).map(|entry| entry.handle.reject_host_key()).unwrap_or(false)
    }

    /// Forward a local terminal resize to the remote PTY.
    pub fn resize(&self, host_id: Id, width: u16, height: u16) -> Result<(), SshError> {
        let mut entries = self.entries.lock().unwrap_or_else(|poison| poison.into_inner());
        let entry = entries.get_mut(&host_id).ok_or_else(no_such_session)?;
        entry.size = (width, height);
        entry.handle.window_change(width, height)
    }

    /// Queue keystrokes for the remote shell.
    pub fn send_input(&self, host_id: Id, bytes: Vec<u8>) -> Result<(), SshError> {
        let entries = self.entries.lock().unwrap_or_else(|poison| poison.into_inner());
        entries.get(&host_id).ok_or_else(no_such_session)?.handle.send_input(bytes)
    }

    /// Drop the session's network handles and forget it. Safe to call on an
    /// id with no session.
    pub fn close(&self, host_id: Id) {
        let removed = self.entries.lock().unwrap_or_else(|poison| poison.into_inner()).remove(&host_id);
        if let Some(entry) = removed {
            entry.handle.close();
        }
    }

    pub fn state(&self, host_id: Id) -> Option<SessionState> {
        let entries = self.entries.lock().unwrap_or_else(|poison| poison.into_inner());
        entries.get(&host_id).map(|entry| entry.handle.state())
    }

    /// Close every session, used on process shutdown so no worker outlives
    /// the UI loop (spec.md §3 "drop the session before releasing its
    /// network handles").
    pub fn close_all(&self) {
        let mut entries = self.entries.lock().unwrap_or_else(|poison| poison.into_inner());
        for (_, entry) in entries.drain() {
            entry.handle.close();
        }
    }
}

fn no_such_session() -> SshError {
    SshError::SessionIo(io::Error::new(io::ErrorKind::NotFound, "no session for that host id"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::SshLogger;
    use crate::repository::{ConnectionMode, CredentialType, InMemoryRepository};
    use std::path::Path;

    fn registry() -> SessionRegistry {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let handle = runtime.handle().clone();
        std::mem::forget(runtime);
        let logger = Arc::new(SshLogger::new(Path::new("/tmp")));
        SessionRegistry::new(handle, Arc::new(InMemoryRepository::new()), logger)
    }

    fn host(id: Id) -> Host {
        Host { id, name: "x".into(), hostname: "example.invalid".into(), port: 22, mode: ConnectionMode::Ssh, credential_id: 1, credential_type: CredentialType::Identity, last_connected_at: None }
    }

    #[test]
    fn resize_on_unknown_host_is_reported_not_panicking() {
        let registry = registry();
        assert!(registry.resize(42, 80, 24).is_err());
    }

    #[test]
    fn send_input_on_unknown_host_is_reported_not_panicking() {
        let registry = registry();
        assert!(registry.send_input(42, vec![1, 2, 3]).is_err());
    }

    #[test]
    fn continue_after_host_key_on_unknown_host_returns_false() {
        let registry = registry();
        assert!(!registry.continue_after_host_key(42, true));
    }

    #[test]
    fn reject_host_key_on_unknown_host_returns_false() {
        let registry = registry();
        assert!(!registry.reject_host_key(42));
    }

    #[test]
    fn close_on_unknown_host_is_a_no_op() {
        let registry = registry();
        registry.close(42);
    }

    #[test]
    fn initiate_then_close_removes_the_entry() {
        let registry = registry();
        registry.initiate(host(1), (80, 24));
        assert!(registry.state(1).is_some());
        registry.close(1);
        assert!(registry.state(1).is_none());
    }
}

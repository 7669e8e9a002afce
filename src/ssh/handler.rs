//! `russh::client::Handler` implementation: the host-key verification step of
//! the Session state machine (spec.md §4.4).
//!
//! Verification itself is synchronous (a repository lookup), but an unknown
//! key must suspend the handshake until the UI posts a decision on a
//! one-shot channel (spec.md §4.4, §5 "Suspension points"). That channel is
//! created here and its sender handed back to the `Session` through
//! `pending_decision` so `SessionRegistry::continue_after_host_key` can reach
//! it.
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use russh::client::Handler;
use russh_keys::key::PublicKey;
use tokio::sync::oneshot;

use super::errors::SshError;
use super::fingerprint;
use crate::events::{self, Event, HostKeyInfo};
use crate::repository::{Id, KnownHost, Repository};

/// What the UI decided about an unknown host key (spec.md §4.4
/// `VerifyingHost`). Kept as a tri-state rather than a bare `bool` so
/// "accept without saving" and "reject" can't collapse onto the same wire
/// value — the registry surface still exposes `save: bool` for the accept
/// path per spec.md §4.5, and a separate reject call for the other.
#[derive(Debug, Clone, Copy)]
pub(crate) enum HostKeyDecision {
    Accept { save: bool },
    Reject,
}

pub(crate) type PendingDecision = Arc<Mutex<Option<oneshot::Sender<HostKeyDecision>>>>;

pub(crate) struct SessionHandler {
    pub(crate) host_id: Id,
    pub(crate) hostname: String,
    pub(crate) port: u16,
    pub(crate) repository: Arc<dyn Repository>,
    pub(crate) pending_decision: PendingDecision,
    /// Set just before `check_server_key` returns `Ok(false)` for a
    /// user-driven reject, so the caller can tell that failure apart from an
    /// ordinary transport-level handshake error.
    pub(crate) rejected: Arc<AtomicBool>,
}

impl Handler for SessionHandler {
    type Error = SshError;

    async fn check_server_key(&mut self, server_public_key: &PublicKey) -> Result<bool, Self::Error> {
        let fp = fingerprint::sha256_fingerprint(server_public_key);

        if let Ok(Some(known)) = self.repository.get_known_host_by_fingerprint(&fp)
            && known.hostname == self.hostname
            && known.port == self.port
        {
            events::connecting(self.host_id, format!("- Checking host key: {}", known.fingerprint));
            events::connecting(self.host_id, format!("- Host {}:{} is known and matches", self.hostname, self.port));
            return Ok(true);
        }

        let (tx, rx) = oneshot::channel();
        *self.pending_decision.lock().unwrap_or_else(|poison| poison.into_inner()) = Some(tx);

        events::EventBus::send(Event::HostKey {
            host_id: self.host_id,
            info: HostKeyInfo {
                hostname: self.hostname.clone(),
                port: self.port,
                key_type: server_public_key.name().to_string(),
                fingerprint: fp.clone(),
                md5_fingerprint: fingerprint::md5_fingerprint(server_public_key),
                key: server_public_key.clone(),
            },
        });

        let decision = rx.await.unwrap_or(HostKeyDecision::Reject);

        match decision {
            HostKeyDecision::Accept { save } => {
                if save {
                    let _ = self.repository.create_known_host(KnownHost {
                        id: 0,
                        hostname: self.hostname.clone(),
                        port: self.port,
                        key_type: server_public_key.name().to_string(),
                        fingerprint: fp,
                    });
                    events::connecting(self.host_id, "- Host key added to known hosts");
                } else {
                    events::connecting(self.host_id, "- Host key accepted (not saved)");
                }
                Ok(true)
            }
            HostKeyDecision::Reject => {
                events::connecting(self.host_id, "- Host key rejected");
                self.rejected.store(true, Ordering::SeqCst);
                Ok(false)
            }
        }
    }
}

/// Unblock a pending host-key decision. No-op (not an error) if there is no
/// decision in flight — `ContinueAfterHostKey` racing a connection that
/// already resolved is expected, not exceptional.
pub(crate) fn resolve_pending(pending: &PendingDecision, decision: HostKeyDecision) -> bool {
    if let Some(tx) = pending.lock().unwrap_or_else(|poison| poison.into_inner()).take() {
        let _ = tx.send(decision);
        true
    } else {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_pending_is_a_noop_without_an_outstanding_decision() {
        let pending: PendingDecision = Arc::new(Mutex::new(None));
        assert!(!resolve_pending(&pending, HostKeyDecision::Accept { save: true }));
    }

    #[tokio::test]
    async fn accept_without_save_is_distinct_from_reject() {
        let pending: PendingDecision = Arc::new(Mutex::new(None));
        let (tx, rx) = oneshot::channel();
        *pending.lock().unwrap() = Some(tx);

        assert!(resolve_pending(&pending, HostKeyDecision::Accept { save: false }));
        match rx.await.unwrap() {
            HostKeyDecision::Accept { save } => assert!(!save),
            HostKeyDecision::Reject => panic!("accept must not be observed as reject"),
        }
    }

    #[tokio::test]
    async fn reject_resolves_distinctly_from_accept() {
        let pending: PendingDecision = Arc::new(Mutex::new(None));
        let (tx, rx) = oneshot::channel();
        *pending.lock().unwrap() = Some(tx);

        assert!(resolve_pending(&pending, HostKeyDecision::Reject));
        match rx.await.unwrap() {
            HostKeyDecision::Reject => {}
            HostKeyDecision::Accept { .. } => panic!("reject must not be observed as accept"),
        }
    }
}


//! The asynchronous event bridge between session workers and the UI loop
//! (spec.md §4.6). A single process-wide channel carries a closed `Event` sum
//! type; workers call `EventBus::send`, the UI loop owns the one `Receiver`
//! handed back by `EventBus::bind`.

use crate::repository::{ConnectionMode, Id};
use once_cell::sync::Lazy;
use russh_keys::key::PublicKey;
use std::sync::RwLock;

use crossbeam_channel::{Receiver, Sender};

/// Deep enough that a burst of PTY output chunks never blocks a worker on a
/// quiet UI loop; spec.md §9 suggests 100 for outputs / 10 for errors as a
/// per-kind split, but one shared channel with this capacity covers both
/// without the extra bookkeeping of per-kind channels.
const BUS_CAPACITY: usize = 256;

static GLOBAL_SENDER: Lazy<RwLock<Option<Sender<Event>>>> = Lazy::new(|| RwLock::new(None));

/// One entry in the host-key prompt: everything the widget needs to render
/// the decision and, on accept, to persist a `KnownHost` row.
#[derive(Debug, Clone)]
pub struct HostKeyInfo {
    pub hostname: String,
    pub port: u16,
    pub key_type: String,
    pub fingerprint: String,
    pub md5_fingerprint: String,
    pub key: PublicKey,
}

/// Tagged event stream from session workers to the UI loop (spec.md §4.6).
/// Ordered per session (FIFO); interleaved freely across sessions.
#[derive(Debug, Clone)]
pub enum Event {
    Connecting { host_id: Id, message: String },
    Authenticating { host_id: Id, message: String },
    HostKey { host_id: Id, info: HostKeyInfo },
    Connected { host_id: Id, log_id: Id },
    Output { host_id: Id, bytes: Vec<u8> },
    Error { host_id: Id, message: String },
    Disconnected { host_id: Id },
}

impl Event {
    pub fn host_id(&self) -> Id {
        match self {
            Event::Connecting { host_id, .. }
            | Event::Authenticating { host_id, .. }
            | Event::HostKey { host_id, .. }
            | Event::Connected { host_id, .. }
            | Event::Output { host_id, .. }
            | Event::Error { host_id, .. }
            | Event::Disconnected { host_id } => *host_id,
        }
    }
}

/// Process-wide one-way channel from session workers to the UI loop.
pub struct EventBus;

impl EventBus {
    /// Bind the bus for this process, returning the receiving end for the UI
    /// loop to poll. Must be called once at startup, before any session is
    /// initiated.
    pub fn bind() -> Receiver<Event> {
        let (tx, rx) = crossbeam_channel::bounded(BUS_CAPACITY);
        *GLOBAL_SENDER.write().unwrap_or_else(|poison| poison.into_inner()) = Some(tx);
        rx
    }

    /// Release the bus. Events posted after this point are dropped, per
    /// spec.md §4.6.
    pub fn release() {
        *GLOBAL_SENDER.write().unwrap_or_else(|poison| poison.into_inner()) = None;
    }

    /// Post an event. A no-op if the bus isn't bound, and non-blocking even
    /// when bound — a full channel drops the event rather than stalling a
    /// worker on a suspended UI loop.
    pub fn send(event: Event) {
        let guard = GLOBAL_SENDER.read().unwrap_or_else(|poison| poison.into_inner());
        if let Some(sender) = guard.as_ref() {
            let _ = sender.try_send(event);
        }
    }
}

/// Helpers mirroring the original's `SSHConnectingMsg`/etc. progress lines
/// (SPEC_FULL.md §B): small free functions so session code reads as a
/// sequence of narration rather than struct-literal noise.
pub fn connecting(host_id: Id, message: impl Into<String>) {
    EventBus::send(Event::Connecting { host_id, message: message.into() });
}

pub fn authenticating(host_id: Id, message: impl Into<String>) {
    EventBus::send(Event::Authenticating { host_id, message: message.into() });
}

pub fn connection_mode_label(mode: ConnectionMode) -> &'static str {
    match mode {
        ConnectionMode::Ssh => "ssh",
        ConnectionMode::Telnet => "telnet",
    }
}

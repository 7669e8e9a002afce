//! One in-flight SSH engagement bound to a host id (spec.md §4.4).
//!
//! The state machine itself runs as a single `tokio` task (spec.md §5, §9
//! "one task per session"); `SessionHandle` is the `Send + Sync` remote
//! control the UI loop and `SessionRegistry` hold onto. All state the UI
//! loop reads (`state`) or the task reads (`pending_decision`) is behind an
//! `Arc<Mutex<_>>` precisely because it crosses that boundary — nothing else
//! is shared, per spec.md §5 "Locking discipline".

use std::net::UdpSocket;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::Utc;
use russh::client::{self, Msg};
use russh::{ChannelMsg, Pty};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, oneshot};

use super::auth::{self, ResolvedAuth};
use super::errors::SshError;
use super::handler::{self, HostKeyDecision, PendingDecision, SessionHandler};
use crate::events::{self, Event};
use crate::logging::SshLogger;
use crate::repository::{ConnectionLog, Host, Id, Repository};

const DIAL_TIMEOUT: Duration = Duration::from_secs(30);
const PTY_TYPE: &str = "xterm-256color";
const TERMINAL_SPEED: u32 = 14400;

/// Forward-only state machine (spec.md §4.4 diagram).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Connecting,
    Authenticating,
    VerifyingHost,
    Connected,
    Disconnected,
    Error,
}

pub(crate) enum SessionCommand {
    Input(Vec<u8>),
    Resize(u16, u16),
}

/// The `Send + Sync` remote control for one session's background task.
pub struct SessionHandle {
    host_id: Id,
    state: Arc<Mutex<SessionState>>,
    pending_decision: PendingDecision,
    command_tx: mpsc::UnboundedSender<SessionCommand>,
    close_tx: Mutex<Option<oneshot::Sender<()>>>,
}

impl SessionHandle {
    pub fn host_id(&self) -> Id {
        self.host_id
    }

    pub fn state(&self) -> SessionState {
        *self.state.lock().unwrap_or_else(|poison| poison.into_inner())
    }

    /// Queue keystrokes for the remote stdin. Errors if the worker has
    /// already exited; never panics (spec.md §4.5).
    pub fn send_input(&self, bytes: Vec<u8>) -> Result<(), SshError> {
        self.command_tx.send(SessionCommand::Input(bytes)).map_err(|_| dead_session())
    }

    pub fn window_change(&self, width: u16, height: u16) -> Result<(), SshError> {
        self.command_tx.send(SessionCommand::Resize(width, height)).map_err(|_| dead_session())
    }

    /// Unblock a pending host-key decision with an accept, optionally saving
    /// the key to known-hosts. Returns `false` if no decision is outstanding
    /// (e.g. the connection already failed or a known host was matched
    /// silently) rather than panicking.
    pub fn continue_after_host_key(&self, save: bool) -> bool {
        handler::resolve_pending(&self.pending_decision, HostKeyDecision::Accept { save })
    }

    /// Unblock a pending host-key decision with a reject, sending the
    /// session to `Error` rather than `Connected` (spec.md §4.4 diagram).
    pub fn reject_host_key(&self) -> bool {
        handler::resolve_pending(&self.pending_decision, HostKeyDecision::Reject)
    }

    /// Close the network handles. Safe to call more than once.
    pub fn close(&self) {
        if let Some(tx) = self.close_tx.lock().unwrap_or_else(|poison| poison.into_inner()).take() {
            let _ = tx.send(());
        }
    }
}

fn dead_session() -> SshError {
    SshError::SessionIo(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "session worker has exited"))
}

/// Spawn the background task for `host` and return the handle the registry
/// keeps. `runtime` is the shared multi-threaded executor (spec.md §9
/// "one task per session").
pub(crate) fn spawn(
    runtime: &tokio::runtime::Handle,
    host: Host,
    repository: Arc<dyn Repository>,
    ssh_logger: Arc<SshLogger>,
    initial_size: (u16, u16),
) -> SessionHandle {
    let host_id = host.id;
    let state = Arc::new(Mutex::new(SessionState::Connecting));
    let pending_decision: PendingDecision = Arc::new(Mutex::new(None));
    let (command_tx, command_rx) = mpsc::unbounded_channel();
    let (close_tx, close_rx) = oneshot::channel();

    let task_state = state.clone();
    let task_pending = pending_decision.clone();

    runtime.spawn(async move {
        run(host, repository, ssh_logger, initial_size, task_state, task_pending, command_rx, close_rx).await;
    });

    SessionHandle {
        host_id,
        state,
        pending_decision,
        command_tx,
        close_tx: Mutex::new(Some(close_tx)),
    }
}

async fn run(
    host: Host,
    repository: Arc<dyn Repository>,
    ssh_logger: Arc<SshLogger>,
    initial_size: (u16, u16),
    state: Arc<Mutex<SessionState>>,
    pending_decision: PendingDecision,
    command_rx: mpsc::UnboundedReceiver<SessionCommand>,
    close_rx: oneshot::Receiver<()>,
) {
    let host_id = host.id;
    let log_slot: Arc<Mutex<Option<ConnectionLog>>> = Arc::new(Mutex::new(None));

    tokio::select! {
        _ = close_rx => {
            handler::resolve_pending(&pending_decision, HostKeyDecision::Reject);
        }
        _ = run_body(host, repository.clone(), ssh_logger, initial_size, state.clone(), pending_decision.clone(), command_rx, log_slot.clone()) => {}
    }

    {
        let mut guard = state.lock().unwrap_or_else(|poison| poison.into_inner());
        if *guard != SessionState::Error {
            *guard = SessionState::Disconnected;
        }
    }
    events::EventBus::send(Event::Disconnected { host_id });

    if let Some(mut log) = log_slot.lock().unwrap_or_else(|poison| poison.into_inner()).take() {
        log.ended_at = Some(Utc::now());
        let _ = repository.update_connection_log(log);
    }
}

fn fail(host_id: Id, state: &Arc<Mutex<SessionState>>, err: impl std::fmt::Display) {
    *state.lock().unwrap_or_else(|poison| poison.into_inner()) = SessionState::Error;
    events::EventBus::send(Event::Error { host_id, message: err.to_string() });
}

async fn run_body(
    host: Host,
    repository: Arc<dyn Repository>,
    ssh_logger: Arc<SshLogger>,
    initial_size: (u16, u16),
    state: Arc<Mutex<SessionState>>,
    pending_decision: PendingDecision,
    mut command_rx: mpsc::UnboundedReceiver<SessionCommand>,
    log_slot: Arc<Mutex<Option<ConnectionLog>>>,
) {
    let host_id = host.id;

    let credential = match repository.resolve_credential(&host) {
        Ok(credential) => credential,
        Err(err) => return fail(host_id, &state, format!("failed to load credential: {}", err)),
    };

    events::connecting(host_id, format!("- Starting connection to {} port {}", host.hostname, host.port));
    events::connecting(host_id, format!("- Starting address resolution of {}", host.hostname));

    let addr = format!("{}:{}", host.hostname, host.port);
    let stream = match tokio::time::timeout(DIAL_TIMEOUT, TcpStream::connect(&addr)).await {
        Ok(Ok(stream)) => stream,
        Ok(Err(err)) => return fail(host_id, &state, format!("failed to dial {}: {}", addr, err)),
        Err(_) => return fail(host_id, &state, format!("timed out dialing {} after {:?}", addr, DIAL_TIMEOUT)),
    };

    events::connecting(host_id, "- Address resolution finished");
    events::connecting(host_id, format!("- Connecting to {} port {}", host.hostname, host.port));

    *state.lock().unwrap_or_else(|poison| poison.into_inner()) = SessionState::VerifyingHost;

    let config = Arc::new(client::Config::default());
    let rejected = Arc::new(AtomicBool::new(false));
    let handler = SessionHandler {
        host_id,
        hostname: host.hostname.clone(),
        port: host.port,
        repository: repository.clone(),
        pending_decision: pending_decision.clone(),
        rejected: rejected.clone(),
    };

    let mut handle = match client::connect_stream(config, stream, handler).await {
        Ok(handle) => handle,
        Err(_) if rejected.load(Ordering::SeqCst) => return fail(host_id, &state, SshError::HostKeyRejected),
        Err(err) => return fail(host_id, &state, SshError::Handshake(err)),
    };

    events::connecting(host_id, format!("- Connection to {} established", host.hostname));
    events::connecting(host_id, "- Starting SSH session");

    *state.lock().unwrap_or_else(|poison| poison.into_inner()) = SessionState::Authenticating;
    events::authenticating(host_id, format!("- Authenticating to {}:{}", host.hostname, host.port));

    let resolved = match auth::resolve(&credential) {
        Ok(resolved) => resolved,
        Err(err) => return fail(host_id, &state, err),
    };
    let method_label = auth::auth_method_label(&credential);
    events::authenticating(host_id, format!("- Authenticating using {} method", method_label));

    let authenticated = match authenticate(&mut handle, resolved).await {
        Ok(authenticated) => authenticated,
        Err(err) => return fail(host_id, &state, err),
    };
    if !authenticated {
        return fail(host_id, &state, SshError::Auth("all authentication methods were rejected".into()));
    }

    events::authenticating(host_id, format!("- Authentication succeeded ({})", method_label));
    events::authenticating(host_id, format!("- Authenticated to {}:{}", host.hostname, host.port));

    events::connecting(host_id, "- Creating terminal session");
    let (cols, rows) = initial_size;
    let mut channel = match handle.channel_open_session().await {
        Ok(channel) => channel,
        Err(err) => return fail(host_id, &state, SshError::Handshake(err)),
    };

    let modes = [(Pty::ECHO, 1), (Pty::TTY_OP_ISPEED, TERMINAL_SPEED), (Pty::TTY_OP_OSPEED, TERMINAL_SPEED)];
    if let Err(err) = channel.request_pty(false, PTY_TYPE, cols as u32, rows as u32, 0, 0, &modes).await {
        return fail(host_id, &state, SshError::Pty(err));
    }
    if let Err(err) = channel.request_shell(false).await {
        return fail(host_id, &state, SshError::Pty(err));
    }

    events::connecting(host_id, "- Shell started successfully");
    *state.lock().unwrap_or_else(|poison| poison.into_inner()) = SessionState::Connected;

    let log = ConnectionLog {
        id: 0,
        started_at: Utc::now(),
        ended_at: None,
        local_hostname: local_hostname(),
        local_ip: local_ipv4(),
        remote_hostname: host.hostname.clone(),
        mode: host.mode,
        credential_id: host.credential_id,
        credential_type: host.credential_type,
    };
    let (log_id, stored_log) = match repository.create_connection_log(log.clone()) {
        Ok(created) => (created.id, created),
        Err(_) => (0, log),
    };
    *log_slot.lock().unwrap_or_else(|poison| poison.into_inner()) = Some(stored_log);

    events::EventBus::send(Event::Connected { host_id, log_id });

    pump(host_id, &mut channel, &mut command_rx, &ssh_logger).await;
}

async fn authenticate(handle: &mut client::Handle<SessionHandler>, resolved: ResolvedAuth) -> Result<bool, SshError> {
    match resolved {
        ResolvedAuth::Password { username, password } => handle.authenticate_password(username, password).await.map_err(SshError::Handshake),
        ResolvedAuth::PublicKey { username, signers } => {
            for signer in signers {
                if handle.authenticate_publickey(username.clone(), signer).await.map_err(SshError::Handshake)? {
                    return Ok(true);
                }
            }
            Ok(false)
        }
    }
}

/// The bidirectional I/O pump (spec.md §4.4 "I/O pump"): merges channel
/// data/extended-data into `Output` events and drains queued keystrokes and
/// resize requests into the channel. Exits on EOF/close from either side.
async fn pump(host_id: Id, channel: &mut russh::Channel<Msg>, command_rx: &mut mpsc::UnboundedReceiver<SessionCommand>, ssh_logger: &SshLogger) {
    loop {
        tokio::select! {
            command = command_rx.recv() => {
                match command {
                    Some(SessionCommand::Input(bytes)) => {
                        if channel.data(&bytes[..]).await.is_err() {
                            break;
                        }
                    }
                    Some(SessionCommand::Resize(width, height)) => {
                        let _ = channel.window_change(width as u32, height as u32, 0, 0).await;
                    }
                    None => {
                        let _ = channel.close().await;
                        break;
                    }
                }
            }
            message = channel.wait() => {
                match message {
                    Some(ChannelMsg::Data { data }) => {
                        let bytes = data.to_vec();
                        if let Ok(text) = std::str::from_utf8(&bytes) {
                            let _ = ssh_logger.log(text);
                        }
                        events::EventBus::send(Event::Output { host_id, bytes });
                    }
                    Some(ChannelMsg::ExtendedData { data, .. }) => {
                        events::EventBus::send(Event::Output { host_id, bytes: data.to_vec() });
                    }
                    Some(ChannelMsg::Eof) | Some(ChannelMsg::Close) => break,
                    Some(_) => {}
                    None => break,
                }
            }
        }
    }
}

fn local_hostname() -> String {
    std::process::Command::new("hostname")
        .output()
        .ok()
        .and_then(|output| String::from_utf8(output.stdout).ok())
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Best-effort local IPv4 discovery (SPEC_FULL.md §B): connect a UDP socket
/// to an arbitrary routable address (no packet is actually sent) and read
/// back the interface it bound to.
fn local_ipv4() -> String {
    UdpSocket::bind("0.0.0.0:0")
        .and_then(|socket| {
            socket.connect("1.1.1.1:80")?;
            socket.local_addr()
        })
        .map(|addr| addr.ip().to_string())
        .unwrap_or_else(|_| "unknown".to_string())
}


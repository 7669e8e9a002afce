//! Modal overlays drawn on top of the sidebar/tab view: the connection
//! popup, the host-key prompt, and the delete confirmation (spec.md §2
//! Widgets row).

use crate::events::HostKeyInfo;
use crate::repository::{ConnectionMode, CredentialType, Host, Id};

use super::text_field::TextField;

/// One credential choosable from the connect popup's identity chooser.
#[derive(Debug, Clone)]
pub struct CredentialOption {
    pub id: Id,
    pub kind: CredentialType,
    pub label: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectField {
    Name,
    Hostname,
    Port,
    Mode,
    Credential,
    Connect,
    Cancel,
}

impl ConnectField {
    pub fn next(self) -> Self {
        match self {
            Self::Name => Self::Hostname,
            Self::Hostname => Self::Port,
            Self::Port => Self::Mode,
            Self::Mode => Self::Credential,
            Self::Credential => Self::Connect,
            Self::Connect => Self::Cancel,
            Self::Cancel => Self::Name,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Self::Name => Self::Cancel,
            Self::Hostname => Self::Name,
            Self::Port => Self::Hostname,
            Self::Mode => Self::Port,
            Self::Credential => Self::Mode,
            Self::Connect => Self::Credential,
            Self::Cancel => Self::Connect,
        }
    }
}

/// The connection popup: add a new host, or re-edit one already in the
/// catalog before connecting (spec.md §2 "Connection popup").
pub struct ConnectPopupState {
    pub editing_host_id: Option<Id>,
    pub name: TextField,
    pub hostname: TextField,
    pub port: TextField,
    pub mode: ConnectionMode,
    pub credentials: Vec<CredentialOption>,
    pub credential_index: usize,
    pub focus: ConnectField,
    pub error: Option<String>,
}

impl ConnectPopupState {
    pub fn new(credentials: Vec<CredentialOption>) -> Self {
        Self {
            editing_host_id: None,
            name: TextField::new(""),
            hostname: TextField::new(""),
            port: TextField::new("22"),
            mode: ConnectionMode::Ssh,
            credentials,
            credential_index: 0,
            focus: ConnectField::Name,
            error: None,
        }
    }

    pub fn from_host(host: &Host, credentials: Vec<CredentialOption>) -> Self {
        let credential_index = credentials
            .iter()
            .position(|credential| credential.id == host.credential_id && credential.kind == host.credential_type)
            .unwrap_or(0);
        Self {
            editing_host_id: Some(host.id),
            name: TextField::new(host.name.clone()),
            hostname: TextField::new(host.hostname.clone()),
            port: TextField::new(host.port.to_string()),
            mode: host.mode,
            credentials,
            credential_index,
            focus: ConnectField::Name,
            error: None,
        }
    }

    pub fn toggle_mode(&mut self) {
        self.mode = match self.mode {
            ConnectionMode::Ssh => ConnectionMode::Telnet,
            ConnectionMode::Telnet => ConnectionMode::Ssh,
        };
    }

    pub fn next_credential(&mut self) {
        if !self.credentials.is_empty() {
            self.credential_index = (self.credential_index + 1) % self.credentials.len();
        }
    }

    pub fn prev_credential(&mut self) {
        if self.credentials.is_empty() {
            return;
        }
        self.credential_index = if self.credential_index == 0 { self.credentials.len() - 1 } else { self.credential_index - 1 };
    }

    pub fn selected_credential(&self) -> Option<&CredentialOption> {
        self.credentials.get(self.credential_index)
    }

    /// Build the `Host` row this popup describes, for persistence. Returns
    /// an error message for the field in question when validation fails.
    pub fn build_host(&self) -> Result<Host, String> {
        if self.name.value().trim().is_empty() {
            return Err("name is required".to_string());
        }
        if self.hostname.value().trim().is_empty() {
            return Err("hostname is required".to_string());
        }
        let port: u16 = self.port.value().trim().parse().map_err(|_| "port must be a number between 1 and 65535".to_string())?;
        let credential = self.selected_credential().ok_or_else(|| "no identity or key is available; create one first".to_string())?;

        Ok(Host {
            id: self.editing_host_id.unwrap_or(0),
            name: self.name.value().trim().to_string(),
            hostname: self.hostname.value().trim().to_string(),
            port,
            mode: self.mode,
            credential_id: credential.id,
            credential_type: credential.kind,
            last_connected_at: None,
        })
    }
}

/// The host-key verification prompt (spec.md §4.4 `VerifyingHost`).
pub struct HostKeyPromptState {
    pub host_id: Id,
    pub info: HostKeyInfo,
    pub save: bool,
}

/// A yes/no confirmation, currently only used for host deletion.
pub enum ConfirmAction {
    DeleteHost(Id),
}

pub struct ConfirmState {
    pub action: ConfirmAction,
    pub message: String,
}

/// A retriable session error (spec.md §4.4 "offers Retry ... or Cancel",
/// §7 "an error with Retry/Cancel").
pub struct ConnectionErrorState {
    pub host_id: Id,
    pub message: String,
}

pub enum Overlay {
    Connect(ConnectPopupState),
    HostKey(HostKeyPromptState),
    Confirm(ConfirmState),
    ConnectionError(ConnectionErrorState),
}

//! Repository entities (spec.md §6): hosts, credentials, known hosts, and
//! connection audit log rows. Plain data, no behavior — the trait in
//! `traits.rs` is the only thing that touches persistence.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type Id = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConnectionMode {
    Ssh,
    Telnet,
}

/// Which credential table a host's `credential_id` resolves against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CredentialType {
    Identity,
    Key,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Host {
    pub id: Id,
    pub name: String,
    pub hostname: String,
    pub port: u16,
    pub mode: ConnectionMode,
    pub credential_id: Id,
    pub credential_type: CredentialType,
    pub last_connected_at: Option<DateTime<Utc>>,
}

/// Username/password credential. `password` is stored encrypted at rest by
/// the repository implementation (see `crypto.rs`); callers always see it in
/// plaintext through the `Repository` trait.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: Id,
    pub name: String,
    pub username: String,
    pub password: String,
}

/// Public-key credential, with an optional certificate that must be signed by
/// the same key to be offered as an additional auth method (spec.md §4.4).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Key {
    pub id: Id,
    pub name: String,
    pub username: String,
    pub private_key: String,
    pub public_key: Option<String>,
    pub certificate: Option<String>,
}

/// A credential resolved from a host's `credential_id`/`credential_type`
/// pair — the concrete type-switch target the session's auth step dispatches
/// on (spec.md §9 "Credential type dispatch by concrete type").
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credential {
    Identity(Identity),
    Key(Key),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnownHost {
    pub id: Id,
    pub hostname: String,
    pub port: u16,
    pub key_type: String,
    pub fingerprint: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionLog {
    pub id: Id,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    pub local_hostname: String,
    pub local_ip: String,
    pub remote_hostname: String,
    pub mode: ConnectionMode,
    pub credential_id: Id,
    pub credential_type: CredentialType,
}

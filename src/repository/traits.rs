//! The repository contract (spec.md §6): a thin, abstract CRUD interface the
//! core consumes but never implements the storage engine for directly — the
//! concrete `file` backend lives alongside it so the crate is runnable, but
//! tests substitute `memory::InMemoryRepository` instead.

use super::entities::*;
use super::errors::RepositoryError;

pub trait Repository: Send + Sync {
    fn list_hosts(&self) -> Result<Vec<Host>, RepositoryError>;
    fn get_host(&self, id: Id) -> Result<Host, RepositoryError>;
    fn create_host(&self, host: Host) -> Result<Host, RepositoryError>;
    fn update_host(&self, host: Host) -> Result<Host, RepositoryError>;
    fn delete_host(&self, id: Id) -> Result<(), RepositoryError>;

    fn list_identities(&self) -> Result<Vec<Identity>, RepositoryError>;
    fn get_identity(&self, id: Id) -> Result<Identity, RepositoryError>;
    fn create_identity(&self, identity: Identity) -> Result<Identity, RepositoryError>;
    fn update_identity(&self, identity: Identity) -> Result<Identity, RepositoryError>;
    fn delete_identity(&self, id: Id) -> Result<(), RepositoryError>;

    fn list_keys(&self) -> Result<Vec<Key>, RepositoryError>;
    fn get_key(&self, id: Id) -> Result<Key, RepositoryError>;
    fn create_key(&self, key: Key) -> Result<Key, RepositoryError>;
    fn update_key(&self, key: Key) -> Result<Key, RepositoryError>;
    fn delete_key(&self, id: Id) -> Result<(), RepositoryError>;

    fn list_known_hosts(&self) -> Result<Vec<KnownHost>, RepositoryError>;
    fn create_known_host(&self, known_host: KnownHost) -> Result<KnownHost, RepositoryError>;
    fn delete_known_host(&self, id: Id) -> Result<(), RepositoryError>;
    fn get_known_host_by_fingerprint(&self, fingerprint: &str) -> Result<Option<KnownHost>, RepositoryError>;

    fn list_connection_logs(&self) -> Result<Vec<ConnectionLog>, RepositoryError>;
    fn create_connection_log(&self, log: ConnectionLog) -> Result<ConnectionLog, RepositoryError>;
    fn update_connection_log(&self, log: ConnectionLog) -> Result<ConnectionLog, RepositoryError>;

    /// Resolve a host's credential reference to the concrete credential,
    /// per spec.md §4.4 "Credentials resolve through the repository".
    fn resolve_credential(&self, host: &Host) -> Result<Credential, RepositoryError> {
        match host.credential_type {
            CredentialType::Identity => self.get_identity(host.credential_id).map(Credential::Identity),
            CredentialType::Key => self.get_key(host.credential_id).map(Credential::Key),
        }
    }
}

//! In-memory `Repository` fake used by tests that exercise the ssh/tui layers
//! without touching the filesystem. No encryption — callers already get
//! plaintext from `Repository`, so there is nothing for a fake to hide.

use std::sync::Mutex;

use super::entities::*;
use super::errors::RepositoryError;
use super::traits::Repository;

#[derive(Default)]
struct Tables {
    hosts: Vec<Host>,
    identities: Vec<Identity>,
    keys: Vec<Key>,
    known_hosts: Vec<KnownHost>,
    connection_logs: Vec<ConnectionLog>,
    next_id: Id,
}

impl Tables {
    fn allocate_id(&mut self) -> Id {
        self.next_id += 1;
        self.next_id
    }
}

#[derive(Default)]
pub struct InMemoryRepository {
    tables: Mutex<Tables>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Repository for InMemoryRepository {
    fn list_hosts(&self) -> Result<Vec<Host>, RepositoryError> {
        Ok(self.tables.lock().unwrap().hosts.clone())
    }

    fn get_host(&self, id: Id) -> Result<Host, RepositoryError> {
        self.tables.lock().unwrap().hosts.iter().find(|h| h.id == id).cloned().ok_or(RepositoryError::NotFound(id))
    }

    fn create_host(&self, mut host: Host) -> Result<Host, RepositoryError> {
        let mut tables = self.tables.lock().unwrap();
        host.id = tables.allocate_id();
        tables.hosts.push(host.clone());
        Ok(host)
    }

    fn update_host(&self, host: Host) -> Result<Host, RepositoryError> {
        let mut tables = self.tables.lock().unwrap();
        let slot = tables.hosts.iter_mut().find(|h| h.id == host.id).ok_or(RepositoryError::NotFound(host.id))?;
        *slot = host.clone();
        Ok(host)
    }

    fn delete_host(&self, id: Id) -> Result<(), RepositoryError> {
        self.tables.lock().unwrap().hosts.retain(|h| h.id != id);
        Ok(())
    }

    fn list_identities(&self) -> Result<Vec<Identity>, RepositoryError> {
        Ok(self.tables.lock().unwrap().identities.clone())
    }

    fn get_identity(&self, id: Id) -> Result<Identity, RepositoryError> {
        self.tables.lock().unwrap().identities.iter().find(|i| i.id == id).cloned().ok_or(RepositoryError::NotFound(id))
    }

    fn create_identity(&self, mut identity: Identity) -> Result<Identity, RepositoryError> {
        let mut tables = self.tables.lock().unwrap();
        identity.id = tables.allocate_id();
        tables.identities.push(identity.clone());
        Ok(identity)
    }

    fn update_identity(&self, identity: Identity) -> Result<Identity, RepositoryError> {
        let mut tables = self.tables.lock().unwrap();
        let slot = tables.identities.iter_mut().find(|i| i.id == identity.id).ok_or(RepositoryError::NotFound(identity.id))?;
        *slot = identity.clone();
        Ok(identity)
    }

    fn delete_identity(&self, id: Id) -> Result<(), RepositoryError> {
        self.tables.lock().unwrap().identities.retain(|i| i.id != id);
        Ok(())
    }

    fn list_keys(&self) -> Result<Vec<Key>, RepositoryError> {
        Ok(self.tables.lock().unwrap().keys.clone())
    }

    fn get_key(&self, id: Id) -> Result<Key, RepositoryError> {
        self.tables.lock().unwrap().keys.iter().find(|k| k.id == id).cloned().ok_or(RepositoryError::NotFound(id))
    }

    fn create_key(&self, mut key: Key) -> Result<Key, RepositoryError> {
        let mut tables = self.tables.lock().unwrap();
        key.id = tables.allocate_id();
        tables.keys.push(key.clone());
        Ok(key)
    }

    fn update_key(&self, key: Key) -> Result<Key, RepositoryError> {
        let mut tables = self.tables.lock().unwrap();
        let slot = tables.keys.iter_mut().find(|k| k.id == key.id).ok_or(RepositoryError::NotFound(key.id))?;
        *slot = key.clone();
        Ok(key)
    }

    fn delete_key(&self, id: Id) -> Result<(), RepositoryError> {
        self.tables.lock().unwrap().keys.retain(|k| k.id != id);
        Ok(())
    }

    fn list_known_hosts(&self) -> Result<Vec<KnownHost>, RepositoryError> {
        Ok(self.tables.lock().unwrap().known_hosts.clone())
    }

    fn create_known_host(&self, mut known_host: KnownHost) -> Result<KnownHost, RepositoryError> {
        let mut tables = self.tables.lock().unwrap();
        known_host.id = tables.allocate_id();
        tables.known_hosts.push(known_host.clone());
        Ok(known_host)
    }

    fn delete_known_host(&self, id: Id) -> Result<(), RepositoryError> {
        self.tables.lock().unwrap().known_hosts.retain(|k| k.id != id);
        Ok(())
    }

    fn get_known_host_by_fingerprint(&self, fingerprint: &str) -> Result<Option<KnownHost>, RepositoryError> {
        Ok(self.tables.lock().unwrap().known_hosts.iter().find(|k| k.fingerprint == fingerprint).cloned())
    }

    fn list_connection_logs(&self) -> Result<Vec<ConnectionLog>, RepositoryError> {
        Ok(self.tables.lock().unwrap().connection_logs.clone())
    }

    fn create_connection_log(&self, mut log: ConnectionLog) -> Result<ConnectionLog, RepositoryError> {
        let mut tables = self.tables.lock().unwrap();
        log.id = tables.allocate_id();
        tables.connection_logs.push(log.clone());
        Ok(log)
    }

    fn update_connection_log(&self, log: ConnectionLog) -> Result<ConnectionLog, RepositoryError> {
        let mut tables = self.tables.lock().unwrap();
        let slot = tables.connection_logs.iter_mut().find(|l| l.id == log.id).ok_or(RepositoryError::NotFound(log.id))?;
        *slot = log.clone();
        Ok(log)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_credential_dispatches_on_type() {
        let repo = InMemoryRepository::new();
        let identity = repo.create_identity(Identity { id: 0, name: "prod".into(), username: "root".into(), password: "x".into() }).unwrap();
        let host = repo
            .create_host(Host {
                id: 0,
                name: "box".into(),
                hostname: "example.com".into(),
                port: 22,
                mode: ConnectionMode::Ssh,
                credential_id: identity.id,
                credential_type: CredentialType::Identity,
                last_connected_at: None,
            })
            .unwrap();

        match repo.resolve_credential(&host).unwrap() {
            Credential::Identity(i) => assert_eq!(i.username, "root"),
            Credential::Key(_) => panic!("expected identity credential"),
        }
    }

    #[test]
    fn delete_host_is_idempotent() {
        let repo = InMemoryRepository::new();
        let host = repo
            .create_host(Host {
                id: 0,
                name: "box".into(),
                hostname: "example.com".into(),
                port: 22,
                mode: ConnectionMode::Ssh,
                credential_id: 1,
                credential_type: CredentialType::Identity,
                last_connected_at: None,
            })
            .unwrap();
        repo.delete_host(host.id).unwrap();
        repo.delete_host(host.id).unwrap();
        assert!(repo.list_hosts().unwrap().is_empty());
    }
}

//! File-backed `Repository`: a single JSON document under the app's database
//! file (spec.md §6 Filesystem), guarded by an `RwLock` and rewritten in full
//! on every mutation. Secret fields are encrypted at rest via
//! [`CredentialCipher`]; every other concern (auto-migration via serde
//! defaults, id assignment) lives here rather than behind a real SQL engine,
//! since the repository contract is "consumed, not defined" by the core.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use super::crypto::CredentialCipher;
use super::entities::*;
use super::errors::RepositoryError;
use super::traits::Repository;

#[derive(Debug, Default, Serialize, Deserialize)]
struct Document {
    #[serde(default)]
    hosts: Vec<Host>,
    #[serde(default)]
    identities: Vec<Identity>,
    #[serde(default)]
    keys: Vec<Key>,
    #[serde(default)]
    known_hosts: Vec<KnownHost>,
    #[serde(default)]
    connection_logs: Vec<ConnectionLog>,
    #[serde(default)]
    next_id: Id,
}

impl Document {
    fn allocate_id(&mut self) -> Id {
        self.next_id += 1;
        self.next_id
    }
}

pub struct FileRepository {
    path: PathBuf,
    cipher: CredentialCipher,
    doc: RwLock<Document>,
}

impl FileRepository {
    pub fn open(db_path: &Path, app_dir: &Path) -> Result<Self, RepositoryError> {
        let cipher = CredentialCipher::open(app_dir)?;
        let doc = if db_path.exists() {
            let content = std::fs::read_to_string(db_path)?;
            if content.trim().is_empty() { Document::default() } else { serde_json::from_str(&content)? }
        } else {
            Document::default()
        };

        let repo = Self { path: db_path.to_path_buf(), cipher, doc: RwLock::new(doc) };
        repo.persist()?;
        Ok(repo)
    }

    fn persist(&self) -> Result<(), RepositoryError> {
        let doc = self.doc.read().unwrap_or_else(|poison| poison.into_inner());
        let serialized = serde_json::to_vec_pretty(&*doc)?;
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, serialized)?;
        Ok(())
    }

    fn encrypt_identity(&self, mut identity: Identity) -> Result<Identity, RepositoryError> {
        identity.password = self.cipher.encrypt(&identity.password)?;
        Ok(identity)
    }

    fn decrypt_identity(&self, mut identity: Identity) -> Result<Identity, RepositoryError> {
        identity.password = self.cipher.decrypt(&identity.password)?;
        Ok(identity)
    }

    fn encrypt_key(&self, mut key: Key) -> Result<Key, RepositoryError> {
        key.private_key = self.cipher.encrypt(&key.private_key)?;
        Ok(key)
    }

    fn decrypt_key(&self, mut key: Key) -> Result<Key, RepositoryError> {
        key.private_key = self.cipher.decrypt(&key.private_key)?;
        Ok(key)
    }
}

impl Repository for FileRepository {
    fn list_hosts(&self) -> Result<Vec<Host>, RepositoryError> {
        Ok(self.doc.read().unwrap_or_else(|poison| poison.into_inner()).hosts.clone())
    }

    fn get_host(&self, id: Id) -> Result<Host, RepositoryError> {
        self.doc.read().unwrap_or_else(|poison| poison.into_inner()).hosts.iter().find(|h| h.id == id).cloned().ok_or(RepositoryError::NotFound(id))
    }

    fn create_host(&self, mut host: Host) -> Result<Host, RepositoryError> {
        {
            let mut doc = self.doc.write().unwrap_or_else(|poison| poison.into_inner());
            host.id = doc.allocate_id();
            doc.hosts.push(host.clone());
        }
        self.persist()?;
        Ok(host)
    }

    fn update_host(&self, host: Host) -> Result<Host, RepositoryError> {
        {
            let mut doc = self.doc.write().unwrap_or_else(|poison| poison.into_inner());
            let slot = doc.hosts.iter_mut().find(|h| h.id == host.id).ok_or(RepositoryError::NotFound(host.id))?;
            *slot = host.clone();
        }
        self.persist()?;
        Ok(host)
    }

    fn delete_host(&self, id: Id) -> Result<(), RepositoryError> {
        {
            let mut doc = self.doc.write().unwrap_or_else(|poison| poison.into_inner());
            doc.hosts.retain(|h| h.id != id);
        }
        self.persist()
    }

    fn list_identities(&self) -> Result<Vec<Identity>, RepositoryError> {
        let raw = self.doc.read().unwrap_or_else(|poison| poison.into_inner()).identities.clone();
        raw.into_iter().map(|i| self.decrypt_identity(i)).collect()
    }

    fn get_identity(&self, id: Id) -> Result<Identity, RepositoryError> {
        let raw = self.doc.read().unwrap_or_else(|poison| poison.into_inner()).identities.iter().find(|i| i.id == id).cloned().ok_or(RepositoryError::NotFound(id))?;
        self.decrypt_identity(raw)
    }

    fn create_identity(&self, identity: Identity) -> Result<Identity, RepositoryError> {
        let mut stored = self.encrypt_identity(identity)?;
        {
            let mut doc = self.doc.write().unwrap_or_else(|poison| poison.into_inner());
            stored.id = doc.allocate_id();
            doc.identities.push(stored.clone());
        }
        self.persist()?;
        self.decrypt_identity(stored)
    }

    fn update_identity(&self, identity: Identity) -> Result<Identity, RepositoryError> {
        let stored = self.encrypt_identity(identity)?;
        {
            let mut doc = self.doc.write().unwrap_or_else(|poison| poison.into_inner());
            let slot = doc.identities.iter_mut().find(|i| i.id == stored.id).ok_or(RepositoryError::NotFound(stored.id))?;
            *slot = stored.clone();
        }
        self.persist()?;
        self.decrypt_identity(stored)
    }

    fn delete_identity(&self, id: Id) -> Result<(), RepositoryError> {
        {
            let mut doc = self.doc.write().unwrap_or_else(|poison| poison.into_inner());
            doc.identities.retain(|i| i.id != id);
        }
        self.persist()
    }

    fn list_keys(&self) -> Result<Vec<Key>, RepositoryError> {
        let raw = self.doc.read().unwrap_or_else(|poison| poison.into_inner()).keys.clone();
        raw.into_iter().map(|k| self.decrypt_key(k)).collect()
    }

    fn get_key(&self, id: Id) -> Result<Key, RepositoryError> {
        let raw = self.doc.read().unwrap_or_else(|poison| poison.into_inner()).keys.iter().find(|k| k.id == id).cloned().ok_or(RepositoryError::NotFound(id))?;
        self.decrypt_key(raw)
    }

    fn create_key(&self, key: Key) -> Result<Key, RepositoryError> {
        let mut stored = self.encrypt_key(key)?;
        {
            let mut doc = self.doc.write().unwrap_or_else(|poison| poison.into_inner());
            stored.id = doc.allocate_id();
            doc.keys.push(stored.clone());
        }
        self.persist()?;
        self.decrypt_key(stored)
    }

    fn update_key(&self, key: Key) -> Result<Key, RepositoryError> {
        let stored = self.encrypt_key(key)?;
        {
            let mut doc = self.doc.write().unwrap_or_else(|poison| poison.into_inner());
            let slot = doc.keys.iter_mut().find(|k| k.id == stored.id).ok_or(RepositoryError::NotFound(stored.id))?;
            *slot = stored.clone();
        }
        self.persist()?;
        self.decrypt_key(stored)
    }

    fn delete_key(&self, id: Id) -> Result<(), RepositoryError> {
        {
            let mut doc = self.doc.write().unwrap_or_else(|poison| poison.into_inner());
            doc.keys.retain(|k| k.id != id);
        }
        self.persist()
    }

    fn list_known_hosts(&self) -> Result<Vec<KnownHost>, RepositoryError> {
        Ok(self.doc.read().unwrap_or_else(|poison| poison.into_inner()).known_hosts.clone())
    }

    fn create_known_host(&self, mut known_host: KnownHost) -> Result<KnownHost, RepositoryError> {
        {
            let mut doc = self.doc.write().unwrap_or_else(|poison| poison.into_inner());
            known_host.id = doc.allocate_id();
            doc.known_hosts.push(known_host.clone());
        }
        self.persist()?;
        Ok(known_host)
    }

    fn delete_known_host(&self, id: Id) -> Result<(), RepositoryError> {
        {
            let mut doc = self.doc.write().unwrap_or_else(|poison| poison.into_inner());
            doc.known_hosts.retain(|k| k.id != id);
        }
        self.persist()
    }

    fn get_known_host_by_fingerprint(&self, fingerprint: &str) -> Result<Option<KnownHost>, RepositoryError> {
        Ok(self.doc.read().unwrap_or_else(|poison| poison.into_inner()).known_hosts.iter().find(|k| k.fingerprint == fingerprint).cloned())
    }

    fn list_connection_logs(&self) -> Result<Vec<ConnectionLog>, RepositoryError> {
        Ok(self.doc.read().unwrap_or_else(|poison| poison.into_inner()).connection_logs.clone())
    }

    fn create_connection_log(&self, mut log: ConnectionLog) -> Result<ConnectionLog, RepositoryError> {
        {
            let mut doc = self.doc.write().unwrap_or_else(|poison| poison.into_inner());
            log.id = doc.allocate_id();
            doc.connection_logs.push(log.clone());
        }
        self.persist()?;
        Ok(log)
    }

    fn update_connection_log(&self, log: ConnectionLog) -> Result<ConnectionLog, RepositoryError> {
        {
            let mut doc = self.doc.write().unwrap_or_else(|poison| poison.into_inner());
            let slot = doc.connection_logs.iter_mut().find(|l| l.id == log.id).ok_or(RepositoryError::NotFound(log.id))?;
            *slot = log.clone();
        }
        self.persist()?;
        Ok(log)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("haven-file-repo-test-{}-{}", std::process::id(), rand_suffix()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn rand_suffix() -> u64 {
        use std::time::{SystemTime, UNIX_EPOCH};
        SystemTime::now().duration_since(UNIX_EPOCH).unwrap().subsec_nanos() as u64
    }

    #[test]
    fn create_then_get_host_round_trips() {
        let dir = temp_dir();
        let repo = FileRepository::open(&dir.join("haven.db"), &dir).unwrap();

        let host = Host {
            id: 0,
            name: "box".to_string(),
            hostname: "example.com".to_string(),
            port: 22,
            mode: ConnectionMode::Ssh,
            credential_id: 0,
            credential_type: CredentialType::Identity,
            last_connected_at: None,
        };
        let created = repo.create_host(host).unwrap();
        assert_ne!(created.id, 0);

        let fetched = repo.get_host(created.id).unwrap();
        assert_eq!(fetched.hostname, "example.com");

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn identity_password_is_encrypted_on_disk() {
        let dir = temp_dir();
        let db_path = dir.join("haven.db");
        let repo = FileRepository::open(&db_path, &dir).unwrap();

        let identity = Identity { id: 0, name: "prod".to_string(), username: "root".to_string(), password: "hunter2".to_string() };
        let created = repo.create_identity(identity).unwrap();
        assert_eq!(created.password, "hunter2");

        let on_disk = std::fs::read_to_string(&db_path).unwrap();
        assert!(!on_disk.contains("hunter2"));

        let fetched = repo.get_identity(created.id).unwrap();
        assert_eq!(fetched.password, "hunter2");

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn known_host_lookup_by_fingerprint() {
        let dir = temp_dir();
        let repo = FileRepository::open(&dir.join("haven.db"), &dir).unwrap();

        let known_host = KnownHost { id: 0, hostname: "example.com".to_string(), port: 22, key_type: "ssh-ed25519".to_string(), fingerprint: "SHA256:abc".to_string() };
        repo.create_known_host(known_host).unwrap();

        let found = repo.get_known_host_by_fingerprint("SHA256:abc").unwrap();
        assert!(found.is_some());
        assert!(repo.get_known_host_by_fingerprint("SHA256:xyz").unwrap().is_none());

        std::fs::remove_dir_all(&dir).ok();
    }
}

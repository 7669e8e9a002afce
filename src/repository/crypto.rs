//! At-rest encryption for the secret fields of stored credentials
//! (`Identity::password`, `Key::private_key`). The repository never persists
//! these in the clear; callers of the `Repository` trait always see
//! plaintext, the same way the original's keychain forms never showed raw
//! database rows.
//!
//! A random 32-byte key file is generated on first run (mode 0600) and
//! stretched through Argon2id into the ChaCha20-Poly1305 key, rather than
//! used directly, so a partially-leaked key file alone is not enough to
//! recover the cipher key.

use argon2::Argon2;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use chacha20poly1305::aead::{Aead, KeyInit};
use chacha20poly1305::{ChaCha20Poly1305, Nonce};
use getrandom::fill;
use secrecy::{ExposeSecret, SecretBox};
use std::path::{Path, PathBuf};
use zeroize::Zeroizing;

fn derive_key(material: &[u8]) -> Result<SecretBox<[u8; 32]>, RepositoryError> {
    let mut out = Zeroizing::new([0u8; 32]);
    Argon2::default().hash_password_into(material, ARGON2_SALT, &mut *out).map_err(|err| RepositoryError::Crypto(err.to_string()))?;
    Ok(SecretBox::new(Box::new(*out)))
}

use super::errors::RepositoryError;

const KEY_FILE_NAME: &str = "credential.key";
const ARGON2_SALT: &[u8] = b"haven-credential-cipher-v1";
const NONCE_LEN: usize = 12;

pub struct CredentialCipher {
    cipher: ChaCha20Poly1305,
}

impl CredentialCipher {
    /// Load the key file under `app_dir`, generating one on first run.
    pub fn open(app_dir: &Path) -> Result<Self, RepositoryError> {
        let key_path = app_dir.join(KEY_FILE_NAME);
        let material = if key_path.exists() {
            Zeroizing::new(std::fs::read(&key_path)?)
        } else {
            let mut bytes = Zeroizing::new(vec![0u8; 32]);
            fill(&mut bytes).map_err(|err| RepositoryError::Crypto(err.to_string()))?;
            std::fs::write(&key_path, &*bytes)?;
            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                let mut perms = std::fs::metadata(&key_path)?.permissions();
                perms.set_mode(0o600);
                std::fs::set_permissions(&key_path, perms)?;
            }
            bytes
        };

        let derived = derive_key(&material)?;
        let cipher = ChaCha20Poly1305::new(derived.expose_secret().into());
        Ok(Self { cipher })
    }

    pub fn key_file_path(app_dir: &Path) -> PathBuf {
        app_dir.join(KEY_FILE_NAME)
    }

    /// Encrypt `plaintext`, returning a base64 blob of `nonce || ciphertext`.
    pub fn encrypt(&self, plaintext: &str) -> Result<String, RepositoryError> {
        let mut nonce_bytes = [0u8; NONCE_LEN];
        fill(&mut nonce_bytes).map_err(|err| RepositoryError::Crypto(err.to_string()))?;
        let nonce = Nonce::from_slice(&nonce_bytes);

        let ciphertext = self.cipher.encrypt(nonce, plaintext.as_bytes()).map_err(|err| RepositoryError::Crypto(err.to_string()))?;

        let mut combined = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        combined.extend_from_slice(&nonce_bytes);
        combined.extend_from_slice(&ciphertext);
        Ok(BASE64.encode(combined))
    }

    pub fn decrypt(&self, stored: &str) -> Result<String, RepositoryError> {
        let combined = BASE64.decode(stored).map_err(|err| RepositoryError::Crypto(err.to_string()))?;
        if combined.len() < NONCE_LEN {
            return Err(RepositoryError::Crypto("ciphertext too short".to_string()));
        }
        let (nonce_bytes, ciphertext) = combined.split_at(NONCE_LEN);
        let nonce = Nonce::from_slice(nonce_bytes);

        let plaintext = self.cipher.decrypt(nonce, ciphertext).map_err(|err| RepositoryError::Crypto(err.to_string()))?;
        String::from_utf8(plaintext).map_err(|err| RepositoryError::Crypto(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_encrypt_decrypt() {
        let dir = std::env::temp_dir().join(format!("haven-crypto-test-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let cipher = CredentialCipher::open(&dir).unwrap();

        let secret = "hunter2";
        let stored = cipher.encrypt(secret).unwrap();
        assert_ne!(stored, secret);
        assert_eq!(cipher.decrypt(&stored).unwrap(), secret);

        std::fs::remove_dir_all(&dir).ok();
    }
}

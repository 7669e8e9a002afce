//! Host-key fingerprints (spec.md §4.4, SPEC_FULL.md §B).
//!
//! Verification is SHA-256 only; the MD5 form is computed purely for display,
//! matching legacy `known_hosts` tooling some users expect to cross-reference.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use md5::Md5;
use russh_keys::key::PublicKey;
use russh_keys::PublicKeyBase64;
use sha2::{Digest, Sha256};

/// `"SHA256:" + base64(sha256(wire encoding))`, per the glossary definition.
pub fn sha256_fingerprint(key: &PublicKey) -> String {
    let wire_bytes = key.public_key_bytes();
    let digest = Sha256::digest(&wire_bytes);
    format!("SHA256:{}", STANDARD.encode(digest))
}

/// Legacy colon-delimited MD5 fingerprint, display-only.
pub fn md5_fingerprint(key: &PublicKey) -> String {
    let wire_bytes = key.public_key_bytes();
    let digest = Md5::digest(&wire_bytes);
    digest.iter().map(|byte| format!("{:02x}", byte)).collect::<Vec<_>>().join(":")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sha256_fingerprint_has_expected_prefix() {
        let key = russh_keys::key::KeyPair::generate_ed25519().unwrap().clone_public_key().unwrap();
        let fp = sha256_fingerprint(&key);
        assert!(fp.starts_with("SHA256:"));
    }

    #[test]
    fn md5_fingerprint_is_colon_delimited_hex() {
        let key = russh_keys::key::KeyPair::generate_ed25519().unwrap().clone_public_key().unwrap();
        let fp = md5_fingerprint(&key);
        assert_eq!(fp.split(':').count(), 16);
        assert!(fp.chars().all(|c| c.is_ascii_hexdigit() || c == ':'));
    }
}

//! Credential resolution and SSH authentication (spec.md §4.4).

use std::sync::Arc;

use russh_keys::key::{KeyPair, PublicKey};

use super::errors::SshError;
use crate::repository::{Credential, Key};

/// One authentication attempt: a username paired with the signer(s) or
/// password to try. `Key` credentials may carry a second, certificate-backed
/// signer alongside the plain key — both spec.md §4.4 auth methods, offered
/// in order.
pub enum ResolvedAuth {
    Password { username: String, password: String },
    PublicKey { username: String, signers: Vec<Arc<KeyPair>> },
}

/// Resolve a repository `Credential` into the concrete auth plan (spec.md
/// §4.4): `Identity` yields password auth; `Key` yields public-key auth,
/// plus an additional certificate-backed signer when the certificate parses
/// and binds to the same key. Missing username on a key credential is fatal.
pub fn resolve(credential: &Credential) -> Result<ResolvedAuth, SshError> {
    match credential {
        Credential::Identity(identity) => Ok(ResolvedAuth::Password {
            username: identity.username.clone(),
            password: identity.password.clone(),
        }),
        Credential::Key(key) => resolve_key(key),
    }
}

fn resolve_key(key: &Key) -> Result<ResolvedAuth, SshError> {
    if key.username.is_empty() {
        return Err(SshError::CredentialMissing("username is required for key authentication".into()));
    }

    let signer = russh_keys::decode_secret_key(&key.private_key, None).map_err(|err| SshError::Auth(format!("failed to parse private key: {}", err)))?;
    let mut signers = vec![Arc::new(signer.clone())];

    if let Some(certificate) = key.certificate.as_deref()
        && let Some(cert_signer) = bind_certificate(certificate, &signer)
    {
        signers.push(Arc::new(cert_signer));
    }

    Ok(ResolvedAuth::PublicKey { username: key.username.clone(), signers })
}

/// Parse `certificate` as an OpenSSH public-key/certificate line and check it
/// binds to `signer`'s public key. Returns a signer for the additional
/// cert-backed auth method when it does.
///
/// Open question (DESIGN.md): `russh_keys` 0.45 has no dedicated
/// `ssh::Certificate` type with its own signer the way `golang.org/x/crypto/ssh`
/// does (`ssh.NewCertSigner`). We approximate the original's "additional
/// cert-signer auth method" by re-offering the same private-key signer once
/// we've confirmed the certificate's embedded public key matches it — the
/// server sees an ordinary publickey attempt, not a certificate-typed one.
fn bind_certificate(certificate: &str, signer: &KeyPair) -> Option<KeyPair> {
    let parsed: PublicKey = russh_keys::parse_public_key_base64(certificate.split_whitespace().nth(1)?).ok()?;
    if parsed.public_key_bytes() == signer.clone_public_key().ok()?.public_key_bytes() {
        Some(signer.clone())
    } else {
        None
    }
}

pub fn auth_method_label(credential: &Credential) -> &'static str {
    match credential {
        Credential::Identity(_) => "password",
        Credential::Key(_) => "publickey",
    }
}

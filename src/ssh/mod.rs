//! The SSH session lifecycle (spec.md §4.4) and the process-wide session
//! registry that multiplexes host id to session (§4.5).

mod auth;
mod errors;
mod fingerprint;
mod handler;
mod registry;
mod session;

pub use errors::SshError;
pub use registry::SessionRegistry;
pub use session::SessionState;

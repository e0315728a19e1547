//! Authentication: who is logged in, and who may see what.
//!
//! This module provides:
//! - `CredentialStore`: durable token + user storage (file, keyring or memory)
//! - `SessionManager`: the single owner and writer of the current `Session`
//! - `Authorizer`: attaches the current bearer token to outgoing requests
//! - `AccessGate`: decides whether a route renders, waits, or redirects
//!
//! The session is published through a `tokio::sync::watch` channel; every
//! other component holds a receiver and only ever reads it.

pub mod authorizer;
pub mod credentials;
pub mod gate;
pub mod session;

pub use authorizer::Authorizer;
pub use credentials::{
    CredentialBackend, CredentialStore, FileStore, KeyValueStore, KeyringStore, MemoryStore,
    StoredCredential,
};
pub use gate::{AccessGate, GateState, RouteDecision};
pub use session::{Session, SessionManager};

//! OrderFood core - everything below the terminal UI.
//!
//! This crate provides the pieces the client is built from:
//!
//! - `api`: typed REST client for the auth, catalog, cart and order endpoints
//! - `auth`: persisted credentials, the session manager, the request
//!   authorizer and the access gate
//! - `models`: identity, catalog, cart, order and money types
//! - `routes`: screen routes and the navigation history
//! - `notify`: transient notifications ("toasts") raised by operations
//! - `config`: on-disk configuration and API URL resolution

pub mod api;
pub mod auth;
pub mod config;
pub mod models;
pub mod notify;
pub mod routes;
pub mod utils;

pub use api::{ApiClient, ApiError};
pub use auth::{AccessGate, CredentialStore, GateState, Session, SessionManager};
pub use config::Config;
pub use notify::{Notifier, Toast, ToastLevel, ToastQueue};
pub use routes::{Navigator, Route};

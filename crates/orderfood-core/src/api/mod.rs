//! REST API client module for the food-ordering backend.
//!
//! This module provides the `ApiClient` for the authentication, catalog,
//! cart and order endpoints, and the `ApiError` every failed call maps to.
//!
//! Requests carry the session's bearer token through the `Authorizer`.

pub mod client;
pub mod error;

pub use client::{ApiClient, ApiSettings, Menu};
pub use error::ApiError;

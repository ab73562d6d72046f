//! Networking modules for the identity service REST API.
//!
//! SYSTEM CONTEXT
//! ==============
//! `transport` owns request policy (sanitization, error normalization, expiry
//! detection), `browser` is the cookie-carrying wire implementation, `api`
//! exposes typed endpoints, and `types`/`error` define the shared schema.

pub mod api;
pub mod browser;
pub mod error;
pub mod sanitize;
pub mod transport;
pub mod types;

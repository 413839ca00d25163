//! OAuth2 client registration registry.
//!
//! Loads client registrations from configuration into a shared in-memory
//! store that login flows query by registration id, with an optional HTTP
//! admin API for changing registrations at runtime.

pub mod config;
pub mod errors;
pub mod http;
pub mod registration;
pub mod storage;

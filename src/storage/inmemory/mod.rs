//! In-memory storage implementations
//!
//! Registrations live only for the lifetime of the process.

mod registrations;

pub use registrations::ClientRegistrationStore;

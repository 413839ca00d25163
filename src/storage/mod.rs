//! Client registration storage: the lookup trait and the in-memory store.

pub mod inmemory;
pub mod traits;

// Re-export commonly used types and traits
pub use inmemory::ClientRegistrationStore;
pub use traits::*;

use crate::errors::RegistrationError;
use crate::registration::{ClientProperties, as_client_registrations};
use std::sync::Arc;

/// Map client configuration and load it into a shared store
pub fn create_registration_store(
    properties: &ClientProperties,
) -> std::result::Result<Arc<ClientRegistrationStore>, RegistrationError> {
    let registrations = as_client_registrations(properties)?;
    for registration in &registrations {
        tracing::info!(
            registration_id = %registration.registration_id,
            client_name = %registration.client_name,
            grant_type = %registration.authorization_grant_type,
            "Loaded client registration"
        );
    }
    Ok(Arc::new(ClientRegistrationStore::new(registrations)))
}

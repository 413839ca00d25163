//! Storage trait definitions for client registrations.

use crate::registration::ClientRegistration;

/// Lookup of client registrations by registration id.
///
/// This is the only capability the login flow needs. Any type with a matching
/// lookup can stand in, including plain closures:
///
/// ```
/// use client_registry::registration::ClientRegistration;
/// use client_registry::storage::ClientRegistrationRepository;
///
/// let nothing = |_: &str| -> Option<ClientRegistration> { None };
/// assert!(nothing.find_by_registration_id("google").is_none());
/// ```
pub trait ClientRegistrationRepository: Send + Sync {
    /// Registration stored under `registration_id`, or `None` if there is none
    fn find_by_registration_id(&self, registration_id: &str) -> Option<ClientRegistration>;
}

impl<F> ClientRegistrationRepository for F
where
    F: Fn(&str) -> Option<ClientRegistration> + Send + Sync,
{
    fn find_by_registration_id(&self, registration_id: &str) -> Option<ClientRegistration> {
        self(registration_id)
    }
}

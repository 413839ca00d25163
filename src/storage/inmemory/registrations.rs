//! In-memory client registration store

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::registration::{
    ClientAuthenticationMethod, ClientRegistration, ProviderDetails, preconfigured_metadata,
};
use crate::storage::traits::ClientRegistrationRepository;

/// Process-wide table of client registrations keyed by registration id.
///
/// Reads vastly outnumber writes, so the table sits behind a reader-writer
/// lock. Every stored value's `registration_id` equals its key.
#[derive(Default)]
pub struct ClientRegistrationStore {
    registrations: RwLock<HashMap<String, ClientRegistration>>,
}

impl ClientRegistrationStore {
    /// Build the store from configuration-derived registrations.
    ///
    /// Each entry is copied into a fresh registration marked as preconfigured.
    /// When two entries share a registration id the later one wins.
    pub fn new<I>(registrations: I) -> Self
    where
        I: IntoIterator<Item = ClientRegistration>,
    {
        let mut table = HashMap::new();
        for registration in registrations.into_iter().map(preconfigured) {
            if let Some(previous) = table.insert(registration.registration_id.clone(), registration)
            {
                tracing::debug!(
                    registration_id = %previous.registration_id,
                    "duplicate registration id, keeping the later entry"
                );
            }
        }
        tracing::debug!(count = table.len(), "client registration store initialized");

        Self {
            registrations: RwLock::new(table),
        }
    }

    pub fn find_by_registration_id(&self, registration_id: &str) -> Option<ClientRegistration> {
        self.read().get(registration_id).cloned()
    }

    /// Snapshot of every stored registration, in no particular order
    pub fn registrations(&self) -> Vec<ClientRegistration> {
        self.read().values().cloned().collect()
    }

    /// Iterate over a snapshot taken now; later writes are not observed
    pub fn iter(&self) -> std::vec::IntoIter<ClientRegistration> {
        self.registrations().into_iter()
    }

    /// Insert or replace the entry at `registration.registration_id`
    pub fn add_registration(&self, registration: ClientRegistration) {
        tracing::debug!(registration_id = %registration.registration_id, "adding client registration");
        self.write()
            .insert(registration.registration_id.clone(), registration);
    }

    /// Remove the entry at `registration_id`; absent ids are ignored
    pub fn remove_registration(&self, registration_id: &str) {
        if self.write().remove(registration_id).is_some() {
            tracing::debug!(registration_id, "removed client registration");
        }
    }

    pub fn contains(&self, registration_id: &str) -> bool {
        self.read().contains_key(registration_id)
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    // The table holds plain values and every write is a single insert or
    // remove, so a poisoned lock still guards a consistent map.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, ClientRegistration>> {
        self.registrations
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, ClientRegistration>> {
        self.registrations
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl ClientRegistrationRepository for ClientRegistrationStore {
    fn find_by_registration_id(&self, registration_id: &str) -> Option<ClientRegistration> {
        ClientRegistrationStore::find_by_registration_id(self, registration_id)
    }
}

impl<'a> IntoIterator for &'a ClientRegistrationStore {
    type Item = ClientRegistration;
    type IntoIter = std::vec::IntoIter<ClientRegistration>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Copy the fields a login flow relies on and pin the provider metadata.
/// Issuer and user-info details are not carried over.
fn preconfigured(registration: ClientRegistration) -> ClientRegistration {
    let ClientRegistration {
        registration_id,
        client_id,
        client_secret,
        authorization_grant_type,
        redirect_uri,
        scopes,
        provider_details,
        client_name,
        ..
    } = registration;

    ClientRegistration {
        client_authentication_method: ClientAuthenticationMethod::deduce(
            &authorization_grant_type,
            &client_secret,
        ),
        registration_id,
        client_id,
        client_secret,
        authorization_grant_type,
        redirect_uri,
        scopes,
        provider_details: ProviderDetails {
            authorization_uri: provider_details.authorization_uri,
            token_uri: provider_details.token_uri,
            jwk_set_uri: provider_details.jwk_set_uri,
            configuration_metadata: preconfigured_metadata(),
            ..Default::default()
        },
        client_name,
    }
}

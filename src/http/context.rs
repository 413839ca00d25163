//! Application state shared by every handler.

use std::sync::Arc;

use crate::config::Config;
use crate::storage::ClientRegistrationStore;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    /// Registrations consulted by login flows and edited by the admin API
    pub registration_store: Arc<ClientRegistrationStore>,
}

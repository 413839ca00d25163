//! Handles GET /oauth2/providers - Registrations available for login, for a provider-selection page

use axum::extract::State;
use axum::response::Json;
use serde::Serialize;

use super::context::AppState;
use crate::registration::AuthorizationGrantType;

#[derive(Debug, Serialize)]
pub struct ProviderLink {
    pub registration_id: String,
    pub client_name: String,
    pub authorization_uri: String,
}

pub async fn handle_list_providers(State(state): State<AppState>) -> Json<Vec<ProviderLink>> {
    let mut providers: Vec<ProviderLink> = state
        .registration_store
        .iter()
        // Only browser logins belong on a provider-selection page
        .filter(|registration| {
            registration.authorization_grant_type == AuthorizationGrantType::AuthorizationCode
        })
        .map(|registration| ProviderLink {
            authorization_uri: registration.provider_details.authorization_uri,
            registration_id: registration.registration_id,
            client_name: registration.client_name,
        })
        .collect();
    providers.sort_by(|a, b| a.registration_id.cmp(&b.registration_id));

    Json(providers)
}

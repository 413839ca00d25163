//! Handles /admin/registrations - Runtime management of client registrations
//!
//! Every route requires the admin bearer token. Client secrets are accepted on
//! write but never returned.

use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
    response::{Json as ResponseJson, Response},
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use super::context::AppState;
use super::middleware_auth::{AdminAuth, create_error_response};
use crate::errors::AdminError;
use crate::registration::{
    AuthenticationMethod, AuthorizationGrantType, ClientAuthenticationMethod, ClientRegistration,
    ProviderProperties, RegistrationProperties, registration_builder,
};

/// Registration as exposed by the admin API, without the client secret
#[derive(Debug, Serialize, Deserialize)]
pub struct RegistrationView {
    pub registration_id: String,
    pub client_id: String,
    pub has_client_secret: bool,
    pub client_authentication_method: ClientAuthenticationMethod,
    pub authorization_grant_type: AuthorizationGrantType,
    pub redirect_uri: String,
    pub scopes: BTreeSet<String>,
    pub client_name: String,
    pub authorization_uri: String,
    pub token_uri: String,
    pub jwk_set_uri: Option<String>,
    pub issuer_uri: Option<String>,
    pub user_info_uri: Option<String>,
    pub user_info_authentication_method: AuthenticationMethod,
    pub user_name_attribute: Option<String>,
    pub configuration_metadata: BTreeMap<String, String>,
}

impl From<ClientRegistration> for RegistrationView {
    fn from(registration: ClientRegistration) -> Self {
        let provider = registration.provider_details;
        Self {
            has_client_secret: !registration.client_secret.is_empty(),
            registration_id: registration.registration_id,
            client_id: registration.client_id,
            client_authentication_method: registration.client_authentication_method,
            authorization_grant_type: registration.authorization_grant_type,
            redirect_uri: registration.redirect_uri,
            scopes: registration.scopes,
            client_name: registration.client_name,
            authorization_uri: provider.authorization_uri,
            token_uri: provider.token_uri,
            jwk_set_uri: provider.jwk_set_uri,
            issuer_uri: provider.issuer_uri,
            user_info_uri: provider.user_info_endpoint.uri,
            user_info_authentication_method: provider.user_info_endpoint.authentication_method,
            user_name_attribute: provider.user_info_endpoint.user_name_attribute_name,
            configuration_metadata: provider.configuration_metadata,
        }
    }
}

/// Body of PUT /admin/registrations/{registration_id}.
///
/// Uses the same keys as the client configuration file; a `provider` naming
/// a preset fills in whatever the body leaves out.
#[derive(Debug, Default, Deserialize)]
pub struct RegistrationRequest {
    #[serde(flatten)]
    pub registration: RegistrationProperties,
    #[serde(flatten)]
    pub provider: ProviderProperties,
    #[serde(default, rename = "configuration-metadata")]
    pub configuration_metadata: BTreeMap<String, String>,
}

fn admin_error_response(error: AdminError) -> Response {
    let (status, error_code) = match &error {
        AdminError::RegistrationNotFound(_) => (StatusCode::NOT_FOUND, "registration_not_found"),
        AdminError::InvalidRegistration(_) => (StatusCode::BAD_REQUEST, "invalid_registration"),
        AdminError::Unauthorized => (StatusCode::UNAUTHORIZED, "unauthorized"),
    };
    create_error_response(status, error_code, &error.to_string())
}

pub async fn handle_list_registrations(
    _admin: AdminAuth,
    State(state): State<AppState>,
) -> ResponseJson<Vec<RegistrationView>> {
    let mut registrations: Vec<RegistrationView> = state
        .registration_store
        .iter()
        .map(RegistrationView::from)
        .collect();
    registrations.sort_by(|a, b| a.registration_id.cmp(&b.registration_id));
    ResponseJson(registrations)
}

pub async fn handle_get_registration(
    _admin: AdminAuth,
    State(state): State<AppState>,
    Path(registration_id): Path<String>,
) -> Result<ResponseJson<RegistrationView>, Response> {
    state
        .registration_store
        .find_by_registration_id(&registration_id)
        .map(|registration| ResponseJson(registration.into()))
        .ok_or_else(|| admin_error_response(AdminError::RegistrationNotFound(registration_id)))
}

pub async fn handle_put_registration(
    _admin: AdminAuth,
    State(state): State<AppState>,
    Path(registration_id): Path<String>,
    Json(request): Json<RegistrationRequest>,
) -> Result<ResponseJson<RegistrationView>, Response> {
    let registration = registration_builder(
        &registration_id,
        &request.registration,
        Some(&request.provider),
    )
    .and_then(|builder| {
        builder
            .configuration_metadata(request.configuration_metadata)
            .build()
    })
    .map_err(|e| {
        tracing::info!(%registration_id, error = %e, "rejected registration update");
        admin_error_response(e.into())
    })?;

    state.registration_store.add_registration(registration.clone());
    tracing::info!(%registration_id, "registration stored via admin API");

    Ok(ResponseJson(registration.into()))
}

pub async fn handle_delete_registration(
    _admin: AdminAuth,
    State(state): State<AppState>,
    Path(registration_id): Path<String>,
) -> StatusCode {
    state.registration_store.remove_registration(&registration_id);
    tracing::info!(%registration_id, "registration removed via admin API");
    StatusCode::NO_CONTENT
}

//! Maps raw client configuration onto [`ClientRegistration`]s.
//!
//! The input mirrors the familiar `registration.<id>.*` / `provider.<id>.*`
//! property layout. Each registration resolves its provider (explicit
//! `provider` key, else its own id), starts from a [`CommonOAuth2Provider`]
//! preset when one matches, then applies configured provider values and
//! finally the registration's own values.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use super::providers::CommonOAuth2Provider;
use super::types::{
    AuthenticationMethod, AuthorizationGrantType, ClientAuthenticationMethod, ClientRegistration,
    ClientRegistrationBuilder,
};
use crate::errors::RegistrationError;

/// Raw OAuth2 client configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientProperties {
    /// Registrations keyed by registration id
    #[serde(default)]
    pub registration: BTreeMap<String, RegistrationProperties>,
    /// Provider overrides keyed by provider id
    #[serde(default)]
    pub provider: BTreeMap<String, ProviderProperties>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RegistrationProperties {
    /// Provider id, defaults to the registration id
    pub provider: Option<String>,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub client_authentication_method: Option<ClientAuthenticationMethod>,
    pub authorization_grant_type: Option<AuthorizationGrantType>,
    pub redirect_uri: Option<String>,
    /// Either a list or a comma separated string
    #[serde(default, deserialize_with = "deserialize_scopes")]
    pub scope: Option<BTreeSet<String>>,
    pub client_name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ProviderProperties {
    pub authorization_uri: Option<String>,
    pub token_uri: Option<String>,
    pub user_info_uri: Option<String>,
    pub user_info_authentication_method: Option<AuthenticationMethod>,
    pub user_name_attribute: Option<String>,
    pub jwk_set_uri: Option<String>,
    pub issuer_uri: Option<String>,
}

impl ClientProperties {
    /// Every registration must carry a client id
    pub fn validate(&self) -> Result<(), RegistrationError> {
        for (registration_id, registration) in &self.registration {
            if registration.client_id.as_deref().is_none_or(str::is_empty) {
                return Err(RegistrationError::MissingClientId(
                    registration_id.clone(),
                ));
            }
        }
        Ok(())
    }
}

impl RegistrationProperties {
    fn apply(&self, mut builder: ClientRegistrationBuilder) -> ClientRegistrationBuilder {
        if let Some(client_id) = &self.client_id {
            builder = builder.client_id(client_id);
        }
        if let Some(client_secret) = &self.client_secret {
            builder = builder.client_secret(client_secret);
        }
        if let Some(method) = self.client_authentication_method {
            builder = builder.client_authentication_method(method);
        }
        if let Some(grant_type) = &self.authorization_grant_type {
            builder = builder.authorization_grant_type(grant_type.clone());
        }
        if let Some(redirect_uri) = &self.redirect_uri {
            builder = builder.redirect_uri(redirect_uri);
        }
        if let Some(scope) = &self.scope {
            builder = builder.scope(scope.iter().cloned());
        }
        if let Some(client_name) = &self.client_name {
            builder = builder.client_name(client_name);
        }
        builder
    }
}

impl ProviderProperties {
    fn apply(&self, mut builder: ClientRegistrationBuilder) -> ClientRegistrationBuilder {
        if let Some(uri) = &self.authorization_uri {
            builder = builder.authorization_uri(uri);
        }
        if let Some(uri) = &self.token_uri {
            builder = builder.token_uri(uri);
        }
        if let Some(uri) = &self.user_info_uri {
            builder = builder.user_info_uri(uri);
        }
        if let Some(method) = self.user_info_authentication_method {
            builder = builder.user_info_authentication_method(method);
        }
        if let Some(attribute) = &self.user_name_attribute {
            builder = builder.user_name_attribute_name(attribute);
        }
        if let Some(uri) = &self.jwk_set_uri {
            builder = builder.jwk_set_uri(uri);
        }
        if let Some(uri) = &self.issuer_uri {
            builder = builder.issuer_uri(uri);
        }
        builder
    }
}

/// Convert configuration into registrations, ordered by registration id
pub fn as_client_registrations(
    properties: &ClientProperties,
) -> Result<Vec<ClientRegistration>, RegistrationError> {
    properties.validate()?;
    properties
        .registration
        .iter()
        .map(|(registration_id, registration)| {
            client_registration(registration_id, registration, &properties.provider)
        })
        .collect()
}

fn client_registration(
    registration_id: &str,
    properties: &RegistrationProperties,
    providers: &BTreeMap<String, ProviderProperties>,
) -> Result<ClientRegistration, RegistrationError> {
    let provider_id = properties.provider.as_deref().unwrap_or(registration_id);
    registration_builder(registration_id, properties, providers.get(provider_id))?.build()
}

/// Resolve the starting builder for one registration and apply its properties.
///
/// `provider` holds the configured values for the registration's provider id,
/// if any; a matching preset is used underneath them.
pub fn registration_builder(
    registration_id: &str,
    properties: &RegistrationProperties,
    provider: Option<&ProviderProperties>,
) -> Result<ClientRegistrationBuilder, RegistrationError> {
    let provider_id = properties.provider.as_deref().unwrap_or(registration_id);

    let builder = match (CommonOAuth2Provider::from_provider_id(provider_id), provider) {
        (Some(preset), _) => preset.builder(registration_id),
        (None, Some(_)) => ClientRegistration::with_registration_id(registration_id),
        (None, None) if properties.provider.is_none() => {
            return Err(RegistrationError::ProviderNotSpecified(
                registration_id.to_string(),
            ));
        }
        (None, None) => {
            return Err(RegistrationError::UnknownProvider(provider_id.to_string()));
        }
    };

    let builder = match provider {
        Some(provider) => provider.apply(builder),
        None => builder,
    };

    Ok(properties.apply(builder))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ScopeValue {
    Joined(String),
    List(Vec<String>),
}

fn deserialize_scopes<'de, D>(deserializer: D) -> Result<Option<BTreeSet<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<ScopeValue>::deserialize(deserializer)?;
    Ok(value.map(|value| match value {
        ScopeValue::Joined(joined) => joined
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
        ScopeValue::List(list) => list.into_iter().collect(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registration::providers::DEFAULT_REDIRECT_URL;
    use serde_json::json;

    fn properties(value: serde_json::Value) -> ClientProperties {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_preset_registration() {
        let props = properties(json!({
            "registration": {
                "google": { "client-id": "abc", "client-secret": "secret" }
            }
        }));

        let registrations = as_client_registrations(&props).unwrap();
        assert_eq!(registrations.len(), 1);
        let google = &registrations[0];
        assert_eq!(google.registration_id, "google");
        assert_eq!(google.client_id, "abc");
        assert_eq!(google.redirect_uri, DEFAULT_REDIRECT_URL);
        assert_eq!(
            google.provider_details.authorization_uri,
            "https://accounts.google.com/o/oauth2/v2/auth"
        );
    }

    #[test]
    fn test_configured_provider_overrides_preset() {
        let props = properties(json!({
            "registration": {
                "corp": {
                    "provider": "okta",
                    "client-id": "x",
                    "client-secret": "y",
                    "scope": "openid, groups",
                    "client-name": "Corporate SSO"
                }
            },
            "provider": {
                "okta": {
                    "authorization-uri": "https://corp.okta.com/oauth2/v1/authorize",
                    "token-uri": "https://corp.okta.com/oauth2/v1/token",
                    "jwk-set-uri": "https://corp.okta.com/oauth2/v1/keys",
                    "user-info-authentication-method": "form"
                }
            }
        }));

        let registrations = as_client_registrations(&props).unwrap();
        let corp = &registrations[0];
        assert_eq!(corp.registration_id, "corp");
        assert_eq!(corp.client_name, "Corporate SSO");
        assert_eq!(
            corp.scopes,
            BTreeSet::from(["openid".to_string(), "groups".to_string()])
        );
        assert_eq!(
            corp.provider_details.token_uri,
            "https://corp.okta.com/oauth2/v1/token"
        );
        assert_eq!(
            corp.provider_details.user_info_endpoint.authentication_method,
            AuthenticationMethod::Form
        );
        // Untouched preset value
        assert_eq!(
            corp.provider_details
                .user_info_endpoint
                .user_name_attribute_name
                .as_deref(),
            Some("sub")
        );
    }

    #[test]
    fn test_custom_provider() {
        let props = properties(json!({
            "registration": {
                "keycloak": {
                    "client-id": "app",
                    "client-secret": "secret",
                    "authorization-grant-type": "authorization_code",
                    "redirect-uri": "{baseUrl}/login/oauth2/code/{registrationId}",
                    "scope": ["openid"]
                }
            },
            "provider": {
                "keycloak": {
                    "authorization-uri": "https://sso.example.com/auth",
                    "token-uri": "https://sso.example.com/token"
                }
            }
        }));

        let registrations = as_client_registrations(&props).unwrap();
        assert_eq!(registrations[0].client_name, "keycloak");
        assert_eq!(
            registrations[0].authorization_grant_type,
            AuthorizationGrantType::AuthorizationCode
        );
    }

    #[test]
    fn test_missing_client_id() {
        let props = properties(json!({
            "registration": { "google": { "client-secret": "secret" } }
        }));
        assert_eq!(
            as_client_registrations(&props).unwrap_err(),
            RegistrationError::MissingClientId("google".to_string())
        );
    }

    #[test]
    fn test_provider_resolution_errors() {
        let unspecified = properties(json!({
            "registration": { "mystery": { "client-id": "x" } }
        }));
        assert_eq!(
            as_client_registrations(&unspecified).unwrap_err(),
            RegistrationError::ProviderNotSpecified("mystery".to_string())
        );

        let unknown = properties(json!({
            "registration": { "mystery": { "provider": "nowhere", "client-id": "x" } }
        }));
        assert_eq!(
            as_client_registrations(&unknown).unwrap_err(),
            RegistrationError::UnknownProvider("nowhere".to_string())
        );
    }

    #[test]
    fn test_output_ordered_by_registration_id() {
        let props = properties(json!({
            "registration": {
                "google": { "client-id": "g" },
                "github": { "client-id": "h" },
                "facebook": { "client-id": "f" }
            }
        }));
        let ids: Vec<_> = as_client_registrations(&props)
            .unwrap()
            .into_iter()
            .map(|r| r.registration_id)
            .collect();
        assert_eq!(ids, vec!["facebook", "github", "google"]);
    }

    #[test]
    fn test_empty_properties() {
        assert!(
            as_client_registrations(&ClientProperties::default())
                .unwrap()
                .is_empty()
        );
    }
}

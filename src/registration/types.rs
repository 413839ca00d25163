//! OAuth2 client registration types and their builder.
//!
//! A [`ClientRegistration`] carries everything an OAuth2/OIDC login flow needs
//! to talk to one identity provider: client credentials, provider endpoints,
//! requested scopes and free-form provider metadata.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::errors::RegistrationError;

/// Provider metadata key marking a registration as loaded from configuration
pub const PRECONFIGURED_METADATA_KEY: &str = "preconfigured";

/// Provider metadata attached to every registration built from configuration
pub fn preconfigured_metadata() -> BTreeMap<String, String> {
    BTreeMap::from([(PRECONFIGURED_METADATA_KEY.to_string(), "true".to_string())])
}

/// OAuth2 authorization grant type.
///
/// Unknown grant types are kept verbatim in [`AuthorizationGrantType::Other`]
/// so extension grants survive a round trip through configuration.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AuthorizationGrantType {
    AuthorizationCode,
    RefreshToken,
    ClientCredentials,
    JwtBearer,
    DeviceCode,
    TokenExchange,
    Other(String),
}

impl AuthorizationGrantType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::AuthorizationCode => "authorization_code",
            Self::RefreshToken => "refresh_token",
            Self::ClientCredentials => "client_credentials",
            Self::JwtBearer => "urn:ietf:params:oauth:grant-type:jwt-bearer",
            Self::DeviceCode => "urn:ietf:params:oauth:grant-type:device_code",
            Self::TokenExchange => "urn:ietf:params:oauth:grant-type:token-exchange",
            Self::Other(value) => value,
        }
    }
}

impl From<&str> for AuthorizationGrantType {
    fn from(value: &str) -> Self {
        match value {
            "authorization_code" => Self::AuthorizationCode,
            "refresh_token" => Self::RefreshToken,
            "client_credentials" => Self::ClientCredentials,
            "urn:ietf:params:oauth:grant-type:jwt-bearer" => Self::JwtBearer,
            "urn:ietf:params:oauth:grant-type:device_code" => Self::DeviceCode,
            "urn:ietf:params:oauth:grant-type:token-exchange" => Self::TokenExchange,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for AuthorizationGrantType {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

impl From<AuthorizationGrantType> for String {
    fn from(value: AuthorizationGrantType) -> Self {
        match value {
            AuthorizationGrantType::Other(value) => value,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for AuthorizationGrantType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the client authenticates against the token endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClientAuthenticationMethod {
    #[serde(alias = "basic")]
    ClientSecretBasic,
    #[serde(alias = "post")]
    ClientSecretPost,
    ClientSecretJwt,
    PrivateKeyJwt,
    None,
}

impl ClientAuthenticationMethod {
    /// Method used when a registration does not name one: public clients of
    /// the authorization code grant send no secret, everyone else uses basic.
    pub fn deduce(grant_type: &AuthorizationGrantType, client_secret: &str) -> Self {
        if *grant_type == AuthorizationGrantType::AuthorizationCode && client_secret.is_empty() {
            Self::None
        } else {
            Self::ClientSecretBasic
        }
    }
}

/// How the access token is sent to the user-info endpoint
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthenticationMethod {
    #[default]
    Header,
    Form,
    Query,
}

/// User-info endpoint details
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserInfoEndpoint {
    pub uri: Option<String>,
    pub authentication_method: AuthenticationMethod,
    /// Claim holding the end-user's name or identifier
    pub user_name_attribute_name: Option<String>,
}

/// Identity provider endpoints and metadata
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderDetails {
    pub authorization_uri: String,
    pub token_uri: String,
    pub jwk_set_uri: Option<String>,
    pub issuer_uri: Option<String>,
    pub user_info_endpoint: UserInfoEndpoint,
    pub configuration_metadata: BTreeMap<String, String>,
}

/// A client registration with one OAuth2 / OpenID Connect provider
#[derive(Clone, PartialEq, Eq)]
pub struct ClientRegistration {
    pub registration_id: String,
    pub client_id: String,
    pub client_secret: String,
    pub client_authentication_method: ClientAuthenticationMethod,
    pub authorization_grant_type: AuthorizationGrantType,
    /// Redirect URI, possibly a template such as `{baseUrl}/login/oauth2/code/{registrationId}`
    pub redirect_uri: String,
    pub scopes: BTreeSet<String>,
    pub provider_details: ProviderDetails,
    pub client_name: String,
}

impl ClientRegistration {
    /// Start building a registration with the given id
    pub fn with_registration_id(registration_id: impl Into<String>) -> ClientRegistrationBuilder {
        ClientRegistrationBuilder {
            registration_id: registration_id.into(),
            ..Default::default()
        }
    }

    /// Builder pre-populated with every field of this registration
    pub fn to_builder(&self) -> ClientRegistrationBuilder {
        let provider = &self.provider_details;
        ClientRegistrationBuilder {
            registration_id: self.registration_id.clone(),
            client_id: self.client_id.clone(),
            client_secret: self.client_secret.clone(),
            client_authentication_method: Some(self.client_authentication_method),
            authorization_grant_type: Some(self.authorization_grant_type.clone()),
            redirect_uri: Some(self.redirect_uri.clone()),
            scopes: self.scopes.clone(),
            authorization_uri: Some(provider.authorization_uri.clone()),
            token_uri: Some(provider.token_uri.clone()),
            user_info_uri: provider.user_info_endpoint.uri.clone(),
            user_info_authentication_method: provider.user_info_endpoint.authentication_method,
            user_name_attribute_name: provider.user_info_endpoint.user_name_attribute_name.clone(),
            jwk_set_uri: provider.jwk_set_uri.clone(),
            issuer_uri: provider.issuer_uri.clone(),
            configuration_metadata: provider.configuration_metadata.clone(),
            client_name: Some(self.client_name.clone()),
        }
    }
}

impl fmt::Debug for ClientRegistration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientRegistration")
            .field("registration_id", &self.registration_id)
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field(
                "client_authentication_method",
                &self.client_authentication_method,
            )
            .field("authorization_grant_type", &self.authorization_grant_type)
            .field("redirect_uri", &self.redirect_uri)
            .field("scopes", &self.scopes)
            .field("provider_details", &self.provider_details)
            .field("client_name", &self.client_name)
            .finish()
    }
}

/// Builder for [`ClientRegistration`]; [`ClientRegistrationBuilder::build`] validates
/// the fields each grant type needs.
#[derive(Clone, Default)]
pub struct ClientRegistrationBuilder {
    registration_id: String,
    client_id: String,
    client_secret: String,
    client_authentication_method: Option<ClientAuthenticationMethod>,
    authorization_grant_type: Option<AuthorizationGrantType>,
    redirect_uri: Option<String>,
    scopes: BTreeSet<String>,
    authorization_uri: Option<String>,
    token_uri: Option<String>,
    user_info_uri: Option<String>,
    user_info_authentication_method: AuthenticationMethod,
    user_name_attribute_name: Option<String>,
    jwk_set_uri: Option<String>,
    issuer_uri: Option<String>,
    configuration_metadata: BTreeMap<String, String>,
    client_name: Option<String>,
}

impl ClientRegistrationBuilder {
    pub fn registration_id(mut self, registration_id: impl Into<String>) -> Self {
        self.registration_id = registration_id.into();
        self
    }

    pub fn client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = client_id.into();
        self
    }

    pub fn client_secret(mut self, client_secret: impl Into<String>) -> Self {
        self.client_secret = client_secret.into();
        self
    }

    pub fn client_authentication_method(mut self, method: ClientAuthenticationMethod) -> Self {
        self.client_authentication_method = Some(method);
        self
    }

    pub fn authorization_grant_type(mut self, grant_type: AuthorizationGrantType) -> Self {
        self.authorization_grant_type = Some(grant_type);
        self
    }

    pub fn redirect_uri(mut self, redirect_uri: impl Into<String>) -> Self {
        self.redirect_uri = Some(redirect_uri.into());
        self
    }

    /// Replace the requested scopes
    pub fn scope<I, S>(mut self, scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.scopes = scopes.into_iter().map(Into::into).collect();
        self
    }

    pub fn authorization_uri(mut self, authorization_uri: impl Into<String>) -> Self {
        self.authorization_uri = Some(authorization_uri.into());
        self
    }

    pub fn token_uri(mut self, token_uri: impl Into<String>) -> Self {
        self.token_uri = Some(token_uri.into());
        self
    }

    pub fn user_info_uri(mut self, user_info_uri: impl Into<String>) -> Self {
        self.user_info_uri = Some(user_info_uri.into());
        self
    }

    pub fn user_info_authentication_method(mut self, method: AuthenticationMethod) -> Self {
        self.user_info_authentication_method = method;
        self
    }

    pub fn user_name_attribute_name(mut self, attribute: impl Into<String>) -> Self {
        self.user_name_attribute_name = Some(attribute.into());
        self
    }

    pub fn jwk_set_uri(mut self, jwk_set_uri: impl Into<String>) -> Self {
        self.jwk_set_uri = Some(jwk_set_uri.into());
        self
    }

    pub fn issuer_uri(mut self, issuer_uri: impl Into<String>) -> Self {
        self.issuer_uri = Some(issuer_uri.into());
        self
    }

    pub fn configuration_metadata(mut self, metadata: BTreeMap<String, String>) -> Self {
        self.configuration_metadata = metadata;
        self
    }

    pub fn client_name(mut self, client_name: impl Into<String>) -> Self {
        self.client_name = Some(client_name.into());
        self
    }

    /// Validate and produce the registration
    pub fn build(self) -> Result<ClientRegistration, RegistrationError> {
        if self.registration_id.is_empty() {
            return Err(RegistrationError::EmptyRegistrationId);
        }
        let id = self.registration_id.clone();

        let grant_type = self
            .authorization_grant_type
            .clone()
            .ok_or_else(|| RegistrationError::MissingGrantType(id.clone()))?;

        if self.client_id.is_empty() {
            return Err(RegistrationError::MissingClientId(id));
        }
        if grant_type == AuthorizationGrantType::AuthorizationCode {
            if is_blank(&self.redirect_uri) {
                return Err(RegistrationError::MissingRedirectUri(id));
            }
            if is_blank(&self.authorization_uri) {
                return Err(RegistrationError::MissingAuthorizationUri(id));
            }
        }
        if is_blank(&self.token_uri) {
            return Err(RegistrationError::MissingTokenUri(id));
        }
        if let Some(scope) = self.scopes.iter().find(|scope| !is_valid_scope(scope)) {
            return Err(RegistrationError::InvalidScope(id, scope.clone()));
        }

        let client_authentication_method = self
            .client_authentication_method
            .unwrap_or_else(|| ClientAuthenticationMethod::deduce(&grant_type, &self.client_secret));

        Ok(ClientRegistration {
            client_name: self.client_name.unwrap_or_else(|| id.clone()),
            registration_id: id,
            client_id: self.client_id,
            client_secret: self.client_secret,
            client_authentication_method,
            authorization_grant_type: grant_type,
            redirect_uri: self.redirect_uri.unwrap_or_default(),
            scopes: self.scopes,
            provider_details: ProviderDetails {
                authorization_uri: self.authorization_uri.unwrap_or_default(),
                token_uri: self.token_uri.unwrap_or_default(),
                jwk_set_uri: self.jwk_set_uri,
                issuer_uri: self.issuer_uri,
                user_info_endpoint: UserInfoEndpoint {
                    uri: self.user_info_uri,
                    authentication_method: self.user_info_authentication_method,
                    user_name_attribute_name: self.user_name_attribute_name,
                },
                configuration_metadata: self.configuration_metadata,
            },
        })
    }
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().is_none_or(|v| v.trim().is_empty())
}

/// RFC 6749 section 3.3: `scope-token = 1*( %x21 / %x23-5B / %x5D-7E )`
pub fn is_valid_scope(scope: &str) -> bool {
    !scope.is_empty()
        && scope
            .chars()
            .all(|c| matches!(c, '\x21' | '\x23'..='\x5B' | '\x5D'..='\x7E'))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn google() -> ClientRegistrationBuilder {
        ClientRegistration::with_registration_id("google")
            .client_id("abc")
            .client_secret("s3cr3t")
            .authorization_grant_type(AuthorizationGrantType::AuthorizationCode)
            .redirect_uri("{baseUrl}/login/oauth2/code/{registrationId}")
            .authorization_uri("https://accounts.google.com/o/oauth2/v2/auth")
            .token_uri("https://oauth2.googleapis.com/token")
            .scope(["openid", "profile"])
    }

    #[test]
    fn test_build_defaults() {
        let registration = google().build().unwrap();
        assert_eq!(registration.client_name, "google");
        assert_eq!(
            registration.client_authentication_method,
            ClientAuthenticationMethod::ClientSecretBasic
        );
        assert!(registration.provider_details.configuration_metadata.is_empty());
        assert_eq!(registration.scopes.len(), 2);
    }

    #[test]
    fn test_public_client_deduces_none() {
        let registration = google().client_secret("").build().unwrap();
        assert_eq!(
            registration.client_authentication_method,
            ClientAuthenticationMethod::None
        );

        let explicit = google()
            .client_secret("")
            .client_authentication_method(ClientAuthenticationMethod::ClientSecretPost)
            .build()
            .unwrap();
        assert_eq!(
            explicit.client_authentication_method,
            ClientAuthenticationMethod::ClientSecretPost
        );
    }

    #[test]
    fn test_authorization_code_requirements() {
        assert_eq!(
            ClientRegistration::with_registration_id("").build(),
            Err(RegistrationError::EmptyRegistrationId)
        );
        assert_eq!(
            google().client_id("").build(),
            Err(RegistrationError::MissingClientId("google".to_string()))
        );
        assert_eq!(
            google().redirect_uri(" ").build(),
            Err(RegistrationError::MissingRedirectUri("google".to_string()))
        );
        assert_eq!(
            google().authorization_uri("").build(),
            Err(RegistrationError::MissingAuthorizationUri("google".to_string()))
        );
        assert_eq!(
            google().token_uri("").build(),
            Err(RegistrationError::MissingTokenUri("google".to_string()))
        );
    }

    #[test]
    fn test_client_credentials_skips_browser_endpoints() {
        let registration = ClientRegistration::with_registration_id("service")
            .client_id("svc")
            .client_secret("secret")
            .authorization_grant_type(AuthorizationGrantType::ClientCredentials)
            .token_uri("https://idp.example.com/token")
            .build()
            .unwrap();
        assert!(registration.redirect_uri.is_empty());
        assert!(registration.provider_details.authorization_uri.is_empty());

        let missing_grant = ClientRegistration::with_registration_id("service")
            .client_id("svc")
            .token_uri("https://idp.example.com/token")
            .build();
        assert_eq!(
            missing_grant,
            Err(RegistrationError::MissingGrantType("service".to_string()))
        );
    }

    #[test]
    fn test_scope_grammar() {
        assert!(is_valid_scope("read:user"));
        assert!(is_valid_scope("https://www.googleapis.com/auth/drive"));
        assert!(!is_valid_scope(""));
        assert!(!is_valid_scope("two words"));
        assert!(!is_valid_scope("quote\"d"));
        assert!(!is_valid_scope("back\\slash"));

        let result = google().scope(["openid", "bad scope"]).build();
        assert_eq!(
            result,
            Err(RegistrationError::InvalidScope(
                "google".to_string(),
                "bad scope".to_string()
            ))
        );
    }

    #[test]
    fn test_grant_type_round_trip() {
        for value in [
            "authorization_code",
            "client_credentials",
            "urn:ietf:params:oauth:grant-type:device_code",
            "urn:example:custom",
        ] {
            let grant_type = AuthorizationGrantType::from(value);
            assert_eq!(grant_type.as_str(), value);
            assert_eq!(String::from(grant_type), value);
        }
        assert_eq!(
            AuthorizationGrantType::from("urn:example:custom"),
            AuthorizationGrantType::Other("urn:example:custom".to_string())
        );

        let parsed: AuthorizationGrantType = serde_json::from_str("\"refresh_token\"").unwrap();
        assert_eq!(parsed, AuthorizationGrantType::RefreshToken);
    }

    #[test]
    fn test_legacy_authentication_method_names() {
        let basic: ClientAuthenticationMethod = serde_json::from_str("\"basic\"").unwrap();
        assert_eq!(basic, ClientAuthenticationMethod::ClientSecretBasic);
        let post: ClientAuthenticationMethod = serde_json::from_str("\"post\"").unwrap();
        assert_eq!(post, ClientAuthenticationMethod::ClientSecretPost);
    }

    #[test]
    fn test_to_builder_preserves_fields() {
        let registration = google()
            .jwk_set_uri("https://www.googleapis.com/oauth2/v3/certs")
            .issuer_uri("https://accounts.google.com")
            .user_name_attribute_name("sub")
            .configuration_metadata(preconfigured_metadata())
            .build()
            .unwrap();
        let rebuilt = registration.to_builder().build().unwrap();
        assert_eq!(rebuilt, registration);
    }

    #[test]
    fn test_debug_redacts_secret() {
        let registration = google().build().unwrap();
        let debug = format!("{:?}", registration);
        assert!(!debug.contains("s3cr3t"));
        assert!(debug.contains("[REDACTED]"));
    }
}

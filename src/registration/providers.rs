//! Presets for well-known identity providers.
//!
//! A preset fills in endpoints, scopes and user-info details so configuration
//! only needs client credentials. Any configured value overrides the preset.

use super::types::{
    AuthorizationGrantType, ClientAuthenticationMethod, ClientRegistration,
    ClientRegistrationBuilder,
};

/// Redirect URI template used by every preset
pub const DEFAULT_REDIRECT_URL: &str = "{baseUrl}/{action}/oauth2/code/{registrationId}";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommonOAuth2Provider {
    Google,
    GitHub,
    Facebook,
    Okta,
}

impl CommonOAuth2Provider {
    pub const ALL: [CommonOAuth2Provider; 4] =
        [Self::Google, Self::GitHub, Self::Facebook, Self::Okta];

    /// Look up a preset by provider id, ignoring case
    pub fn from_provider_id(provider_id: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|provider| provider.provider_id().eq_ignore_ascii_case(provider_id))
    }

    pub fn provider_id(&self) -> &'static str {
        match self {
            Self::Google => "google",
            Self::GitHub => "github",
            Self::Facebook => "facebook",
            Self::Okta => "okta",
        }
    }

    /// Builder for `registration_id` seeded with this provider's defaults
    pub fn builder(&self, registration_id: impl Into<String>) -> ClientRegistrationBuilder {
        let builder = ClientRegistration::with_registration_id(registration_id)
            .client_authentication_method(ClientAuthenticationMethod::ClientSecretBasic)
            .authorization_grant_type(AuthorizationGrantType::AuthorizationCode)
            .redirect_uri(DEFAULT_REDIRECT_URL);

        match self {
            Self::Google => builder
                .scope(["openid", "profile", "email"])
                .authorization_uri("https://accounts.google.com/o/oauth2/v2/auth")
                .token_uri("https://www.googleapis.com/oauth2/v4/token")
                .jwk_set_uri("https://www.googleapis.com/oauth2/v3/certs")
                .issuer_uri("https://accounts.google.com")
                .user_info_uri("https://www.googleapis.com/oauth2/v3/userinfo")
                .user_name_attribute_name("sub")
                .client_name("Google"),
            Self::GitHub => builder
                .scope(["read:user"])
                .authorization_uri("https://github.com/login/oauth/authorize")
                .token_uri("https://github.com/login/oauth/access_token")
                .user_info_uri("https://api.github.com/user")
                .user_name_attribute_name("id")
                .client_name("GitHub"),
            Self::Facebook => builder
                .client_authentication_method(ClientAuthenticationMethod::ClientSecretPost)
                .scope(["public_profile", "email"])
                .authorization_uri("https://www.facebook.com/v2.8/dialog/oauth")
                .token_uri("https://graph.facebook.com/v2.8/oauth/access_token")
                .user_info_uri("https://graph.facebook.com/me?fields=id,name,email")
                .user_name_attribute_name("id")
                .client_name("Facebook"),
            // Okta endpoints are tenant specific and must come from configuration
            Self::Okta => builder
                .scope(["openid", "profile", "email"])
                .user_name_attribute_name("sub")
                .client_name("Okta"),
        }
    }
}

//! OAuth2 client registrations: the record type, provider presets, and the
//! configuration mapper that produces them.

pub mod mapper;
pub mod providers;
pub mod types;

pub use mapper::{
    ClientProperties, ProviderProperties, RegistrationProperties, as_client_registrations,
    registration_builder,
};
pub use providers::CommonOAuth2Provider;
pub use types::{
    AuthenticationMethod, AuthorizationGrantType, ClientAuthenticationMethod, ClientRegistration,
    ClientRegistrationBuilder, PRECONFIGURED_METADATA_KEY, ProviderDetails, UserInfoEndpoint,
    preconfigured_metadata,
};

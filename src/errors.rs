//! Standardized error types following the `error-registry-<domain>-<number>` format.

use thiserror::Error;

/// Configuration errors that occur during application startup
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Error when HTTP_PORT cannot be parsed
    #[error("error-registry-config-1 Parsing HTTP_PORT into u16 failed: {0:?}")]
    PortParsingFailed(std::num::ParseIntError),

    /// Error when version information is not available
    #[error("error-registry-config-2 One of GIT_HASH or CARGO_PKG_VERSION must be set")]
    VersionNotSet,

    /// Error when boolean string cannot be parsed
    #[error(
        "error-registry-config-3 Failed to parse boolean '{0}': expected true/false/1/0/yes/no/on/off"
    )]
    BoolParsingFailed(String),

    /// Error when the client configuration file cannot be read
    #[error("error-registry-config-4 Unable to read client configuration '{0}': {1}")]
    ClientConfigUnreadable(String, std::io::Error),

    /// Error when the client configuration document is not valid
    #[error("error-registry-config-5 Invalid client configuration: {0}")]
    ClientConfigInvalid(#[from] serde_json::Error),

    /// Error when both client configuration sources are set
    #[error(
        "error-registry-config-6 Only one of OAUTH2_CLIENT_CONFIG or OAUTH2_CLIENT_CONFIG_JSON may be set"
    )]
    ClientConfigConflict,
}

/// Client registration construction errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistrationError {
    /// Registration id is empty
    #[error("error-registry-registration-1 Registration id cannot be empty")]
    EmptyRegistrationId,

    /// Client id is empty
    #[error("error-registry-registration-2 Client id must not be empty for registration '{0}'")]
    MissingClientId(String),

    /// Redirect URI is empty for a grant that needs one
    #[error("error-registry-registration-3 Redirect uri cannot be empty for registration '{0}'")]
    MissingRedirectUri(String),

    /// Authorization URI is empty for a grant that needs one
    #[error(
        "error-registry-registration-4 Authorization uri cannot be empty for registration '{0}'"
    )]
    MissingAuthorizationUri(String),

    /// Token URI is empty
    #[error("error-registry-registration-5 Token uri cannot be empty for registration '{0}'")]
    MissingTokenUri(String),

    /// Scope contains characters outside the RFC 6749 scope-token grammar
    #[error("error-registry-registration-6 Invalid scope '{1}' for registration '{0}'")]
    InvalidScope(String, String),

    /// No provider id and no preset for the registration id
    #[error(
        "error-registry-registration-7 Provider id must be specified for client registration '{0}'"
    )]
    ProviderNotSpecified(String),

    /// Provider id refers to neither a preset nor a configured provider
    #[error("error-registry-registration-8 Unknown provider id '{0}'")]
    UnknownProvider(String),

    /// Authorization grant type not set
    #[error(
        "error-registry-registration-9 Authorization grant type must be set for registration '{0}'"
    )]
    MissingGrantType(String),
}

/// Admin API errors
#[derive(Debug, Error)]
pub enum AdminError {
    /// Registration not found
    #[error("error-registry-admin-1 Registration not found: {0}")]
    RegistrationNotFound(String),

    /// Registration could not be built from the request
    #[error("error-registry-admin-2 Invalid registration: {0}")]
    InvalidRegistration(#[from] RegistrationError),

    /// Missing or wrong bearer token
    #[error("error-registry-admin-3 Unauthorized")]
    Unauthorized,
}

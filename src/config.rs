//! Environment-based configuration types for the registry server.

use anyhow::Result;
use subtle::ConstantTimeEq;

use crate::errors::ConfigError;
use crate::registration::ClientProperties;

/// HTTP server port configuration
#[derive(Clone)]
pub struct HttpPort(u16);

/// Bearer token guarding the admin API; the API is disabled when unset
#[derive(Clone, Default)]
pub struct AdminToken(Option<String>);

/// Whether the provider listing endpoint is mounted
#[derive(Clone)]
pub struct EnableProviderListing(bool);

/// Main application configuration
#[derive(Clone)]
pub struct Config {
    pub version: String,
    pub http_port: HttpPort,
    pub admin_token: AdminToken,
    pub enable_provider_listing: EnableProviderListing,
    pub client_properties: ClientProperties,
}

impl Config {
    /// Create a new configuration from environment variables
    pub fn new() -> Result<Self> {
        let http_port: HttpPort = default_env("HTTP_PORT", "8080").try_into()?;
        let admin_token: AdminToken = optional_env("ADMIN_TOKEN").into();
        let enable_provider_listing: EnableProviderListing =
            default_env("ENABLE_PROVIDER_LISTING", "true").try_into()?;
        let client_properties = load_client_properties(
            optional_env("OAUTH2_CLIENT_CONFIG"),
            optional_env("OAUTH2_CLIENT_CONFIG_JSON"),
        )?;

        Ok(Self {
            version: version()?,
            http_port,
            admin_token,
            enable_provider_listing,
            client_properties,
        })
    }
}

/// Get application version from build environment
pub fn version() -> Result<String> {
    option_env!("GIT_HASH")
        .or(option_env!("CARGO_PKG_VERSION"))
        .map(|val| val.to_string())
        .ok_or(ConfigError::VersionNotSet.into())
}

pub(crate) fn optional_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.is_empty())
}

fn default_env(name: &str, default_value: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default_value.to_string())
}

/// Read client configuration from a JSON file path or an inline JSON document.
///
/// With neither source set the registry starts empty.
pub fn load_client_properties(
    path: Option<String>,
    inline: Option<String>,
) -> std::result::Result<ClientProperties, ConfigError> {
    match (path, inline) {
        (Some(_), Some(_)) => Err(ConfigError::ClientConfigConflict),
        (Some(path), None) => {
            let contents = std::fs::read_to_string(&path)
                .map_err(|err| ConfigError::ClientConfigUnreadable(path, err))?;
            Ok(serde_json::from_str(&contents)?)
        }
        (None, Some(inline)) => Ok(serde_json::from_str(&inline)?),
        (None, None) => Ok(ClientProperties::default()),
    }
}

impl TryFrom<String> for HttpPort {
    type Error = anyhow::Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value.is_empty() {
            Ok(Self(8080))
        } else {
            value
                .parse::<u16>()
                .map(Self)
                .map_err(|err| ConfigError::PortParsingFailed(err).into())
        }
    }
}

impl AsRef<u16> for HttpPort {
    fn as_ref(&self) -> &u16 {
        &self.0
    }
}

impl From<Option<String>> for AdminToken {
    fn from(value: Option<String>) -> Self {
        Self(value.filter(|s| !s.trim().is_empty()))
    }
}

impl AdminToken {
    pub fn is_enabled(&self) -> bool {
        self.0.is_some()
    }

    /// Constant-time comparison against the configured token
    pub fn matches(&self, presented: &str) -> bool {
        let Some(expected) = &self.0 else {
            return false;
        };
        expected.as_bytes().ct_eq(presented.as_bytes()).into()
    }
}

impl TryFrom<String> for EnableProviderListing {
    type Error = anyhow::Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(Self(true)),
            "false" | "0" | "no" | "off" => Ok(Self(false)),
            _ => Err(ConfigError::BoolParsingFailed(value).into()),
        }
    }
}

impl AsRef<bool> for EnableProviderListing {
    fn as_ref(&self) -> &bool {
        &self.0
    }
}

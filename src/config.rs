//! Environment-based configuration types for the LTI tool server runtime settings.

use anyhow::Result;
use std::time::Duration;
use url::Url;

use crate::errors::ConfigError;

/// HTTP server port configuration
#[derive(Clone)]
pub struct HttpPort(u16);

/// HTTP client timeout configuration
#[derive(Clone)]
pub struct HttpClientTimeout(Duration);

/// Public base URL of this tool; launch, login, and keys endpoints derive from it
#[derive(Clone)]
pub struct ExternalBase(Url);

/// Tool display name sent as `client_name` during dynamic registration
#[derive(Clone)]
pub struct LtiClientName(String);

/// Tool description carried in the LTI tool configuration block
#[derive(Clone)]
pub struct LtiClientDescription(Option<String>);

/// Tool logo URL sent as `logo_uri` during dynamic registration
#[derive(Clone)]
pub struct LtiClientLogo(Option<String>);

/// Main application configuration
#[derive(Clone)]
pub struct Config {
    pub version: String,
    pub http_port: HttpPort,
    pub external_base: ExternalBase,
    pub user_agent: String,
    pub http_client_timeout: HttpClientTimeout,
    pub storage_backend: String,
    pub lti_client_name: LtiClientName,
    pub lti_client_description: LtiClientDescription,
    pub lti_client_logo: LtiClientLogo,
}

impl Config {
    /// Create a new configuration from environment variables
    pub fn new() -> Result<Self> {
        let default_user_agent = format!("lti-tool/{}", version()?);
        let external_base: ExternalBase = require_env("EXTERNAL_BASE")?.try_into()?;
        let http_client_timeout: HttpClientTimeout =
            default_env("HTTP_CLIENT_TIMEOUT", "10s").try_into()?;
        let http_port: HttpPort = default_env("HTTP_PORT", "8080").try_into()?;
        let storage_backend = default_env("STORAGE_BACKEND", "memory");
        let user_agent = default_env("USER_AGENT", &default_user_agent);
        let lti_client_name: LtiClientName =
            default_env("LTI_CLIENT_NAME", "LTI Tool").try_into()?;
        let lti_client_description: LtiClientDescription =
            optional_env("LTI_CLIENT_DESCRIPTION").try_into()?;
        let lti_client_logo: LtiClientLogo = optional_env("LTI_CLIENT_LOGO").try_into()?;

        Ok(Self {
            version: version()?,
            http_port,
            external_base,
            user_agent,
            http_client_timeout,
            storage_backend,
            lti_client_name,
            lti_client_description,
            lti_client_logo,
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

fn require_env(name: &str) -> Result<String> {
    std::env::var(name).map_err(|_| ConfigError::EnvVarRequired(name.to_string()).into())
}

pub(crate) fn optional_env(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

fn default_env(name: &str, default_value: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default_value.to_string())
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

impl TryFrom<String> for HttpClientTimeout {
    type Error = anyhow::Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        duration_str::parse(&value)
            .map(Self)
            .map_err(|err| ConfigError::DurationParsingFailed(value, err.to_string()).into())
    }
}

impl AsRef<Duration> for HttpClientTimeout {
    fn as_ref(&self) -> &Duration {
        &self.0
    }
}

impl TryFrom<String> for ExternalBase {
    type Error = anyhow::Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Url::parse(&value)
            .map(Self)
            .map_err(|err| ConfigError::ExternalBaseInvalid(format!("{value}: {err}")).into())
    }
}

impl AsRef<Url> for ExternalBase {
    fn as_ref(&self) -> &Url {
        &self.0
    }
}

impl TryFrom<String> for LtiClientName {
    type Error = anyhow::Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Ok(Self(value))
    }
}

impl AsRef<String> for LtiClientName {
    fn as_ref(&self) -> &String {
        &self.0
    }
}

impl TryFrom<Option<String>> for LtiClientDescription {
    type Error = anyhow::Error;

    fn try_from(value: Option<String>) -> Result<Self, Self::Error> {
        Ok(Self(value))
    }
}

impl AsRef<Option<String>> for LtiClientDescription {
    fn as_ref(&self) -> &Option<String> {
        &self.0
    }
}

impl TryFrom<Option<String>> for LtiClientLogo {
    type Error = anyhow::Error;

    fn try_from(value: Option<String>) -> Result<Self, Self::Error> {
        Ok(Self(value))
    }
}

impl AsRef<Option<String>> for LtiClientLogo {
    fn as_ref(&self) -> &Option<String> {
        &self.0
    }
}

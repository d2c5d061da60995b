//! Standardized error types following the `error-lti-<domain>-<number>` format.

use http::StatusCode;
use thiserror::Error;

/// Configuration errors that occur during application startup
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Error when a required environment variable is not set
    #[error("error-lti-config-1 {0} must be set")]
    EnvVarRequired(String),

    /// Error when PORT cannot be parsed
    #[error("error-lti-config-2 Parsing PORT into u16 failed: {0:?}")]
    PortParsingFailed(std::num::ParseIntError),

    /// Error when version information is not available
    #[error("error-lti-config-3 One of GIT_HASH or CARGO_PKG_VERSION must be set")]
    VersionNotSet,

    /// Error when duration string cannot be parsed
    #[error("error-lti-config-4 Failed to parse duration '{0}': {1}")]
    DurationParsingFailed(String, String),

    /// Error when EXTERNAL_BASE is not a valid absolute URL
    #[error("error-lti-config-5 EXTERNAL_BASE is not a valid URL: {0}")]
    ExternalBaseInvalid(String),
}

/// Errors raised by the two-phase dynamic registration protocol
#[derive(Debug, Error)]
pub enum RegistrationError {
    /// Malformed or missing registration input
    #[error("error-lti-registration-1 Invalid registration request: {0}")]
    Validation(String),

    /// No pending registration exists for the configuration endpoint
    #[error("error-lti-registration-2 Registration not started: {0}")]
    NotStarted(String),

    /// A platform is already recorded for the issuer and client id
    #[error("error-lti-registration-3 Platform already registered: {0}")]
    Duplicate(String),

    /// Platform configuration fetch or registration call failed
    #[error("error-lti-registration-4 Platform request failed: {0}")]
    Upstream(String),

    /// Tool signing key pair generation failed
    #[error("error-lti-registration-5 Key generation failed: {0}")]
    KeyGeneration(String),

    /// Unclassified internal failure
    #[error("error-lti-registration-6 Internal error: {0}")]
    Internal(String),
}

impl RegistrationError {
    /// HTTP status the error maps to at the handler boundary
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::NotStarted(_) => StatusCode::BAD_REQUEST,
            Self::Duplicate(_) => StatusCode::CONFLICT,
            Self::Upstream(_) | Self::KeyGeneration(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

/// Key pair provider errors
#[derive(Debug, Error)]
pub enum KeyError {
    /// Error when RSA key pair generation fails
    #[error("error-lti-key-1 Key pair generation failed: {0}")]
    GenerationFailed(String),

    /// Error when key material cannot be encoded
    #[error("error-lti-key-2 Key encoding failed: {0}")]
    EncodingFailed(String),

    /// Error when the generated key cannot be stored
    #[error("error-lti-key-3 Key storage failed: {0}")]
    StorageFailed(String),
}

/// Database/storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    /// Error when database connection fails
    #[error("error-lti-storage-1 Database connection failed: {0}")]
    ConnectionFailed(String),

    /// Error when query execution fails
    #[error("error-lti-storage-2 Query execution failed: {0}")]
    QueryFailed(String),

    /// Error when data serialization fails
    #[error("error-lti-storage-3 Data serialization failed: {0}")]
    SerializationFailed(String),

    /// Error when data validation fails
    #[error("error-lti-storage-4 Invalid data: {0}")]
    InvalidData(String),

    /// Error when requested resource is not found
    #[error("error-lti-storage-5 Not found: {0}")]
    NotFound(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registration_error_status_codes() {
        assert_eq!(
            RegistrationError::Validation("bad url".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            RegistrationError::NotStarted("e".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            RegistrationError::Duplicate("e:c".into()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            RegistrationError::Upstream("timeout".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            RegistrationError::KeyGeneration("rng".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_error_message_codes_are_stable() {
        let err = RegistrationError::NotStarted("https://lms.example/cfg".to_string());
        assert!(err.to_string().starts_with("error-lti-registration-2"));
    }
}

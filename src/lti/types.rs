//! LTI 1.3 dynamic registration core types and data structures.
//!
//! Defines the wire shapes exchanged with the platform during the
//! registration handshake and the durable records the tool keeps.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Scopes requested from the platform during registration
pub const LTI_REGISTRATION_SCOPES: [&str; 5] = [
    "https://purl.imsglobal.org/spec/lti-ags/scope/lineitem.readonly",
    "https://purl.imsglobal.org/spec/lti-ags/scope/lineitem",
    "https://purl.imsglobal.org/spec/lti-ags/scope/score",
    "https://purl.imsglobal.org/spec/lti-ags/scope/result.readonly",
    "https://purl.imsglobal.org/spec/lti-nrps/scope/contextmembership.readonly",
];

/// OAuth grant types requested during registration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrantType {
    Implicit,
    ClientCredentials,
}

/// OAuth response types requested during registration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseType {
    IdToken,
}

/// LTI message types the tool accepts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LtiMessageType {
    LtiResourceLinkRequest,
    LtiDeepLinkingRequest,
}

/// Single-use registration state stored between the two phases
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingRegistration {
    /// Platform's OpenID configuration endpoint (unique key)
    pub configuration_endpoint: String,
    /// Bearer credential for the registration call; may be empty
    pub registration_token: String,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl PendingRegistration {
    pub fn new(configuration_endpoint: String, registration_token: Option<String>) -> Self {
        Self {
            configuration_endpoint,
            registration_token: registration_token.unwrap_or_default(),
            created_at: Utc::now(),
        }
    }
}

/// LTI block of the platform's OpenID configuration document
#[derive(Debug, Clone, Deserialize)]
pub struct LtiPlatformConfiguration {
    /// Platform product identity
    pub product_family_code: String,
}

/// Platform OpenID configuration document, fetched per completion.
///
/// Parsed strictly: a missing required member is an upstream error.
#[derive(Debug, Clone, Deserialize)]
pub struct PlatformConfiguration {
    pub issuer: String,
    pub token_endpoint: String,
    pub jwks_uri: String,
    pub authorization_endpoint: String,
    pub registration_endpoint: String,
    pub claims_supported: Vec<String>,
    #[serde(rename = "https://purl.imsglobal.org/spec/lti-platform-configuration")]
    pub lti_platform_configuration: LtiPlatformConfiguration,
}

/// Message entry in the LTI tool configuration block
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LtiMessage {
    #[serde(rename = "type")]
    pub message_type: LtiMessageType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_link_uri: Option<String>,
}

/// LTI tool configuration block of the registration request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LtiToolConfiguration {
    pub domain: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub target_link_uri: String,
    pub custom_parameters: HashMap<String, String>,
    pub claims: Vec<String>,
    pub messages: Vec<LtiMessage>,
}

/// Dynamic registration request POSTed to the platform's registration endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientRegistrationRequest {
    pub application_type: String,
    pub grant_types: Vec<GrantType>,
    pub response_types: Vec<ResponseType>,
    /// Exactly the launch and deep-link URLs, in that order
    pub redirect_uris: Vec<String>,
    pub initiate_login_uri: String,
    pub client_name: String,
    pub jwks_uri: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo_uri: Option<String>,
    pub token_endpoint_auth_method: String,
    pub scope: String,
    #[serde(rename = "https://purl.imsglobal.org/spec/lti-tool-configuration")]
    pub lti_tool_configuration: LtiToolConfiguration,
}

/// Registration response from the platform; only `client_id` is needed,
/// everything else the platform echoes back is ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientRegistrationResponse {
    pub client_id: String,
}

/// Authentication configuration method for a registered platform
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuthConfigMethod {
    #[serde(rename = "JWK_SET")]
    JwkSet,
}

/// How the tool validates messages signed by the platform
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    pub method: AuthConfigMethod,
    /// Platform JWKS URL
    pub key: String,
}

/// Durable record of a registered platform, the protocol's end product.
///
/// Keyed by `(url, client_id)`; created exactly once, never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Platform {
    /// Platform issuer URL
    pub url: String,
    /// Client id issued by the platform for this tool
    pub client_id: String,
    /// Platform product family code
    pub name: String,
    /// User-supplied tool label from the continuation form
    pub tool_name: String,
    /// Platform authorization endpoint
    pub authentication_endpoint: String,
    /// Platform token endpoint
    pub access_token_endpoint: String,
    pub auth_config: AuthConfig,
    /// Identifier of the tool signing key pair generated for this platform
    pub kid: String,
    /// Registration timestamp
    pub registered_at: DateTime<Utc>,
}

//! LTI 1.3 dynamic registration implementation.
//!
//! Drives the two-phase handshake against a learning platform: phase one
//! records a pending registration for the platform's configuration endpoint,
//! phase two consumes it, fetches the platform's OpenID configuration,
//! performs the dynamic registration call, generates the tool signing key
//! pair, and records the platform.

use std::collections::HashMap;
use std::sync::Arc;
use url::Url;

use crate::config::Config;
use crate::errors::RegistrationError;
use crate::lti::types::*;
use crate::storage::key_provider::KeyPairProvider;
use crate::storage::traits::LtiStorage;
use chrono::Utc;

pub type Result<T> = std::result::Result<T, RegistrationError>;

/// Registration service for the two-phase dynamic registration protocol
pub struct RegistrationService {
    storage: Arc<dyn LtiStorage>,
    key_provider: Arc<dyn KeyPairProvider>,
    http_client: reqwest::Client,
    /// Public base URL of this tool
    external_base: Url,
    /// Tool display name sent as `client_name`
    client_name: String,
    client_description: Option<String>,
    client_logo: Option<String>,
}

impl RegistrationService {
    /// Create a new registration service
    pub fn new(
        storage: Arc<dyn LtiStorage>,
        key_provider: Arc<dyn KeyPairProvider>,
        http_client: reqwest::Client,
        config: &Config,
    ) -> Self {
        Self {
            storage,
            key_provider,
            http_client,
            external_base: config.external_base.as_ref().clone(),
            client_name: config.lti_client_name.as_ref().clone(),
            client_description: config.lti_client_description.as_ref().clone(),
            client_logo: config.lti_client_logo.as_ref().clone(),
        }
    }

    /// Phase one: record a pending registration for a configuration endpoint.
    ///
    /// Upserts the pending entry (last writer wins) and performs no network
    /// calls. The returned pending registration carries the endpoint the
    /// continuation form must submit back.
    pub async fn initiate(
        &self,
        openid_configuration: &str,
        registration_token: Option<String>,
    ) -> Result<PendingRegistration> {
        let endpoint = parse_absolute_url("openid_configuration", openid_configuration)?;

        let pending = PendingRegistration::new(endpoint.to_string(), registration_token);
        self.storage
            .store_pending(&pending)
            .await
            .map_err(|e| RegistrationError::Internal(e.to_string()))?;

        tracing::info!(endpoint = %pending.configuration_endpoint, "registration initiated");
        Ok(pending)
    }

    /// Phase two: complete a previously initiated registration.
    ///
    /// The pending entry is consumed before any external call; a failed
    /// completion leaves the protocol requiring re-initiation from phase one.
    pub async fn continue_registration(&self, endpoint: &str, tool_name: &str) -> Result<Platform> {
        let configuration_endpoint = parse_absolute_url("endpoint", endpoint)?;

        let pending = self
            .storage
            .consume_pending(configuration_endpoint.as_str())
            .await
            .map_err(|e| RegistrationError::Internal(e.to_string()))?
            .ok_or_else(|| {
                RegistrationError::NotStarted(configuration_endpoint.to_string())
            })?;

        let configuration = self
            .fetch_platform_configuration(&configuration_endpoint)
            .await?;

        let request = self.build_registration_request(&configuration)?;
        let client_id = self
            .register_with_platform(&configuration, &request, &pending.registration_token)
            .await?;

        let kid = self
            .key_provider
            .generate_key_pair()
            .await
            .map_err(|e| RegistrationError::KeyGeneration(e.to_string()))?;

        let platform = Platform {
            url: configuration.issuer.clone(),
            client_id: client_id.clone(),
            name: configuration
                .lti_platform_configuration
                .product_family_code
                .clone(),
            tool_name: tool_name.to_string(),
            authentication_endpoint: configuration.authorization_endpoint.clone(),
            access_token_endpoint: configuration.token_endpoint.clone(),
            auth_config: AuthConfig {
                method: AuthConfigMethod::JwkSet,
                key: configuration.jwks_uri.clone(),
            },
            kid,
            registered_at: Utc::now(),
        };

        let exists = self
            .storage
            .platform_exists(&platform.url, &platform.client_id)
            .await
            .map_err(|e| RegistrationError::Internal(e.to_string()))?;
        if exists {
            return Err(RegistrationError::Duplicate(format!(
                "{}:{}",
                platform.url, platform.client_id
            )));
        }

        self.storage
            .store_platform(&platform)
            .await
            .map_err(|e| RegistrationError::Internal(e.to_string()))?;

        tracing::info!(
            url = %platform.url,
            client_id = %platform.client_id,
            name = %platform.name,
            "new platform registered"
        );
        Ok(platform)
    }

    /// Fetch and parse the platform's OpenID configuration document
    async fn fetch_platform_configuration(
        &self,
        configuration_endpoint: &Url,
    ) -> Result<PlatformConfiguration> {
        let response = self
            .http_client
            .get(configuration_endpoint.clone())
            .send()
            .await
            .map_err(|e| RegistrationError::Upstream(format!("configuration fetch: {}", e)))?;

        if !response.status().is_success() {
            return Err(RegistrationError::Upstream(format!(
                "configuration fetch returned {}",
                response.status()
            )));
        }

        response
            .json::<PlatformConfiguration>()
            .await
            .map_err(|e| RegistrationError::Upstream(format!("configuration parse: {}", e)))
    }

    /// Build the dynamic registration request from the tool's own endpoints
    /// and the claims the platform supports
    fn build_registration_request(
        &self,
        configuration: &PlatformConfiguration,
    ) -> Result<ClientRegistrationRequest> {
        let launch_url = self.tool_endpoint("launch")?;
        let deep_link_url = self.tool_endpoint("deep-link-launch")?;
        let login_url = self.tool_endpoint("login")?;
        let keys_url = self.tool_endpoint("keys")?;

        Ok(ClientRegistrationRequest {
            application_type: "web".to_string(),
            grant_types: vec![GrantType::Implicit, GrantType::ClientCredentials],
            response_types: vec![ResponseType::IdToken],
            redirect_uris: vec![launch_url.to_string(), deep_link_url.to_string()],
            initiate_login_uri: login_url.to_string(),
            client_name: self.client_name.clone(),
            jwks_uri: keys_url.to_string(),
            logo_uri: self.client_logo.clone(),
            token_endpoint_auth_method: "private_key_jwt".to_string(),
            scope: LTI_REGISTRATION_SCOPES.join(" "),
            lti_tool_configuration: LtiToolConfiguration {
                domain: self.external_base.to_string(),
                description: self.client_description.clone(),
                target_link_uri: launch_url.to_string(),
                custom_parameters: HashMap::new(),
                claims: configuration.claims_supported.clone(),
                messages: vec![
                    LtiMessage {
                        message_type: LtiMessageType::LtiResourceLinkRequest,
                        target_link_uri: None,
                    },
                    LtiMessage {
                        message_type: LtiMessageType::LtiDeepLinkingRequest,
                        target_link_uri: Some(deep_link_url.to_string()),
                    },
                ],
            },
        })
    }

    /// POST the registration request, authorized with the consumed token
    async fn register_with_platform(
        &self,
        configuration: &PlatformConfiguration,
        request: &ClientRegistrationRequest,
        registration_token: &str,
    ) -> Result<String> {
        let response = self
            .http_client
            .post(&configuration.registration_endpoint)
            .bearer_auth(registration_token)
            .json(request)
            .send()
            .await
            .map_err(|e| RegistrationError::Upstream(format!("registration call: {}", e)))?;

        if !response.status().is_success() {
            return Err(RegistrationError::Upstream(format!(
                "registration call returned {}",
                response.status()
            )));
        }

        let registration: ClientRegistrationResponse = response
            .json()
            .await
            .map_err(|e| RegistrationError::Upstream(format!("registration parse: {}", e)))?;

        Ok(registration.client_id)
    }

    /// Resolve one of the tool's own endpoints against its public base URL
    fn tool_endpoint(&self, path: &str) -> Result<Url> {
        self.external_base
            .join(path)
            .map_err(|e| RegistrationError::Internal(format!("endpoint {}: {}", path, e)))
    }
}

/// Parse a required absolute URL parameter
fn parse_absolute_url(name: &str, value: &str) -> Result<Url> {
    Url::parse(value).map_err(|e| RegistrationError::Validation(format!("{}: {}", name, e)))
}

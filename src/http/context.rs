//! Application state and request context management.

use axum_template::engine::Engine;
use std::sync::Arc;

use crate::config::Config;
use crate::lti::registration::RegistrationService;
use crate::storage::key_provider::KeyPairProvider;
use crate::storage::traits::LtiStorage;

/// Template engine for rendering HTML responses.
pub type AppEngine = Engine<minijinja::Environment<'static>>;

#[derive(Clone)]
pub struct AppState {
    pub http_client: reqwest::Client,
    pub config: Arc<Config>,
    /// Template engine for rendering HTML responses.
    pub template_env: AppEngine,
    /// Storage for pending registrations, platforms, and signing keys
    pub storage: Arc<dyn LtiStorage>,
    /// Provider of tool signing key pairs
    pub key_provider: Arc<dyn KeyPairProvider>,
    /// Registration service driving the two-phase protocol
    pub registration_service: Arc<RegistrationService>,
}

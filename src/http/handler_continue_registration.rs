//! Handles POST /continue-registration - phase two of the LTI dynamic registration handshake

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    Form,
};
use axum_template::RenderHtml;
use minijinja::context;
use serde::Deserialize;

use super::context::AppState;

/// Form body submitted by the continuation page.
///
/// Fields are optional at the extractor level so a missing member surfaces
/// as a validation failure (400) instead of an unprocessable-entity reject.
#[derive(Debug, Deserialize)]
pub struct ContinueRegistrationForm {
    pub endpoint: Option<String>,
    pub tool_name: Option<String>,
}

/// Handle phase two: consume the pending registration, register with the
/// platform, and return the close-signal page for the registration popup.
pub async fn handle_continue_registration(
    State(state): State<AppState>,
    Form(form): Form<ContinueRegistrationForm>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let endpoint = form
        .endpoint
        .ok_or((StatusCode::BAD_REQUEST, "endpoint is required".to_string()))?;
    let tool_name = form
        .tool_name
        .ok_or((StatusCode::BAD_REQUEST, "tool_name is required".to_string()))?;

    state
        .registration_service
        .continue_registration(&endpoint, &tool_name)
        .await
        .map_err(|e| {
            let status = e.status_code();
            if status == StatusCode::INTERNAL_SERVER_ERROR {
                tracing::error!(error = ?e, "registration continuation failed");
                (status, "Something went wrong".to_string())
            } else {
                (status, e.to_string())
            }
        })?;

    Ok(RenderHtml(
        "close.html",
        state.template_env.clone(),
        context! {},
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lti::registration::RegistrationService;
    use crate::storage::key_provider::RsaKeyPairProvider;
    use crate::storage::MemoryLtiStorage;
    use std::sync::Arc;

    fn create_test_app_state() -> AppState {
        let storage = Arc::new(MemoryLtiStorage::new());
        let key_provider = Arc::new(RsaKeyPairProvider::new(storage.clone()));
        let http_client = reqwest::Client::new();

        let config = Arc::new(crate::config::Config {
            version: "test".to_string(),
            http_port: "3000".to_string().try_into().unwrap(),
            external_base: "https://tool.example".to_string().try_into().unwrap(),
            user_agent: "test-user-agent".to_string(),
            http_client_timeout: "10s".to_string().try_into().unwrap(),
            storage_backend: "memory".to_string(),
            lti_client_name: "LTI Tool".to_string().try_into().unwrap(),
            lti_client_description: None::<String>.try_into().unwrap(),
            lti_client_logo: None::<String>.try_into().unwrap(),
        });

        let registration_service = Arc::new(RegistrationService::new(
            storage.clone(),
            key_provider.clone(),
            http_client.clone(),
            &config,
        ));

        let template_env =
            axum_template::engine::Engine::new(crate::templates::build_env().unwrap());

        AppState {
            http_client,
            config,
            template_env,
            storage,
            key_provider,
            registration_service,
        }
    }

    #[tokio::test]
    async fn test_continue_without_pending_registration_is_bad_request() {
        let state = create_test_app_state();
        let form = ContinueRegistrationForm {
            endpoint: Some("https://lms.example/.well-known/cfg".to_string()),
            tool_name: Some("My Tool".to_string()),
        };

        let result = handle_continue_registration(State(state), Form(form)).await;
        let (status, message) = result.err().unwrap();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(message.contains("Registration not started"));
    }

    #[tokio::test]
    async fn test_continue_with_malformed_endpoint_is_bad_request() {
        let state = create_test_app_state();
        let form = ContinueRegistrationForm {
            endpoint: Some("::::".to_string()),
            tool_name: Some("My Tool".to_string()),
        };

        let result = handle_continue_registration(State(state), Form(form)).await;
        let (status, _) = result.err().unwrap();
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_continue_without_tool_name_is_bad_request() {
        let state = create_test_app_state();
        let form = ContinueRegistrationForm {
            endpoint: Some("https://lms.example/.well-known/cfg".to_string()),
            tool_name: None,
        };

        let result = handle_continue_registration(State(state), Form(form)).await;
        let (status, message) = result.err().unwrap();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(message.contains("tool_name"));
    }
}

//! Handles GET /registration - phase one of the LTI dynamic registration handshake

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use axum_template::RenderHtml;
use minijinja::context;
use serde::Deserialize;

use super::context::AppState;

/// Query parameters the platform opens the registration popup with
#[derive(Debug, Deserialize)]
pub struct RegistrationQuery {
    pub openid_configuration: String,
    pub registration_token: Option<String>,
}

/// Handle phase one: record the pending registration and return the
/// continuation form that carries the endpoint and tool name forward.
pub async fn handle_registration(
    State(state): State<AppState>,
    Query(query): Query<RegistrationQuery>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let pending = state
        .registration_service
        .initiate(&query.openid_configuration, query.registration_token)
        .await
        .map_err(|e| {
            let status = e.status_code();
            if status == StatusCode::INTERNAL_SERVER_ERROR {
                tracing::error!(error = ?e, "registration initiation failed");
                (status, "Something went wrong".to_string())
            } else {
                (status, e.to_string())
            }
        })?;

    Ok(RenderHtml(
        "registration.html",
        state.template_env.clone(),
        context! {
            endpoint => pending.configuration_endpoint,
        },
    ))
}

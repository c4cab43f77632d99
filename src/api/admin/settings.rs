//! Admin settings endpoints
//!
//! Manages the stored instruction override. Note the override is only
//! honored at dispatch when builtin templates are not forced.

use axum::extract::State;
use tracing::info;

use crate::api::state::AppState;
use crate::api::types::{ApiError, Json, SettingsView, UpdateSettingsRequest};
use crate::infrastructure::store::SYSTEM_PROMPT_KEY;

/// GET /admin/settings
pub async fn get_settings(State(state): State<AppState>) -> Result<Json<SettingsView>, ApiError> {
    let system_prompt = state.settings_store.get(SYSTEM_PROMPT_KEY).await?;
    Ok(Json(SettingsView { system_prompt }))
}

/// PUT /admin/settings
pub async fn update_settings(
    State(state): State<AppState>,
    Json(request): Json<UpdateSettingsRequest>,
) -> Result<Json<SettingsView>, ApiError> {
    if request.system_prompt.trim().is_empty() {
        return Err(ApiError::bad_request(
            "VALIDATION_ERROR",
            "systemPrompt must not be empty",
        ));
    }

    state
        .settings_store
        .set(SYSTEM_PROMPT_KEY, &request.system_prompt)
        .await?;

    info!("Instruction override updated");
    state.registry.reload().await;

    Ok(Json(SettingsView {
        system_prompt: Some(request.system_prompt),
    }))
}

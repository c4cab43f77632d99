//! Recognition endpoint

use axum::extract::State;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::{ApiError, Json, RecognizeRequest, RecognizeResponse};

/// POST /v1/recognize
///
/// Input validation happens before any provider is attempted: a missing
/// image or undecodable base64 is rejected with 400 and no upstream call.
pub async fn recognize(
    State(state): State<AppState>,
    Json(request): Json<RecognizeRequest>,
) -> Result<Json<RecognizeResponse>, ApiError> {
    if request.image.trim().is_empty() {
        return Err(ApiError::bad_request(
            "MISSING_IMAGE",
            "Image field is required",
        ));
    }

    if BASE64.decode(request.image.as_bytes()).is_err() {
        return Err(ApiError::bad_request(
            "INVALID_IMAGE_FORMAT",
            "Image must be base64 encoded",
        ));
    }

    debug!(
        image_len = request.image.len(),
        locale = request.locale.as_deref().unwrap_or("default"),
        "Recognition request received"
    );

    let result = state
        .recognition_service
        .recognize_with_fallback(&request.image, request.locale.as_deref())
        .await?;

    Ok(Json(RecognizeResponse::from(result)))
}

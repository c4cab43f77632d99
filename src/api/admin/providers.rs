//! Admin provider management endpoints

use axum::extract::{Path, State};
use axum::http::StatusCode;
use tracing::info;
use uuid::Uuid;

use crate::api::state::AppState;
use crate::api::types::{
    ApiError, CreateProviderRequest, Json, ProviderView, UpdateProviderModelRequest,
};
use crate::domain::ProviderRecord;

/// GET /admin/providers
pub async fn list_providers(
    State(state): State<AppState>,
) -> Result<Json<Vec<ProviderView>>, ApiError> {
    let records = state.provider_store.list().await?;
    Ok(Json(records.into_iter().map(ProviderView::from).collect()))
}

/// POST /admin/providers
///
/// The plaintext credential is encrypted at this edge; nothing past this
/// handler sees it.
pub async fn create_provider(
    State(state): State<AppState>,
    Json(request): Json<CreateProviderRequest>,
) -> Result<(StatusCode, Json<ProviderView>), ApiError> {
    if request.name.trim().is_empty() || request.provider_id.trim().is_empty() {
        return Err(ApiError::bad_request(
            "VALIDATION_ERROR",
            "Provider name and providerId are required",
        ));
    }

    let mut record = ProviderRecord::new(
        request.provider_id,
        request.name,
        request.base_url,
        request.model,
    );

    if let Some(key) = request.api_key.as_deref().filter(|k| !k.is_empty()) {
        record = record.with_encrypted_key(state.credential_codec.encrypt(key));
    }
    if let Some(priority) = request.priority {
        record = record.with_priority(priority);
    }
    if let Some(enabled) = request.enabled {
        record = record.with_enabled(enabled);
    }
    if let Some(max_tokens) = request.max_tokens {
        record = record.with_max_tokens(max_tokens);
    }
    if let Some(temperature) = request.temperature {
        record = record.with_temperature(temperature);
    }

    let record = state.provider_store.insert(record).await?;
    info!(provider = %record.provider_id, "Provider created");

    state.registry.reload().await;

    Ok((StatusCode::CREATED, Json(ProviderView::from(record))))
}

/// DELETE /admin/providers/{id}
pub async fn delete_provider(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let removed = state.provider_store.delete(&id).await?;
    if !removed {
        return Err(ApiError::not_found(format!("Provider '{}' not found", id)));
    }

    info!(%id, "Provider deleted");
    state.registry.reload().await;

    Ok(StatusCode::NO_CONTENT)
}

/// PUT /admin/providers/{id}/model
pub async fn update_provider_model(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateProviderModelRequest>,
) -> Result<Json<ProviderView>, ApiError> {
    if request.model.trim().is_empty() {
        return Err(ApiError::bad_request(
            "VALIDATION_ERROR",
            "Model name is required",
        ));
    }

    let record = state
        .provider_store
        .update_model(&id, &request.model)
        .await
        .map_err(|_| ApiError::not_found(format!("Provider '{}' not found", id)))?;

    info!(%id, model = %record.model, "Provider model updated");
    state.registry.reload().await;

    Ok(Json(ProviderView::from(record)))
}

/// POST /admin/providers/reload
pub async fn reload_providers(State(state): State<AppState>) -> StatusCode {
    state.registry.reload().await;
    StatusCode::NO_CONTENT
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;

    use crate::api::state::RecognitionServiceTrait;
    use crate::domain::{DomainError, RecognitionResult};
    use crate::infrastructure::crypto::CredentialCodec;
    use crate::infrastructure::registry::ProviderRegistry;
    use crate::infrastructure::store::{InMemoryProviderStore, InMemorySettingsStore};

    use super::*;

    struct NoopService;

    #[async_trait]
    impl RecognitionServiceTrait for NoopService {
        async fn recognize_with_fallback(
            &self,
            _image_base64: &str,
            _locale: Option<&str>,
        ) -> Result<RecognitionResult, DomainError> {
            Err(DomainError::internal("not under test"))
        }
    }

    fn state() -> AppState {
        let store = Arc::new(InMemoryProviderStore::new());
        let settings = Arc::new(InMemorySettingsStore::new());
        let codec = Arc::new(CredentialCodec::new("0123456789abcdef0123456789abcdef").unwrap());
        let registry = Arc::new(ProviderRegistry::new(
            store.clone(),
            settings.clone(),
            codec.clone(),
            None,
            true,
        ));

        AppState::new(Arc::new(NoopService), store, settings, registry, codec)
    }

    fn create_request(api_key: Option<&str>) -> CreateProviderRequest {
        CreateProviderRequest {
            name: "Backup".to_string(),
            provider_id: "backup".to_string(),
            base_url: "https://backup.test/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            api_key: api_key.map(str::to_string),
            priority: Some(5),
            enabled: None,
            max_tokens: None,
            temperature: None,
        }
    }

    #[tokio::test]
    async fn test_create_encrypts_credential_and_reloads_registry() {
        let state = state();

        let (status, view) =
            create_provider(State(state.clone()), Json(create_request(Some("sk-live"))))
                .await
                .unwrap();

        assert_eq!(status, StatusCode::CREATED);
        assert!(view.has_credential);
        assert_eq!(view.priority, 5);

        // Stored credential is encrypted, not plaintext.
        let stored = &state.provider_store.list().await.unwrap()[0];
        let encrypted = stored.api_key_encrypted.as_deref().unwrap();
        assert!(!encrypted.contains("sk-live"));
        assert_eq!(
            state.credential_codec.decrypt(encrypted).as_deref(),
            Some("sk-live")
        );

        // The new provider is already live in the registry.
        let providers = state.registry.providers().await;
        assert_eq!(providers.len(), 1);
        assert_eq!(providers[0].api_key.as_deref(), Some("sk-live"));
    }

    #[tokio::test]
    async fn test_create_without_credential() {
        let state = state();

        let (_, view) = create_provider(State(state.clone()), Json(create_request(None)))
            .await
            .unwrap();
        assert!(!view.has_credential);
    }

    #[tokio::test]
    async fn test_create_rejects_blank_name() {
        let state = state();
        let mut request = create_request(None);
        request.name = "  ".to_string();

        let error = create_provider(State(state), Json(request)).await.unwrap_err();
        assert_eq!(error.status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_delete_missing_provider_is_404() {
        let state = state();
        let error = delete_provider(State(state), Path(Uuid::new_v4()))
            .await
            .unwrap_err();
        assert_eq!(error.status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_update_model_round_trip() {
        let state = state();
        let (_, view) = create_provider(State(state.clone()), Json(create_request(None)))
            .await
            .unwrap();

        let updated = update_provider_model(
            State(state),
            Path(view.id),
            Json(UpdateProviderModelRequest {
                model: "gpt-4o".to_string(),
            }),
        )
        .await
        .unwrap();

        assert_eq!(updated.model, "gpt-4o");
    }
}

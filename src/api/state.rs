//! Shared application state

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::{DomainError, RecognitionResult};
use crate::infrastructure::crypto::CredentialCodec;
use crate::infrastructure::registry::ProviderRegistry;
use crate::infrastructure::store::{ProviderStore, SettingsStore};

/// Recognition entry point, behind a trait so handlers can be tested with a
/// stub service.
#[async_trait]
pub trait RecognitionServiceTrait: Send + Sync {
    async fn recognize_with_fallback(
        &self,
        image_base64: &str,
        locale: Option<&str>,
    ) -> Result<RecognitionResult, DomainError>;
}

/// Application state shared across all routes
#[derive(Clone)]
pub struct AppState {
    pub recognition_service: Arc<dyn RecognitionServiceTrait>,
    pub provider_store: Arc<dyn ProviderStore>,
    pub settings_store: Arc<dyn SettingsStore>,
    pub registry: Arc<ProviderRegistry>,
    pub credential_codec: Arc<CredentialCodec>,
}

impl AppState {
    pub fn new(
        recognition_service: Arc<dyn RecognitionServiceTrait>,
        provider_store: Arc<dyn ProviderStore>,
        settings_store: Arc<dyn SettingsStore>,
        registry: Arc<ProviderRegistry>,
        credential_codec: Arc<CredentialCodec>,
    ) -> Self {
        Self {
            recognition_service,
            provider_store,
            settings_store,
            registry,
            credential_codec,
        }
    }
}

//! ShelfScan
//!
//! Image-based product recognition service. A single `/v1/recognize`
//! endpoint dispatches the image to a chain of OpenAI-compatible vision
//! providers in priority order, normalizes whatever the first successful
//! provider answers into a canonical item list, and falls back to the next
//! provider on any failure.

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use api::state::AppState;
use infrastructure::crypto::CredentialCodec;
use infrastructure::llm::{HttpClient, VisionClient};
use infrastructure::manager::ProviderManager;
use infrastructure::registry::{PinnedProvider, ProviderRegistry};
use infrastructure::store::{
    AttemptLogStore, InMemoryAttemptLogStore, InMemoryProviderStore, InMemorySettingsStore,
    PostgresAttemptLogStore, PostgresProviderStore, PostgresSettingsStore, ProviderStore,
    SettingsStore, postgres,
};

/// Create the application state with all services initialized
pub async fn create_app_state(config: &AppConfig) -> anyhow::Result<AppState> {
    let codec = Arc::new(CredentialCodec::new(&config.recognition.encryption_key)?);

    let (provider_store, settings_store, attempt_store): (
        Arc<dyn ProviderStore>,
        Arc<dyn SettingsStore>,
        Arc<dyn AttemptLogStore>,
    ) = if config.storage.backend == "postgres" {
        let database_url = config
            .storage
            .database_url
            .clone()
            .or_else(|| std::env::var("DATABASE_URL").ok())
            .ok_or_else(|| {
                anyhow::anyhow!("postgres backend selected but no database URL configured")
            })?;

        info!("Connecting to PostgreSQL...");
        let pool = postgres::connect(&database_url, config.storage.max_connections).await?;

        let providers = PostgresProviderStore::new(pool.clone());
        let settings = PostgresSettingsStore::new(pool.clone());
        let attempts = PostgresAttemptLogStore::new(pool);

        providers.ensure_table().await?;
        settings.ensure_table().await?;
        attempts.ensure_table().await?;
        info!("PostgreSQL storage ready");

        (Arc::new(providers), Arc::new(settings), Arc::new(attempts))
    } else {
        info!("Using in-memory storage");
        (
            Arc::new(InMemoryProviderStore::new()),
            Arc::new(InMemorySettingsStore::new()),
            Arc::new(InMemoryAttemptLogStore::new()),
        )
    };

    let pinned = config.recognition.pinned.as_ref().map(|p| PinnedProvider {
        id: p.id.clone(),
        base_url: p.base_url.clone(),
        model: p.model.clone(),
        api_key: p.api_key.clone(),
        max_tokens: p.max_tokens,
        temperature: p.temperature,
    });

    let registry = Arc::new(ProviderRegistry::new(
        provider_store.clone(),
        settings_store.clone(),
        codec.clone(),
        pinned,
        config.recognition.force_builtin_template,
    ));
    registry.reload().await;

    let manager = ProviderManager::new(
        registry.clone(),
        VisionClient::new(HttpClient::new()),
        attempt_store,
        Duration::from_secs(config.recognition.attempt_timeout_secs),
    );

    Ok(AppState::new(
        Arc::new(manager),
        provider_store,
        settings_store,
        registry,
        codec,
    ))
}

//! Runtime provider registry
//!
//! Builds the ordered provider list the dispatcher walks: the pinned
//! provider first (when configured), then every enabled stored record by
//! ascending priority with its credential decrypted. A reload never fails;
//! a broken store degrades to the pinned-only list so recognition keeps
//! working while storage is down.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::domain::{ProviderConfig, ProviderRecord};

use super::crypto::CredentialCodec;
use super::prompts::PromptCatalog;
use super::store::{ProviderStore, SYSTEM_PROMPT_KEY, SettingsStore};

/// Statically configured provider that always heads the dispatch order.
#[derive(Debug, Clone)]
pub struct PinnedProvider {
    pub id: String,
    pub base_url: String,
    pub model: String,
    pub api_key: Option<String>,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl PinnedProvider {
    fn to_config(&self) -> ProviderConfig {
        ProviderConfig {
            id: self.id.clone(),
            priority: 0,
            enabled: true,
            base_url: self.base_url.clone(),
            model: self.model.clone(),
            api_key: self.api_key.clone(),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        }
    }
}

/// Reloadable snapshot of providers and the instruction override.
pub struct ProviderRegistry {
    store: Arc<dyn ProviderStore>,
    settings: Arc<dyn SettingsStore>,
    codec: Arc<CredentialCodec>,
    pinned: Option<PinnedProvider>,
    force_builtin_template: bool,
    providers: RwLock<Arc<Vec<ProviderConfig>>>,
    instruction_override: RwLock<Option<String>>,
}

impl ProviderRegistry {
    pub fn new(
        store: Arc<dyn ProviderStore>,
        settings: Arc<dyn SettingsStore>,
        codec: Arc<CredentialCodec>,
        pinned: Option<PinnedProvider>,
        force_builtin_template: bool,
    ) -> Self {
        Self {
            store,
            settings,
            codec,
            pinned,
            force_builtin_template,
            providers: RwLock::new(Arc::new(Vec::new())),
            instruction_override: RwLock::new(None),
        }
    }

    /// Rebuild the provider snapshot from storage.
    ///
    /// Store failures are logged and degrade to the pinned-only list rather
    /// than surfacing an error.
    pub async fn reload(&self) {
        let records = match self.store.list_enabled().await {
            Ok(records) => records,
            Err(e) => {
                warn!(error = %e, "Provider store unavailable, keeping pinned provider only");
                Vec::new()
            }
        };

        let mut configs: Vec<ProviderConfig> = Vec::with_capacity(records.len() + 1);
        if let Some(pinned) = &self.pinned {
            configs.push(pinned.to_config());
        }

        let mut sorted = records;
        sorted.sort_by_key(|r| r.priority);
        for record in &sorted {
            configs.push(self.record_to_config(record));
        }

        info!(providers = configs.len(), "Provider registry reloaded");
        *self.providers.write().await = Arc::new(configs);

        self.reload_instruction_override().await;
    }

    async fn reload_instruction_override(&self) {
        let stored = match self.settings.get(SYSTEM_PROMPT_KEY).await {
            Ok(value) => value.filter(|v| !v.trim().is_empty()),
            Err(e) => {
                warn!(error = %e, "Settings store unavailable, keeping builtin templates");
                None
            }
        };

        if stored.is_some() && self.force_builtin_template {
            info!("Configured instruction override present but builtin templates are forced");
        }

        *self.instruction_override.write().await = stored;
    }

    fn record_to_config(&self, record: &ProviderRecord) -> ProviderConfig {
        let api_key = record.api_key_encrypted.as_deref().and_then(|encrypted| {
            let decrypted = self.codec.decrypt(encrypted);
            if decrypted.is_none() {
                warn!(
                    provider = %record.provider_id,
                    "Credential decryption failed, provider will be skipped at dispatch"
                );
            }
            decrypted
        });

        ProviderConfig {
            id: record.provider_id.clone(),
            priority: record.priority,
            enabled: record.enabled,
            base_url: record.base_url.clone(),
            model: record.model.clone(),
            api_key,
            max_tokens: record.max_tokens,
            temperature: record.temperature,
        }
    }

    /// Current provider snapshot, loading lazily on first use.
    pub async fn providers(&self) -> Arc<Vec<ProviderConfig>> {
        {
            let providers = self.providers.read().await;
            if !providers.is_empty() {
                return providers.clone();
            }
        }

        debug!("Provider snapshot empty, reloading");
        self.reload().await;
        self.providers.read().await.clone()
    }

    /// System instruction for a recognition request.
    ///
    /// The stored override wins only when builtin templates are not forced;
    /// otherwise the locale-selected template is used.
    pub async fn instruction(&self, locale: Option<&str>) -> String {
        if !self.force_builtin_template {
            if let Some(custom) = self.instruction_override.read().await.clone() {
                return custom;
            }
        }

        PromptCatalog::instruction(locale).to_string()
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use uuid::Uuid;

    use crate::domain::DomainError;
    use crate::infrastructure::store::{InMemoryProviderStore, InMemorySettingsStore};

    use super::*;

    fn codec() -> Arc<CredentialCodec> {
        Arc::new(CredentialCodec::new("0123456789abcdef0123456789abcdef").unwrap())
    }

    fn pinned() -> PinnedProvider {
        PinnedProvider {
            id: "glm-4v-flash".to_string(),
            base_url: "https://open.bigmodel.cn/api/paas/v4".to_string(),
            model: "glm-4v-flash".to_string(),
            api_key: Some("pinned-key".to_string()),
            max_tokens: 1000,
            temperature: 0.1,
        }
    }

    struct FailingProviderStore;

    #[async_trait]
    impl ProviderStore for FailingProviderStore {
        async fn list_enabled(&self) -> Result<Vec<ProviderRecord>, DomainError> {
            Err(DomainError::storage("connection refused"))
        }

        async fn list(&self) -> Result<Vec<ProviderRecord>, DomainError> {
            Err(DomainError::storage("connection refused"))
        }

        async fn insert(&self, _record: ProviderRecord) -> Result<ProviderRecord, DomainError> {
            Err(DomainError::storage("connection refused"))
        }

        async fn delete(&self, _id: &Uuid) -> Result<bool, DomainError> {
            Err(DomainError::storage("connection refused"))
        }

        async fn update_model(
            &self,
            _id: &Uuid,
            _model: &str,
        ) -> Result<ProviderRecord, DomainError> {
            Err(DomainError::storage("connection refused"))
        }
    }

    #[tokio::test]
    async fn test_pinned_provider_heads_the_list() {
        let codec = codec();
        let key = codec.encrypt("stored-key");
        let store = Arc::new(InMemoryProviderStore::with_records(vec![
            ProviderRecord::new("backup", "Backup", "https://backup.test/v1", "m")
                .with_priority(1)
                .with_encrypted_key(&key),
            ProviderRecord::new("primary", "Primary", "https://primary.test/v1", "m")
                .with_priority(-5)
                .with_encrypted_key(&key),
        ]));

        let registry = ProviderRegistry::new(
            store,
            Arc::new(InMemorySettingsStore::new()),
            codec,
            Some(pinned()),
            true,
        );
        registry.reload().await;

        let providers = registry.providers().await;
        let ids: Vec<&str> = providers.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["glm-4v-flash", "primary", "backup"]);
        assert_eq!(providers[1].api_key.as_deref(), Some("stored-key"));
    }

    #[tokio::test]
    async fn test_store_failure_degrades_to_pinned_only() {
        let registry = ProviderRegistry::new(
            Arc::new(FailingProviderStore),
            Arc::new(InMemorySettingsStore::new()),
            codec(),
            Some(pinned()),
            true,
        );
        registry.reload().await;

        let providers = registry.providers().await;
        assert_eq!(providers.len(), 1);
        assert_eq!(providers[0].id, "glm-4v-flash");
    }

    #[tokio::test]
    async fn test_undecryptable_credential_keeps_provider_without_key() {
        let store = Arc::new(InMemoryProviderStore::with_records(vec![
            ProviderRecord::new("broken", "Broken", "https://broken.test", "m")
                .with_encrypted_key("not-a-valid-token"),
        ]));

        let registry = ProviderRegistry::new(
            store,
            Arc::new(InMemorySettingsStore::new()),
            codec(),
            None,
            true,
        );
        registry.reload().await;

        let providers = registry.providers().await;
        assert_eq!(providers.len(), 1);
        assert!(providers[0].api_key.is_none());
        assert!(!providers[0].has_usable_credential());
    }

    #[tokio::test]
    async fn test_lazy_load_on_first_access() {
        let store = Arc::new(InMemoryProviderStore::with_records(vec![
            ProviderRecord::new("p1", "P1", "https://p1.test", "m"),
        ]));

        let registry = ProviderRegistry::new(
            store,
            Arc::new(InMemorySettingsStore::new()),
            codec(),
            None,
            true,
        );

        // No explicit reload; first read must populate the snapshot.
        let providers = registry.providers().await;
        assert_eq!(providers.len(), 1);
        assert_eq!(providers[0].id, "p1");
    }

    #[tokio::test]
    async fn test_instruction_override_suppressed_when_builtin_forced() {
        let settings = Arc::new(InMemorySettingsStore::new());
        settings.set(SYSTEM_PROMPT_KEY, "custom prompt").await.unwrap();

        let registry = ProviderRegistry::new(
            Arc::new(InMemoryProviderStore::new()),
            settings,
            codec(),
            None,
            true,
        );
        registry.reload().await;

        assert_eq!(
            registry.instruction(Some("en")).await,
            PromptCatalog::instruction(Some("en"))
        );
    }

    #[tokio::test]
    async fn test_instruction_override_honored_when_not_forced() {
        let settings = Arc::new(InMemorySettingsStore::new());
        settings.set(SYSTEM_PROMPT_KEY, "custom prompt").await.unwrap();

        let registry = ProviderRegistry::new(
            Arc::new(InMemoryProviderStore::new()),
            settings,
            codec(),
            None,
            false,
        );
        registry.reload().await;

        assert_eq!(registry.instruction(Some("en")).await, "custom prompt");
        assert_eq!(registry.instruction(None).await, "custom prompt");
    }
}

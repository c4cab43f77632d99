//! Provider records and runtime configuration

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Persisted provider record.
///
/// The credential is stored encrypted as `ivHex:cipherHex` and is only
/// decrypted transiently when the registry builds the runtime provider list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderRecord {
    pub id: Uuid,
    pub name: String,
    pub provider_id: String,
    pub base_url: String,
    pub model: String,
    pub api_key_encrypted: Option<String>,
    pub priority: i32,
    pub enabled: bool,
    pub max_tokens: u32,
    pub temperature: f32,
    pub created_at: DateTime<Utc>,
}

impl ProviderRecord {
    pub fn new(
        provider_id: impl Into<String>,
        name: impl Into<String>,
        base_url: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            provider_id: provider_id.into(),
            base_url: base_url.into(),
            model: model.into(),
            api_key_encrypted: None,
            priority: 10,
            enabled: true,
            max_tokens: 1000,
            temperature: 0.1,
            created_at: Utc::now(),
        }
    }

    pub fn with_encrypted_key(mut self, encrypted: impl Into<String>) -> Self {
        self.api_key_encrypted = Some(encrypted.into());
        self
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }
}

/// Runtime provider configuration after credential decryption.
///
/// `api_key: None` means the record had no credential or decryption failed;
/// the provider stays in the list but is skipped at dispatch time.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub id: String,
    pub priority: i32,
    pub enabled: bool,
    pub base_url: String,
    pub model: String,
    pub api_key: Option<String>,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl ProviderConfig {
    pub fn has_usable_credential(&self) -> bool {
        self.api_key.as_deref().is_some_and(|key| !key.is_empty())
    }

    pub fn chat_completions_url(&self) -> String {
        format!(
            "{}/chat/completions",
            self.base_url.trim_end_matches('/')
        )
    }
}

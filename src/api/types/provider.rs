//! Admin provider management types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::ProviderRecord;

/// Provider record as exposed over the admin API.
///
/// The encrypted credential never leaves the service; only its presence is
/// reported.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderView {
    pub id: Uuid,
    pub name: String,
    pub provider_id: String,
    pub base_url: String,
    pub model: String,
    pub has_credential: bool,
    pub priority: i32,
    pub enabled: bool,
    pub max_tokens: u32,
    pub temperature: f32,
    pub created_at: DateTime<Utc>,
}

impl From<ProviderRecord> for ProviderView {
    fn from(record: ProviderRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            provider_id: record.provider_id,
            base_url: record.base_url,
            model: record.model,
            has_credential: record.api_key_encrypted.is_some(),
            priority: record.priority,
            enabled: record.enabled,
            max_tokens: record.max_tokens,
            temperature: record.temperature,
            created_at: record.created_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProviderRequest {
    pub name: String,
    pub provider_id: String,
    pub base_url: String,
    pub model: String,
    /// Plaintext credential, encrypted before persistence.
    pub api_key: Option<String>,
    pub priority: Option<i32>,
    pub enabled: Option<bool>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateProviderModelRequest {
    pub model: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_hides_credential() {
        let record = ProviderRecord::new("glm-4v", "GLM-4V", "https://api.test", "glm-4v-flash")
            .with_encrypted_key("aa:bb");
        let view = ProviderView::from(record);

        assert!(view.has_credential);
        let json = serde_json::to_string(&view).unwrap();
        assert!(!json.contains("aa:bb"));
        assert!(json.contains("\"hasCredential\":true"));
    }

    #[test]
    fn test_create_request_optional_fields() {
        let request: CreateProviderRequest = serde_json::from_str(
            r#"{
                "name": "Backup",
                "providerId": "backup",
                "baseUrl": "https://backup.test/v1",
                "model": "gpt-4o-mini"
            }"#,
        )
        .unwrap();

        assert!(request.api_key.is_none());
        assert!(request.priority.is_none());
        assert!(request.enabled.is_none());
    }
}

//! Recognition results and attempt audit records

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A single recognized product item, normalized from model output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecognitionItem {
    pub name: String,
    /// Open category string; models are steered towards a recommended set
    /// but any value is accepted.
    pub category: String,
    pub expiry_date: Option<NaiveDate>,
    pub production_date: Option<NaiveDate>,
    pub shelf_life_days: Option<u32>,
    pub quantity: u32,
}

/// Outcome of a successful recognition pass.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecognitionResult {
    pub items: Vec<RecognitionItem>,
    pub confidence: f32,
    /// Id of the provider that produced the result.
    pub provider: String,
    /// Provider ids in the order they were attempted, winner included.
    pub attempted_providers: Vec<String>,
    pub processed_at: DateTime<Utc>,
}

/// Append-only audit record for a single provider attempt.
///
/// Advisory only: persistence failures must never affect the recognition
/// outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttemptLog {
    pub provider_id: String,
    pub success: bool,
    pub error_message: Option<String>,
    pub response_time_ms: u64,
}

impl AttemptLog {
    pub fn success(provider_id: impl Into<String>, response_time_ms: u64) -> Self {
        Self {
            provider_id: provider_id.into(),
            success: true,
            error_message: None,
            response_time_ms,
        }
    }

    pub fn failure(
        provider_id: impl Into<String>,
        error_message: impl Into<String>,
        response_time_ms: u64,
    ) -> Self {
        Self {
            provider_id: provider_id.into(),
            success: false,
            error_message: Some(error_message.into()),
            response_time_ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_serializes_camel_case() {
        let item = RecognitionItem {
            name: "可口可乐".to_string(),
            category: "饮料".to_string(),
            expiry_date: NaiveDate::from_ymd_opt(2025, 12, 31),
            production_date: None,
            shelf_life_days: Some(365),
            quantity: 2,
        };

        let json = serde_json::to_string(&item).unwrap();
        assert!(json.contains("\"expiryDate\":\"2025-12-31\""));
        assert!(json.contains("\"shelfLifeDays\":365"));
        assert!(json.contains("\"productionDate\":null"));
        assert!(json.contains("\"quantity\":2"));
    }

    #[test]
    fn test_attempt_log_constructors() {
        let ok = AttemptLog::success("glm-4v", 812);
        assert!(ok.success);
        assert!(ok.error_message.is_none());

        let failed = AttemptLog::failure("gpt-4o", "HTTP 429", 120);
        assert!(!failed.success);
        assert_eq!(failed.error_message.as_deref(), Some("HTTP 429"));
    }
}

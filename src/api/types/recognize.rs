//! Recognition request/response types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{RecognitionItem, RecognitionResult};

/// POST /v1/recognize request body
#[derive(Debug, Clone, Deserialize)]
pub struct RecognizeRequest {
    /// Base64-encoded image, without a data-URL prefix.
    #[serde(default)]
    pub image: String,
    /// BCP 47 tag picking the prompt template, e.g. `en-US`.
    pub locale: Option<String>,
}

/// Successful recognition response
#[derive(Debug, Clone, Serialize)]
pub struct RecognizeResponse {
    pub success: bool,
    pub data: RecognizeData,
    pub metadata: RecognizeMetadata,
}

#[derive(Debug, Clone, Serialize)]
pub struct RecognizeData {
    pub items: Vec<RecognitionItem>,
    pub confidence: f32,
    pub provider: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecognizeMetadata {
    pub attempted_providers: Vec<String>,
    pub processed_at: DateTime<Utc>,
}

impl From<RecognitionResult> for RecognizeResponse {
    fn from(result: RecognitionResult) -> Self {
        Self {
            success: true,
            data: RecognizeData {
                items: result.items,
                confidence: result.confidence,
                provider: result.provider,
            },
            metadata: RecognizeMetadata {
                attempted_providers: result.attempted_providers,
                processed_at: result.processed_at,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_deserializes_without_locale() {
        let request: RecognizeRequest =
            serde_json::from_str(r#"{"image": "AAAA"}"#).unwrap();
        assert_eq!(request.image, "AAAA");
        assert!(request.locale.is_none());
    }

    #[test]
    fn test_response_serialization_shape() {
        let result = RecognitionResult {
            items: vec![RecognitionItem {
                name: "Coke".to_string(),
                category: "Beverage".to_string(),
                expiry_date: None,
                production_date: None,
                shelf_life_days: Some(365),
                quantity: 2,
            }],
            confidence: 0.85,
            provider: "glm-4v".to_string(),
            attempted_providers: vec!["glm-4v".to_string()],
            processed_at: Utc::now(),
        };

        let json = serde_json::to_value(RecognizeResponse::from(result)).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["data"]["provider"], "glm-4v");
        assert_eq!(json["data"]["items"][0]["shelfLifeDays"], 365);
        assert_eq!(json["metadata"]["attemptedProviders"][0], "glm-4v");
        assert!(json["metadata"]["processedAt"].is_string());
    }
}

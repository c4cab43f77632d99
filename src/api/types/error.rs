//! API error envelope

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::domain::DomainError;

/// Error response body
///
/// `success` is always false; clients branch on it before reading `error`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    pub success: bool,
    pub error: ApiErrorDetail,
}

/// Error detail structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attempted_providers: Option<Vec<String>>,
}

/// API error with status code
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub response: ApiErrorResponse,
}

impl ApiError {
    pub fn new(status: StatusCode, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status,
            response: ApiErrorResponse {
                success: false,
                error: ApiErrorDetail {
                    code: code.into(),
                    message: message.into(),
                    details: None,
                    attempted_providers: None,
                },
            },
        }
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.response.error.details = Some(details);
        self
    }

    pub fn with_attempted_providers(mut self, attempted: Vec<String>) -> Self {
        self.response.error.attempted_providers = Some(attempted);
        self
    }

    pub fn bad_request(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, code, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, "NOT_FOUND", message)
    }

    pub fn bad_gateway(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_GATEWAY, code, message)
    }

    pub fn internal(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, code, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.response)).into_response()
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation { message } => {
                Self::bad_request("VALIDATION_ERROR", message)
            }
            DomainError::AllProvidersFailed { errors, attempted } => {
                let details: Value = Value::Object(
                    errors
                        .into_iter()
                        .map(|(provider, message)| (provider, json!(message)))
                        .collect(),
                );

                Self::bad_gateway(
                    "ALL_PROVIDERS_FAILED",
                    "All recognition providers failed",
                )
                .with_details(details)
                .with_attempted_providers(attempted)
            }
            DomainError::Provider { provider, message } => {
                Self::bad_gateway("UPSTREAM_ERROR", format!("{}: {}", provider, message))
            }
            DomainError::UpstreamFormat { message } => {
                Self::bad_gateway("UPSTREAM_ERROR", message)
            }
            DomainError::Configuration { message } => {
                Self::internal("CONFIGURATION_ERROR", message)
            }
            DomainError::Storage { message } => Self::internal("STORAGE_ERROR", message),
            DomainError::Credential { message } | DomainError::Internal { message } => {
                Self::internal("INTERNAL_ERROR", message)
            }
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {}",
            self.response.error.code, self.response.error.message
        )
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_creation() {
        let err = ApiError::bad_request("MISSING_IMAGE", "Image field is required");
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.response.error.code, "MISSING_IMAGE");
        assert!(!err.response.success);
    }

    #[test]
    fn test_all_providers_failed_maps_to_502_with_details() {
        let err: ApiError = DomainError::AllProvidersFailed {
            errors: vec![
                ("glm-4v".to_string(), "timeout".to_string()),
                ("backup".to_string(), "bad json".to_string()),
            ],
            attempted: vec!["glm-4v".to_string(), "backup".to_string()],
        }
        .into();

        assert_eq!(err.status, StatusCode::BAD_GATEWAY);
        assert_eq!(err.response.error.code, "ALL_PROVIDERS_FAILED");
        assert_eq!(
            err.response.error.attempted_providers,
            Some(vec!["glm-4v".to_string(), "backup".to_string()])
        );

        let details = err.response.error.details.unwrap();
        assert_eq!(details["glm-4v"], "timeout");
        assert_eq!(details["backup"], "bad json");
    }

    #[test]
    fn test_validation_error_maps_to_400() {
        let err: ApiError = DomainError::validation("bad input").into();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.response.error.code, "VALIDATION_ERROR");
    }

    #[test]
    fn test_serialization_uses_camel_case_and_omits_empty_fields() {
        let err = ApiError::bad_request("MISSING_IMAGE", "Image field is required");
        let json = serde_json::to_string(&err.response).unwrap();

        assert!(json.contains("\"success\":false"));
        assert!(json.contains("\"code\":\"MISSING_IMAGE\""));
        assert!(!json.contains("details"));
        assert!(!json.contains("attemptedProviders"));

        let err = err.with_attempted_providers(vec!["a".to_string()]);
        let json = serde_json::to_string(&err.response).unwrap();
        assert!(json.contains("\"attemptedProviders\":[\"a\"]"));
    }
}

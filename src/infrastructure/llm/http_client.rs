//! HTTP client abstraction for upstream provider calls

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::DomainError;

/// Trait for HTTP operations against provider endpoints.
///
/// The seam exists so the dispatch path can be exercised in tests without a
/// network.
#[async_trait]
pub trait HttpClientTrait: Send + Sync {
    /// POST a JSON body and return the parsed JSON response.
    async fn post_json(
        &self,
        url: &str,
        headers: Vec<(String, String)>,
        body: &Value,
    ) -> Result<Value, DomainError>;
}

/// Real HTTP client implementation using reqwest
#[derive(Debug, Clone, Default)]
pub struct HttpClient {
    client: reqwest::Client,
}

impl HttpClient {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl HttpClientTrait for HttpClient {
    async fn post_json(
        &self,
        url: &str,
        headers: Vec<(String, String)>,
        body: &Value,
    ) -> Result<Value, DomainError> {
        let mut request = self.client.post(url).json(body);
        for (name, value) in &headers {
            request = request.header(name, value);
        }

        let response = request
            .send()
            .await
            .map_err(|e| DomainError::provider("http", format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(DomainError::provider(
                "http",
                format!("HTTP {}: {}", status.as_u16(), text),
            ));
        }

        response
            .json()
            .await
            .map_err(|e| DomainError::provider("http", format!("Invalid JSON response: {}", e)))
    }
}

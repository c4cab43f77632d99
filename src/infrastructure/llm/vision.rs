//! OpenAI-compatible chat-completions client for vision models
//!
//! Every supported provider speaks the same wire dialect: POST to
//! `{base_url}/chat/completions` with a model name, a message list and
//! sampling parameters, Bearer auth, and a `choices[0].message.content`
//! answer.

use serde::Deserialize;
use serde_json::{Value, json};

use crate::domain::{ContentPart, DomainError, Message, ProviderConfig};

use super::http_client::HttpClientTrait;

/// Chat-completions client generic over the HTTP transport.
pub struct VisionClient<C: HttpClientTrait> {
    pub(crate) client: C,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

impl<C: HttpClientTrait> VisionClient<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    /// Send a completion request and return the assistant message content.
    pub async fn complete(
        &self,
        provider: &ProviderConfig,
        messages: &[Message],
    ) -> Result<String, DomainError> {
        let body = json!({
            "model": provider.model,
            "messages": to_wire(messages),
            "max_tokens": provider.max_tokens,
            "temperature": provider.temperature,
        });

        let mut headers = vec![("Content-Type".to_string(), "application/json".to_string())];
        if let Some(key) = provider.api_key.as_deref() {
            headers.push(("Authorization".to_string(), format!("Bearer {}", key)));
        }

        let response = self
            .client
            .post_json(&provider.chat_completions_url(), headers, &body)
            .await?;

        let parsed: ChatResponse = serde_json::from_value(response).map_err(|e| {
            DomainError::provider(&provider.id, format!("Unexpected response shape: {}", e))
        })?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| DomainError::provider(&provider.id, "No choices in response"))
    }
}

fn to_wire(messages: &[Message]) -> Value {
    Value::Array(messages.iter().map(message_to_wire).collect())
}

fn message_to_wire(message: &Message) -> Value {
    let parts = message.content_parts();
    if parts.is_empty() {
        return json!({
            "role": message.role,
            "content": message.content_text().unwrap_or_default(),
        });
    }

    let content: Vec<Value> = parts
        .into_iter()
        .map(|part| match part {
            ContentPart::Text { text } => json!({"type": "text", "text": text}),
            ContentPart::ImageUrl { url } => {
                json!({"type": "image_url", "image_url": {"url": url}})
            }
        })
        .collect();

    json!({"role": message.role, "content": content})
}

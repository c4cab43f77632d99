//! Provider fallback dispatch
//!
//! Walks the registry's ordered provider list and returns the first
//! successfully normalized recognition result. Providers without a usable
//! credential are skipped silently; every real attempt is recorded in the
//! audit log off the request path.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::Utc;
use tracing::{debug, info, warn};

use crate::api::state::RecognitionServiceTrait;
use crate::domain::{
    AttemptLog, ContentPart, DomainError, Message, ProviderConfig, RecognitionItem,
    RecognitionResult,
};

use super::llm::{HttpClientTrait, VisionClient};
use super::normalizer::{self, DEFAULT_CONFIDENCE};
use super::prompts::PromptCatalog;
use super::registry::ProviderRegistry;
use super::store::AttemptLogStore;

/// Orchestrates recognition across providers with ordered fallback.
pub struct ProviderManager<C: HttpClientTrait> {
    registry: Arc<ProviderRegistry>,
    client: VisionClient<C>,
    audit: Arc<dyn AttemptLogStore>,
    attempt_timeout: Duration,
}

impl<C: HttpClientTrait> ProviderManager<C> {
    pub fn new(
        registry: Arc<ProviderRegistry>,
        client: VisionClient<C>,
        audit: Arc<dyn AttemptLogStore>,
        attempt_timeout: Duration,
    ) -> Self {
        Self {
            registry,
            client,
            audit,
            attempt_timeout,
        }
    }

    /// Try each provider in order until one yields a normalized result.
    pub async fn recognize_with_fallback(
        &self,
        image_base64: &str,
        locale: Option<&str>,
    ) -> Result<RecognitionResult, DomainError> {
        let providers = self.registry.providers().await;
        let instruction = self.registry.instruction(locale).await;
        let user_prompt = PromptCatalog::user_prompt(locale);
        let fallback_category = PromptCatalog::fallback_category(locale);
        let today = Utc::now().date_naive();

        let messages = vec![
            Message::system(instruction),
            Message::user_with_parts(vec![
                ContentPart::Text {
                    text: user_prompt.to_string(),
                },
                ContentPart::ImageUrl {
                    url: format!("data:image/jpeg;base64,{}", image_base64),
                },
            ]),
        ];

        let mut attempted: Vec<String> = Vec::new();
        let mut errors: Vec<(String, String)> = Vec::new();

        for provider in providers.iter() {
            if !provider.has_usable_credential() {
                debug!(provider = %provider.id, "Skipping provider without usable credential");
                continue;
            }

            attempted.push(provider.id.clone());
            let started = Instant::now();

            match self.attempt(provider, &messages, fallback_category, today).await {
                Ok(items) => {
                    let elapsed_ms = started.elapsed().as_millis() as u64;
                    info!(
                        provider = %provider.id,
                        items = items.len(),
                        elapsed_ms,
                        "Recognition succeeded"
                    );
                    self.audit_attempt(AttemptLog::success(&provider.id, elapsed_ms));

                    return Ok(RecognitionResult {
                        items,
                        confidence: DEFAULT_CONFIDENCE,
                        provider: provider.id.clone(),
                        attempted_providers: attempted,
                        processed_at: Utc::now(),
                    });
                }
                Err(e) => {
                    let elapsed_ms = started.elapsed().as_millis() as u64;
                    warn!(provider = %provider.id, error = %e, elapsed_ms, "Provider attempt failed");
                    self.audit_attempt(AttemptLog::failure(&provider.id, e.to_string(), elapsed_ms));
                    errors.push((provider.id.clone(), e.to_string()));
                }
            }
        }

        Err(DomainError::AllProvidersFailed { errors, attempted })
    }

    async fn attempt(
        &self,
        provider: &ProviderConfig,
        messages: &[Message],
        fallback_category: &str,
        today: chrono::NaiveDate,
    ) -> Result<Vec<RecognitionItem>, DomainError> {
        let content = tokio::time::timeout(self.attempt_timeout, self.client.complete(provider, messages))
            .await
            .map_err(|_| {
                DomainError::provider(
                    &provider.id,
                    format!("Attempt timed out after {:?}", self.attempt_timeout),
                )
            })??;

        normalizer::normalize(&content, fallback_category, today)
    }

    /// Audit writes happen off the request path; a broken log store must
    /// never affect recognition.
    fn audit_attempt(&self, entry: AttemptLog) {
        let audit = self.audit.clone();
        tokio::spawn(async move {
            if let Err(e) = audit.append(entry).await {
                debug!(error = %e, "Failed to record provider attempt");
            }
        });
    }
}

#[async_trait]
impl<C: HttpClientTrait> RecognitionServiceTrait for ProviderManager<C> {
    async fn recognize_with_fallback(
        &self,
        image_base64: &str,
        locale: Option<&str>,
    ) -> Result<RecognitionResult, DomainError> {
        ProviderManager::recognize_with_fallback(self, image_base64, locale).await
    }
}

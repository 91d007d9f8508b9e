use reqwest::Client;
use std::time::{Duration, Instant};
use tracing::{debug, error, info};

use super::types::{ChatCompletionRequest, ChatCompletionResponse, ProviderErrorEnvelope};
use crate::config::{ProviderConfig, RequestConfig};
use crate::error::{ProviderError, ProviderResult};

/// Client for an OpenAI-compatible chat-completion endpoint
///
/// Each call is a single attempt; the provider is metered, so nothing here
/// retries on its own.
#[derive(Clone)]
pub struct ProviderClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    request_config: RequestConfig,
}

impl ProviderClient {
    /// Create a new provider client
    pub fn new(config: &ProviderConfig, request_config: RequestConfig) -> ProviderResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(request_config.timeout_ms))
            .build()
            .map_err(ProviderError::Http)?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            request_config,
        })
    }

    /// Whether a credential is configured
    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }

    /// Get the base URL (for testing)
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Send one chat-completion request
    pub async fn chat_completion(
        &self,
        request: &ChatCompletionRequest,
    ) -> ProviderResult<ChatCompletionResponse> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(ProviderError::MissingCredential)?;
        let url = format!("{}/v1/chat/completions", self.base_url);

        debug!(
            model = %request.model,
            messages = request.messages.len(),
            "Calling chat completion"
        );

        let start = Instant::now();
        let result = self.execute_request(&url, api_key, request).await;
        let latency = start.elapsed();

        match &result {
            Ok(response) => info!(
                model = %request.model,
                choices = response.choices.len(),
                total_tokens = ?response.usage.as_ref().and_then(|u| u.total_tokens),
                latency_ms = latency.as_millis(),
                "Chat completion succeeded"
            ),
            Err(e) => error!(
                model = %request.model,
                error = %e,
                latency_ms = latency.as_millis(),
                "Chat completion failed"
            ),
        }

        result
    }

    async fn execute_request(
        &self,
        url: &str,
        api_key: &str,
        request: &ChatCompletionRequest,
    ) -> ProviderResult<ChatCompletionResponse> {
        let response = self
            .client
            .post(url)
            .header("Authorization", format!("Bearer {}", api_key))
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::Timeout {
                        timeout_ms: self.request_config.timeout_ms,
                    }
                } else {
                    ProviderError::Http(e)
                }
            })?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let envelope = ProviderErrorEnvelope::parse(&body);
            return Err(ProviderError::Api {
                status: status.as_u16(),
                message: envelope.message().unwrap_or("未知错误").to_string(),
                code: envelope.code(),
            });
        }

        let body = response.text().await.map_err(ProviderError::Http)?;
        serde_json::from_str(&body).map_err(|e| ProviderError::InvalidEnvelope {
            message: format!("Failed to parse completion envelope: {}", e),
        })
    }
}

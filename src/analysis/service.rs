use std::time::Instant;
use tracing::{debug, info, warn};

use super::types::AnalysisResult;
use super::validation::{validate_analysis, validate_input};
use crate::config::{Config, GenerationConfig};
use crate::error::{AnalyzeError, AnalyzeResult};
use crate::prompts::{system_prompt, user_prompt};
use crate::provider::{ChatCompletionRequest, Message, ProviderClient};

/// Turns one sentence into a validated [`AnalysisResult`].
///
/// One provider call per invocation. Invalid input never reaches the network.
#[derive(Clone)]
pub struct AnalysisService {
    client: ProviderClient,
    model: String,
    generation: GenerationConfig,
}

impl AnalysisService {
    pub fn new(client: ProviderClient, config: &Config) -> Self {
        Self {
            client,
            model: config.provider.model.clone(),
            generation: config.generation.clone(),
        }
    }

    /// Build the chat-completion request for `input`.
    pub fn build_request(&self, input: &str) -> ChatCompletionRequest {
        let messages = vec![Message::system(system_prompt()), Message::user(user_prompt(input))];

        ChatCompletionRequest::new(&self.model, messages)
            .with_json_output()
            .with_temperature(self.generation.temperature)
            .with_max_tokens(self.generation.max_tokens)
    }

    /// Analyze one sentence.
    pub async fn analyze(&self, input: &str) -> AnalyzeResult<AnalysisResult> {
        let start = Instant::now();

        validate_input(input).map_err(AnalyzeError::Validation)?;

        let request = self.build_request(input);
        let response = self.client.chat_completion(&request).await?;

        let content = response.first_content().ok_or_else(|| {
            warn!("Provider returned no message content");
            AnalyzeError::EmptyResponse
        })?;

        let value = parse_completion(content)?;

        let result = validate_analysis(&value).map_err(|errors| {
            warn!(
                issues = errors.len(),
                details = %errors,
                "Provider reply violated the analysis schema"
            );
            AnalyzeError::ResponseShape(errors)
        })?;

        info!(
            sentence_type = %result.sentence_type,
            nodes = result.logic_graph.nodes.len(),
            edges = result.logic_graph.edges.len(),
            latency_ms = start.elapsed().as_millis(),
            "Analysis completed"
        );

        Ok(result)
    }
}

/// Parse completion content as JSON. Content that is already JSON of any
/// shape is returned as is and left to the validator; otherwise a fenced
/// block is tried.
pub(crate) fn parse_completion(content: &str) -> AnalyzeResult<serde_json::Value> {
    if let Ok(value) = serde_json::from_str(content.trim()) {
        return Ok(value);
    }

    let json = extract_json(content).map_err(|message| AnalyzeError::Internal { message })?;
    serde_json::from_str(json).map_err(|e| AnalyzeError::Internal {
        message: format!("Failed to parse analysis JSON: {}", e),
    })
}

/// Locate the JSON object in a completion, tolerating markdown fences some
/// models wrap around it even in JSON mode.
pub(crate) fn extract_json(completion: &str) -> Result<&str, String> {
    let trimmed = completion.trim();
    if trimmed.starts_with('{') {
        return Ok(trimmed);
    }

    let fenced = if let Some(rest) = completion.split("```json").nth(1) {
        rest.split("```").next()
    } else {
        completion.split("```").nth(1)
    };

    match fenced.map(str::trim).filter(|s| !s.is_empty()) {
        Some(block) => {
            debug!("Extracted JSON from fenced block");
            Ok(block)
        }
        None => Err(format!(
            "No JSON found in completion. First 100 chars: '{}'",
            completion.chars().take(100).collect::<String>()
        )),
    }
}

//! OpenAI-compatible chat completions over a blocking HTTP client.

use crate::prompt::{self, ChatMessage};
use crate::{GeneratorConfig, ServiceError};
use serde::{Deserialize, Serialize};

/// Turns one function's source into unit-test source.
pub trait TestGenerator {
    fn generate_test(&self, function_name: &str, function_source: &str)
    -> Result<String, ServiceError>;
}

/// Produces a prose review of a diff.
pub trait DiffAnalyzer {
    fn analyze_diff(&self, diff: &str) -> Result<String, ServiceError>;
}

/// Names that are empty or contain whitespace are never sent to the service.
pub fn is_valid_function_name(name: &str) -> bool {
    !name.is_empty() && !name.chars().any(char::is_whitespace)
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: AssistantMessage,
}

#[derive(Debug, Deserialize)]
struct AssistantMessage {
    #[serde(default)]
    content: Option<String>,
}

/// HTTP client for chat completions.
pub struct OpenAiClient {
    http: reqwest::blocking::Client,
    config: GeneratorConfig,
}

impl OpenAiClient {
    pub fn new(config: GeneratorConfig) -> Result<Self, ServiceError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(config.timeout)
            .build()?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Send one chat request and return the first choice's content.
    pub fn complete(&self, messages: &[ChatMessage]) -> Result<String, ServiceError> {
        let body = ChatCompletionRequest {
            model: &self.config.model,
            messages,
        };
        let url = self.config.completions_url();
        tracing::debug!(%url, model = %self.config.model, "sending chat completion");

        let res = self
            .http
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()?;
        let status = res.status().as_u16();
        let text = res.text()?;
        parse_response(status, &text)
    }
}

impl TestGenerator for OpenAiClient {
    fn generate_test(
        &self,
        function_name: &str,
        function_source: &str,
    ) -> Result<String, ServiceError> {
        if !is_valid_function_name(function_name) {
            return Err(ServiceError::InvalidName(function_name.to_string()));
        }
        tracing::info!(function = function_name, "generating test");
        self.complete(&prompt::test_messages(function_source))
    }
}

impl DiffAnalyzer for OpenAiClient {
    fn analyze_diff(&self, diff: &str) -> Result<String, ServiceError> {
        tracing::info!(bytes = diff.len(), "analyzing diff");
        self.complete(&prompt::analysis_messages(diff))
    }
}

fn parse_response(status: u16, body: &str) -> Result<String, ServiceError> {
    if !(200..300).contains(&status) {
        return Err(ServiceError::Api {
            status,
            body: body.to_string(),
        });
    }
    let parsed: ChatCompletionResponse =
        serde_json::from_str(body).map_err(|e| ServiceError::Decode(e.to_string()))?;
    parsed
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .filter(|content| !content.trim().is_empty())
        .ok_or(ServiceError::EmptyResponse)
}

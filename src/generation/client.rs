//! HTTP client for the generation backend.

use super::ChatMessage;
use crate::error::GenerationError;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Template endpoint response.
///
/// Accepts both field spellings the backend has used over time:
/// `prompts`/`systemPrompt` and `uiPrompts`/`basicCode`.
#[derive(Debug, Clone, Deserialize)]
pub struct TemplateResponse {
    #[serde(default, alias = "systemPrompt")]
    pub prompts: Vec<String>,
    #[serde(default, rename = "uiPrompts", alias = "basicCode")]
    pub ui_prompts: Vec<String>,
}

impl TemplateResponse {
    /// The raw artifact text to seed the initial step batch from.
    pub fn primary_artifact(&self) -> Result<&str, GenerationError> {
        self.ui_prompts
            .first()
            .map(String::as_str)
            .ok_or_else(|| {
                GenerationError::MalformedResponse(
                    "template response carried no artifact text".to_string(),
                )
            })
    }
}

#[derive(Serialize)]
struct TemplateRequest<'a> {
    prompt: &'a str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    messages: &'a [ChatMessage],
}

#[derive(Deserialize)]
struct ChatResponse {
    response: String,
}

/// Client for the generation backend's template and chat endpoints.
pub struct GenerationClient {
    http: reqwest::Client,
    api_url: String,
}

impl GenerationClient {
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_url: api_url.into(),
        }
    }

    /// `POST {api_url}/template` with the user prompt.
    pub async fn fetch_template(&self, prompt: &str) -> Result<TemplateResponse, GenerationError> {
        debug!(prompt_len = prompt.len(), "Requesting project template");
        let response = self
            .http
            .post(format!("{}/template", self.api_url))
            .json(&TemplateRequest { prompt })
            .send()
            .await?
            .error_for_status()?
            .json::<TemplateResponse>()
            .await?;

        info!(
            prompts = response.prompts.len(),
            artifacts = response.ui_prompts.len(),
            "Template received"
        );
        Ok(response)
    }

    /// `POST {api_url}/chat` with the conversation so far; returns the raw
    /// artifact text of the model's answer.
    pub async fn chat(&self, messages: &[ChatMessage]) -> Result<String, GenerationError> {
        debug!(turns = messages.len(), "Sending chat turn");
        let response = self
            .http
            .post(format!("{}/chat", self.api_url))
            .json(&ChatRequest { messages })
            .send()
            .await?
            .error_for_status()?
            .json::<ChatResponse>()
            .await?;

        Ok(response.response)
    }
}

// Client for the remote generative-text endpoint backing the AI assistant
// conversation. One POST per prompt: no retry, no streaming, no timeout.

use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::AssistantConfig;

/// Returned when the endpoint answers 2xx but the body carries no text.
const EMPTY_CANDIDATE_REPLY: &str = "Sorry, I could not generate a response.";

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("generation request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("generation endpoint returned status {0}")]
    Status(reqwest::StatusCode),
}

/// Seam between the store and the remote endpoint so tests can stub the
/// generation outcome.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, GenerateError>;
}

#[derive(Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Serialize, Deserialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Content,
}

/// Pull the first candidate's text out of a response body. A well-formed
/// body with nothing in it gets the canned reply rather than an error.
fn extract_reply(response: GenerateContentResponse) -> String {
    response
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content.parts.into_iter().next())
        .map(|part| part.text)
        .unwrap_or_else(|| EMPTY_CANDIDATE_REPLY.to_string())
}

#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl GeminiClient {
    pub fn new(config: &AssistantConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.base_url.clone(),
            model: config.model.clone(),
            api_key: config.api_key.clone(),
        }
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, GenerateError> {
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        );

        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
        };

        debug!("Requesting generation from model {}", self.model);

        let response = self.client.post(&url).json(&request).send().await?;

        if !response.status().is_success() {
            return Err(GenerateError::Status(response.status()));
        }

        // A body that fails to deserialize is a failure like any transport
        // error; the caller substitutes its own fallback text.
        let body: GenerateContentResponse = response.json().await?;
        Ok(extract_reply(body))
    }
}

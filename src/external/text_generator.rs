use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TextGenError {
    #[error("network error: {0}")]
    Network(String),

    #[error("bad response: {0}")]
    BadResponse(String),
}

/// Text-generation collaborator boundary: fully rendered prompt in,
/// free-text summary out. Consumed as a black box; every failure is expected
/// to be absorbed by the caller's degraded path.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn summarize(&self, prompt: String) -> Result<String, TextGenError>;
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: usize,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: String,
}

/// OpenAI-compatible chat-completion backend.
pub struct OpenAiGenerator {
    api_key: String,
    model: String,
    max_tokens: usize,
    temperature: f32,
    client: reqwest::Client,
}

impl OpenAiGenerator {
    /// `None` when `OPENAI_API_KEY` is unset; insight generation then runs
    /// in rule-based fallback mode.
    pub fn from_env() -> Option<Self> {
        let api_key = std::env::var("OPENAI_API_KEY").ok()?;
        if api_key.trim().is_empty() {
            return None;
        }
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("failed to build HTTP client");
        Some(Self {
            api_key,
            model: "gpt-4o-mini".to_string(),
            max_tokens: 700,
            temperature: 0.7,
            client,
        })
    }
}

#[async_trait]
impl TextGenerator for OpenAiGenerator {
    async fn summarize(&self, prompt: String) -> Result<String, TextGenError> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt,
            }],
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        };

        let resp = self
            .client
            .post("https://api.openai.com/v1/chat/completions")
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| TextGenError::Network(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(TextGenError::BadResponse(format!(
                "status {}",
                resp.status()
            )));
        }

        let body = resp
            .json::<ChatResponse>()
            .await
            .map_err(|e| TextGenError::BadResponse(e.to_string()))?;

        body.choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| TextGenError::BadResponse("empty choices".into()))
    }
}

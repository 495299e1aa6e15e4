//! Client for the OpenAI-compatible chat completion endpoint that writes
//! novels.

use booksummary_core::generation::NovelRequest;
use serde::Deserialize;

use crate::config::GenerationConfig;

/// Upper bound on tokens in one completion.
const MAX_COMPLETION_TOKENS: u32 = 32_768;

#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    /// No API key configured.
    #[error("generation endpoint is not configured")]
    NotConfigured,

    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The endpoint returned a non-2xx status code.
    #[error("generation API error ({status}): {body}")]
    ApiError { status: u16, body: String },

    /// 2xx response without any message content.
    #[error("generation API returned no content")]
    EmptyResponse,
}

#[derive(Debug, Deserialize)]
struct ChatCompletion {
    #[serde(default)]
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

pub struct NovelGenerator {
    client: reqwest::Client,
    config: GenerationConfig,
}

impl NovelGenerator {
    pub fn new(config: GenerationConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    /// Send the prompt built from `request` and return the story text.
    pub async fn generate(&self, request: &NovelRequest) -> Result<String, GenerationError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(GenerationError::NotConfigured)?;

        let body = serde_json::json!({
            "model": self.config.model,
            "messages": [
                { "role": "user", "content": request.build_prompt() }
            ],
            "temperature": 1,
            "max_completion_tokens": MAX_COMPLETION_TOKENS,
        });

        tracing::info!(
            model = %self.config.model,
            title = %request.title,
            genre = %request.genre,
            "Requesting novel generation"
        );

        let response = self
            .client
            .post(format!("{}/chat/completions", self.config.api_url))
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(GenerationError::ApiError {
                status: status.as_u16(),
                body,
            });
        }

        let completion: ChatCompletion = response.json().await?;
        extract_content(completion)
    }
}

fn extract_content(completion: ChatCompletion) -> Result<String, GenerationError> {
    completion
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .filter(|c| !c.trim().is_empty())
        .ok_or(GenerationError::EmptyResponse)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn first_choice_content_is_used() {
        let completion: ChatCompletion = serde_json::from_value(serde_json::json!({
            "choices": [
                { "message": { "role": "assistant", "content": "옛날 옛적에" } },
                { "message": { "role": "assistant", "content": "ignored" } }
            ]
        }))
        .unwrap();
        assert_eq!(extract_content(completion).unwrap(), "옛날 옛적에");
    }

    #[test]
    fn missing_choices_is_empty_response() {
        let completion: ChatCompletion = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_matches!(extract_content(completion), Err(GenerationError::EmptyResponse));
    }

    #[tokio::test]
    async fn missing_key_fails_without_network() {
        let generator = NovelGenerator::new(GenerationConfig {
            api_url: "http://127.0.0.1:9".into(),
            api_key: None,
            model: "o1-preview".into(),
        });
        let request = NovelRequest {
            title: "달".into(),
            genre: "시".into(),
            prompt: String::new(),
            themes: vec![],
        };
        assert_matches!(
            generator.generate(&request).await,
            Err(GenerationError::NotConfigured)
        );
    }
}

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;

use crate::config::ModelConfig;
use crate::errors::{ModelError, ModelResult};

/// One entry of a chat-completion conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: "system".to_string(), content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: "user".to_string(), content: content.into() }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: "assistant".to_string(), content: content.into() }
    }
}

/// Per-call-site sampling settings.
#[derive(Debug, Clone, Copy)]
pub struct SamplingParams {
    pub temperature: f32,
    pub max_tokens: u32,
}

pub const REVIEW_SAMPLING: SamplingParams = SamplingParams {
    temperature: 0.2,
    max_tokens: 1500,
};

pub const CHAT_SAMPLING: SamplingParams = SamplingParams {
    temperature: 0.7,
    max_tokens: 1024,
};

/// Thin client for an OpenAI-compatible chat-completions endpoint. The
/// HTTP client carries a hard request timeout, so no call can wait
/// unboundedly on a stalled upstream.
#[derive(Clone)]
pub struct ModelClient {
    http: reqwest::Client,
    config: ModelConfig,
}

impl ModelClient {
    pub fn new(config: ModelConfig) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(Self { http, config })
    }

    pub fn model_id(&self) -> &str {
        &self.config.model
    }

    /// Send one completion request and return the reply text.
    pub async fn complete(
        &self,
        api_key: &str,
        messages: &[ChatMessage],
        params: SamplingParams,
    ) -> ModelResult<String> {
        let api_key = api_key.trim();
        if api_key.is_empty() {
            return Err(ModelError::MissingApiKey);
        }

        let url = format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'));
        let body = build_request_body(&self.config.model, messages, params);

        tracing::debug!("Requesting completion from {} ({})", url, self.config.model);

        let response = self
            .http
            .post(&url)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(classify_transport)?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            tracing::warn!("Model API returned {}: {}", status, message);
            return Err(classify_status(status, message));
        }

        let completion: CompletionResponse =
            response.json().await.map_err(classify_transport)?;

        completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(ModelError::EmptyReply)
    }
}

fn build_request_body(
    model: &str,
    messages: &[ChatMessage],
    params: SamplingParams,
) -> serde_json::Value {
    json!({
        "model": model,
        "messages": messages,
        "temperature": params.temperature,
        "max_tokens": params.max_tokens,
    })
}

fn classify_transport(error: reqwest::Error) -> ModelError {
    if error.is_timeout() {
        ModelError::Timeout
    } else {
        ModelError::Transport(error.to_string())
    }
}

fn classify_status(status: StatusCode, message: String) -> ModelError {
    match status.as_u16() {
        401 | 403 => ModelError::Auth(message),
        429 => ModelError::RateLimited(message),
        _ => ModelError::Api {
            status: status.as_u16(),
            message,
        },
    }
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: CompletionMessage,
}

#[derive(Debug, Deserialize)]
struct CompletionMessage {
    #[serde(default)]
    content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_body_carries_model_and_sampling() {
        let messages = vec![
            ChatMessage::system("be terse"),
            ChatMessage::user("review this"),
        ];
        let body = build_request_body("llama-3.3-70b-versatile", &messages, REVIEW_SAMPLING);

        assert_eq!(body["model"], "llama-3.3-70b-versatile");
        assert_eq!(body["messages"].as_array().unwrap().len(), 2);
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["max_tokens"], 1500);
        assert!((body["temperature"].as_f64().unwrap() - 0.2).abs() < 1e-6);
    }

    #[test]
    fn status_codes_map_to_structured_errors() {
        assert!(matches!(
            classify_status(StatusCode::UNAUTHORIZED, "bad key".into()),
            ModelError::Auth(_)
        ));
        assert!(matches!(
            classify_status(StatusCode::FORBIDDEN, String::new()),
            ModelError::Auth(_)
        ));
        assert!(matches!(
            classify_status(StatusCode::TOO_MANY_REQUESTS, String::new()),
            ModelError::RateLimited(_)
        ));
        assert!(matches!(
            classify_status(StatusCode::INTERNAL_SERVER_ERROR, String::new()),
            ModelError::Api { status: 500, .. }
        ));
    }

    #[test]
    fn empty_choices_parse_but_yield_no_reply() {
        let completion: CompletionResponse = serde_json::from_str("{}").unwrap();
        assert!(completion.choices.is_empty());

        let completion: CompletionResponse = serde_json::from_str(
            r#"{"choices":[{"message":{"role":"assistant","content":"done"}}]}"#,
        )
        .unwrap();
        assert_eq!(completion.choices[0].message.content, "done");
    }
}

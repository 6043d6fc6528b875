//! Shared OpenAI-compatible provider chat client.
//!
//! Model flows talk to a [`ModelClient`]; [`ProviderClient`] is the network
//! implementation. The trait returns boxed futures so the client can live
//! behind `Arc<dyn ModelClient>` in [`AppState`](crate::state::AppState).

use std::future::Future;
use std::pin::Pin;

use serde::Deserialize;
use serde_json::json;

use crate::config::LlmConfig;
use crate::error::ApiError;

pub type ModelFuture<'a> = Pin<Box<dyn Future<Output = Result<String, ApiError>> + Send + 'a>>;

/// Per-call generation options.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ChatOptions {
    pub temperature: Option<f32>,
}

/// Structured input to structured output: a prompt in, JSON text out.
pub trait ModelClient: Send + Sync {
    /// Runs chat with JSON-mode preference enabled and returns the assistant
    /// content.
    fn complete_json<'a>(&'a self, prompt: &'a str, options: ChatOptions) -> ModelFuture<'a>;
}

/// [`ModelClient`] backed by an OpenAI-compatible `/chat/completions` endpoint.
#[derive(Debug, Clone)]
pub struct ProviderClient {
    llm: LlmConfig,
    http: reqwest::Client,
}

impl ProviderClient {
    pub fn new(llm: LlmConfig) -> Self {
        ProviderClient {
            llm,
            http: reqwest::Client::new(),
        }
    }
}

impl ModelClient for ProviderClient {
    fn complete_json<'a>(&'a self, prompt: &'a str, options: ChatOptions) -> ModelFuture<'a> {
        Box::pin(run_external_chat(&self.http, &self.llm, prompt, options))
    }
}

async fn run_external_chat(
    client: &reqwest::Client,
    llm: &LlmConfig,
    user_message: &str,
    options: ChatOptions,
) -> Result<String, ApiError> {
    if !llm.is_configured() {
        return Err(ApiError::Unconfigured(
            "set ALGOVIZ_LLM_MODEL and ALGOVIZ_LLM_API_KEY to enable generation".to_string(),
        ));
    }
    let provider = llm.provider.as_deref().unwrap_or_default();
    let base_url = match provider {
        "openrouter" => llm
            .api_base_url
            .clone()
            .unwrap_or_else(|| "https://openrouter.ai/api/v1".to_string()),
        "openai_compatible" => llm.api_base_url.clone().ok_or_else(|| {
            ApiError::Unconfigured(
                "openai_compatible provider requires ALGOVIZ_LLM_API_BASE_URL".to_string(),
            )
        })?,
        other => {
            return Err(ApiError::Unconfigured(format!(
                "unsupported provider '{}': use openrouter or openai_compatible",
                other
            )))
        }
    };

    let endpoint = format!("{}/chat/completions", base_url.trim_end_matches('/'));
    let api_key = llm.api_key.clone().unwrap_or_default();
    let model = llm.model.clone().unwrap_or_default();

    let mut messages = Vec::new();
    if let Some(system_prompt) = llm.system_prompt.clone() {
        messages.push(json!({
            "role": "system",
            "content": system_prompt
        }));
    }
    messages.push(json!({
        "role": "user",
        "content": user_message
    }));

    let mut body = json!({
        "model": model,
        "messages": messages,
        "response_format": { "type": "json_object" },
    });
    if let Some(temperature) = options.temperature {
        body["temperature"] = json!(temperature);
    }

    let mut req = client
        .post(&endpoint)
        .header("Authorization", format!("Bearer {}", api_key))
        .header("Content-Type", "application/json")
        .json(&body);

    if provider == "openrouter" {
        req = req
            .header("HTTP-Referer", "https://localhost:3000")
            .header("X-Title", "algoviz");
    }

    tracing::debug!(%endpoint, %model, "sending model request");
    let response = req
        .send()
        .await
        .map_err(|err| ApiError::UpstreamFailure(format!("provider request failed: {}", err)))?;

    let status = response.status();
    let body_text = response.text().await.map_err(|err| {
        ApiError::UpstreamFailure(format!("provider response read failed: {}", err))
    })?;

    if !status.is_success() {
        return Err(ApiError::UpstreamFailure(format!(
            "provider request failed ({}): {}",
            status, body_text
        )));
    }

    extract_assistant_content(&body_text)
}

/// Pulls the first choice's trimmed assistant content out of a completions
/// response body.
pub fn extract_assistant_content(body_text: &str) -> Result<String, ApiError> {
    let parsed: OpenAiCompatibleChatResponse = serde_json::from_str(body_text).map_err(|err| {
        ApiError::UpstreamFailure(format!("provider response parse failed: {}", err))
    })?;

    parsed
        .choices
        .first()
        .and_then(|choice| choice.message.content.clone())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| {
            ApiError::UpstreamFailure("provider response missing assistant content".to_string())
        })
}

#[derive(Debug, Deserialize)]
struct OpenAiCompatibleChatResponse {
    choices: Vec<OpenAiCompatibleChoice>,
}

#[derive(Debug, Deserialize)]
struct OpenAiCompatibleChoice {
    message: OpenAiCompatibleMessage,
}

#[derive(Debug, Deserialize)]
struct OpenAiCompatibleMessage {
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_trimmed_content() {
        let content = extract_assistant_content(
            r#"{"choices": [{"message": {"role": "assistant", "content": "  {\"a\": 1}\n"}}]}"#,
        )
        .unwrap();
        assert_eq!(content, r#"{"a": 1}"#);
    }

    #[test]
    fn missing_content_is_upstream_failure() {
        for body in [
            r#"{"choices": []}"#,
            r#"{"choices": [{"message": {"content": null}}]}"#,
            r#"{"choices": [{"message": {"content": "   "}}]}"#,
            "<html>",
        ] {
            assert!(matches!(
                extract_assistant_content(body),
                Err(ApiError::UpstreamFailure(_))
            ));
        }
    }

    #[tokio::test]
    async fn unconfigured_provider_is_rejected_before_network() {
        let client = ProviderClient::new(LlmConfig::default());
        let err = client
            .complete_json("hello", ChatOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Unconfigured(_)));
    }

    #[tokio::test]
    async fn unknown_provider_is_rejected() {
        let client = ProviderClient::new(LlmConfig {
            provider: Some("carrier-pigeon".to_string()),
            model: Some("m".to_string()),
            api_key: Some("k".to_string()),
            ..LlmConfig::default()
        });
        let err = client
            .complete_json("hello", ChatOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Unconfigured(msg) if msg.contains("carrier-pigeon")));
    }
}

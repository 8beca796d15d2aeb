// src/provider/openai.rs — OpenAI chat-completions responder

use async_trait::async_trait;

use super::{ResponseRequest, Responder};
use crate::infra::errors::EvolveError;

pub const API_KEY_VAR: &str = "OPENAI_API_KEY";
pub const BASE_URL_VAR: &str = "OPENAI_BASE_URL";
const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

pub struct OpenAiResponder {
    api_key: String,
    client: reqwest::Client,
    base_url: String,
}

impl OpenAiResponder {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL.into())
    }

    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self {
            api_key,
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Build from the environment. Fails fast when the key is missing so no
    /// epoch ever starts without credentials.
    pub fn from_env() -> Result<Self, EvolveError> {
        let api_key = std::env::var(API_KEY_VAR)
            .ok()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .ok_or_else(|| EvolveError::MissingCredential {
                var: API_KEY_VAR.into(),
            })?;
        let base_url = std::env::var(BASE_URL_VAR).unwrap_or_else(|_| DEFAULT_BASE_URL.into());
        Ok(Self::with_base_url(api_key, base_url))
    }

    fn provider_error(message: String, retriable: bool) -> EvolveError {
        EvolveError::Provider {
            provider: "openai".into(),
            message,
            retriable,
        }
    }
}

/// Pull the first choice's message content; `null` or missing content is absent.
fn extract_content(resp: &serde_json::Value) -> Option<String> {
    resp["choices"][0]["message"]["content"]
        .as_str()
        .map(str::to_string)
}

/// Parse a `Retry-After` header value given in seconds.
fn retry_after_ms(headers: &reqwest::header::HeaderMap) -> u64 {
    headers
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<f64>().ok())
        .map(|secs| (secs * 1000.0) as u64)
        .unwrap_or(0)
}

#[async_trait]
impl Responder for OpenAiResponder {
    fn id(&self) -> &str {
        "openai"
    }

    async fn respond(&self, request: &ResponseRequest) -> Result<Option<String>, EvolveError> {
        let body = serde_json::json!({
            "model": request.model,
            "messages": [{ "role": "user", "content": request.prompt }],
            "temperature": request.temperature,
        });

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
            .await
            .map_err(|e| Self::provider_error(e.to_string(), e.is_timeout() || e.is_connect()))?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(EvolveError::RateLimited {
                provider: "openai".into(),
                retry_after_ms: retry_after_ms(response.headers()),
            });
        }

        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(Self::provider_error(
                format!("HTTP {}: {}", status, error_body),
                status.is_server_error() || status == reqwest::StatusCode::REQUEST_TIMEOUT,
            ));
        }

        // A truncated or garbled body is a transient service fault.
        let resp: serde_json::Value = response
            .json()
            .await
            .map_err(|e| Self::provider_error(format!("Failed to parse response: {}", e), true))?;

        let content = extract_content(&resp);
        tracing::trace!(
            model = %request.model,
            has_content = content.is_some(),
            "openai response"
        );
        Ok(content)
    }
}

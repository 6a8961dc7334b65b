use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use super::{GenerationError, GenerationRequest, TextGenerator};
use crate::config_file::ConfigFile;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Chat-completions backend for OpenAI and API-compatible servers.
#[derive(Clone)]
pub struct OpenAiGenerator {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
    timeout: Duration,
}

impl OpenAiGenerator {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: model.into(),
            timeout: Duration::from_secs(120),
        }
    }

    /// Build from `OPENAI_API_KEY` (and `OPENAI_BASE_URL`, if set).
    pub fn from_env(model: impl Into<String>) -> Result<Self, GenerationError> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| GenerationError::Config("OPENAI_API_KEY not set".into()))?;
        let mut generator = Self::new(api_key, model);
        if let Ok(url) = std::env::var("OPENAI_BASE_URL") {
            generator = generator.with_base_url(url);
        }
        Ok(generator)
    }

    /// Resolve key and base URL: env vars (`OPENAI_API_KEY`, `OPENAI_BASE_URL`)
    /// first, then the `[openai]` section of the config file.
    pub fn from_env_or_config(
        config: &ConfigFile,
        model: impl Into<String>,
    ) -> Result<Self, GenerationError> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .ok()
            .or_else(|| config.openai_api_key().map(String::from))
            .ok_or_else(|| {
                GenerationError::Config(
                    "OPENAI_API_KEY is not set (env, .env, or [openai] api_key in config)".into(),
                )
            })?;
        let mut generator = Self::new(api_key, model);
        if let Some(url) = std::env::var("OPENAI_BASE_URL")
            .ok()
            .or_else(|| config.openai_base_url().map(String::from))
        {
            generator = generator.with_base_url(url);
        }
        Ok(generator)
    }

    /// Point at a proxy or compatible server instead of api.openai.com.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn complete(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
        let body = request_body(&self.model, request);

        tracing::debug!(
            model = %self.model,
            temperature = request.temperature,
            messages = request.messages.len(),
            "sending chat completion"
        );

        let resp = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .timeout(self.timeout)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if status.as_u16() == 429 {
            return Err(GenerationError::RateLimited);
        }
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(GenerationError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let data: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| GenerationError::Parse(e.to_string()))?;
        completion_text(&data)
    }
}

impl TextGenerator for OpenAiGenerator {
    fn name(&self) -> &str {
        &self.model
    }

    fn generate<'a>(
        &'a self,
        request: &'a GenerationRequest,
    ) -> Pin<Box<dyn Future<Output = Result<String, GenerationError>> + Send + 'a>> {
        Box::pin(self.complete(request))
    }
}

/// JSON body for `POST /chat/completions`.
pub(crate) fn request_body(model: &str, request: &GenerationRequest) -> serde_json::Value {
    serde_json::json!({
        "model": model,
        "messages": request.messages,
        "temperature": request.temperature,
        "max_tokens": request.max_tokens,
    })
}

/// Pull `choices[0].message.content` out of a completion response.
pub(crate) fn completion_text(data: &serde_json::Value) -> Result<String, GenerationError> {
    let choices = data["choices"]
        .as_array()
        .ok_or_else(|| GenerationError::Parse("missing `choices` array".into()))?;
    let text = choices
        .first()
        .and_then(|c| c["message"]["content"].as_str())
        .map(str::trim)
        .unwrap_or("");
    if text.is_empty() {
        return Err(GenerationError::EmptyResponse);
    }
    Ok(text.to_string())
}

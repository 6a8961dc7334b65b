//! Text-generation capability and its implementations.

pub mod mock;
pub mod openai;

use std::future::Future;
use std::pin::Pin;

use thiserror::Error;

use crate::Message;

#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("configuration error: {0}")]
    Config(String),
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("rate limited (429)")]
    RateLimited,
    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },
    #[error("failed to parse response: {0}")]
    Parse(String),
    #[error("response contained no text")]
    EmptyResponse,
}

/// A single chat completion request.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub messages: Vec<Message>,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl GenerationRequest {
    pub fn new(messages: Vec<Message>, temperature: f32, max_tokens: u32) -> Self {
        Self {
            messages,
            temperature,
            max_tokens,
        }
    }
}

/// Something that turns a chat conversation into generated text.
///
/// The hosted model lives behind this trait so that prompt synthesis and the
/// web front end can be exercised without network access.
pub trait TextGenerator: Send + Sync {
    /// Human-readable name of this backend (e.g. the model id).
    fn name(&self) -> &str;

    /// Run the request and return the generated text, trimmed.
    fn generate<'a>(
        &'a self,
        request: &'a GenerationRequest,
    ) -> Pin<Box<dyn Future<Output = Result<String, GenerationError>> + Send + 'a>>;
}

//! Mock generator for testing.

use std::future::Future;
use std::pin::Pin;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::{GenerationError, GenerationRequest, TextGenerator};

/// A configurable mock response for [`MockGenerator`].
#[derive(Clone, Debug)]
pub enum MockResponse {
    /// Return this text (trimmed, like a real backend).
    Text(String),
    /// Simulate a 429 rate-limit response.
    RateLimited,
    /// Simulate a non-2xx API error.
    Error(String),
}

/// A hand-rolled mock implementing [`TextGenerator`] for tests.
///
/// Supports a fixed response, or a sequence of responses (one per call,
/// repeating the last once exhausted). Every request is recorded.
pub struct MockGenerator {
    name: &'static str,
    /// Stored reversed so `pop()` yields the next response.
    responses: Mutex<Vec<MockResponse>>,
    fallback: MockResponse,
    requests: Mutex<Vec<GenerationRequest>>,
    call_count: AtomicUsize,
}

impl MockGenerator {
    /// Create a mock that always returns `response`.
    pub fn new(name: &'static str, response: MockResponse) -> Self {
        Self {
            name,
            responses: Mutex::new(Vec::new()),
            fallback: response,
            requests: Mutex::new(Vec::new()),
            call_count: AtomicUsize::new(0),
        }
    }

    /// Shorthand for a mock that always answers with `text`.
    pub fn always(text: impl Into<String>) -> Self {
        Self::new("mock", MockResponse::Text(text.into()))
    }

    /// Create a mock that returns responses in order, repeating the last one.
    pub fn with_sequence(name: &'static str, mut responses: Vec<MockResponse>) -> Self {
        let fallback = responses
            .last()
            .cloned()
            .unwrap_or_else(|| MockResponse::Text(String::new()));
        responses.reverse();
        Self {
            name,
            responses: Mutex::new(responses),
            fallback,
            requests: Mutex::new(Vec::new()),
            call_count: AtomicUsize::new(0),
        }
    }

    /// How many times `generate()` has been called.
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Every request seen so far, in call order.
    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    fn next_response(&self) -> MockResponse {
        let mut seq = self.responses.lock().unwrap_or_else(|e| e.into_inner());
        seq.pop().unwrap_or_else(|| self.fallback.clone())
    }
}

impl TextGenerator for MockGenerator {
    fn name(&self) -> &str {
        self.name
    }

    fn generate<'a>(
        &'a self,
        request: &'a GenerationRequest,
    ) -> Pin<Box<dyn Future<Output = Result<String, GenerationError>> + Send + 'a>> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(request.clone());
        let response = self.next_response();

        Box::pin(async move {
            match response {
                MockResponse::Text(text) => Ok(text.trim().to_string()),
                MockResponse::RateLimited => Err(GenerationError::RateLimited),
                MockResponse::Error(message) => Err(GenerationError::Api {
                    status: 500,
                    message,
                }),
            }
        })
    }
}

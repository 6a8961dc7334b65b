use serde::{Deserialize, Serialize};

pub mod compose;
pub mod config_file;
pub mod generator;

// Re-export for convenience
pub use compose::{clean_poem_output, compose_poem};
pub use generator::openai::{DEFAULT_BASE_URL, OpenAiGenerator};
pub use generator::{GenerationError, GenerationRequest, TextGenerator};

/// A poem reconstructed from an extracted book, or loaded from a parsed poem list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Poem {
    pub title: String,
    pub content: String,
    /// Year or year range found on the poem's closing line (e.g. "1959, 1960").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

impl Poem {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            date: None,
        }
    }
}

/// One chat message, as sent to a completion endpoint and as written to training files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// "system", "user" or "assistant"
    pub role: String,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: content.into(),
        }
    }
}

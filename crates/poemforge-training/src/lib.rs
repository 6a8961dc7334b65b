use std::io::{BufWriter, Write};
use std::path::Path;

use poemforge_core::GenerationError;
use serde::Serialize;
use thiserror::Error;

pub mod builder;
pub mod prompts;

pub use builder::{
    ChatExample, DEFAULT_PROMPT_MODEL, DEFAULT_PROMPTS_PER_POEM, DEFAULT_VALIDATION_RATIO,
    Dataset, ProgressEvent, TrainingOptions, build_dataset, build_examples_for_poem,
    generate_creative_prompt, load_poems, split_examples,
};

#[derive(Error, Debug)]
pub enum TrainingError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("prompt generation failed for poem '{title}': {source}")]
    Generation {
        title: String,
        #[source]
        source: GenerationError,
    },
    #[error("validation ratio must be between 0 and 1, got {0}")]
    InvalidRatio(f64),
}

/// Write one compact JSON object per line. Non-ASCII text is written as-is.
pub fn write_jsonl<T: Serialize>(path: &Path, items: &[T]) -> Result<(), TrainingError> {
    let mut writer = BufWriter::new(std::fs::File::create(path)?);
    for item in items {
        serde_json::to_writer(&mut writer, item)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(())
}

use std::path::Path;

use serde::Serialize;
use thiserror::Error;

pub mod config;
pub mod lines;
pub mod segmenter;

pub use config::{ListOverride, ParsingConfig, ParsingConfigBuilder};
pub use segmenter::{
    DroppedLines, OpenPoem, PAGE_BREAK, PageAction, ParseOutcome, Segmenter, SegmenterState,
    classify,
};
// Re-export the record type from core (canonical definition lives there)
pub use poemforge_core::Poem;

#[derive(Error, Debug)]
pub enum ParsingError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid parsing config: {0}")]
    Config(#[from] regex::Error),
}

/// Rebuild poems from form-feed delimited text using the default configuration.
///
/// Pipeline, per page:
/// 1. Find the header candidate (first non-blank, non page-number line)
/// 2. Decide whether it opens a poem, continues the open one, or replaces it
/// 3. Append the page's body lines, minus page numbers
/// 4. Close the open poem early if its text now ends in a date line
pub fn parse_text(text: &str) -> ParseOutcome {
    Segmenter::new().parse(text)
}

/// Read an extracted text file and rebuild its poems.
pub fn parse_file(path: &Path, config: ParsingConfig) -> Result<ParseOutcome, ParsingError> {
    let text = std::fs::read_to_string(path)?;
    Ok(Segmenter::with_config(config).parse(&text))
}

#[derive(Serialize)]
struct PoemRecord<'a> {
    title: &'a str,
    content: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    date: Option<&'a str>,
}

/// Serialize poems as an indented JSON array of `{title, content}` objects.
///
/// With `with_dates`, poems that closed on a date line also carry `date`.
/// Non-ASCII text is written as-is.
pub fn poems_to_json(poems: &[Poem], with_dates: bool) -> Result<String, ParsingError> {
    let records: Vec<PoemRecord<'_>> = poems
        .iter()
        .map(|p| PoemRecord {
            title: &p.title,
            content: &p.content,
            date: if with_dates { p.date.as_deref() } else { None },
        })
        .collect();
    Ok(serde_json::to_string_pretty(&records)?)
}

/// Write poems as JSON to `path`, creating or truncating it.
pub fn write_json(path: &Path, poems: &[Poem], with_dates: bool) -> Result<(), ParsingError> {
    let json = poems_to_json(poems, with_dates)?;
    std::fs::write(path, json)?;
    Ok(())
}

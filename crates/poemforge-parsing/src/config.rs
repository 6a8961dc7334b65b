use regex::Regex;

/// Controls how a list of values is overridden from its defaults.
#[derive(Debug, Clone, Default)]
pub enum ListOverride<T> {
    /// Use the built-in defaults.
    #[default]
    Default,
    /// Completely replace the defaults with these values.
    Replace(Vec<T>),
    /// Append these values to the defaults.
    Extend(Vec<T>),
}

impl<T: Clone> ListOverride<T> {
    /// Resolve this override against the given defaults.
    pub fn resolve(&self, defaults: &[T]) -> Vec<T> {
        match self {
            ListOverride::Default => defaults.to_vec(),
            ListOverride::Replace(v) => v.clone(),
            ListOverride::Extend(v) => {
                let mut result = defaults.to_vec();
                result.extend(v.iter().cloned());
                result
            }
        }
    }
}

/// Headers that always open a fresh poem, whatever is currently open.
pub const DEFAULT_SECTION_MARKERS: &[&str] = &["poem"];

/// Headers with more words than this are treated as wrapped verse, not titles.
pub const DEFAULT_HEADER_WORD_THRESHOLD: usize = 5;

/// Configuration for the poem segmentation pipeline.
///
/// Regex fields are `Option<Regex>`; `None` means "use the built-in default".
/// Use [`ParsingConfigBuilder`] to construct with string patterns.
#[derive(Debug, Clone)]
pub struct ParsingConfig {
    /// Word count above which a header candidate is treated as body text.
    pub(crate) header_word_threshold: usize,
    /// Header texts that force a new poem, resolved and lowercased once.
    pub(crate) section_markers: Vec<String>,
    /// Regex for page-number footer lines, matched against the trimmed line.
    pub(crate) footer_re: Option<Regex>,
    /// Regex for a closing date line, matched against the trimmed line.
    pub(crate) date_re: Option<Regex>,
}

impl Default for ParsingConfig {
    fn default() -> Self {
        Self {
            header_word_threshold: DEFAULT_HEADER_WORD_THRESHOLD,
            section_markers: resolve_markers(&ListOverride::Default),
            footer_re: None,
            date_re: None,
        }
    }
}

impl ParsingConfig {
    pub fn header_word_threshold(&self) -> usize {
        self.header_word_threshold
    }

    /// Resolved section markers, lowercased for comparison.
    pub fn section_markers(&self) -> &[String] {
        &self.section_markers
    }
}

fn resolve_markers(markers: &ListOverride<String>) -> Vec<String> {
    let defaults: Vec<String> = DEFAULT_SECTION_MARKERS
        .iter()
        .map(|s| s.to_string())
        .collect();
    markers
        .resolve(&defaults)
        .into_iter()
        .map(|m| m.trim().to_lowercase())
        .collect()
}

/// Builder for [`ParsingConfig`].
///
/// Accepts string patterns that are compiled to `Regex` in [`build()`](Self::build).
/// Fails fast with `regex::Error` if any pattern is invalid.
#[derive(Debug, Clone, Default)]
pub struct ParsingConfigBuilder {
    header_word_threshold: Option<usize>,
    section_markers: ListOverride<String>,
    footer_re: Option<String>,
    date_re: Option<String>,
}

impl ParsingConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn header_word_threshold(mut self, n: usize) -> Self {
        self.header_word_threshold = Some(n);
        self
    }

    // ── Section markers ──

    pub fn set_section_markers(mut self, markers: Vec<String>) -> Self {
        self.section_markers = ListOverride::Replace(markers);
        self
    }

    pub fn add_section_marker(mut self, marker: String) -> Self {
        match &mut self.section_markers {
            ListOverride::Extend(v) => v.push(marker),
            _ => self.section_markers = ListOverride::Extend(vec![marker]),
        }
        self
    }

    // ── Line patterns ──

    pub fn footer_regex(mut self, pattern: &str) -> Self {
        self.footer_re = Some(pattern.to_string());
        self
    }

    pub fn date_regex(mut self, pattern: &str) -> Self {
        self.date_re = Some(pattern.to_string());
        self
    }

    /// Compile all string patterns into regexes and produce a [`ParsingConfig`].
    pub fn build(self) -> Result<ParsingConfig, regex::Error> {
        let compile = |opt: Option<String>| -> Result<Option<Regex>, regex::Error> {
            opt.map(|p| Regex::new(&p)).transpose()
        };

        Ok(ParsingConfig {
            header_word_threshold: self
                .header_word_threshold
                .unwrap_or(DEFAULT_HEADER_WORD_THRESHOLD),
            section_markers: resolve_markers(&self.section_markers),
            footer_re: compile(self.footer_re)?,
            date_re: compile(self.date_re)?,
        })
    }
}

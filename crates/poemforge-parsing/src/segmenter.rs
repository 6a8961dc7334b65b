use poemforge_core::Poem;

use crate::config::ParsingConfig;
use crate::lines::{
    extract_date_with_config, is_footer_line_with_config, parse_date_line_with_config,
    remove_leading_blank_lines, strip_trailing_footers_with_config, title_case, word_count,
};

/// Form feed: the page separator in extracted book text.
pub const PAGE_BREAK: char = '\u{000C}';

/// The poem currently being accumulated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenPoem {
    /// Header text as found on the page (trimmed, original case).
    pub title: String,
    pub lines: Vec<String>,
}

/// Segmentation state carried from one page to the next.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SegmenterState {
    #[default]
    Idle,
    Open(OpenPoem),
}

/// What a page does to the segmentation state, decided from its header candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageAction {
    /// Header is a section marker ("Poem"): close whatever is open, start anew.
    StartMarked,
    /// Nothing open: the header starts a poem.
    Start,
    /// Header is too long to be a title; the whole page is verse.
    ContinueWholePage,
    /// Running header repeating the open title.
    ContinueAfterHeader,
    /// A different short header: close the open poem, start a new one.
    Replace,
    /// The page has no header candidate at all.
    ContinueHeaderless,
}

/// Lines that arrived as continuation text while no poem was open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DroppedLines {
    /// 1-based page number in the source document.
    pub page: usize,
    pub lines: Vec<String>,
}

/// Everything produced by one segmentation run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseOutcome {
    pub poems: Vec<Poem>,
    pub dropped: Vec<DroppedLines>,
    /// Pages seen, including empty ones.
    pub pages: usize,
}

/// Decide how a page with the given header candidate affects `state`.
pub fn classify(state: &SegmenterState, header: Option<&str>, config: &ParsingConfig) -> PageAction {
    let Some(header) = header else {
        return PageAction::ContinueHeaderless;
    };
    let normalized = header.trim().to_lowercase();

    if config.section_markers().iter().any(|m| *m == normalized) {
        return PageAction::StartMarked;
    }

    match state {
        SegmenterState::Idle => PageAction::Start,
        SegmenterState::Open(_) if word_count(header) > config.header_word_threshold => {
            PageAction::ContinueWholePage
        }
        SegmenterState::Open(open) if open.title.trim().to_lowercase() == normalized => {
            PageAction::ContinueAfterHeader
        }
        SegmenterState::Open(_) => PageAction::Replace,
    }
}

/// Splits extracted text into pages and rebuilds poems from them.
pub struct Segmenter {
    config: ParsingConfig,
}

impl Default for Segmenter {
    fn default() -> Self {
        Self::new()
    }
}

impl Segmenter {
    pub fn new() -> Self {
        Self {
            config: ParsingConfig::default(),
        }
    }

    pub fn with_config(config: ParsingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ParsingConfig {
        &self.config
    }

    /// Run the full segmentation over a form-feed delimited document.
    pub fn parse(&self, text: &str) -> ParseOutcome {
        let mut outcome = ParseOutcome::default();

        let last = text
            .split(PAGE_BREAK)
            .enumerate()
            .fold(SegmenterState::Idle, |state, (i, page)| {
                outcome.pages += 1;
                self.step(state, i + 1, page, &mut outcome)
            });

        if let SegmenterState::Open(open) = last {
            outcome.poems.push(self.finalize(&open));
        }

        tracing::debug!(
            pages = outcome.pages,
            poems = outcome.poems.len(),
            dropped = outcome.dropped.len(),
            "segmentation complete"
        );
        outcome
    }

    /// Apply one page to `state`, pushing any finished poems into `outcome`.
    pub fn step(
        &self,
        state: SegmenterState,
        page_no: usize,
        page: &str,
        outcome: &mut ParseOutcome,
    ) -> SegmenterState {
        let lines: Vec<&str> = page.lines().collect();
        if lines.is_empty() {
            return state;
        }

        let header = self.header_candidate(&lines);
        let action = classify(&state, header.map(|(_, h)| h), &self.config);
        tracing::trace!(page = page_no, ?action, header = ?header.map(|(_, h)| h), "page classified");

        let state = match (action, header) {
            (PageAction::StartMarked | PageAction::Start | PageAction::Replace, Some((idx, h))) => {
                if let SegmenterState::Open(open) = state {
                    outcome.poems.push(self.finalize(&open));
                }
                SegmenterState::Open(OpenPoem {
                    title: h.to_string(),
                    lines: self.body_lines(&lines[idx + 1..]),
                })
            }
            (PageAction::ContinueAfterHeader, Some((idx, _))) => {
                self.append(state, page_no, self.body_lines(&lines[idx + 1..]), outcome)
            }
            _ => self.append(state, page_no, self.body_lines(&lines), outcome),
        };

        self.close_if_dated(state, outcome)
    }

    /// First line that is non-blank and not a page number, with its index.
    fn header_candidate<'a>(&self, lines: &[&'a str]) -> Option<(usize, &'a str)> {
        lines
            .iter()
            .enumerate()
            .find(|(_, l)| !l.trim().is_empty() && !is_footer_line_with_config(l, &self.config))
            .map(|(i, l)| (i, l.trim()))
    }

    fn body_lines(&self, lines: &[&str]) -> Vec<String> {
        lines
            .iter()
            .filter(|l| !is_footer_line_with_config(l, &self.config))
            .map(|l| l.to_string())
            .collect()
    }

    fn append(
        &self,
        state: SegmenterState,
        page_no: usize,
        lines: Vec<String>,
        outcome: &mut ParseOutcome,
    ) -> SegmenterState {
        match state {
            SegmenterState::Open(mut open) => {
                open.lines.extend(lines);
                SegmenterState::Open(open)
            }
            SegmenterState::Idle => {
                if !lines.is_empty() {
                    tracing::debug!(
                        page = page_no,
                        lines = lines.len(),
                        "dropping continuation lines with no open poem"
                    );
                    outcome.dropped.push(DroppedLines {
                        page: page_no,
                        lines,
                    });
                }
                SegmenterState::Idle
            }
        }
    }

    /// Finish the open poem early when its text already ends in a date line.
    fn close_if_dated(&self, state: SegmenterState, outcome: &mut ParseOutcome) -> SegmenterState {
        match state {
            SegmenterState::Open(open)
                if !open.lines.is_empty() && self.ends_with_date(&open.lines) =>
            {
                outcome.poems.push(self.finalize(&open));
                SegmenterState::Idle
            }
            other => other,
        }
    }

    /// Whether finalizing these lines would find a closing date.
    fn ends_with_date(&self, lines: &[String]) -> bool {
        let mut end = lines.len();
        while end > 0 && lines[end - 1].trim().is_empty() {
            end -= 1;
        }
        while end > 1 && is_footer_line_with_config(&lines[end - 1], &self.config) {
            end -= 1;
        }
        end > 0 && parse_date_line_with_config(&lines[end - 1], &self.config).is_some()
    }

    /// Close a poem: strip footers and the closing date, drop leading blanks.
    pub fn finalize(&self, open: &OpenPoem) -> Poem {
        let text = open.lines.join("\n");
        let text = strip_trailing_footers_with_config(text.trim_end(), &self.config);
        let (text, date) = extract_date_with_config(&text, &self.config);
        let content = remove_leading_blank_lines(&text).trim_end().to_string();

        Poem {
            title: title_case(&open.title),
            content,
            date,
        }
    }
}

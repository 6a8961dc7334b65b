use std::io::Write;
use std::path::Path;

use owo_colors::OwoColorize;
use poemforge_parsing::ParseOutcome;
use poemforge_training::Dataset;

/// Whether to use colored output.
#[derive(Debug, Clone, Copy)]
pub struct ColorMode(pub bool);

impl ColorMode {
    pub fn enabled(&self) -> bool {
        self.0
    }
}

/// Print the parse summary: poems found, pages seen, and any dropped text.
pub fn print_parse_summary(
    w: &mut dyn Write,
    source: &str,
    outcome: &ParseOutcome,
    color: ColorMode,
) -> std::io::Result<()> {
    let headline = format!(
        "Parsed {} from {} ({})",
        counted(outcome.poems.len(), "poem"),
        source,
        counted(outcome.pages, "page")
    );
    if color.enabled() {
        writeln!(w, "{}", headline.bold().green())?;
    } else {
        writeln!(w, "{}", headline)?;
    }

    if !outcome.dropped.is_empty() {
        let pages: Vec<String> = outcome.dropped.iter().map(|d| d.page.to_string()).collect();
        let lines: usize = outcome.dropped.iter().map(|d| d.lines.len()).sum();
        let note = format!(
            "(Dropped {} with no open poem on {} {})",
            counted(lines, "line"),
            if pages.len() == 1 { "page" } else { "pages" },
            pages.join(", ")
        );
        if color.enabled() {
            writeln!(w, "{}", note.dimmed())?;
        } else {
            writeln!(w, "{}", note)?;
        }
    }

    let dated = outcome.poems.iter().filter(|p| p.date.is_some()).count();
    if dated > 0 {
        writeln!(w, "{} closed on a date line", counted(dated, "poem"))?;
    }
    Ok(())
}

/// `1 poem`, `2 poems`.
fn counted(n: usize, noun: &str) -> String {
    if n == 1 {
        format!("{} {}", n, noun)
    } else {
        format!("{} {}s", n, noun)
    }
}

/// Print where the dataset was written and how it was split.
pub fn print_dataset_summary(
    w: &mut dyn Write,
    dataset: &Dataset,
    training_file: &Path,
    validation_file: &Path,
    color: ColorMode,
) -> std::io::Result<()> {
    let train = format!(
        "Training data saved to '{}' with {} examples.",
        training_file.display(),
        dataset.training.len()
    );
    let valid = format!(
        "Validation data saved to '{}' with {} examples.",
        validation_file.display(),
        dataset.validation.len()
    );
    if color.enabled() {
        writeln!(w, "{}", train.green())?;
        writeln!(w, "{}", valid.green())?;
    } else {
        writeln!(w, "{}", train)?;
        writeln!(w, "{}", valid)?;
    }
    Ok(())
}

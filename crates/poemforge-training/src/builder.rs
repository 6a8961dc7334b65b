use std::path::Path;
use std::time::Duration;

use poemforge_core::{GenerationRequest, Message, Poem, TextGenerator};
use serde::{Deserialize, Serialize};

use crate::TrainingError;
use crate::prompts::{
    GENERATOR_SYSTEM_MESSAGE, META_PROMPT, PROMPT_MAX_TOKENS, PROMPT_TEMPERATURES,
    assistant_reply, task_description,
};

pub const DEFAULT_PROMPTS_PER_POEM: usize = 5;
pub const DEFAULT_VALIDATION_RATIO: f64 = 0.2;
pub const DEFAULT_PROMPT_MODEL: &str = "gpt-4o-2024-08-06";

/// One chat-format fine-tuning example.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatExample {
    pub messages: Vec<Message>,
}

/// Shuffled examples split into training and validation sets.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub training: Vec<ChatExample>,
    pub validation: Vec<ChatExample>,
}

#[derive(Debug, Clone)]
pub struct TrainingOptions {
    pub prompts_per_poem: usize,
    /// Fraction of examples (rounded down) held out for validation.
    pub validation_ratio: f64,
    /// Pause after every generation request.
    pub delay: Duration,
}

impl Default for TrainingOptions {
    fn default() -> Self {
        Self {
            prompts_per_poem: DEFAULT_PROMPTS_PER_POEM,
            validation_ratio: DEFAULT_VALIDATION_RATIO,
            delay: Duration::from_secs(1),
        }
    }
}

/// Progress events emitted while the dataset is built.
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    PromptGenerated {
        title: String,
        variant: usize,
        variants: usize,
    },
    PoemDone {
        index: usize,
        total: usize,
        title: String,
    },
}

#[derive(Deserialize)]
struct PoemInput {
    title: Option<String>,
    content: Option<String>,
}

/// Load a JSON array of `{title, content}` records.
///
/// A missing title becomes "Untitled", missing content becomes empty; both are trimmed.
pub fn load_poems(path: &Path) -> Result<Vec<Poem>, TrainingError> {
    let data = std::fs::read_to_string(path)?;
    let inputs: Vec<PoemInput> = serde_json::from_str(&data)?;
    Ok(inputs
        .into_iter()
        .map(|p| {
            Poem::new(
                p.title.as_deref().unwrap_or("Untitled").trim(),
                p.content.as_deref().unwrap_or("").trim(),
            )
        })
        .collect())
}

/// Ask the model for two creative prompts leading to this poem and keep one.
///
/// If the reply has no newline it is returned whole; otherwise it is split at
/// the first newline and one half is picked at random.
pub async fn generate_creative_prompt(
    generator: &dyn TextGenerator,
    title: &str,
    content: &str,
    rng: &mut fastrand::Rng,
) -> Result<String, TrainingError> {
    let temperature = PROMPT_TEMPERATURES[rng.usize(..PROMPT_TEMPERATURES.len())];
    let request = GenerationRequest::new(
        vec![
            Message::system(META_PROMPT),
            Message::user(task_description(title, content)),
        ],
        temperature,
        PROMPT_MAX_TOKENS,
    );

    let reply = generator
        .generate(&request)
        .await
        .map_err(|source| TrainingError::Generation {
            title: title.to_string(),
            source,
        })?;
    let reply = reply.trim();

    match reply.split_once('\n') {
        None => Ok(reply.to_string()),
        Some((first, second)) => {
            let picked = if rng.bool() { first } else { second };
            Ok(picked.trim().to_string())
        }
    }
}

/// Build `n` chat examples for one poem, each with a freshly generated prompt.
pub async fn build_examples_for_poem(
    generator: &dyn TextGenerator,
    poem: &Poem,
    options: &TrainingOptions,
    rng: &mut fastrand::Rng,
    progress: &dyn Fn(ProgressEvent),
) -> Result<Vec<ChatExample>, TrainingError> {
    let title = poem.title.trim();
    let content = poem.content.trim();
    let n = options.prompts_per_poem;
    let mut examples = Vec::with_capacity(n);

    for variant in 1..=n {
        let prompt = generate_creative_prompt(generator, title, content, rng).await?;
        examples.push(ChatExample {
            messages: vec![
                Message::system(GENERATOR_SYSTEM_MESSAGE),
                Message::user(prompt),
                Message::assistant(assistant_reply(title, content)),
            ],
        });
        tracing::debug!(title, variant, "generated prompt variant");
        progress(ProgressEvent::PromptGenerated {
            title: title.to_string(),
            variant,
            variants: n,
        });
        if !options.delay.is_zero() {
            tokio::time::sleep(options.delay).await;
        }
    }
    Ok(examples)
}

/// Generate examples for every poem, then shuffle and split them.
///
/// Poems are processed strictly in order; the first generation failure
/// aborts the whole run and nothing is returned.
pub async fn build_dataset(
    generator: &dyn TextGenerator,
    poems: &[Poem],
    options: &TrainingOptions,
    rng: &mut fastrand::Rng,
    progress: &dyn Fn(ProgressEvent),
) -> Result<Dataset, TrainingError> {
    if !(0.0..=1.0).contains(&options.validation_ratio) {
        return Err(TrainingError::InvalidRatio(options.validation_ratio));
    }

    let mut all = Vec::with_capacity(poems.len() * options.prompts_per_poem);
    for (index, poem) in poems.iter().enumerate() {
        let examples = build_examples_for_poem(generator, poem, options, rng, progress).await?;
        all.extend(examples);
        tracing::info!(title = %poem.title, index = index + 1, total = poems.len(), "processed poem");
        progress(ProgressEvent::PoemDone {
            index: index + 1,
            total: poems.len(),
            title: poem.title.clone(),
        });
    }

    Ok(split_examples(all, options.validation_ratio, rng))
}

/// Shuffle and hold out `floor(len * ratio)` examples for validation.
pub fn split_examples(
    mut examples: Vec<ChatExample>,
    validation_ratio: f64,
    rng: &mut fastrand::Rng,
) -> Dataset {
    rng.shuffle(&mut examples);
    let n_validation = ((examples.len() as f64) * validation_ratio) as usize;
    let training = examples.split_off(n_validation.min(examples.len()));
    Dataset {
        training,
        validation: examples,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use poemforge_core::generator::mock::{MockGenerator, MockResponse};

    fn example(tag: &str) -> ChatExample {
        ChatExample {
            messages: vec![Message::user(tag)],
        }
    }

    #[test]
    fn split_rounds_validation_down() {
        let mut rng = fastrand::Rng::with_seed(7);
        let examples: Vec<_> = (0..9).map(|i| example(&i.to_string())).collect();
        let dataset = split_examples(examples, 0.2, &mut rng);
        assert_eq!(dataset.validation.len(), 1);
        assert_eq!(dataset.training.len(), 8);
    }

    #[test]
    fn split_extremes() {
        let mut rng = fastrand::Rng::with_seed(1);
        let all: Vec<_> = (0..4).map(|i| example(&i.to_string())).collect();
        let none = split_examples(all.clone(), 0.0, &mut rng);
        assert_eq!((none.training.len(), none.validation.len()), (4, 0));
        let every = split_examples(all, 1.0, &mut rng);
        assert_eq!((every.training.len(), every.validation.len()), (0, 4));
    }

    #[tokio::test]
    async fn single_line_reply_is_used_whole() {
        let mock = MockGenerator::always("Write a poem about fog.");
        let mut rng = fastrand::Rng::with_seed(3);
        let prompt = generate_creative_prompt(&mock, "Fog", "The fog comes", &mut rng)
            .await
            .unwrap();
        assert_eq!(prompt, "Write a poem about fog.");

        let request = &mock.requests()[0];
        assert_eq!(request.max_tokens, 1500);
        assert!(PROMPT_TEMPERATURES.contains(&request.temperature));
        assert_eq!(request.messages[0].content, META_PROMPT);
        assert!(request.messages[1].content.starts_with("Poem Title: Fog"));
    }

    #[tokio::test]
    async fn two_line_reply_picks_one_half() {
        let mock = MockGenerator::always("  Detailed prompt here.  \n  Simple prompt.\n");
        let mut rng = fastrand::Rng::with_seed(11);
        for _ in 0..10 {
            let prompt = generate_creative_prompt(&mock, "Fog", "x", &mut rng)
                .await
                .unwrap();
            assert!(
                prompt == "Detailed prompt here." || prompt == "Simple prompt.",
                "unexpected prompt {prompt:?}"
            );
        }
    }

    #[tokio::test]
    async fn generation_failure_names_the_poem() {
        let mock = MockGenerator::new("broken", MockResponse::Error("boom".into()));
        let mut rng = fastrand::Rng::with_seed(0);
        let err = generate_creative_prompt(&mock, "Fog", "x", &mut rng)
            .await
            .unwrap_err();
        match err {
            TrainingError::Generation { title, .. } => assert_eq!(title, "Fog"),
            other => panic!("unexpected error: {other}"),
        }
    }
}

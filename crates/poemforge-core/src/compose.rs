//! One-off poem generation from a free-text prompt, as served by the web form.

use crate::{GenerationError, GenerationRequest, Message, TextGenerator};

pub const COMPOSE_SYSTEM_MESSAGE: &str = "You are a creative poem generator, fine-tuned to write in Frank O\u{2019}Hara\u{2019}s style. Only return the poem text\u{2014}do not repeat the prompt or add extra headings.";

pub const COMPOSE_TEMPERATURE: f32 = 0.7;
pub const COMPOSE_MAX_TOKENS: u32 = 500;

/// Drop lines where the model echoed a heading or the user prompt.
///
/// Removes lines starting with `title:` (any case) and lines containing
/// `User Prompt`, then trims the result.
pub fn clean_poem_output(poem: &str) -> String {
    poem.split('\n')
        .filter(|line| !line.to_lowercase().starts_with("title:") && !line.contains("User Prompt"))
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

/// Generate a poem for `prompt` and clean up the reply.
pub async fn compose_poem(
    generator: &dyn TextGenerator,
    prompt: &str,
) -> Result<String, GenerationError> {
    let request = GenerationRequest::new(
        vec![Message::system(COMPOSE_SYSTEM_MESSAGE), Message::user(prompt)],
        COMPOSE_TEMPERATURE,
        COMPOSE_MAX_TOKENS,
    );
    let raw = generator.generate(&request).await?;
    Ok(clean_poem_output(&raw))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::mock::{MockGenerator, MockResponse};

    #[test]
    fn clean_drops_title_and_prompt_echo() {
        let raw = "TITLE: Lunch Poem\nIt is 12:20 in New York\nUser Prompt: lunch\na Friday\n";
        assert_eq!(clean_poem_output(raw), "It is 12:20 in New York\na Friday");
    }

    #[test]
    fn clean_keeps_title_mid_line() {
        let raw = "the title: of nothing\n  Title: indented stays";
        assert_eq!(clean_poem_output(raw), raw);
    }

    #[test]
    fn clean_only_matches_exact_user_prompt_case() {
        assert_eq!(clean_poem_output("user prompt here"), "user prompt here");
    }

    #[tokio::test]
    async fn compose_sends_fixed_system_message() {
        let mock = MockGenerator::always("Title: X\nline one\nline two");
        let poem = compose_poem(&mock, "a poem about lunch").await.unwrap();
        assert_eq!(poem, "line one\nline two");

        let request = &mock.requests()[0];
        assert_eq!(request.messages[0].content, COMPOSE_SYSTEM_MESSAGE);
        assert_eq!(request.messages[1].content, "a poem about lunch");
        assert_eq!(request.max_tokens, 500);
        assert_eq!(request.temperature, 0.7);
    }

    #[tokio::test]
    async fn compose_propagates_errors() {
        let mock = MockGenerator::new("down", MockResponse::Error("unavailable".into()));
        assert!(compose_poem(&mock, "x").await.is_err());
    }
}

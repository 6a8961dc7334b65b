//! Fixed prompt text used when synthesizing training conversations.

/// System prompt asking the model for one detailed and one simple creative prompt.
pub const META_PROMPT: &str = "\
<reasoning>
- Simple Change: yes
- Reasoning: no
- Structure: yes
- Examples: yes
- Complexity: 1
- Specificity: 1
- Prioritization: prompt clarity and variety
- Conclusion: Generate two creative prompts for an AI poem generator: one detailed (rich in style, tone, and imagery) and one simple (direct and concise). Separate the two outputs with a newline.
</reasoning>
Generate two creative prompts to guide an AI poem generator:
1. A detailed prompt with rich instructions on style, tone, and imagery.
2. A simple, direct prompt that states the task plainly.
Do not include any extra commentary. Separate the two prompts with a newline.";

/// System message placed at the head of every training conversation.
pub const GENERATOR_SYSTEM_MESSAGE: &str = "You are a creative poem generator. Generate a poem in the style of Frank O\u{2019}Hara based on the instructions provided.";

/// Sampling temperatures picked from at random, to vary between detailed and simple prompts.
pub const PROMPT_TEMPERATURES: [f32; 3] = [0.5, 0.7, 0.9];

pub const PROMPT_MAX_TOKENS: u32 = 1500;

/// User message describing the poem the prompts should lead back to.
pub fn task_description(title: &str, content: &str) -> String {
    format!(
        "Poem Title: {title}\n\
         Poem Content:\n{content}\n\n\
         Generate two creative prompts that instruct an AI poem generator to compose a poem similar in style, tone, and imagery to the above. \
         The first prompt should be detailed and elaborate, while the second should be simple and direct (e.g., 'Write a poem about being gay in the 1960s'). \
         Separate the two prompts with a newline."
    )
}

/// Assistant turn: the original poem the fine-tuned model should produce.
pub fn assistant_reply(title: &str, content: &str) -> String {
    format!("Title: {title}\nContent:\n{content}")
}

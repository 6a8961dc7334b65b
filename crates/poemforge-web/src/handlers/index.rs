use std::sync::Arc;

use axum::Form;
use axum::extract::State;
use axum::response::Html;
use serde::Deserialize;

use crate::state::AppState;
use crate::template;

#[derive(Debug, Deserialize)]
pub struct PromptForm {
    #[serde(default)]
    pub prompt: String,
}

pub async fn index() -> Html<String> {
    template::render_index("", None)
}

/// Generate a poem for the submitted prompt. Failures are shown on the page.
pub async fn generate(
    State(state): State<Arc<AppState>>,
    Form(form): Form<PromptForm>,
) -> Html<String> {
    if form.prompt.is_empty() {
        return template::render_index("", None);
    }

    let result = match poemforge_core::compose_poem(state.generator.as_ref(), &form.prompt).await
    {
        Ok(poem) => poem,
        Err(e) => {
            tracing::warn!(error = %e, "poem generation failed");
            format!("Error: {}", e)
        }
    };
    let shown = (!result.is_empty()).then_some(result.as_str());
    template::render_index(&form.prompt, shown)
}

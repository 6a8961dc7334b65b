use axum::response::Html;

const INDEX_HTML: &str = include_str!("../templates/index.html");

/// Render the form page, refilling the prompt and showing the result if there is one.
pub fn render_index(prompt: &str, result: Option<&str>) -> Html<String> {
    let result_block = match result {
        Some(text) => format!(
            "<h2>Generated Poem:</h2>\n    <pre class=\"poem\">{}</pre>",
            html_escape(text)
        ),
        None => String::new(),
    };
    let html = INDEX_HTML
        .replace("{{ user_prompt }}", &html_escape(prompt))
        .replace("{{ result }}", &result_block);
    Html(html)
}

pub fn html_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

use std::net::SocketAddr;
use std::sync::Arc;

use poemforge_core::OpenAiGenerator;
use poemforge_core::config_file;

mod handlers;
mod state;
mod template;

use state::AppState;

const DEFAULT_BIND: &str = "127.0.0.1:5000";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let config = config_file::load_config();

    let model = std::env::var("MODEL_ID")
        .ok()
        .or_else(|| config.fine_tuned_model().map(String::from))
        .ok_or_else(|| {
            anyhow::anyhow!("MODEL_ID is not set (env, .env, or [openai] fine_tuned_model)")
        })?;
    let generator = OpenAiGenerator::from_env_or_config(&config, model)?;
    tracing::info!(model = generator.model(), "using fine-tuned model");

    let state = Arc::new(AppState {
        generator: Arc::new(generator),
    });

    let app = axum::Router::new()
        .route(
            "/",
            axum::routing::get(handlers::index::index).post(handlers::index::generate),
        )
        .with_state(state);

    let bind = std::env::var("POEMFORGE_BIND")
        .ok()
        .or_else(|| config.web_bind().map(String::from))
        .unwrap_or_else(|| DEFAULT_BIND.to_string());
    let addr: SocketAddr = bind
        .parse()
        .map_err(|e| anyhow::anyhow!("invalid bind address {bind:?}: {e}"))?;

    println!("Listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

use std::sync::Arc;

use poemforge_core::TextGenerator;

/// Shared application state accessible from all handlers.
pub struct AppState {
    pub generator: Arc<dyn TextGenerator>,
}

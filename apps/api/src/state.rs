use crate::config::Config;
use crate::render::StoryRenderer;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Holds the image source and page geometry; cheap to clone.
    pub renderer: StoryRenderer,
}

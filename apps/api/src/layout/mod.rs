// Story Layout Engine
// Implements: column resolution around a side image, greedy line wrap, page overflow,
// bordered and numbered pages. Pure and synchronous; the renderer runs it inside
// tokio::task::spawn_blocking.

pub mod column;
pub mod document;
pub mod flow;
pub mod font_metrics;
pub mod hero;
pub mod story;

// Re-export the public API consumed by other modules (renderer, handlers, state).
pub use document::Document;
pub use font_metrics::{default_page_geometry, PageGeometry, PageSize};
pub use story::layout_story;

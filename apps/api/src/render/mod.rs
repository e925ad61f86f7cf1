//! Story Renderer: the one entry point that turns a `Story` into output.
//!
//! # Pipeline
//! 1. Fetch the hero image bytes (the only await before layout). Failures are logged
//!    and the story renders without an image.
//! 2. Inside `spawn_blocking`: decode the image, lay the story out, and for the PDF
//!    sinks serialize the document.
//! 3. Wrap the bytes for the requested sink (`Download` or `PrintView`).
//!
//! The renderer holds only immutable shared state, so one instance serves every request.

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use thiserror::Error;
use tracing::{info, info_span, warn, Instrument, Span};
use uuid::Uuid;

use crate::image_client::decode::decode_hero;
use crate::image_client::ImageSource;
use crate::layout::{layout_story, Document, PageGeometry};
use crate::models::story::Story;

pub mod handlers;
pub mod pdf;
pub mod sinks;

use pdf::{write_pdf, PdfError};
use sinks::{Download, PrintView};

#[derive(Debug, Error)]
pub enum RenderError {
    #[error(transparent)]
    Pdf(#[from] PdfError),

    #[error("render task failed: {0}")]
    Join(String),
}

#[derive(Clone)]
pub struct StoryRenderer {
    source: Arc<dyn ImageSource>,
    geometry: PageGeometry,
    print_fallback: Duration,
}

impl StoryRenderer {
    pub fn new(source: Arc<dyn ImageSource>, geometry: PageGeometry, print_fallback: Duration) -> Self {
        Self {
            source,
            geometry,
            print_fallback,
        }
    }

    /// Lays the story out without serializing it.
    pub async fn layout(&self, story: &Story) -> Result<Document, RenderError> {
        self.run(story, |_, doc| Ok(doc))
            .instrument(render_span("layout"))
            .await
    }

    /// Renders the story to PDF bytes.
    pub async fn render_to_bytes(&self, story: &Story) -> Result<Vec<u8>, RenderError> {
        self.run(story, |story, doc| {
            let bytes = write_pdf(&doc, &story.title)?;
            info!(
                "rendered '{}': {} page(s), {} bytes",
                story.title,
                doc.page_count(),
                bytes.len()
            );
            Ok(bytes)
        })
        .instrument(render_span("pdf"))
        .await
    }

    /// Save sink: the PDF as a named download.
    pub async fn save_to_file(&self, story: &Story) -> Result<Download, RenderError> {
        let bytes = self.render_to_bytes(story).await?;
        Ok(Download::new(&story.title, bytes))
    }

    /// Print sink: an HTML page that embeds the PDF and opens the print dialog.
    pub async fn open_for_print(&self, story: &Story) -> Result<PrintView, RenderError> {
        let bytes = self.render_to_bytes(story).await?;
        Ok(PrintView::new(&story.title, &bytes, self.print_fallback))
    }

    /// Fetches the hero image, then runs decode, layout and `finish` on the blocking pool.
    async fn run<T, F>(&self, story: &Story, finish: F) -> Result<T, RenderError>
    where
        T: Send + 'static,
        F: FnOnce(&Story, Document) -> Result<T, RenderError> + Send + 'static,
    {
        let hero_bytes = self.fetch_hero(story).await;

        let story = story.clone();
        let geometry = self.geometry.clone();
        let span = Span::current();

        tokio::task::spawn_blocking(move || {
            let _entered = span.enter();
            let hero = hero_bytes.and_then(|bytes| match decode_hero(&bytes) {
                Ok(image) => Some(image),
                Err(e) => {
                    warn!("hero image could not be decoded, rendering without it: {e}");
                    None
                }
            });
            let doc = layout_story(&story, hero, &geometry);
            finish(&story, doc)
        })
        .await
        .map_err(|e| RenderError::Join(e.to_string()))?
    }

    async fn fetch_hero(&self, story: &Story) -> Option<Bytes> {
        let hero = story.hero_image.as_ref()?;
        match self.source.fetch(&hero.url).await {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                warn!("hero image fetch failed, rendering without it: {e}");
                None
            }
        }
    }
}

fn render_span(sink: &'static str) -> Span {
    info_span!("render", render_id = %Uuid::new_v4(), sink)
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::document::DrawOp;
    use crate::layout::{default_page_geometry, PageSize};
    use crate::models::story::Alignment;
    use crate::test_support::{gems_story, long_story, png_bytes, with_hero, StubImageSource};

    fn renderer(source: StubImageSource) -> StoryRenderer {
        StoryRenderer::new(
            Arc::new(source),
            default_page_geometry(PageSize::A4),
            Duration::from_millis(1500),
        )
    }

    fn has_image(doc: &Document) -> bool {
        doc.pages()[0]
            .ops
            .iter()
            .any(|op| matches!(op, DrawOp::Image(_)))
    }

    #[tokio::test]
    async fn test_layout_places_fetched_image() {
        let renderer = renderer(StubImageSource::Serves(png_bytes(200, 150)));
        let story = with_hero(long_story(3), Some(Alignment::Left));
        let doc = renderer.layout(&story).await.unwrap();
        assert!(has_image(&doc));
        assert!(doc.is_finalized());
    }

    #[tokio::test]
    async fn test_failed_fetch_matches_no_image_layout() {
        let story = long_story(5);
        let plain = renderer(StubImageSource::Fails).layout(&story).await.unwrap();

        let broken = renderer(StubImageSource::Fails)
            .layout(&with_hero(story, Some(Alignment::Right)))
            .await
            .unwrap();
        assert!(!has_image(&broken));
        assert_eq!(plain, broken);
    }

    #[tokio::test]
    async fn test_undecodable_image_matches_no_image_layout() {
        let story = long_story(5);
        let renderer = renderer(StubImageSource::Serves(b"<html>not an image</html>".to_vec()));
        let plain = renderer.layout(&story).await.unwrap();
        let broken = renderer
            .layout(&with_hero(story, Some(Alignment::Left)))
            .await
            .unwrap();
        assert_eq!(plain, broken);
    }

    #[tokio::test]
    async fn test_story_without_hero_never_fetches() {
        // A failing source must not matter when there is nothing to fetch.
        let doc = renderer(StubImageSource::Fails)
            .layout(&gems_story())
            .await
            .unwrap();
        assert_eq!(doc.page_count(), 1);
    }

    #[tokio::test]
    async fn test_render_to_bytes_is_pdf() {
        let bytes = renderer(StubImageSource::Fails)
            .render_to_bytes(&gems_story())
            .await
            .unwrap();
        assert!(bytes.starts_with(b"%PDF-"));
    }

    #[tokio::test]
    async fn test_failed_image_still_renders_pdf() {
        let story = with_hero(gems_story(), Some(Alignment::Center));
        let bytes = renderer(StubImageSource::Fails)
            .render_to_bytes(&story)
            .await
            .unwrap();
        assert!(bytes.starts_with(b"%PDF-"));
    }

    #[tokio::test]
    async fn test_save_to_file_names_download_after_title() {
        let download = renderer(StubImageSource::Fails)
            .save_to_file(&gems_story())
            .await
            .unwrap();
        assert_eq!(download.filename, "Gems.pdf");
        assert!(download.bytes.starts_with(b"%PDF-"));
    }

    #[tokio::test]
    async fn test_open_for_print_embeds_pdf() {
        let view = renderer(StubImageSource::Fails)
            .open_for_print(&gems_story())
            .await
            .unwrap();
        assert!(view.html.contains("application/pdf"));
        assert!(view.html.contains("setTimeout(triggerPrint, 1500)"));
        assert!(view.html.contains("<title>Gems</title>"));
    }
}

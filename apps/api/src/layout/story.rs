//! Story layout: the single forward pass from a `Story` to a finalized `Document`.
//!
//! Order on the page: hero image (if any), title, rule, genre, read time, rule, body
//! paragraphs. Page numbers are stamped once everything is placed.

use crate::image_client::decode::DecodedImage;
use crate::layout::document::Document;
use crate::layout::flow::{
    draw_rule, flow_text, split_paragraphs, LayoutCursor, WrapStyle, PARAGRAPH_GAP,
};
use crate::layout::font_metrics::PageGeometry;
use crate::layout::hero::embed_hero;
use crate::models::story::Story;

/// Lays out a story. `hero` is the already decoded hero image, or `None` when the story
/// has none or it could not be loaded; the two cases produce identical text layout.
pub fn layout_story(story: &Story, hero: Option<DecodedImage>, geometry: &PageGeometry) -> Document {
    let mut doc = Document::new(geometry.clone());
    let mut cursor = LayoutCursor::top_of(0, geometry);

    let alignment = story.hero_image.as_ref().and_then(|h| h.alignment);
    let side_image = hero.and_then(|image| embed_hero(&mut doc, &mut cursor, image, alignment));
    let side_image = side_image.as_ref();

    flow_text(&mut doc, &mut cursor, side_image, &story.title, &WrapStyle::title());
    draw_rule(&mut doc, &mut cursor, side_image);

    let metadata = WrapStyle::metadata();
    flow_text(
        &mut doc,
        &mut cursor,
        side_image,
        &format!("Genre: {}", story.genre),
        &metadata,
    );
    flow_text(
        &mut doc,
        &mut cursor,
        side_image,
        &format!("Read Time: {}", story.read_time),
        &metadata,
    );
    draw_rule(&mut doc, &mut cursor, side_image);

    let body = WrapStyle::body();
    for paragraph in split_paragraphs(&story.body) {
        flow_text(&mut doc, &mut cursor, side_image, &paragraph, &body);
        cursor.y -= PARAGRAPH_GAP;
    }

    doc.finalize();
    doc
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

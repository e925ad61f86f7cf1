//! Image Embedder (placement half): scales the decoded hero image and draws it on page 1.
//!
//! Side-aligned images leave a `SideImage` behind for the column resolver; centered or
//! unaligned images only push the cursor below themselves.

use std::sync::Arc;

use tracing::debug;

use crate::image_client::decode::DecodedImage;
use crate::layout::column::{HeroImageRect, Side, SideImage};
use crate::layout::document::{DrawOp, Document, ImagePlacement};
use crate::layout::flow::LayoutCursor;
use crate::models::story::Alignment;

/// Share of the text width a side-aligned image may take.
pub const SIDE_WIDTH_FRACTION: f32 = 0.4;
/// Space between a centered image and the first line below it.
pub const IMAGE_BOTTOM_GAP: f32 = 20.0;

fn side_of(alignment: Option<Alignment>) -> Option<Side> {
    match alignment {
        Some(Alignment::Left) => Some(Side::Left),
        Some(Alignment::Right) => Some(Side::Right),
        Some(Alignment::Center) | None => None,
    }
}

/// Computes where the image goes on page 1.
///
/// 1 px maps to 1 pt. The image is never upscaled, never wider than its share of
/// the text width and never taller than the space between the margins.
pub fn place_hero(
    doc: &Document,
    image: &DecodedImage,
    alignment: Option<Alignment>,
) -> HeroImageRect {
    let geometry = doc.geometry();
    let available = geometry.content_width();
    let fraction = if side_of(alignment).is_some() {
        SIDE_WIDTH_FRACTION
    } else {
        1.0
    };

    let (intrinsic_w, intrinsic_h) = (image.width as f32, image.height as f32);
    let scale = (available * fraction / intrinsic_w)
        .min(geometry.content_height() / intrinsic_h)
        .min(1.0);
    let (width, height) = (intrinsic_w * scale, intrinsic_h * scale);

    let x = match alignment {
        Some(Alignment::Left) => geometry.margin_pt,
        Some(Alignment::Right) => geometry.width_pt - geometry.margin_pt - width,
        Some(Alignment::Center) | None => geometry.margin_pt + (available - width) / 2.0,
    };

    HeroImageRect {
        x,
        y: geometry.top() - height,
        width,
        height,
    }
}

/// Draws the hero image on page 1.
///
/// Returns the side image the flow must route text around, or `None` for a centered
/// image, in which case the cursor has been moved below it.
pub fn embed_hero(
    doc: &mut Document,
    cursor: &mut LayoutCursor,
    image: DecodedImage,
    alignment: Option<Alignment>,
) -> Option<SideImage> {
    let rect = place_hero(doc, &image, alignment);
    debug!(
        "hero image {:?} {}x{}px placed at ({:.1}, {:.1}) size {:.1}x{:.1}pt",
        image.format, image.width, image.height, rect.x, rect.y, rect.width, rect.height
    );
    doc.push(
        0,
        DrawOp::Image(ImagePlacement {
            rect,
            image: Arc::new(image),
        }),
    );

    match side_of(alignment) {
        Some(side) => Some(SideImage { rect, side }),
        None => {
            cursor.y = rect.y - IMAGE_BOTTOM_GAP;
            None
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

//! Column Layout Resolver: the horizontal text band available at a vertical position.
//!
//! Pure function of the cursor, the line height and the side image (if any). The flow
//! calls it before every line, so the column can change between two consecutive lines
//! as the cursor crosses out of the image's vertical extent.

use serde::{Deserialize, Serialize};

use crate::layout::font_metrics::PageGeometry;

/// Horizontal gap kept between a side image and the text beside it.
pub const SIDE_IMAGE_GAP: f32 = 15.0;

/// Narrowest column the resolver will hand out beside a side image.
pub const MIN_COLUMN_WIDTH: f32 = 72.0;

/// Hero image bounds in page points; `y` is the bottom edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeroImageRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl HeroImageRect {
    pub fn top(&self) -> f32 {
        self.y + self.height
    }

    /// True when the band `[bottom, top]` intersects the image's vertical extent.
    pub fn overlaps_band(&self, bottom: f32, top: f32) -> bool {
        !(bottom > self.top() || top < self.y)
    }
}

/// Which margin a side-aligned hero image is flush against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
}

/// A side-aligned hero image on page 1: the only thing that ever narrows the column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SideImage {
    pub rect: HeroImageRect,
    pub side: Side,
}

/// The band a single line may occupy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnRegion {
    pub x: f32,
    pub max_width: f32,
}

impl ColumnRegion {
    /// The band used when nothing floats beside the text.
    pub fn full(geometry: &PageGeometry) -> Self {
        Self {
            x: geometry.margin_pt,
            max_width: geometry.content_width(),
        }
    }
}

/// Resolves the column for a line whose top sits at `y`.
///
/// The line occupies `[y - line_height, y]`. With no side image, or no overlap, the
/// full band between the margins is returned. Beside a left image the text starts
/// after the image plus `SIDE_IMAGE_GAP`; beside a right image it stops before it.
/// A narrowed width never drops below `MIN_COLUMN_WIDTH`, and the column never
/// reaches past the right margin.
pub fn resolve_column(
    geometry: &PageGeometry,
    y: f32,
    line_height: f32,
    side_image: Option<&SideImage>,
) -> ColumnRegion {
    let full = ColumnRegion::full(geometry);
    let Some(side_image) = side_image else {
        return full;
    };
    let rect = &side_image.rect;
    if !rect.overlaps_band(y - line_height, y) {
        return full;
    }

    match side_image.side {
        Side::Left => {
            let right_edge = geometry.width_pt - geometry.margin_pt;
            let x = (rect.x + rect.width + SIDE_IMAGE_GAP).min(right_edge - MIN_COLUMN_WIDTH);
            ColumnRegion {
                x,
                max_width: right_edge - x,
            }
        }
        Side::Right => ColumnRegion {
            x: geometry.margin_pt,
            max_width: (rect.x - geometry.margin_pt - SIDE_IMAGE_GAP).max(MIN_COLUMN_WIDTH),
        },
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

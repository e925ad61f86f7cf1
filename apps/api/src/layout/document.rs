//! Document & Page Manager: owns the page sequence and its decoration.
//!
//! A `Document` is a display list: each `Page` holds the draw operations produced by
//! the flow, in paint order. Nothing here knows about words or images beyond storing
//! the ops; `render::pdf` is the only consumer that turns them into bytes.

use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::image_client::decode::DecodedImage;
use crate::layout::column::HeroImageRect;
use crate::layout::font_metrics::{get_metrics, FontFace, PageGeometry};

// ────────────────────────────────────────────────────────────────────────────
// Draw operations
// ────────────────────────────────────────────────────────────────────────────

/// An RGB colour with channels in 0.0..=1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RgbColor {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl RgbColor {
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }
}

/// One stroked rectangle of the page border, inset from every page edge.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BorderStroke {
    pub inset: f32,
    pub thickness: f32,
    pub color: RgbColor,
}

/// A single drawn line of text.
///
/// `top` is the cursor position the line was laid out at; the line occupies the
/// band `[top - line_height, top]`. `column_width` is the width the column resolver
/// granted, kept so previews can show where the text band was narrowed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextRun {
    pub text: String,
    pub face: FontFace,
    pub size: f32,
    pub color: RgbColor,
    pub x: f32,
    pub baseline: f32,
    pub top: f32,
    pub line_height: f32,
    pub column_width: f32,
}

/// A horizontal rule between the header blocks.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RuleLine {
    pub x1: f32,
    pub x2: f32,
    pub y: f32,
    pub thickness: f32,
    pub color: RgbColor,
}

/// The hero image drawn at its final position.
#[derive(Debug, Clone, PartialEq)]
pub struct ImagePlacement {
    pub rect: HeroImageRect,
    pub image: Arc<DecodedImage>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Border(BorderStroke),
    Text(TextRun),
    Rule(RuleLine),
    Image(ImagePlacement),
    PageNumber(TextRun),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub ops: Vec<DrawOp>,
}

impl Page {
    /// Text lines in paint order, excluding the page number.
    pub fn lines(&self) -> impl Iterator<Item = &TextRun> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text(run) => Some(run),
            _ => None,
        })
    }

    #[cfg(test)]
    pub fn page_number(&self) -> Option<&TextRun> {
        self.ops.iter().find_map(|op| match op {
            DrawOp::PageNumber(run) => Some(run),
            _ => None,
        })
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Decoration constants
// ────────────────────────────────────────────────────────────────────────────

/// Outer, middle and inner border: each with its own weight and colour.
const BORDER_STROKES: [BorderStroke; 3] = [
    BorderStroke {
        inset: 20.0,
        thickness: 2.0,
        color: RgbColor::new(0.36, 0.25, 0.20),
    },
    BorderStroke {
        inset: 25.0,
        thickness: 1.0,
        color: RgbColor::new(0.72, 0.58, 0.30),
    },
    BorderStroke {
        inset: 30.0,
        thickness: 0.5,
        color: RgbColor::new(0.60, 0.60, 0.60),
    },
];

const PAGE_NUMBER_SIZE: f32 = 10.0;
/// Distance of the page-number baseline below the bottom margin.
const PAGE_NUMBER_DROP: f32 = 16.0;
const PAGE_NUMBER_COLOR: RgbColor = RgbColor::new(0.35, 0.35, 0.35);

// ────────────────────────────────────────────────────────────────────────────
// Document
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    geometry: PageGeometry,
    pages: Vec<Page>,
    finalized: bool,
}

impl Document {
    /// Creates a document holding one bordered page.
    pub fn new(geometry: PageGeometry) -> Self {
        let mut doc = Self {
            geometry,
            pages: Vec::new(),
            finalized: false,
        };
        doc.add_page();
        doc
    }

    /// Appends a bordered page and returns its index, which becomes the current page.
    pub fn add_page(&mut self) -> usize {
        let ops = BORDER_STROKES.iter().cloned().map(DrawOp::Border).collect();
        self.pages.push(Page { ops });
        let index = self.pages.len() - 1;
        debug!("allocated page {}", index + 1);
        index
    }

    /// Appends a draw op to the page at `page`.
    ///
    /// `page` must be an index previously returned by `add_page` (or 0).
    pub fn push(&mut self, page: usize, op: DrawOp) {
        self.pages[page].ops.push(op);
    }

    /// Stamps a centered page number on every page. A second call is a no-op.
    pub fn finalize(&mut self) {
        if self.finalized {
            return;
        }
        let metrics = get_metrics(FontFace::Regular);
        let baseline = self.geometry.margin_pt - PAGE_NUMBER_DROP;
        let page_width = self.geometry.width_pt;

        for (i, page) in self.pages.iter_mut().enumerate() {
            let label = (i + 1).to_string();
            let width = metrics.measure_pt(&label, PAGE_NUMBER_SIZE);
            page.ops.push(DrawOp::PageNumber(TextRun {
                x: (page_width - width) / 2.0,
                baseline,
                top: baseline + PAGE_NUMBER_SIZE,
                line_height: PAGE_NUMBER_SIZE,
                column_width: width,
                text: label,
                face: FontFace::Regular,
                size: PAGE_NUMBER_SIZE,
                color: PAGE_NUMBER_COLOR,
            }));
        }
        self.finalized = true;
    }

    pub fn geometry(&self) -> &PageGeometry {
        &self.geometry
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    #[cfg(test)]
    pub fn is_finalized(&self) -> bool {
        self.finalized
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

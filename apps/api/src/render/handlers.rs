//! Axum route handlers for the Stories API.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::errors::AppError;
use crate::layout::column::HeroImageRect;
use crate::layout::document::{DrawOp, RuleLine};
use crate::layout::font_metrics::FontFace;
use crate::layout::{Document, PageSize};
use crate::models::story::Story;
use crate::render::sinks::{Download, PrintView};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutPreview {
    pub page_size: PageSize,
    pub page_width: f32,
    pub page_height: f32,
    pub margin: f32,
    pub page_count: usize,
    pub hero_image: Option<HeroImageRect>,
    pub pages: Vec<PagePreview>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PagePreview {
    pub number: usize,
    pub lines: Vec<LinePreview>,
    pub rules: Vec<RuleLine>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinePreview {
    pub text: String,
    pub face: FontFace,
    pub size: f32,
    pub x: f32,
    /// Baseline, in page points from the bottom edge.
    pub y: f32,
    pub column_width: f32,
}

impl From<&Document> for LayoutPreview {
    fn from(doc: &Document) -> Self {
        let geometry = doc.geometry();
        let mut hero_image = None;

        let pages = doc
            .pages()
            .iter()
            .enumerate()
            .map(|(i, page)| {
                let mut lines = Vec::new();
                let mut rules = Vec::new();
                for op in &page.ops {
                    match op {
                        DrawOp::Text(run) => lines.push(LinePreview {
                            text: run.text.clone(),
                            face: run.face,
                            size: run.size,
                            x: run.x,
                            y: run.baseline,
                            column_width: run.column_width,
                        }),
                        DrawOp::Rule(rule) => rules.push(rule.clone()),
                        DrawOp::Image(placement) => hero_image = Some(placement.rect),
                        DrawOp::Border(_) | DrawOp::PageNumber(_) => {}
                    }
                }
                PagePreview {
                    number: i + 1,
                    lines,
                    rules,
                }
            })
            .collect();

        LayoutPreview {
            page_size: geometry.size,
            page_width: geometry.width_pt,
            page_height: geometry.height_pt,
            margin: geometry.margin_pt,
            page_count: doc.page_count(),
            hero_image,
            pages,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/stories/pdf
///
/// Renders the story and returns the PDF as a file download. A blank title still
/// renders; the download is then named `story.pdf`.
pub async fn handle_render_pdf(
    State(state): State<AppState>,
    Json(story): Json<Story>,
) -> Result<Download, AppError> {
    Ok(state.renderer.save_to_file(&story).await?)
}

/// POST /api/v1/stories/print
///
/// Renders the story and returns an HTML page that opens the print dialog on it.
pub async fn handle_render_print(
    State(state): State<AppState>,
    Json(story): Json<Story>,
) -> Result<PrintView, AppError> {
    Ok(state.renderer.open_for_print(&story).await?)
}

/// POST /api/v1/stories/layout
///
/// Lays the story out and returns where every line, rule and the hero image landed.
pub async fn handle_layout_preview(
    State(state): State<AppState>,
    Json(story): Json<Story>,
) -> Result<Json<LayoutPreview>, AppError> {
    let doc = state.renderer.layout(&story).await?;
    Ok(Json(LayoutPreview::from(&doc)))
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

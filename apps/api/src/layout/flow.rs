//! Text Flow Engine: greedy word wrap with on-demand pagination.
//!
//! # Algorithm
//! For each word, the candidate line (`current + " " + word`) is measured against the
//! column resolved at the cursor. If it fits it replaces `current`; otherwise `current`
//! is flushed and the word starts a new line on its own. A word wider than the column
//! is still placed, alone on its line, so every word is drawn and the loop always ends.
//!
//! Every flush first checks whether the line's band would cross the bottom margin; if
//! so the document allocates a page and the line lands at the top of it. One routine
//! serves the title, the metadata rows and the body; only the `WrapStyle` differs.

use serde::Serialize;

use crate::layout::column::{resolve_column, ColumnRegion, SideImage};
use crate::layout::document::{DrawOp, Document, RgbColor, RuleLine, TextRun};
use crate::layout::font_metrics::{get_metrics, FontFace, PageGeometry};

/// Vertical space consumed by a rule (the rule sits in its middle).
pub const RULE_GAP: f32 = 14.0;
/// Extra space after every body paragraph.
pub const PARAGRAPH_GAP: f32 = 8.0;

const RULE_THICKNESS: f32 = 0.75;
const RULE_COLOR: RgbColor = RgbColor::new(0.72, 0.58, 0.30);

// ────────────────────────────────────────────────────────────────────────────
// Cursor & style
// ────────────────────────────────────────────────────────────────────────────

/// The only mutable render state: which page the flow is on and how far down it is.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LayoutCursor {
    pub page: usize,
    pub y: f32,
}

impl LayoutCursor {
    /// A cursor at the top margin of `page`.
    pub fn top_of(page: usize, geometry: &PageGeometry) -> Self {
        Self {
            page,
            y: geometry.top(),
        }
    }

    /// Moves to a freshly allocated page.
    fn break_page(&mut self, doc: &mut Document) {
        self.page = doc.add_page();
        self.y = doc.geometry().top();
    }
}

/// Typography and pagination behaviour for one call site of `flow_text`.
#[derive(Debug, Clone, PartialEq)]
pub struct WrapStyle {
    pub face: FontFace,
    pub size: f32,
    pub color: RgbColor,
    pub line_height_multiplier: f32,
}

impl WrapStyle {
    pub fn title() -> Self {
        Self {
            face: FontFace::Bold,
            size: 24.0,
            color: RgbColor::new(0.13, 0.10, 0.08),
            line_height_multiplier: 1.2,
        }
    }

    pub fn metadata() -> Self {
        Self {
            face: FontFace::Italic,
            size: 12.0,
            color: RgbColor::new(0.35, 0.35, 0.35),
            line_height_multiplier: 1.4,
        }
    }

    pub fn body() -> Self {
        Self {
            face: FontFace::Regular,
            size: 12.0,
            color: RgbColor::new(0.0, 0.0, 0.0),
            line_height_multiplier: 1.5,
        }
    }

    pub fn line_height(&self) -> f32 {
        self.size * self.line_height_multiplier
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Flow
// ────────────────────────────────────────────────────────────────────────────

/// The column for a line at the cursor. The side image only exists on page 1.
fn column_at(
    geometry: &PageGeometry,
    cursor: &LayoutCursor,
    line_height: f32,
    side_image: Option<&SideImage>,
) -> ColumnRegion {
    let side_image = side_image.filter(|_| cursor.page == 0);
    resolve_column(geometry, cursor.y, line_height, side_image)
}

/// Word-wraps `text` into lines drawn at the cursor, advancing it past every line.
///
/// Whitespace of any kind separates words; empty or blank text draws nothing.
pub fn flow_text(
    doc: &mut Document,
    cursor: &mut LayoutCursor,
    side_image: Option<&SideImage>,
    text: &str,
    style: &WrapStyle,
) {
    let metrics = get_metrics(style.face);
    let line_height = style.line_height();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{current} {word}")
        };
        let column = column_at(doc.geometry(), cursor, line_height, side_image);

        if current.is_empty() || metrics.measure_pt(&candidate, style.size) <= column.max_width {
            current = candidate;
        } else {
            flush_line(doc, cursor, side_image, &current, style);
            current = word.to_string();
        }
    }

    if !current.is_empty() {
        flush_line(doc, cursor, side_image, &current, style);
    }
}

/// Draws one finished line at the cursor, moving to a new page first when the line's
/// band would cross the bottom margin. A fresh page is never broken again.
fn flush_line(
    doc: &mut Document,
    cursor: &mut LayoutCursor,
    side_image: Option<&SideImage>,
    line: &str,
    style: &WrapStyle,
) {
    let line_height = style.line_height();
    let geometry = doc.geometry();
    if cursor.y - line_height < geometry.margin_pt && cursor.y < geometry.top() {
        cursor.break_page(doc);
    }

    let column = column_at(doc.geometry(), cursor, line_height, side_image);
    doc.push(
        cursor.page,
        DrawOp::Text(TextRun {
            text: line.to_string(),
            face: style.face,
            size: style.size,
            color: style.color,
            x: column.x,
            baseline: cursor.y - style.size,
            top: cursor.y,
            line_height,
            column_width: column.max_width,
        }),
    );
    cursor.y -= line_height;
}

/// Draws a horizontal rule across the current column, then leaves `RULE_GAP` below the
/// previous content. Moves to a new page first if the rule would sit below the margin.
pub fn draw_rule(doc: &mut Document, cursor: &mut LayoutCursor, side_image: Option<&SideImage>) {
    if cursor.y - RULE_GAP < doc.geometry().margin_pt {
        cursor.break_page(doc);
    }

    let y = cursor.y - RULE_GAP / 2.0;
    let column = column_at(doc.geometry(), cursor, RULE_GAP, side_image);
    doc.push(
        cursor.page,
        DrawOp::Rule(RuleLine {
            x1: column.x,
            x2: column.x + column.max_width,
            y,
            thickness: RULE_THICKNESS,
            color: RULE_COLOR,
        }),
    );
    cursor.y -= RULE_GAP;
}

/// Splits a story body into paragraphs.
///
/// Paragraphs are separated by one or more blank (or whitespace-only) lines. Inside a
/// paragraph, single newlines are soft breaks and collapse to spaces.
pub fn split_paragraphs(body: &str) -> Vec<String> {
    let mut paragraphs = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in body.lines() {
        let line = line.trim();
        if line.is_empty() {
            if !current.is_empty() {
                paragraphs.push(current.join(" "));
                current.clear();
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        paragraphs.push(current.join(" "));
    }

    paragraphs
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::column::{HeroImageRect, Side};
    use crate::layout::font_metrics::{default_page_geometry, PageSize};

    fn make_doc() -> (Document, LayoutCursor) {
        let geometry = default_page_geometry(PageSize::A4);
        let cursor = LayoutCursor::top_of(0, &geometry);
        (Document::new(geometry), cursor)
    }

    fn all_lines(doc: &Document) -> Vec<&TextRun> {
        doc.pages().iter().flat_map(|p| p.lines()).collect()
    }

    // ── split_paragraphs ────────────────────────────────────────────────────

    #[test]
    fn test_split_paragraphs_on_blank_lines() {
        let body = "First line\nstill first.\n\nSecond.\n\n\n\nThird.";
        assert_eq!(
            split_paragraphs(body),
            vec!["First line still first.", "Second.", "Third."]
        );
    }

    #[test]
    fn test_split_paragraphs_whitespace_only_line_is_blank() {
        let body = "One.\r\n   \t\r\nTwo.\r\n";
        assert_eq!(split_paragraphs(body), vec!["One.", "Two."]);
    }

    #[test]
    fn test_split_paragraphs_empty_body() {
        assert!(split_paragraphs("").is_empty());
        assert!(split_paragraphs("\n\n  \n").is_empty());
    }

    // ── flow_text ───────────────────────────────────────────────────────────

    #[test]
    fn test_short_text_is_one_line_at_top() {
        let (mut doc, mut cursor) = make_doc();
        let style = WrapStyle::body();
        let top = cursor.y;
        flow_text(&mut doc, &mut cursor, None, "Hello world.", &style);

        let lines = all_lines(&doc);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].text, "Hello world.");
        assert_eq!(lines[0].top, top);
        assert_eq!(lines[0].x, doc.geometry().margin_pt);
        assert!((cursor.y - (top - style.line_height())).abs() < 1e-4);
    }

    #[test]
    fn test_blank_text_draws_nothing() {
        let (mut doc, mut cursor) = make_doc();
        let before = cursor;
        flow_text(&mut doc, &mut cursor, None, "   \n ", &WrapStyle::body());
        assert!(all_lines(&doc).is_empty());
        assert_eq!(cursor, before);
    }

    #[test]
    fn test_wrapped_lines_fit_their_column() {
        let (mut doc, mut cursor) = make_doc();
        let style = WrapStyle::body();
        let text = "the quick brown fox jumps over the lazy dog ".repeat(20);
        flow_text(&mut doc, &mut cursor, None, &text, &style);

        let metrics = get_metrics(style.face);
        let lines = all_lines(&doc);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(metrics.measure_pt(&line.text, style.size) <= line.column_width);
        }
        // No words lost or reordered.
        let rejoined: Vec<&str> = lines.iter().flat_map(|l| l.text.split(' ')).collect();
        let original: Vec<&str> = text.split_whitespace().collect();
        assert_eq!(rejoined, original);
    }

    #[test]
    fn test_overlong_word_is_placed_alone() {
        let (mut doc, mut cursor) = make_doc();
        let word = "x".repeat(200);
        let text = format!("before {word} after");
        flow_text(&mut doc, &mut cursor, None, &text, &WrapStyle::body());

        let lines: Vec<&str> = all_lines(&doc).iter().map(|l| l.text.as_str()).collect();
        assert_eq!(lines, vec!["before", word.as_str(), "after"]);
    }

    #[test]
    fn test_body_paginates_and_resets_to_top() {
        let (mut doc, mut cursor) = make_doc();
        let style = WrapStyle::body();
        let text = "memory ".repeat(2000);
        flow_text(&mut doc, &mut cursor, None, &text, &style);

        assert!(doc.page_count() > 1);
        let geometry = doc.geometry().clone();
        for page in doc.pages() {
            let lines: Vec<&TextRun> = page.lines().collect();
            assert!(!lines.is_empty());
            assert_eq!(lines[0].top, geometry.top());
            for line in lines {
                assert!(line.top - line.line_height >= geometry.margin_pt - 1e-3);
                assert!(line.top <= geometry.top());
            }
        }
        assert_eq!(cursor.page, doc.page_count() - 1);
    }

    fn assert_within_margins(doc: &Document) {
        let geometry = doc.geometry();
        for line in all_lines(doc) {
            assert!(
                line.top - line.line_height >= geometry.margin_pt - 1e-3,
                "line {:?} crosses the bottom margin",
                line.text
            );
            assert!(line.top <= geometry.top() + 1e-3);
        }
    }

    #[test]
    fn test_title_and_metadata_paginate_within_margins() {
        for style in [WrapStyle::title(), WrapStyle::metadata()] {
            let (mut doc, mut cursor) = make_doc();
            let text = "heading ".repeat(600);
            flow_text(&mut doc, &mut cursor, None, &text, &style);

            assert!(doc.page_count() > 1);
            assert_within_margins(&doc);
            let words = all_lines(&doc)
                .iter()
                .flat_map(|l| l.text.split(' '))
                .count();
            assert_eq!(words, 600);
        }
    }

    #[test]
    fn test_cursor_below_margin_moves_title_to_next_page() {
        let (mut doc, mut cursor) = make_doc();
        cursor.y = 30.0;
        flow_text(&mut doc, &mut cursor, None, "Gems", &WrapStyle::title());

        assert_eq!(doc.page_count(), 2);
        assert_eq!(doc.pages()[0].lines().count(), 0);
        let line = doc.pages()[1].lines().next().unwrap();
        assert_eq!(line.top, doc.geometry().top());
        assert_within_margins(&doc);
    }

    #[test]
    fn test_side_image_narrows_only_page_one() {
        let (mut doc, mut cursor) = make_doc();
        let geometry = doc.geometry().clone();
        // An image covering the whole usable height of page 1.
        let side = SideImage {
            rect: HeroImageRect {
                x: geometry.margin_pt,
                y: geometry.margin_pt,
                width: 150.0,
                height: geometry.content_height(),
            },
            side: Side::Left,
        };
        let text = "story ".repeat(1500);
        flow_text(&mut doc, &mut cursor, Some(&side), &text, &WrapStyle::body());

        assert!(doc.page_count() > 1);
        for line in doc.pages()[0].lines() {
            assert!(line.x > geometry.margin_pt);
            assert!(line.column_width < geometry.content_width());
        }
        for line in doc.pages()[1].lines() {
            assert_eq!(line.x, geometry.margin_pt);
            assert_eq!(line.column_width, geometry.content_width());
        }
    }

    // ── draw_rule ───────────────────────────────────────────────────────────

    #[test]
    fn test_rule_spans_column_and_advances_cursor() {
        let (mut doc, mut cursor) = make_doc();
        let start = cursor.y;
        draw_rule(&mut doc, &mut cursor, None);

        let rule = doc.pages()[0].ops.iter().find_map(|op| match op {
            DrawOp::Rule(r) => Some(r.clone()),
            _ => None,
        });
        let Some(rule) = rule else {
            panic!("no rule drawn");
        };
        let geometry = doc.geometry();
        assert_eq!(rule.x1, geometry.margin_pt);
        assert!((rule.x2 - (geometry.width_pt - geometry.margin_pt)).abs() < 1e-3);
        assert!(rule.y < start && rule.y > cursor.y);
        assert!((start - cursor.y - RULE_GAP).abs() < 1e-4);
    }

    #[test]
    fn test_rule_beside_right_image_is_narrowed() {
        let (mut doc, mut cursor) = make_doc();
        let geometry = doc.geometry().clone();
        let side = SideImage {
            rect: HeroImageRect {
                x: geometry.width_pt - geometry.margin_pt - 150.0,
                y: geometry.top() - 200.0,
                width: 150.0,
                height: 200.0,
            },
            side: Side::Right,
        };
        draw_rule(&mut doc, &mut cursor, Some(&side));
        let rule = doc.pages()[0].ops.iter().find_map(|op| match op {
            DrawOp::Rule(r) => Some(r.clone()),
            _ => None,
        });
        let Some(rule) = rule else {
            panic!("no rule drawn");
        };
        assert!(rule.x2 < side.rect.x);
    }
}

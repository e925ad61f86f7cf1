//! PDF serialization of a laid-out `Document` via printpdf.
//!
//! Layout works in points with a bottom-left origin, which is also PDF's native space;
//! printpdf takes millimetres, so every coordinate goes through `mm()`.

use std::io::{BufWriter, Cursor};

use printpdf::{
    BuiltinFont, Color, ColorBits, ColorSpace, Image, ImageTransform, ImageXObject,
    IndirectFontRef, Line, Mm, PdfDocument, PdfLayerReference, Point, Px, Rgb,
};
use thiserror::Error;

use crate::layout::document::{BorderStroke, DrawOp, ImagePlacement, RgbColor, RuleLine, TextRun};
use crate::layout::font_metrics::{FontFace, PageGeometry};
use crate::layout::Document;

const PT_TO_MM: f32 = 0.352_777_78;
/// At 72 dpi one image pixel is one point, matching the layout's scale.
const IMAGE_DPI: f32 = 72.0;
const LAYER_NAME: &str = "Story";

#[derive(Debug, Error)]
pub enum PdfError {
    #[error("failed to register font: {0}")]
    Font(String),

    #[error("failed to write PDF: {0}")]
    Write(String),
}

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    italic: IndirectFontRef,
}

impl Fonts {
    fn get(&self, face: FontFace) -> &IndirectFontRef {
        match face {
            FontFace::Regular => &self.regular,
            FontFace::Bold => &self.bold,
            FontFace::Italic => &self.italic,
        }
    }
}

fn mm(pt: f32) -> Mm {
    Mm(pt * PT_TO_MM)
}

fn pdf_color(color: RgbColor) -> Color {
    Color::Rgb(Rgb::new(color.r, color.g, color.b, None))
}

/// Serializes a finalized document to PDF bytes.
pub fn write_pdf(doc: &Document, title: &str) -> Result<Vec<u8>, PdfError> {
    let geometry = doc.geometry();
    let (width, height) = (mm(geometry.width_pt), mm(geometry.height_pt));
    let (pdf, first_page, first_layer) = PdfDocument::new(title, width, height, LAYER_NAME);

    let add_font = |font: BuiltinFont| {
        pdf.add_builtin_font(font)
            .map_err(|e| PdfError::Font(format!("{e:?}")))
    };
    let fonts = Fonts {
        regular: add_font(BuiltinFont::Helvetica)?,
        bold: add_font(BuiltinFont::HelveticaBold)?,
        italic: add_font(BuiltinFont::HelveticaOblique)?,
    };

    for (i, page) in doc.pages().iter().enumerate() {
        let layer = if i == 0 {
            pdf.get_page(first_page).get_layer(first_layer)
        } else {
            let (page_index, layer_index) = pdf.add_page(width, height, LAYER_NAME);
            pdf.get_page(page_index).get_layer(layer_index)
        };

        for op in &page.ops {
            match op {
                DrawOp::Border(stroke) => draw_border(&layer, stroke, geometry),
                DrawOp::Text(run) | DrawOp::PageNumber(run) => draw_text(&layer, &fonts, run),
                DrawOp::Rule(rule) => draw_rule(&layer, rule),
                DrawOp::Image(placement) => draw_image(&layer, placement),
            }
        }
    }

    let mut buf = Vec::new();
    {
        let mut writer = BufWriter::new(Cursor::new(&mut buf));
        pdf.save(&mut writer)
            .map_err(|e| PdfError::Write(format!("{e:?}")))?;
    }
    Ok(buf)
}

fn draw_border(layer: &PdfLayerReference, stroke: &BorderStroke, geometry: &PageGeometry) {
    let (left, bottom) = (stroke.inset, stroke.inset);
    let right = geometry.width_pt - stroke.inset;
    let top = geometry.height_pt - stroke.inset;

    layer.set_outline_color(pdf_color(stroke.color));
    layer.set_outline_thickness(stroke.thickness);
    layer.add_line(Line {
        points: vec![
            (Point::new(mm(left), mm(bottom)), false),
            (Point::new(mm(right), mm(bottom)), false),
            (Point::new(mm(right), mm(top)), false),
            (Point::new(mm(left), mm(top)), false),
        ],
        is_closed: true,
    });
}

fn draw_text(layer: &PdfLayerReference, fonts: &Fonts, run: &TextRun) {
    layer.set_fill_color(pdf_color(run.color));
    layer.use_text(
        run.text.as_str(),
        run.size,
        mm(run.x),
        mm(run.baseline),
        fonts.get(run.face),
    );
}

fn draw_rule(layer: &PdfLayerReference, rule: &RuleLine) {
    layer.set_outline_color(pdf_color(rule.color));
    layer.set_outline_thickness(rule.thickness);
    layer.add_line(Line {
        points: vec![
            (Point::new(mm(rule.x1), mm(rule.y)), false),
            (Point::new(mm(rule.x2), mm(rule.y)), false),
        ],
        is_closed: false,
    });
}

fn draw_image(layer: &PdfLayerReference, placement: &ImagePlacement) {
    let decoded = &placement.image;
    let image = Image::from(ImageXObject {
        width: Px(decoded.width as usize),
        height: Px(decoded.height as usize),
        color_space: ColorSpace::Rgb,
        bits_per_component: ColorBits::Bit8,
        interpolate: true,
        image_data: decoded.rgb.clone(),
        image_filter: None,
        clipping_bbox: None,
        smask: None,
    });

    let rect = &placement.rect;
    image.add_to_layer(
        layer.clone(),
        ImageTransform {
            translate_x: Some(mm(rect.x)),
            translate_y: Some(mm(rect.y)),
            scale_x: Some(rect.width / decoded.width as f32),
            scale_y: Some(rect.height / decoded.height as f32),
            dpi: Some(IMAGE_DPI),
            ..Default::default()
        },
    );
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

//! Hero image decoding: PNG first, then JPEG, nothing else.
//!
//! The declared content type of a response is not trusted; the bytes are offered to
//! each supported decoder in turn. Alpha is composited over white because the PDF
//! writer embeds plain RGB.

use image::{DynamicImage, ImageFormat};
use thiserror::Error;
use tracing::debug;

/// Decoders tried, in order.
const SUPPORTED_FORMATS: [HeroFormat; 2] = [HeroFormat::Png, HeroFormat::Jpeg];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeroFormat {
    Png,
    Jpeg,
}

impl HeroFormat {
    fn image_format(self) -> ImageFormat {
        match self {
            HeroFormat::Png => ImageFormat::Png,
            HeroFormat::Jpeg => ImageFormat::Jpeg,
        }
    }
}

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("image is empty")]
    Empty,

    #[error("image ({len} bytes) is neither PNG nor JPEG")]
    Unsupported { len: usize },

    #[error("image has zero width or height")]
    ZeroSized,
}

/// A decoded hero image: intrinsic size plus tightly packed RGB8 pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedImage {
    pub format: HeroFormat,
    pub width: u32,
    pub height: u32,
    pub rgb: Vec<u8>,
}

/// Decodes hero image bytes, trying PNG and then JPEG.
pub fn decode_hero(bytes: &[u8]) -> Result<DecodedImage, DecodeError> {
    if bytes.is_empty() {
        return Err(DecodeError::Empty);
    }

    for format in SUPPORTED_FORMATS {
        match image::load_from_memory_with_format(bytes, format.image_format()) {
            Ok(decoded) => return from_dynamic(format, decoded),
            Err(e) => debug!("hero image is not {format:?}: {e}"),
        }
    }

    Err(DecodeError::Unsupported { len: bytes.len() })
}

fn from_dynamic(format: HeroFormat, decoded: DynamicImage) -> Result<DecodedImage, DecodeError> {
    let (width, height) = (decoded.width(), decoded.height());
    if width == 0 || height == 0 {
        return Err(DecodeError::ZeroSized);
    }

    let rgb = if decoded.color().has_alpha() {
        flatten_on_white(&decoded)
    } else {
        decoded.to_rgb8().into_raw()
    };

    Ok(DecodedImage {
        format,
        width,
        height,
        rgb,
    })
}

fn flatten_on_white(decoded: &DynamicImage) -> Vec<u8> {
    let rgba = decoded.to_rgba8();
    let mut rgb = Vec::with_capacity(rgba.as_raw().len() / 4 * 3);
    for pixel in rgba.pixels() {
        let [r, g, b, a] = pixel.0;
        let alpha = a as u16;
        for channel in [r, g, b] {
            let blended = (channel as u16 * alpha + 255 * (255 - alpha)) / 255;
            rgb.push(blended as u8);
        }
    }
    rgb
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

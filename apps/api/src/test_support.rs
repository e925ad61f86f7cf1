//! Shared fixtures for unit tests: in-memory images, a scripted image source, stories.

use std::io::Cursor;

use async_trait::async_trait;
use bytes::Bytes;
use image::{ImageFormat, Rgb, RgbImage};

use crate::image_client::{ImageError, ImageSource};
use crate::models::story::{Alignment, HeroImage, Story};

fn encode(width: u32, height: u32, format: ImageFormat) -> Vec<u8> {
    let img = RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, 120])
    });
    let mut bytes = Vec::new();
    img.write_to(&mut Cursor::new(&mut bytes), format)
        .expect("encode test image");
    bytes
}

pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    encode(width, height, ImageFormat::Png)
}

pub fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
    encode(width, height, ImageFormat::Jpeg)
}

/// Returns the same canned response for every URL.
pub enum StubImageSource {
    Serves(Vec<u8>),
    Fails,
}

#[async_trait]
impl ImageSource for StubImageSource {
    async fn fetch(&self, _url: &str) -> Result<Bytes, ImageError> {
        match self {
            StubImageSource::Serves(bytes) => Ok(Bytes::from(bytes.clone())),
            StubImageSource::Fails => Err(ImageError::Status { status: 404 }),
        }
    }
}

pub fn gems_story() -> Story {
    Story {
        title: "Gems".to_string(),
        genre: "Memoir".to_string(),
        read_time: "1 minute read".to_string(),
        body: "Hello world.".to_string(),
        hero_image: None,
    }
}

pub fn long_story(paragraph_repeats: usize) -> Story {
    let paragraph = "The summer we moved to the coast, my grandmother kept a jar of sea glass \
                     on the kitchen windowsill. Every morning she would hold a piece up to the \
                     light and tell me where she thought it had come from, a ship, a bottle \
                     thrown from a pier, a lantern broken in a storm long before either of us \
                     was born.";
    let body = vec![paragraph; paragraph_repeats].join("\n\n");
    Story {
        title: "Sea Glass".to_string(),
        genre: "Memoir".to_string(),
        read_time: "7 minutes read".to_string(),
        body,
        hero_image: None,
    }
}

pub fn with_hero(mut story: Story, alignment: Option<Alignment>) -> Story {
    story.hero_image = Some(HeroImage {
        url: "https://images.example.com/hero.png".to_string(),
        alignment,
    });
    story
}

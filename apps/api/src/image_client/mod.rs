/// Image Client: retrieves hero image bytes for the story renderer.
///
/// The renderer only sees the `ImageSource` trait; `HttpImageSource` is the production
/// backend. Every failure is returned as an `ImageError` and the renderer decides what
/// to do with it (it logs and carries on without the image).
use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use bytes::Bytes;
use reqwest::Client;
use thiserror::Error;
use tracing::debug;

pub mod decode;

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("image request returned status {status}")]
    Status { status: u16 },

    #[error("image exceeds {limit} bytes")]
    TooLarge { limit: usize },

    #[error("unsupported image URL scheme: {0}")]
    UnsupportedScheme(String),

    #[error("malformed data URL: {0}")]
    MalformedDataUrl(String),
}

/// Where hero image bytes come from. Carried in `AppState` as `Arc<dyn ImageSource>`.
#[async_trait]
pub trait ImageSource: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Bytes, ImageError>;
}

/// Fetches http(s) URLs with a bounded timeout and body size; decodes `data:` URLs inline.
#[derive(Clone)]
pub struct HttpImageSource {
    client: Client,
    max_bytes: usize,
}

impl HttpImageSource {
    pub fn new(timeout: Duration, max_bytes: usize) -> Result<Self, ImageError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            max_bytes,
        })
    }

    async fn fetch_http(&self, url: &str) -> Result<Bytes, ImageError> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ImageError::Status {
                status: status.as_u16(),
            });
        }

        if let Some(declared) = response.content_length() {
            if declared > self.max_bytes as u64 {
                return Err(ImageError::TooLarge {
                    limit: self.max_bytes,
                });
            }
        }

        let body = response.bytes().await?;
        if body.len() > self.max_bytes {
            return Err(ImageError::TooLarge {
                limit: self.max_bytes,
            });
        }

        debug!("fetched hero image: {} bytes", body.len());
        Ok(body)
    }
}

#[async_trait]
impl ImageSource for HttpImageSource {
    async fn fetch(&self, url: &str) -> Result<Bytes, ImageError> {
        let url = url.trim();
        if url.starts_with("data:") {
            let bytes = decode_data_url(url)?;
            if bytes.len() > self.max_bytes {
                return Err(ImageError::TooLarge {
                    limit: self.max_bytes,
                });
            }
            return Ok(bytes);
        }
        if url.starts_with("http://") || url.starts_with("https://") {
            return self.fetch_http(url).await;
        }

        let scheme = url.split(':').next().unwrap_or_default();
        Err(ImageError::UnsupportedScheme(scheme.to_string()))
    }
}

/// Decodes `data:[<mediatype>];base64,<payload>`. Only base64 payloads are accepted.
fn decode_data_url(url: &str) -> Result<Bytes, ImageError> {
    let (header, payload) = url
        .split_once(',')
        .ok_or_else(|| ImageError::MalformedDataUrl("missing ',' separator".to_string()))?;

    if !header.ends_with(";base64") {
        return Err(ImageError::MalformedDataUrl(
            "only base64 payloads are supported".to_string(),
        ));
    }

    base64::engine::general_purpose::STANDARD
        .decode(payload.trim())
        .map(Bytes::from)
        .map_err(|e| ImageError::MalformedDataUrl(e.to_string()))
}

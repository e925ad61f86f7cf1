mod config;
mod errors;
mod image_client;
mod layout;
mod models;
mod render;
mod routes;
mod state;

#[cfg(test)]
mod test_support;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::image_client::HttpImageSource;
use crate::layout::default_page_geometry;
use crate::render::StoryRenderer;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on unparseable env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Storypress v{}", env!("CARGO_PKG_VERSION"));

    // Initialize hero image client
    let images = HttpImageSource::new(config.image_fetch_timeout, config.image_max_bytes)
        .context("failed to build the image HTTP client")?;
    info!(
        "Image client initialized (timeout {:?}, max {} bytes)",
        config.image_fetch_timeout, config.image_max_bytes
    );

    // Initialize renderer
    let geometry = default_page_geometry(config.page_size);
    info!(
        "Page geometry: {:?} {}x{}pt, margin {}pt",
        geometry.size, geometry.width_pt, geometry.height_pt, geometry.margin_pt
    );
    let renderer = StoryRenderer::new(Arc::new(images), geometry, config.print_fallback);

    // Build app state
    let state = AppState {
        config: config.clone(),
        renderer,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::render::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Stories API
        .route("/api/v1/stories/pdf", post(handlers::handle_render_pdf))
        .route("/api/v1/stories/print", post(handlers::handle_render_print))
        .route("/api/v1/stories/layout", post(handlers::handle_layout_preview))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
        response::Response,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::config::Config;
    use crate::layout::default_page_geometry;
    use crate::render::StoryRenderer;
    use crate::test_support::{png_bytes, StubImageSource};

    fn app(source: StubImageSource) -> Router {
        let config = Config::default();
        let renderer = StoryRenderer::new(
            Arc::new(source),
            default_page_geometry(config.page_size),
            config.print_fallback,
        );
        build_router(AppState { config, renderer })
    }

    fn story_json() -> Value {
        json!({
            "title": "Gems",
            "genre": "Memoir",
            "readTime": "1 minute read",
            "body": "Hello world."
        })
    }

    async fn post_json(app: Router, uri: &str, body: Value) -> Response {
        app.oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap()
    }

    async fn body_bytes(response: Response) -> Vec<u8> {
        to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap()
            .to_vec()
    }

    #[tokio::test]
    async fn test_health() {
        let response = app(StubImageSource::Fails)
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body: Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "storypress");
        assert_eq!(body["pageSize"], "a4");
    }

    #[tokio::test]
    async fn test_pdf_route_returns_download() {
        let response = post_json(app(StubImageSource::Fails), "/api/v1/stories/pdf", story_json()).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/pdf");
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"Gems.pdf\""
        );
        assert!(body_bytes(response).await.starts_with(b"%PDF-"));
    }

    #[tokio::test]
    async fn test_pdf_route_survives_failing_image() {
        let mut story = story_json();
        story["heroImage"] = json!({ "url": "https://images.example.com/missing.png", "alignment": "left" });
        let response = post_json(app(StubImageSource::Fails), "/api/v1/stories/pdf", story).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_bytes(response).await.starts_with(b"%PDF-"));
    }

    #[tokio::test]
    async fn test_print_route_returns_html() {
        let response = post_json(app(StubImageSource::Fails), "/api/v1/stories/print", story_json()).await;
        assert_eq!(response.status(), StatusCode::OK);
        let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap().to_string();
        assert!(content_type.starts_with("text/html"));

        let html = String::from_utf8(body_bytes(response).await).unwrap();
        assert!(html.contains("<title>Gems</title>"));
        assert!(html.contains("setTimeout(triggerPrint, 1500)"));
    }

    #[tokio::test]
    async fn test_layout_route_reports_hero() {
        let mut story = story_json();
        story["heroImage"] = json!({ "url": "https://images.example.com/hero.png", "alignment": "right" });
        let response = post_json(
            app(StubImageSource::Serves(png_bytes(120, 80))),
            "/api/v1/stories/layout",
            story,
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        let body: Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(body["pageCount"], 1);
        assert_eq!(body["heroImage"]["width"], 120.0);
        assert_eq!(body["pages"][0]["lines"][0]["text"], "Gems");
    }

    #[tokio::test]
    async fn test_blank_title_downloads_under_fallback_name() {
        let mut story = story_json();
        story["title"] = json!("  ");
        let response = post_json(app(StubImageSource::Fails), "/api/v1/stories/pdf", story).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"story.pdf\""
        );
        assert!(body_bytes(response).await.starts_with(b"%PDF-"));
    }

    #[tokio::test]
    async fn test_malformed_story_is_client_error() {
        let response = post_json(
            app(StubImageSource::Fails),
            "/api/v1/stories/layout",
            json!({ "title": "Gems" }),
        )
        .await;
        assert!(response.status().is_client_error());
    }
}

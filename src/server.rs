//! Static file server for the state directory
//!
//! Every response allows any origin and forbids caching so a visualization
//! dev setup always sees the latest day files. `OPTIONS` requests are
//! answered by the CORS layer with a 200.

use axum::http::header::CACHE_CONTROL;
use axum::http::HeaderValue;
use axum::Router;
use std::path::Path;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

pub const NO_CACHE: &str = "no-store, no-cache, must-revalidate";

/// Router serving the files under `data_dir`.
pub fn create_app(data_dir: &Path) -> Router {
    Router::new()
        .fallback_service(ServeDir::new(data_dir))
        .layer(CorsLayer::permissive())
        // Outside CORS so preflight answers carry it too
        .layer(SetResponseHeaderLayer::overriding(
            CACHE_CONTROL,
            HeaderValue::from_static(NO_CACHE),
        ))
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Method, Request, StatusCode};
    use tower::ServiceExt;

    fn app_with_file() -> (tempfile::TempDir, Router) {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("20240101.json"), br#"{"frontline":[]}"#).unwrap();
        let app = create_app(dir.path());
        (dir, app)
    }

    #[tokio::test]
    async fn test_serves_day_file_with_headers() {
        let (_dir, app) = app_with_file();
        let resp = app
            .oneshot(
                Request::get("/20240101.json")
                    .header("origin", "http://localhost:5173")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers().get(CACHE_CONTROL).unwrap(), NO_CACHE);
        assert_eq!(
            resp.headers().get("access-control-allow-origin").unwrap(),
            "*"
        );
    }

    #[tokio::test]
    async fn test_plain_options_is_ok() {
        let (_dir, app) = app_with_file();
        let resp = app
            .oneshot(
                Request::builder()
                    .method(Method::OPTIONS)
                    .uri("/anything")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers().get(CACHE_CONTROL).unwrap(), NO_CACHE);
    }

    #[tokio::test]
    async fn test_preflight_carries_cors_and_no_cache() {
        let (_dir, app) = app_with_file();
        let resp = app
            .oneshot(
                Request::builder()
                    .method(Method::OPTIONS)
                    .uri("/20240101.json")
                    .header("origin", "http://localhost:5173")
                    .header("access-control-request-method", "GET")
                    .header("access-control-request-headers", "content-type")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers().get(CACHE_CONTROL).unwrap(), NO_CACHE);
        assert_eq!(
            resp.headers().get("access-control-allow-origin").unwrap(),
            "*"
        );
        assert!(resp.headers().contains_key("access-control-allow-methods"));
    }

    #[tokio::test]
    async fn test_missing_file_is_404_and_uncached() {
        let (_dir, app) = app_with_file();
        let resp = app
            .oneshot(Request::get("/20991231.json").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(resp.headers().get(CACHE_CONTROL).unwrap(), NO_CACHE);
    }
}

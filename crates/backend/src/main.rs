mod api;
mod catalog;
mod config;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::HeaderValue;
use axum::{
    response::Html,
    routing::{get, post},
    Router,
};
use chrono::{DateTime, Utc};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use catalog::RoofCatalog;
use config::ServerConfig;

/// Shared, read-only state for every handler.
pub struct AppContext {
    pub config: ServerConfig,
    pub catalog: RoofCatalog,
    pub started_at: DateTime<Utc>,
}

impl AppContext {
    pub fn new(config: ServerConfig, catalog: RoofCatalog) -> Self {
        AppContext {
            config,
            catalog,
            started_at: Utc::now(),
        }
    }
}

/// Build a cache-controlled static file router.
///
/// Separated so tests can exercise the caching layer with arbitrary directories.
fn cached_static_router(dir: &Path, cache_header: &'static str) -> Router {
    let layer = SetResponseHeaderLayer::overriding(
        axum::http::header::CACHE_CONTROL,
        HeaderValue::from_static(cache_header),
    );
    Router::new()
        .fallback_service(ServeDir::new(dir))
        .layer(layer)
}

const CACHE_1DAY: &str = "public, max-age=86400, must-revalidate";
const CACHE_IMMUTABLE: &str = "public, max-age=31536000, immutable";

/// Build the full application router.
fn build_app(ctx: Arc<AppContext>) -> Router {
    let dist_dir = &ctx.config.dist_dir;
    let static_files = Router::new()
        .nest(
            "/static",
            cached_static_router(&ctx.config.assets_dir, CACHE_1DAY),
        )
        .nest("/dist", cached_static_router(dist_dir, CACHE_IMMUTABLE))
        .nest(
            "/assets",
            cached_static_router(&dist_dir.join("assets"), CACHE_IMMUTABLE),
        );

    let trace = TraceLayer::new_for_http().make_span_with(|req: &Request| {
        tracing::info_span!(
            "request",
            method = %req.method(),
            uri = %req.uri(),
            id = %Uuid::new_v4(),
        )
    });

    Router::new()
        .route("/analyze", post(api::analyze))
        .route("/health", get(api::health))
        .route("/", get(serve_index))
        .fallback(serve_index)
        .with_state(ctx.clone())
        .merge(static_files)
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .layer(trace)
}

#[tokio::main]
async fn main() -> Result<(), String> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::DEFAULT_LOG_FILTER)),
        )
        .init();

    let config = ServerConfig::from_env()?;
    let catalog = RoofCatalog::load(&config.assets_dir)?;
    let addr = config.bind_addr();
    let roofs = catalog.len();

    let app = build_app(Arc::new(AppContext::new(config, catalog)));

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| format!("Failed to bind {}: {}", addr, e))?;
    tracing::info!(%addr, roofs, "Sol-Scout backend listening");

    axum::serve(listener, app)
        .await
        .map_err(|e| format!("Server error: {}", e))
}

async fn serve_index(State(ctx): State<Arc<AppContext>>) -> Html<String> {
    // Serve the built frontend, fall back to a simple message
    let index: PathBuf = ctx.config.dist_dir.join("index.html");
    match tokio::fs::read_to_string(&index).await {
        Ok(html) => Html(html),
        Err(_) => Html(
            r#"<!DOCTYPE html>
<html>
<head><title>Sol-Scout</title></head>
<body>
<h1>Sol-Scout</h1>
<p>Frontend not built yet. The analysis API is at <code>POST /analyze</code>.</p>
</body>
</html>"#
                .to_string(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    struct Dirs {
        _assets: tempfile::TempDir,
        dist: tempfile::TempDir,
    }

    /// Temp assets and dist dirs with a few files, and an app serving them.
    fn test_app() -> (Router, Dirs) {
        let assets = tempfile::tempdir().unwrap();
        std::fs::write(assets.path().join("roofs.json"), "[]").unwrap();

        let dist = tempfile::tempdir().unwrap();
        std::fs::write(dist.path().join("index.html"), "<html>sol-scout</html>").unwrap();
        std::fs::write(dist.path().join("app-abc123.js"), "bundle()").unwrap();
        std::fs::create_dir(dist.path().join("assets")).unwrap();
        std::fs::write(dist.path().join("assets/style-xyz.css"), "body{}").unwrap();

        let config = ServerConfig {
            assets_dir: assets.path().to_path_buf(),
            dist_dir: dist.path().to_path_buf(),
            ..ServerConfig::default()
        };
        let app = build_app(Arc::new(AppContext::new(config, RoofCatalog::default())));
        (app, Dirs { _assets: assets, dist })
    }

    fn get_req(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_static_assets_have_1day_cache() {
        let (app, _dirs) = test_app();
        let resp = app.oneshot(get_req("/static/roofs.json")).await.unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers().get("cache-control").unwrap(),
            "public, max-age=86400, must-revalidate"
        );
    }

    #[tokio::test]
    async fn test_dist_bundles_have_immutable_cache() {
        let (app, _dirs) = test_app();
        let resp = app.oneshot(get_req("/dist/app-abc123.js")).await.unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers().get("cache-control").unwrap(),
            "public, max-age=31536000, immutable"
        );
    }

    #[tokio::test]
    async fn test_dist_assets_have_immutable_cache() {
        let (app, _dirs) = test_app();
        let resp = app.oneshot(get_req("/assets/style-xyz.css")).await.unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers().get("cache-control").unwrap(),
            "public, max-age=31536000, immutable"
        );
    }

    #[tokio::test]
    async fn test_missing_static_file_returns_404() {
        let (app, _dirs) = test_app();
        let resp = app.oneshot(get_req("/static/nonexistent.txt")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_root_and_unknown_paths_serve_index() {
        let (app, _dirs) = test_app();
        for uri in ["/", "/some/client/route"] {
            let resp = app.clone().oneshot(get_req(uri)).await.unwrap();
            assert_eq!(resp.status(), StatusCode::OK, "{uri}");
            let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
            assert_eq!(&bytes[..], b"<html>sol-scout</html>");
        }
    }

    #[tokio::test]
    async fn test_index_placeholder_without_build() {
        let (app, dirs) = test_app();
        std::fs::remove_file(dirs.dist.path().join("index.html")).unwrap();
        let resp = app.oneshot(get_req("/")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        assert!(String::from_utf8_lossy(&bytes).contains("Frontend not built yet"));
    }

    #[tokio::test]
    async fn test_cors_allows_cross_origin_analyze() {
        let (app, _dirs) = test_app();
        let resp = app
            .oneshot(
                Request::builder()
                    .method("OPTIONS")
                    .uri("/analyze")
                    .header("origin", "http://localhost:8080")
                    .header("access-control-request-method", "POST")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert!(resp.headers().contains_key("access-control-allow-origin"));
    }
}

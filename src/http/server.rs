//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (tracing, timeout, request ID)
//! - Bind server to listener
//! - Dispatch requests to the resolver against one captured snapshot
//! - Observability (metrics, request IDs)

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::State,
    http::{header, Method, Request, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::ServerConfig;
use crate::http::request::{request_id_header, RequestIdExt, UuidRequestId};
use crate::http::response::outcome_response;
use crate::observability::metrics;
use crate::render::renderer_for;
use crate::repository::SnapshotStore;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<SnapshotStore>,
    pub config: Arc<ServerConfig>,
}

/// HTTP server for the content repository.
pub struct HttpServer {
    router: Router,
    config: Arc<ServerConfig>,
}

impl HttpServer {
    /// Create a new HTTP server serving the snapshots held by `store`.
    pub fn new(config: Arc<ServerConfig>, store: Arc<SnapshotStore>) -> Self {
        let state = AppState {
            store,
            config: Arc::clone(&config),
        };
        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ServerConfig, state: AppState) -> Router {
        Router::new()
            .route("/-/health", get(health_handler))
            .fallback(content_handler)
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(PropagateRequestIdLayer::new(request_id_header()))
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::new(request_id_header(), UuidRequestId))
    }

    /// The configured router, for in-process use.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }
}

#[derive(Serialize)]
struct HealthStatus {
    status: &'static str,
    items: usize,
    files: usize,
}

async fn health_handler(State(state): State<AppState>) -> Json<HealthStatus> {
    let snapshot = state.store.load();
    Json(HealthStatus {
        status: "ok",
        items: snapshot.items.len(),
        files: snapshot.files.len() + snapshot.items.file_count(),
    })
}

/// Main content handler.
/// Captures a snapshot, resolves the path and renders the outcome.
async fn content_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start = Instant::now();

    if request.method() != Method::GET && request.method() != Method::HEAD {
        return (StatusCode::METHOD_NOT_ALLOWED, "Method not allowed").into_response();
    }

    let request_id = request.request_id().to_string();
    let path = request.uri().path().to_string();
    let accept = header_string(&request, header::ACCEPT);
    let if_none_match = header_string(&request, header::IF_NONE_MATCH);

    tracing::debug!(request_id = %request_id, path = %path, "Resolving request");

    let resolver = state.store.resolver();

    // Fires if this future is dropped, e.g. on client disconnect.
    let cancel = CancellationToken::new();
    let _cancel_on_drop = cancel.clone().drop_guard();

    let task = tokio::task::spawn_blocking(move || {
        let outcome = resolver.resolve_with_cancel(&path, &cancel);
        metrics::record_resolution(&outcome, start);
        tracing::debug!(
            request_id = %request_id,
            path = %path,
            outcome = outcome.kind(),
            stage = ?outcome.stage(),
            "Request resolved"
        );
        outcome_response(
            outcome,
            renderer_for(accept.as_deref()),
            &resolver.snapshot().theme_route,
            if_none_match.as_deref(),
        )
    });

    match task.await {
        Ok(response) => response,
        Err(e) => {
            tracing::error!(error = %e, "Resolution task failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal error").into_response()
        }
    }
}

fn header_string(request: &Request<Body>, name: header::HeaderName) -> Option<String> {
    request
        .headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use tower::ServiceExt;

    use crate::content::{File, Item, ItemMetadata, MemoryContentProvider};
    use crate::index::{FileIndex, ItemIndex};
    use crate::repository::ContentSnapshot;
    use crate::rewrite::RewriteSet;
    use crate::route::Route;

    fn server() -> HttpServer {
        let root = Arc::new(Item::new(
            Route::root(),
            Arc::new(MemoryContentProvider::new("# Home")),
            ItemMetadata {
                title: "Home".into(),
                ..Default::default()
            },
        ));
        let css = Arc::new(File::new(
            Route::parse("theme/site.css").unwrap(),
            Arc::new(MemoryContentProvider::new("body{}")),
        ));
        let snapshot = ContentSnapshot::new(
            ItemIndex::from_tree(&root).unwrap(),
            FileIndex::build([css]).unwrap(),
            RewriteSet::default(),
            Route::parse("theme").unwrap(),
        );

        HttpServer::new(
            Arc::new(ServerConfig::default()),
            Arc::new(SnapshotStore::new(snapshot)),
        )
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_request_id_is_propagated() {
        let req = Request::builder()
            .uri("/theme/site.css")
            .header("x-request-id", "req-42")
            .body(Body::empty())
            .unwrap();

        let res = server().router().oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(res.headers()["x-request-id"], "req-42");
    }

    #[tokio::test]
    async fn test_request_id_is_generated() {
        let res = server().router().oneshot(get("/")).await.unwrap();
        assert!(res.headers().contains_key("x-request-id"));
    }

    #[tokio::test]
    async fn test_head_is_allowed() {
        let req = Request::builder()
            .method(Method::HEAD)
            .uri("/theme/site.css")
            .body(Body::empty())
            .unwrap();

        let res = server().router().oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_delete_is_rejected() {
        let req = Request::builder()
            .method(Method::DELETE)
            .uri("/")
            .body(Body::empty())
            .unwrap();

        let res = server().router().oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn test_health() {
        let res = server().router().oneshot(get("/-/health")).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);

        let body = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let health: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(health["items"], 1);
        assert_eq!(health["files"], 1);
    }

    #[tokio::test]
    async fn test_percent_encoded_path() {
        let res = server().router().oneshot(get("/theme/%73ite.css")).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
    }
}

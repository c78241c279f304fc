//! Serve command - the review HTTP server
//!
//! Exposes the batch reviewer to the browser client:
//! `POST /api/review` takes `{files: [{filename, content}], model?}` and
//! returns either the full ordered result list or a single
//! `{error, details?}` object with a non-2xx status. All state is
//! request-scoped; the server holds nothing but the reviewer itself.

use std::sync::Arc;

use axum::extract::{DefaultBodyLimit, Json, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::Router;
use clap::Args;
use starling_core::{BatchRequest, BatchReviewer, Config, Error, OllamaRunner};
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;

/// Combined upload payloads can run to several megabytes
const MAX_BODY_SIZE: usize = 16 * 1024 * 1024;

/// Arguments for the serve command
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Address to bind (overrides config)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on (overrides config)
    #[arg(short, long)]
    pub port: Option<u16>,
}

/// Shared state for request handlers
#[derive(Clone)]
struct AppState {
    reviewer: BatchReviewer,
}

impl ServeArgs {
    /// Execute the serve command
    pub async fn execute(&self, verbose: bool, config: &Config) -> anyhow::Result<()> {
        let host = self.host.as_deref().unwrap_or(&config.server.host);
        let port = self.port.unwrap_or(config.server.port);

        let runner = OllamaRunner::from_config(&config.runner);
        let reviewer = BatchReviewer::new(Arc::new(runner), &config.runner);

        if verbose {
            tracing::info!(
                model = %reviewer.default_model(),
                max_concurrent = config.runner.max_concurrent_reviews,
                "Reviewer configured"
            );
        }

        let app = router(AppState { reviewer });

        let addr = format!("{}:{}", host, port);
        let listener = tokio::net::TcpListener::bind(&addr).await?;
        tracing::info!(addr = %addr, "Review server listening");
        println!("Review server listening on http://{}", addr);

        axum::serve(listener, app).await?;

        Ok(())
    }
}

/// Build the application router
fn router(state: AppState) -> Router {
    // The browser client may be served from a different origin (dev server)
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handle_health))
        .route("/api/review", post(handle_review))
        .with_state(state)
        .layer(cors)
        .layer(DefaultBodyLimit::max(MAX_BODY_SIZE))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_SIZE))
}

/// GET /health
async fn handle_health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// POST /api/review — run a whole batch, all-or-nothing
async fn handle_review(
    State(state): State<AppState>,
    Json(request): Json<BatchRequest>,
) -> (StatusCode, Json<serde_json::Value>) {
    match state.reviewer.review_batch(request).await {
        Ok(results) => match serde_json::to_value(&results) {
            Ok(body) => (StatusCode::OK, Json(body)),
            Err(e) => error_response(&Error::Json(e)),
        },
        Err(e) => error_response(&e),
    }
}

/// Map a core error onto the wire error shape and HTTP status
fn error_response(error: &Error) -> (StatusCode, Json<serde_json::Value>) {
    let status = match error {
        Error::Validation(_) => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let mut body = serde_json::json!({ "error": error.to_string() });
    if let Some(details) = error.details() {
        body["details"] = serde_json::Value::String(details.to_string());
    }

    (status, Json(body))
}

//! HTTP router.

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};

use super::context::AppContext;
use super::{rest, ws};

/// Every REST endpoint plus the real-time channel at
/// `config.server.realtime_path`, open to any origin.
pub fn router(ctx: Arc<AppContext>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(rest::root))
        .route("/health", get(rest::health))
        .route("/suggestions", post(rest::suggestions))
        .route("/check_sentence", post(rest::check_one_sentence))
        .route("/check_text", post(rest::check_text))
        .route("/analyze_tone", post(rest::tone_report))
        .route(&ctx.config.server.realtime_path, get(ws::realtime))
        .layer(cors)
        .with_state(ctx)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

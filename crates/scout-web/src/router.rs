//! Axum router — maps all URL paths to handlers.

use axum::{
    extract::{DefaultBodyLimit, Request},
    http::{header, Method},
    routing::{get, post},
    Router,
};
use std::path::Path;
use std::sync::Arc;
use tower::{service_fn, ServiceExt};
use tower_http::{
    services::ServeDir,
    cors::CorsLayer,
    trace::TraceLayer,
    compression::CompressionLayer,
};
use crate::state::{AppState, SharedState};
use crate::handlers::{
    classify::classify,
    describe::describe,
    health::health,
};

/// Room for multipart boundaries and part headers on top of the image itself.
const MULTIPART_OVERHEAD: usize = 16 * 1024;

/// Build and return the full Axum router.
pub fn build_router(state: AppState, static_dir: Option<&Path>) -> Router {
    let body_limit = state.max_upload_bytes.saturating_add(MULTIPART_OVERHEAD);
    let shared: SharedState = Arc::new(state);

    let mut router = Router::new()
        .route("/health",       get(health))
        .route("/api/describe", post(describe))
        .route("/api/classify", post(classify).layer(DefaultBodyLimit::max(body_limit)));

    if let Some(dir) = static_dir {
        router = router.fallback_service(ServeDir::new(dir));
    }

    let routes = router.with_state(shared);
    let with_cors = routes.clone().layer(CorsLayer::permissive());

    // The CORS layer answers every OPTIONS itself; only real preflights go
    // through it so a bare OPTIONS still gets the method router's 405.
    let dispatch = service_fn(move |req: Request| {
        let target = if is_cors_preflight(&req) || req.method() != Method::OPTIONS {
            with_cors.clone()
        } else {
            routes.clone()
        };
        target.oneshot(req)
    });

    Router::new()
        .fallback_service(dispatch)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
}

/// OPTIONS carrying both `Origin` and `Access-Control-Request-Method`.
fn is_cors_preflight(req: &Request) -> bool {
    req.method() == Method::OPTIONS
        && req.headers().contains_key(header::ORIGIN)
        && req.headers().contains_key(header::ACCESS_CONTROL_REQUEST_METHOD)
}

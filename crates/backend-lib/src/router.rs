// ============================
// hwcatalog-backend-lib/src/router.rs
// ============================
//! HTTP route table.
use std::sync::Arc;

use axum::{
    body::Body,
    http::Request,
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info_span;

use crate::handlers;
use crate::middleware::{request_id, REQUEST_ID_HEADER};
use crate::storage::Storage;
use crate::AppState;

/// Create the application router
pub fn create_router<S: Storage>(state: Arc<AppState<S>>) -> Router {
    Router::new()
        .route("/register", post(handlers::register::<S>))
        .route("/auth", post(handlers::login::<S>))
        .route("/addDisplay", post(handlers::create_display::<S>))
        .route("/addMonitor", post(handlers::create_monitor::<S>))
        .route("/getAll", get(handlers::list_monitors::<S>))
        .route("/getMonitor", get(handlers::get_monitor::<S>))
        .route("/health", get(handlers::health))
        .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
            let request_id = request
                .headers()
                .get(&REQUEST_ID_HEADER)
                .and_then(|value| value.to_str().ok())
                .unwrap_or_default();
            info_span!(
                "http_request",
                method = %request.method(),
                path = %request.uri().path(),
                request_id,
            )
        }))
        .layer(CorsLayer::permissive())
        .layer(middleware::from_fn(request_id))
        .with_state(state)
}

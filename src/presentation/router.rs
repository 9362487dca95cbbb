use axum::extract::DefaultBodyLimit;
use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::infrastructure::observability::request_id_middleware;
use crate::presentation::handlers::{
    contact_handler, convert_handler, download_handler, health_handler, job_status_handler,
    upload_handler, MAX_UPLOAD_BYTES,
};
use crate::presentation::state::AppState;

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    Router::new()
        .route("/health", get(health_handler))
        .route("/api/v1/upload", post(upload_handler))
        .route("/api/v1/convert", post(convert_handler))
        .route("/api/v1/jobs/{job_id}", get(job_status_handler))
        .route("/api/v1/jobs/{job_id}/download", get(download_handler))
        .route("/api/v1/contact", post(contact_handler))
        // The body limit exceeds the upload ceiling so oversized payloads
        // reach the handler and get a deliberate 413 instead of a framework
        // rejection.
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES + 1024 * 1024))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(trace_layer)
        .layer(cors)
        .with_state(state)
}

//! Router configuration for the HTTP API.
//!
//! This module sets up all routes, middleware (CORS, compression, tracing),
//! and creates the axum router ready for serving.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers;
use super::state::AppState;

/// Create the main application router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_v1 = Router::new()
        // Schedule reports
        .route("/schedule/report", post(handlers::schedule_report))
        .route(
            "/courses/{course_id}/schedule/report",
            get(handlers::course_schedule_report),
        )
        // Generation jobs
        .route(
            "/courses/{course_id}/generations",
            post(handlers::create_generation),
        )
        .route("/generations/{job_id}", get(handlers::get_generation))
        .route(
            "/generations/{job_id}/events",
            get(handlers::stream_generation_events),
        )
        // Document refresh notifications
        .route("/notifications", get(handlers::stream_notifications));

    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/v1", api_v1)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

// src/routes.rs

use axum::{
    Router,
    http::Method,
    routing::{get, patch, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    handlers::{entries, exams, submissions},
    state::AppState,
};

/// Assembles the main application router.
///
/// * Merges all sub-routers (exams, entries, violations, submissions).
/// * Applies global middleware (Trace, CORS).
/// * Injects global state (Database Pool + Config).
pub fn create_router(state: AppState) -> Router {
    let origins = [
        "http://localhost:3000".parse().unwrap(),
        "http://127.0.0.1:3000".parse().unwrap(),
    ];

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PATCH])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
        ]);

    let exam_routes = Router::new()
        .route("/", post(exams::create_exam).get(exams::list_exams))
        .route("/{id}/paper", get(exams::get_paper))
        .route("/{id}/published", patch(exams::set_published));

    let entry_routes = Router::new().route("/", post(entries::record_entry));

    let violation_routes = Router::new().route("/", get(entries::violation_report));

    let submission_routes = Router::new()
        .route("/", post(submissions::submit_exam))
        .route("/latest", get(submissions::latest_result))
        .route("/{id}/allow-retry", patch(submissions::set_allow_retry));

    Router::new()
        .nest("/api/exams", exam_routes)
        .nest("/api/entries", entry_routes)
        .nest("/api/violations", violation_routes)
        .nest("/api/submissions", submission_routes)
        // Global Middleware (applied from outside in)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

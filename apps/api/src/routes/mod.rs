pub mod cv;
pub mod health;
pub mod listing;
pub mod records;
pub mod seed;
pub mod upload;

use std::any::Any;

use axum::{
    extract::DefaultBodyLimit,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;

use crate::errors::AppError;
use crate::models::{Achievement, ContactInfo, Cv, Dream, Objective, Project, Skill};
use crate::state::AppState;
use records::{handle_create, handle_delete, handle_get, handle_update};

async fn not_found_fallback() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({"success": false, "error": "Endpoint not found"})),
    )
        .into_response()
}

/// Response for a handler that panicked; installed through `CatchPanicLayer::custom`.
pub fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    tracing::error!("Handler panicked: {detail}");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({"success": false, "error": "Internal server error"})),
    )
        .into_response()
}

/// `TimeoutLayer` answers with a bare 408; give it the error envelope.
/// Installed through `middleware::map_response` outside the timeout layer.
pub async fn timeout_envelope(response: Response) -> Response {
    if response.status() == StatusCode::REQUEST_TIMEOUT {
        tracing::warn!("Request timed out");
        return AppError::Timeout.into_response();
    }
    response
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health::health_handler))
        .route("/api/all", get(listing::handle_all))
        // Skills
        .route(
            "/api/skills",
            get(listing::handle_list_skills).post(handle_create::<Skill>),
        )
        .route(
            "/api/skills/:id",
            get(handle_get::<Skill>)
                .put(handle_update::<Skill>)
                .delete(handle_delete::<Skill>),
        )
        // Projects
        .route(
            "/api/projects",
            get(listing::handle_list_projects).post(handle_create::<Project>),
        )
        .route(
            "/api/projects/:id",
            get(handle_get::<Project>)
                .put(handle_update::<Project>)
                .delete(handle_delete::<Project>),
        )
        // Objectives
        .route(
            "/api/objectives",
            get(listing::handle_list_objectives).post(handle_create::<Objective>),
        )
        .route(
            "/api/objectives/:id",
            get(handle_get::<Objective>)
                .put(handle_update::<Objective>)
                .delete(handle_delete::<Objective>),
        )
        // Contact
        .route(
            "/api/contact",
            get(listing::handle_list_contacts).post(handle_create::<ContactInfo>),
        )
        .route(
            "/api/contact/:id",
            get(handle_get::<ContactInfo>)
                .put(handle_update::<ContactInfo>)
                .delete(handle_delete::<ContactInfo>),
        )
        // Dreams
        .route(
            "/api/dreams",
            get(listing::handle_list_dreams).post(handle_create::<Dream>),
        )
        .route(
            "/api/dreams/:id",
            get(handle_get::<Dream>)
                .put(handle_update::<Dream>)
                .delete(handle_delete::<Dream>),
        )
        // Achievements
        .route(
            "/api/achievements",
            get(listing::handle_list_achievements).post(handle_create::<Achievement>),
        )
        .route(
            "/api/achievements/:id",
            get(handle_get::<Achievement>)
                .put(handle_update::<Achievement>)
                .delete(handle_delete::<Achievement>),
        )
        // CV
        .route("/api/cv", get(cv::handle_get_active).post(cv::handle_create))
        .route(
            "/api/cv/:id",
            get(handle_get::<Cv>)
                .put(handle_update::<Cv>)
                .delete(handle_delete::<Cv>),
        )
        // Admin utilities
        .route(
            "/api/upload",
            post(upload::handle_upload).layer(DefaultBodyLimit::max(upload::UPLOAD_BODY_LIMIT)),
        )
        .route("/api/seed", post(seed::handle_seed))
        .fallback(not_found_fallback)
        .with_state(state)
}

use axum::{extract::State, http::StatusCode, Json};

use crate::content;
use crate::errors::AppError;
use crate::extractors::ApiJson;
use crate::models::{Cv, Record};
use crate::response::ApiResponse;
use crate::state::AppState;

/// GET /api/cv: the current CV, or `data: null` when none is active.
pub async fn handle_get_active(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Option<Record<Cv>>>>, AppError> {
    let cv = content::active_cv(state.store.as_ref()).await?;
    Ok(Json(ApiResponse::data(cv)))
}

/// POST /api/cv: the new CV becomes the only active one.
pub async fn handle_create(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<serde_json::Value>,
) -> Result<(StatusCode, Json<ApiResponse<Record<Cv>>>), AppError> {
    let cv = content::create_cv(state.store.as_ref(), payload).await?;
    state.cache.invalidate().await;
    Ok((StatusCode::CREATED, Json(ApiResponse::data(cv))))
}

//! Generic single-record handlers, instantiated once per entity in the router.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::Value;

use crate::content;
use crate::errors::AppError;
use crate::extractors::ApiJson;
use crate::models::{Document, Record};
use crate::response::ApiResponse;
use crate::state::AppState;

/// GET /api/{entity}/:id
pub async fn handle_get<T: Document>(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Record<T>>>, AppError> {
    let record = content::get::<T>(state.store.as_ref(), &id).await?;
    Ok(Json(ApiResponse::data(record)))
}

/// POST /api/{entity}
pub async fn handle_create<T: Document>(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<Value>,
) -> Result<(StatusCode, Json<ApiResponse<Record<T>>>), AppError> {
    let record = content::create::<T>(state.store.as_ref(), payload).await?;
    state.cache.invalidate().await;
    Ok((StatusCode::CREATED, Json(ApiResponse::data(record))))
}

/// PUT /api/{entity}/:id
pub async fn handle_update<T: Document>(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(patch): ApiJson<Value>,
) -> Result<Json<ApiResponse<Record<T>>>, AppError> {
    let record = content::update::<T>(state.store.as_ref(), &id, patch).await?;
    state.cache.invalidate().await;
    Ok(Json(ApiResponse::data(record)))
}

/// DELETE /api/{entity}/:id
pub async fn handle_delete<T: Document>(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    content::delete::<T>(state.store.as_ref(), &id).await?;
    state.cache.invalidate().await;
    Ok(Json(ApiResponse::message(format!("{} deleted", T::LABEL))))
}

use axum::{
    extract::{Query, State},
    http::Uri,
    Json,
};
use serde::Deserialize;
use serde_json::Value;

use crate::content;
use crate::errors::AppError;
use crate::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct FeaturedQuery {
    pub featured: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct StatusQuery {
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CategoryQuery {
    pub category: Option<String>,
}

fn cache_key(uri: &Uri) -> String {
    uri.path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| uri.path().to_string())
}

fn to_json<T: serde::Serialize>(body: ApiResponse<T>) -> Result<Value, AppError> {
    serde_json::to_value(body).map_err(|e| AppError::Internal(e.into()))
}

/// GET /api/skills: grouped by category; `total` counts skills, not groups.
pub async fn handle_list_skills(State(state): State<AppState>, uri: Uri) -> Result<Json<Value>, AppError> {
    let body = state
        .cache
        .get_or_load(&cache_key(&uri), || async {
            let skills = content::list_skills(state.store.as_ref()).await?;
            let total = skills.len();
            to_json(ApiResponse::list(content::group_skills(skills), total))
        })
        .await?;
    Ok(Json(body))
}

/// GET /api/projects?featured=true|false
pub async fn handle_list_projects(
    State(state): State<AppState>,
    Query(params): Query<FeaturedQuery>,
    uri: Uri,
) -> Result<Json<Value>, AppError> {
    // Any present value other than "true" selects non-featured projects.
    let featured = params.featured.map(|v| v == "true");
    let body = state
        .cache
        .get_or_load(&cache_key(&uri), || async {
            let projects = content::list_projects(state.store.as_ref(), featured).await?;
            let total = projects.len();
            to_json(ApiResponse::list(projects, total))
        })
        .await?;
    Ok(Json(body))
}

/// GET /api/objectives?status=
pub async fn handle_list_objectives(
    State(state): State<AppState>,
    Query(params): Query<StatusQuery>,
    uri: Uri,
) -> Result<Json<Value>, AppError> {
    let body = state
        .cache
        .get_or_load(&cache_key(&uri), || async {
            let objectives = content::list_objectives(state.store.as_ref(), params.status.as_deref()).await?;
            let total = objectives.len();
            to_json(ApiResponse::list(objectives, total))
        })
        .await?;
    Ok(Json(body))
}

/// GET /api/contact: active entries only.
pub async fn handle_list_contacts(State(state): State<AppState>, uri: Uri) -> Result<Json<Value>, AppError> {
    let body = state
        .cache
        .get_or_load(&cache_key(&uri), || async {
            let contacts = content::list_contacts(state.store.as_ref()).await?;
            let total = contacts.len();
            to_json(ApiResponse::list(contacts, total))
        })
        .await?;
    Ok(Json(body))
}

/// GET /api/dreams?category=
pub async fn handle_list_dreams(
    State(state): State<AppState>,
    Query(params): Query<CategoryQuery>,
    uri: Uri,
) -> Result<Json<Value>, AppError> {
    let body = state
        .cache
        .get_or_load(&cache_key(&uri), || async {
            let dreams = content::list_dreams(state.store.as_ref(), params.category.as_deref()).await?;
            let total = dreams.len();
            to_json(ApiResponse::list(dreams, total))
        })
        .await?;
    Ok(Json(body))
}

/// GET /api/achievements?category=
pub async fn handle_list_achievements(
    State(state): State<AppState>,
    Query(params): Query<CategoryQuery>,
    uri: Uri,
) -> Result<Json<Value>, AppError> {
    let body = state
        .cache
        .get_or_load(&cache_key(&uri), || async {
            let achievements =
                content::list_achievements(state.store.as_ref(), params.category.as_deref()).await?;
            let total = achievements.len();
            to_json(ApiResponse::list(achievements, total))
        })
        .await?;
    Ok(Json(body))
}

/// GET /api/all
pub async fn handle_all(State(state): State<AppState>, uri: Uri) -> Result<Json<Value>, AppError> {
    let body = state
        .cache
        .get_or_load(&cache_key(&uri), || async {
            let snapshot = content::snapshot(state.store.as_ref()).await?;
            to_json(ApiResponse::data(snapshot))
        })
        .await?;
    Ok(Json(body))
}

use axum::{extract::State, Json};

use crate::content::seed::seed_sample;
use crate::errors::AppError;
use crate::response::ApiResponse;
use crate::state::AppState;

/// POST /api/seed
pub async fn handle_seed(State(state): State<AppState>) -> Result<Json<ApiResponse<()>>, AppError> {
    let counts = seed_sample(state.store.as_ref()).await?;
    state.cache.invalidate().await;
    let inserted: usize = counts.iter().map(|(_, n)| n).sum();
    Ok(Json(ApiResponse::message(format!(
        "Database seeded successfully ({inserted} records)"
    ))))
}

use axum::extract::State;
use axum::Json;

use super::AppState;
use crate::domain::SystemCostIndices;
use crate::error::AppError;

/// The upstream cost index table, passed through untouched. Activity labels
/// stay exactly as the provider spells them.
pub async fn get_costs(
    State(state): State<AppState>,
) -> Result<Json<Vec<SystemCostIndices>>, AppError> {
    let table = state.pipeline.cost_table().await?;
    Ok(Json(table))
}

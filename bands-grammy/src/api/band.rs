//! Forwarded band mutations

use axum::{
    extract::{Path, State},
    http::StatusCode,
};
use tracing::info;

use crate::error::{ApiError, ApiResult};
use crate::AppState;

fn parse_band_id(raw: &str) -> Result<i64, ApiError> {
    match raw.trim().parse::<i64>() {
        Ok(id) if id >= 1 => Ok(id),
        _ => Err(ApiError::BadRequest(format!(
            "Invalid value for parameter id: {}",
            raw
        ))),
    }
}

/// POST /grammy/band/:id/singles/add
pub async fn add_single(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let id = parse_band_id(&id)?;
    let status = state.client.add_single(id).await?;
    info!(id, "Single added via catalog");
    Ok(status)
}

/// DELETE /grammy/band/:id/participants/remove
pub async fn remove_participant(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let id = parse_band_id(&id)?;
    let status = state.client.remove_participant(id).await?;
    info!(id, "Participant removed via catalog");
    Ok(status)
}

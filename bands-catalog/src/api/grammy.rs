//! Mutations forwarded by the grammy gateway
//!
//! Both answer 200 with an empty body on success; failures use the usual
//! error envelope.

use axum::{
    extract::{Path, State},
    http::StatusCode,
};

use crate::api::parse_band_id;
use crate::error::ApiResult;
use crate::{service, AppState};

/// POST /grammy/band/:id/singles/add
pub async fn add_single(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let id = parse_band_id(&id)?;
    service::add_single(&state.db, id).await?;
    Ok(StatusCode::OK)
}

/// DELETE /grammy/band/:id/participants/remove
pub async fn remove_participant(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let id = parse_band_id(&id)?;
    service::remove_participant(&state.db, id).await?;
    Ok(StatusCode::OK)
}

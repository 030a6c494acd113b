//! Band business rules
//!
//! Handlers parse and validate transport concerns; everything about what
//! a band may look like, and which mutations are allowed, lives here.

use sqlx::SqlitePool;
use tracing::info;
use validator::Validate;

use crate::db::bands;
use crate::error::{ApiError, ApiResult};
use crate::filter::{BandFilter, SortOrder};
use crate::model::{
    BandRequest, BandSearchRequest, MusicBand, NewBand, SubstringRequest, MAX_PARTICIPANTS,
};
use crate::pagination::{Page, PageRequest};

/// Validate a create/update body and apply the participant cap
fn accept_band_request(request: BandRequest) -> ApiResult<NewBand> {
    request.validate()?;

    let band = request
        .into_new_band()
        .map_err(|field| ApiError::Internal(format!("{} missing after validation", field)))?;

    if band.number_of_participants > MAX_PARTICIPANTS {
        return Err(ApiError::Unprocessable(format!(
            "Number of participants cannot exceed {}",
            MAX_PARTICIPANTS
        )));
    }

    Ok(band)
}

pub async fn create_band(pool: &SqlitePool, request: BandRequest) -> ApiResult<MusicBand> {
    let band = accept_band_request(request)?;
    let stored = bands::insert_band(pool, &band).await?;
    info!(id = stored.id, name = %stored.name, "Created band");
    Ok(stored)
}

pub async fn get_band(pool: &SqlitePool, id: i64) -> ApiResult<MusicBand> {
    bands::find_band(pool, id)
        .await?
        .ok_or_else(|| ApiError::band_not_found(id))
}

/// Full replace of an existing band
///
/// Existence is checked first, then field validation and the participant
/// cap.
pub async fn update_band(pool: &SqlitePool, id: i64, request: BandRequest) -> ApiResult<MusicBand> {
    if !bands::band_exists(pool, id).await? {
        return Err(ApiError::band_not_found(id));
    }

    let band = accept_band_request(request)?;
    if !bands::update_band(pool, id, &band).await? {
        return Err(ApiError::band_not_found(id));
    }

    info!(id, "Updated band");
    get_band(pool, id).await
}

pub async fn delete_band(pool: &SqlitePool, id: i64) -> ApiResult<()> {
    if !bands::delete_band(pool, id).await? {
        return Err(ApiError::band_not_found(id));
    }
    info!(id, "Deleted band");
    Ok(())
}

pub async fn count_by_singles(pool: &SqlitePool, singles_count: i64) -> ApiResult<i64> {
    bands::count_by_singles_count(pool, singles_count).await
}

pub async fn count_by_singles_greater_than(pool: &SqlitePool, singles_count: i64) -> ApiResult<i64> {
    bands::count_by_singles_count_greater_than(pool, singles_count).await
}

pub async fn search_by_name(
    pool: &SqlitePool,
    request: SubstringRequest,
    page: PageRequest,
) -> ApiResult<Page<MusicBand>> {
    request.validate()?;
    let needle = request.value.unwrap_or_default();
    bands::find_by_name_containing(pool, &needle, page).await
}

/// Criteria search
///
/// `sort` comes from the query string; when absent the body's `<sort>`
/// element is used instead.
pub async fn search_bands(
    pool: &SqlitePool,
    request: BandSearchRequest,
    sort: Option<&str>,
    page: PageRequest,
) -> ApiResult<Page<MusicBand>> {
    let sort_expr = sort
        .filter(|s| !s.trim().is_empty())
        .or(request.sort.as_deref());
    let sort = SortOrder::parse(sort_expr)?;
    let filter = BandFilter::from_request(&request)?;
    bands::find_by_filter(pool, &filter, sort, page).await
}

pub async fn add_single(pool: &SqlitePool, id: i64) -> ApiResult<MusicBand> {
    if bands::increment_singles(pool, id).await? {
        info!(id, "Added single");
        return get_band(pool, id).await;
    }

    if bands::band_exists(pool, id).await? {
        Err(ApiError::Unprocessable(
            "Cannot add a single: singles count is at its maximum".to_string(),
        ))
    } else {
        Err(ApiError::band_not_found(id))
    }
}

/// Remove one participant; a band never drops below one
pub async fn remove_participant(pool: &SqlitePool, id: i64) -> ApiResult<MusicBand> {
    if bands::decrement_participants(pool, id).await? {
        info!(id, "Removed participant");
        return get_band(pool, id).await;
    }

    if bands::band_exists(pool, id).await? {
        Err(ApiError::Unprocessable(
            "Cannot remove a participant: a band must keep at least one".to_string(),
        ))
    } else {
        Err(ApiError::band_not_found(id))
    }
}

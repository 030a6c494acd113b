//! Band CRUD, searches and counts

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
};
use bands_common::{OptionalXml, Xml};

use crate::api::parse_band_id;
use crate::error::{ApiError, ApiResult};
use crate::model::{
    BandPageResponse, BandRequest, BandSearchRequest, CountResponse, MusicBand, SubstringRequest,
};
use crate::pagination::{PageQuery, PageRequest, MAX_FILTER_PAGE_SIZE};
use crate::{service, AppState};

/// POST /bands
pub async fn create_band(
    State(state): State<AppState>,
    Xml(request): Xml<BandRequest>,
) -> ApiResult<(StatusCode, Xml<MusicBand>)> {
    let band = service::create_band(&state.db, request).await?;
    Ok((StatusCode::CREATED, Xml(band)))
}

/// GET /bands/:id
pub async fn get_band(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Xml<MusicBand>> {
    let id = parse_band_id(&id)?;
    Ok(Xml(service::get_band(&state.db, id).await?))
}

/// PUT /bands/:id
pub async fn update_band(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Xml(request): Xml<BandRequest>,
) -> ApiResult<Xml<MusicBand>> {
    let id = parse_band_id(&id)?;
    Ok(Xml(service::update_band(&state.db, id, request).await?))
}

/// DELETE /bands/:id
pub async fn delete_band(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let id = parse_band_id(&id)?;
    service::delete_band(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /bands/filters?page=&size=&sort=
///
/// The body is optional; without one every band matches.
pub async fn search_bands(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
    OptionalXml(request): OptionalXml<BandSearchRequest>,
) -> ApiResult<Xml<BandPageResponse>> {
    let page = PageRequest::from_query(&query, Some(MAX_FILTER_PAGE_SIZE))?;
    let request = request.unwrap_or_default();
    let result = service::search_bands(&state.db, request, query.sort.as_deref(), page).await?;
    Ok(Xml(result.into()))
}

/// POST /bands/search-by-name?page=&size=
pub async fn search_by_name(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
    Xml(request): Xml<SubstringRequest>,
) -> ApiResult<Xml<BandPageResponse>> {
    let page = PageRequest::from_query(&query, None)?;
    let result = service::search_by_name(&state.db, request, page).await?;
    Ok(Xml(result.into()))
}

fn parse_singles_count(raw: &str) -> Result<i64, ApiError> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| ApiError::invalid_parameter("singlesCount", raw))
}

/// GET /bands/singles/equally/:singles_count
pub async fn count_singles_equal(
    State(state): State<AppState>,
    Path(singles_count): Path<String>,
) -> ApiResult<Xml<CountResponse>> {
    let n = parse_singles_count(&singles_count)?;
    let value = service::count_by_singles(&state.db, n).await?;
    Ok(Xml(CountResponse { value }))
}

/// GET /bands/singles/greater/:singles_count
pub async fn count_singles_greater(
    State(state): State<AppState>,
    Path(singles_count): Path<String>,
) -> ApiResult<Xml<CountResponse>> {
    let n = parse_singles_count(&singles_count)?;
    let value = service::count_by_singles_greater_than(&state.db, n).await?;
    Ok(Xml(CountResponse { value }))
}

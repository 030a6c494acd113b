//! Pagination for band searches
//!
//! Pages are 1-indexed. Unlike a browsing UI, a page past the end is not
//! clamped: it is simply empty, and `total_pages` tells the caller where
//! the data stops.

use serde::Deserialize;

use crate::error::ApiError;

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_PAGE_SIZE: i64 = 10;
/// Largest page the criteria search will serve
pub const MAX_FILTER_PAGE_SIZE: i64 = 100;

/// Raw `?page=&size=&sort=` query parameters
///
/// Kept as text so that bad numbers produce the XML error envelope rather
/// than a plain-text extractor rejection.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
    pub size: Option<String>,
    pub sort: Option<String>,
}

/// Validated page request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// Page number (1-indexed)
    pub page: i64,
    /// Rows per page
    pub size: i64,
}

fn parse_param(name: &str, raw: Option<&str>, default: i64) -> Result<i64, ApiError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(default),
        Some(text) => text.parse::<i64>().map_err(|_| ApiError::invalid_parameter(name, text)),
    }
}

impl PageRequest {
    /// Validate page and size; `max_size` of `None` leaves size unbounded
    pub fn new(page: i64, size: i64, max_size: Option<i64>) -> Result<Self, ApiError> {
        if page < 1 {
            return Err(ApiError::invalid_parameter("page", page));
        }
        if size < 1 || max_size.is_some_and(|max| size > max) {
            return Err(ApiError::invalid_parameter("size", size));
        }
        Ok(Self { page, size })
    }

    pub fn from_query(query: &PageQuery, max_size: Option<i64>) -> Result<Self, ApiError> {
        let page = parse_param("page", query.page.as_deref(), DEFAULT_PAGE)?;
        let size = parse_param("size", query.size.as_deref(), DEFAULT_PAGE_SIZE)?;
        Self::new(page, size, max_size)
    }

    /// Offset for SQL LIMIT/OFFSET query
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.size)
    }
}

/// One page of results plus totals
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: i64,
    pub size: i64,
    pub total_count: i64,
    pub total_pages: i64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, request: PageRequest, total_count: i64) -> Self {
        let total_pages = total_count / request.size + i64::from(total_count % request.size != 0);
        Self {
            items,
            page: request.page,
            size: request.size,
            total_count,
            total_pages,
        }
    }
}

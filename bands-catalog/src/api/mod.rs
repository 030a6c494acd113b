//! HTTP API handlers for bands-catalog

pub mod bands;
pub mod grammy;
pub mod health;

pub use bands::{
    count_singles_equal, count_singles_greater, create_band, delete_band, get_band,
    search_by_name, search_bands, update_band,
};
pub use grammy::{add_single, remove_participant};
pub use health::health_routes;

use crate::error::ApiError;

/// Parse a `{id}` path segment; ids start at 1
pub(crate) fn parse_band_id(raw: &str) -> Result<i64, ApiError> {
    match raw.trim().parse::<i64>() {
        Ok(id) if id >= 1 => Ok(id),
        _ => Err(ApiError::invalid_parameter("id", raw)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_band_id() {
        assert_eq!(parse_band_id("42").unwrap(), 42);
        for bad in ["0", "-3", "abc", "1.5", ""] {
            assert!(parse_band_id(bad).is_err(), "accepted {:?}", bad);
        }
    }
}

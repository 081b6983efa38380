//! Find-query resolution: raw `name` / `min_price` / `max_price` strings in,
//! one [`ItemFilter`] or a typed 400 out. Pure; no store access.

use crate::error::AppError;
use crate::model::ItemFilter;
use serde::Deserialize;

/// Raw query parameters of `GET /api/v1/items/find_all` and
/// `GET /api/v1/merchants/find`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FindParams {
    pub name: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
}

/// A price bound must be a finite, non-negative real number.
fn parse_bound(raw: &str) -> Result<f64, AppError> {
    let value: f64 = raw.parse().map_err(|_| AppError::IncorrectParameter)?;
    if !value.is_finite() {
        return Err(AppError::IncorrectParameter);
    }
    if value < 0.0 {
        return Err(AppError::IncorrectParameter);
    }
    Ok(value)
}

/// Resolve raw parameters into exactly one filter variant.
///
/// Precedence, first match wins: unparseable or negative price bound →
/// `IncorrectParameter`; name combined with a price bound →
/// `IncorrectParameter`; then both bounds / min / max / name; nothing usable →
/// `MissingParameter`. An empty `name=` counts as absent (a missing
/// parameter, not a search for ""), while an empty price bound is a number
/// that fails to parse and is therefore incorrect.
pub fn parse_filter(params: &FindParams) -> Result<ItemFilter, AppError> {
    let name = params
        .name
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string);
    let min = params
        .min_price
        .as_deref()
        .map(|s| parse_bound(s.trim()))
        .transpose()?;
    let max = params
        .max_price
        .as_deref()
        .map(|s| parse_bound(s.trim()))
        .transpose()?;

    if name.is_some() && (min.is_some() || max.is_some()) {
        return Err(AppError::IncorrectParameter);
    }

    match (min, max, name) {
        (Some(min), Some(max), _) => Ok(ItemFilter::ByPriceRange { min, max }),
        (Some(min), None, _) => Ok(ItemFilter::ByMinPrice(min)),
        (None, Some(max), _) => Ok(ItemFilter::ByMaxPrice(max)),
        (None, None, Some(name)) => Ok(ItemFilter::ByName(name)),
        (None, None, None) => Err(AppError::MissingParameter),
    }
}

//! Write-time item validation. Failures collect into an ordered message list
//! (name, description, price, merchant) and surface as one 400.

use crate::error::AppError;
use crate::model::{Item, ItemChanges, ItemDraft, NewItem};
use crate::store::CatalogStore;

const NAME_BLANK: &str = "Name can't be blank";
const DESCRIPTION_BLANK: &str = "Description can't be blank";
const PRICE_NOT_POSITIVE: &str = "Unit price must be greater than 0";
const MERCHANT_MISSING: &str = "Merchant must exist";

fn nonblank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn positive(price: f64) -> bool {
    price.is_finite() && price > 0.0
}

/// Validate a create payload: all four fields required. Merchant existence is
/// the only check that touches the store.
pub async fn validate_create(
    store: &dyn CatalogStore,
    body: &NewItem,
) -> Result<ItemDraft, AppError> {
    let mut errors = Vec::new();

    let name = nonblank(&body.name);
    if name.is_none() {
        errors.push(NAME_BLANK.to_string());
    }
    let description = nonblank(&body.description);
    if description.is_none() {
        errors.push(DESCRIPTION_BLANK.to_string());
    }
    let unit_price = body.unit_price.filter(|p| positive(*p));
    if unit_price.is_none() {
        errors.push(PRICE_NOT_POSITIVE.to_string());
    }
    let merchant_id = match body.merchant_id {
        Some(id) if store.get_merchant(id).await?.is_some() => Some(id),
        _ => {
            errors.push(MERCHANT_MISSING.to_string());
            None
        }
    };

    match (name, description, unit_price, merchant_id) {
        (Some(name), Some(description), Some(unit_price), Some(merchant_id)) => Ok(ItemDraft {
            name,
            description,
            unit_price,
            merchant_id,
        }),
        _ => Err(AppError::Validation(errors)),
    }
}

/// Validate a partial update: only supplied fields are checked, untouched
/// fields carry over from the existing item.
pub async fn validate_update(
    store: &dyn CatalogStore,
    existing: &Item,
    changes: &ItemChanges,
) -> Result<ItemDraft, AppError> {
    let mut errors = Vec::new();

    let name = match &changes.name {
        Some(_) => nonblank(&changes.name).unwrap_or_else(|| {
            errors.push(NAME_BLANK.to_string());
            existing.name.clone()
        }),
        None => existing.name.clone(),
    };
    let description = match &changes.description {
        Some(_) => nonblank(&changes.description).unwrap_or_else(|| {
            errors.push(DESCRIPTION_BLANK.to_string());
            existing.description.clone()
        }),
        None => existing.description.clone(),
    };
    let unit_price = match changes.unit_price {
        Some(p) if positive(p) => p,
        Some(_) => {
            errors.push(PRICE_NOT_POSITIVE.to_string());
            existing.unit_price
        }
        None => existing.unit_price,
    };
    let merchant_id = match changes.merchant_id {
        Some(id) => {
            if store.get_merchant(id).await?.is_none() {
                errors.push(MERCHANT_MISSING.to_string());
            }
            id
        }
        None => existing.merchant_id,
    };

    if errors.is_empty() {
        Ok(ItemDraft {
            name,
            description,
            unit_price,
            merchant_id,
        })
    } else {
        Err(AppError::Validation(errors))
    }
}

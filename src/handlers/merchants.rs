//! Merchant handlers: index/show, find-by-name, merchant→items lookup.

use crate::error::AppError;
use crate::model::Id;
use crate::response::{self, item_resource, merchant_resource};
use crate::service::FindParams;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
};

pub async fn index(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let merchants = state.store.list_merchants().await?;
    Ok(response::collection(
        merchants.iter().map(merchant_resource).collect(),
    ))
}

pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<Id>,
) -> Result<impl IntoResponse, AppError> {
    let merchant = state
        .store
        .get_merchant(id)
        .await?
        .ok_or_else(|| AppError::not_found("Merchant", id))?;
    Ok(response::single(merchant_resource(&merchant)))
}

/// `GET /api/v1/merchants/find?name=` — first match in lowercased-name order.
/// No match is the `{"data": {}}` sentinel with 200, not an error.
pub async fn find(
    State(state): State<AppState>,
    Query(params): Query<FindParams>,
) -> Result<Response, AppError> {
    let fragment = params
        .name
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or(AppError::MissingParameter)?;
    match state.store.find_merchant_by_name(fragment).await? {
        Some(merchant) => Ok(response::single(merchant_resource(&merchant)).into_response()),
        None => Ok(response::empty_object().into_response()),
    }
}

/// `GET /api/v1/merchants/:id/items` — 404s on an unknown merchant before
/// touching items.
pub async fn items(
    State(state): State<AppState>,
    Path(id): Path<Id>,
) -> Result<impl IntoResponse, AppError> {
    state
        .store
        .get_merchant(id)
        .await?
        .ok_or_else(|| AppError::not_found("Merchant", id))?;
    let items = state.store.items_for_merchant(id).await?;
    Ok(response::collection(
        items.iter().map(item_resource).collect(),
    ))
}

//! Item handlers: CRUD, the parametric find, and item→merchant lookup.

use crate::error::AppError;
use crate::model::{Id, ItemChanges, NewItem};
use crate::response::{self, item_resource, merchant_resource};
use crate::service::{parse_filter, validate_create, validate_update, FindParams};
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

/// Create/update bodies arrive wrapped: `{"item": {...}}`.
#[derive(Deserialize)]
pub struct NewItemBody {
    pub item: NewItem,
}

#[derive(Deserialize)]
pub struct ItemChangesBody {
    pub item: ItemChanges,
}

pub async fn index(
    State(state): State<AppState>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let items = state.store.list_items().await?;
    Ok(response::collection(
        items.iter().map(item_resource).collect(),
    ))
}

pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<Id>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let item = state
        .store
        .get_item(id)
        .await?
        .ok_or_else(|| AppError::not_found("Item", id))?;
    Ok(response::single(item_resource(&item)))
}

pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<NewItemBody>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let draft = validate_create(state.store.as_ref(), &body.item).await?;
    let item = state.store.create_item(draft).await?;
    tracing::info!(item_id = item.id, "item created");
    Ok(response::created(item_resource(&item)))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Id>,
    Json(body): Json<ItemChangesBody>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let existing = state
        .store
        .get_item(id)
        .await?
        .ok_or_else(|| AppError::not_found("Item", id))?;
    let draft = validate_update(state.store.as_ref(), &existing, &body.item).await?;
    let item = state
        .store
        .update_item(id, draft)
        .await?
        .ok_or_else(|| AppError::not_found("Item", id))?;
    Ok(response::single(item_resource(&item)))
}

pub async fn destroy(
    State(state): State<AppState>,
    Path(id): Path<Id>,
) -> Result<StatusCode, AppError> {
    if !state.store.delete_item(id).await? {
        return Err(AppError::not_found("Item", id));
    }
    tracing::info!(item_id = id, "item deleted");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn find_all(
    State(state): State<AppState>,
    Query(params): Query<FindParams>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let filter = parse_filter(&params)?;
    let items = state.store.filter_items(&filter).await?;
    Ok(response::collection(
        items.iter().map(item_resource).collect(),
    ))
}

/// `GET /api/v1/items/:id/merchant` — the owning merchant.
pub async fn merchant(
    State(state): State<AppState>,
    Path(id): Path<Id>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let item = state
        .store
        .get_item(id)
        .await?
        .ok_or_else(|| AppError::not_found("Item", id))?;
    let merchant = state
        .store
        .get_merchant(item.merchant_id)
        .await?
        .ok_or_else(|| AppError::not_found("Merchant", item.merchant_id))?;
    Ok(response::single(merchant_resource(&merchant)))
}

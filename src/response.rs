//! Success envelope helpers and JSON:API resource shaping.
//!
//! Every success body is `{ "data": ... }`: an object for single lookups, an
//! array for collections, and a bare `{}` sentinel when a singular find
//! matches nothing.

use crate::model::{Id, Item, Merchant};
use axum::{http::StatusCode, Json};
use serde::Serialize;

#[derive(Serialize)]
pub struct Resource<A> {
    pub id: String,
    pub r#type: &'static str,
    pub attributes: A,
}

#[derive(Serialize)]
pub struct ItemAttributes {
    pub name: String,
    pub description: String,
    pub unit_price: f64,
    pub merchant_id: Id,
}

#[derive(Serialize)]
pub struct MerchantAttributes {
    pub name: String,
}

pub fn item_resource(item: &Item) -> Resource<ItemAttributes> {
    Resource {
        id: item.id.to_string(),
        r#type: "item",
        attributes: ItemAttributes {
            name: item.name.clone(),
            description: item.description.clone(),
            unit_price: item.unit_price,
            merchant_id: item.merchant_id,
        },
    }
}

pub fn merchant_resource(merchant: &Merchant) -> Resource<MerchantAttributes> {
    Resource {
        id: merchant.id.to_string(),
        r#type: "merchant",
        attributes: MerchantAttributes {
            name: merchant.name.clone(),
        },
    }
}

#[derive(Serialize)]
pub struct DataBody<T> {
    pub data: T,
}

pub fn single<T: Serialize>(data: T) -> (StatusCode, Json<DataBody<T>>) {
    (StatusCode::OK, Json(DataBody { data }))
}

pub fn created<T: Serialize>(data: T) -> (StatusCode, Json<DataBody<T>>) {
    (StatusCode::CREATED, Json(DataBody { data }))
}

pub fn collection<T: Serialize>(data: Vec<T>) -> (StatusCode, Json<DataBody<Vec<T>>>) {
    (StatusCode::OK, Json(DataBody { data }))
}

/// `{ "data": {} }` — the no-match sentinel for singular finds. Distinct from
/// an empty array.
pub fn empty_object() -> (StatusCode, Json<serde_json::Value>) {
    (StatusCode::OK, Json(serde_json::json!({ "data": {} })))
}

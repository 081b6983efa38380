//! Domain entities and request payload types.

use serde::{Deserialize, Serialize};

pub type Id = i64;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Merchant {
    pub id: Id,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: Id,
    pub name: String,
    pub description: String,
    pub unit_price: f64,
    pub merchant_id: Id,
}

/// Invoice belongs to one customer and one merchant; items attach via
/// [`InvoiceItem`] join rows. Customer is an opaque foreign id here — the API
/// exposes no customer surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    pub id: Id,
    pub customer_id: Id,
    pub merchant_id: Id,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceItem {
    pub id: Id,
    pub invoice_id: Id,
    pub item_id: Id,
}

/// Body of `POST /api/v1/items`. All fields optional at the serde level so
/// missing ones surface as validation messages, not a 422 deserialization
/// failure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewItem {
    pub name: Option<String>,
    pub description: Option<String>,
    pub unit_price: Option<f64>,
    pub merchant_id: Option<Id>,
}

/// Body of `PATCH /api/v1/items/:id`; any subset of fields.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ItemChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub unit_price: Option<f64>,
    pub merchant_id: Option<Id>,
}

/// A fully validated item payload: every field present and constraint-checked.
/// Produced by [`crate::service::validation`], consumed by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemDraft {
    pub name: String,
    pub description: String,
    pub unit_price: f64,
    pub merchant_id: Id,
}

/// A validated find query. Exactly one variant per request; constructing more
/// than one from the same parameter set is rejected upstream in
/// [`crate::service::find`].
#[derive(Debug, Clone, PartialEq)]
pub enum ItemFilter {
    ByName(String),
    ByMinPrice(f64),
    ByMaxPrice(f64),
    ByPriceRange { min: f64, max: f64 },
}

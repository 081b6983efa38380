//! Merchant/item catalog REST API.
//!
//! The interesting logic lives in [`service`] (find-query resolution and
//! write-time validation), [`store`] (ordering contract and the cascade
//! delete), and [`error`]/[`response`] (the uniform envelope).

pub mod error;
pub mod handlers;
pub mod model;
pub mod response;
pub mod routes;
pub mod service;
pub mod state;
pub mod store;

pub use error::AppError;
pub use model::{Item, ItemFilter, Merchant};
pub use routes::app;
pub use service::{parse_filter, FindParams};
pub use state::AppState;
pub use store::{CatalogStore, MemoryStore, PgStore};

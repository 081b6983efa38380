//! Decision logic: find-query resolution and write-time item validation.

pub mod find;
pub mod validation;

pub use find::{parse_filter, FindParams};
pub use validation::{validate_create, validate_update};

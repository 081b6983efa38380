//! HTTP handlers for the catalog surface.

pub mod items;
pub mod merchants;

//! Storage seam: explicit finder/filter operations behind a trait object.
//!
//! Both backends honor the same ordering contract: name searches sort
//! ascending by lowercased name with id as tiebreaker, price filters sort
//! ascending by unit price with id as tiebreaker, and zero matches is an
//! empty vector, never an error.

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use crate::error::AppError;
use crate::model::{Id, Invoice, InvoiceItem, Item, ItemDraft, ItemFilter, Merchant};

#[async_trait::async_trait]
pub trait CatalogStore: Send + Sync {
    async fn list_merchants(&self) -> Result<Vec<Merchant>, AppError>;
    async fn get_merchant(&self, id: Id) -> Result<Option<Merchant>, AppError>;
    /// First merchant whose name contains `fragment` case-insensitively,
    /// taken in ascending lowercased-name order. `None` is a valid outcome.
    async fn find_merchant_by_name(&self, fragment: &str) -> Result<Option<Merchant>, AppError>;
    async fn create_merchant(&self, name: &str) -> Result<Merchant, AppError>;

    async fn list_items(&self) -> Result<Vec<Item>, AppError>;
    async fn get_item(&self, id: Id) -> Result<Option<Item>, AppError>;
    async fn items_for_merchant(&self, merchant_id: Id) -> Result<Vec<Item>, AppError>;
    /// Execute one filter variant with the canonical ordering.
    async fn filter_items(&self, filter: &ItemFilter) -> Result<Vec<Item>, AppError>;
    async fn create_item(&self, draft: ItemDraft) -> Result<Item, AppError>;
    /// `None` when no item has this id.
    async fn update_item(&self, id: Id, draft: ItemDraft) -> Result<Option<Item>, AppError>;
    /// Cascade delete: invoices whose only line is this item are removed with
    /// their join rows, join rows on multi-item invoices are severed, then
    /// the item goes. All-or-nothing; returns `false` (no side effects) when
    /// the id is unknown.
    async fn delete_item(&self, id: Id) -> Result<bool, AppError>;

    async fn create_invoice(&self, customer_id: Id, merchant_id: Id) -> Result<Invoice, AppError>;
    async fn get_invoice(&self, id: Id) -> Result<Option<Invoice>, AppError>;
    async fn add_invoice_item(
        &self,
        invoice_id: Id,
        item_id: Id,
    ) -> Result<InvoiceItem, AppError>;
    async fn invoice_items_for_invoice(
        &self,
        invoice_id: Id,
    ) -> Result<Vec<InvoiceItem>, AppError>;
}

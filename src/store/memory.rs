//! In-memory store. Insertion order is preserved so ordering tiebreaks fall
//! back to creation order, and the whole cascade delete runs under one write
//! lock.

use crate::error::AppError;
use crate::model::{Id, Invoice, InvoiceItem, Item, ItemDraft, ItemFilter, Merchant};
use crate::store::CatalogStore;
use std::sync::RwLock;

#[derive(Default)]
struct Tables {
    merchants: Vec<Merchant>,
    items: Vec<Item>,
    invoices: Vec<Invoice>,
    invoice_items: Vec<InvoiceItem>,
    next_merchant_id: Id,
    next_item_id: Id,
    next_invoice_id: Id,
    next_invoice_item_id: Id,
}

#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Tables> {
        self.tables.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Tables> {
        self.tables.write().unwrap_or_else(|e| e.into_inner())
    }
}

fn sort_by_name(items: &mut [Item]) {
    items.sort_by(|a, b| {
        a.name
            .to_lowercase()
            .cmp(&b.name.to_lowercase())
            .then(a.id.cmp(&b.id))
    });
}

fn sort_by_price(items: &mut [Item]) {
    items.sort_by(|a, b| a.unit_price.total_cmp(&b.unit_price).then(a.id.cmp(&b.id)));
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

#[async_trait::async_trait]
impl CatalogStore for MemoryStore {
    async fn list_merchants(&self) -> Result<Vec<Merchant>, AppError> {
        Ok(self.read().merchants.clone())
    }

    async fn get_merchant(&self, id: Id) -> Result<Option<Merchant>, AppError> {
        Ok(self.read().merchants.iter().find(|m| m.id == id).cloned())
    }

    async fn find_merchant_by_name(&self, fragment: &str) -> Result<Option<Merchant>, AppError> {
        let tables = self.read();
        let mut matches: Vec<&Merchant> = tables
            .merchants
            .iter()
            .filter(|m| contains_ci(&m.name, fragment))
            .collect();
        matches.sort_by(|a, b| {
            a.name
                .to_lowercase()
                .cmp(&b.name.to_lowercase())
                .then(a.id.cmp(&b.id))
        });
        Ok(matches.first().map(|m| (*m).clone()))
    }

    async fn create_merchant(&self, name: &str) -> Result<Merchant, AppError> {
        let mut tables = self.write();
        tables.next_merchant_id += 1;
        let merchant = Merchant {
            id: tables.next_merchant_id,
            name: name.to_string(),
        };
        tables.merchants.push(merchant.clone());
        Ok(merchant)
    }

    async fn list_items(&self) -> Result<Vec<Item>, AppError> {
        Ok(self.read().items.clone())
    }

    async fn get_item(&self, id: Id) -> Result<Option<Item>, AppError> {
        Ok(self.read().items.iter().find(|i| i.id == id).cloned())
    }

    async fn items_for_merchant(&self, merchant_id: Id) -> Result<Vec<Item>, AppError> {
        Ok(self
            .read()
            .items
            .iter()
            .filter(|i| i.merchant_id == merchant_id)
            .cloned()
            .collect())
    }

    async fn filter_items(&self, filter: &ItemFilter) -> Result<Vec<Item>, AppError> {
        let mut matches: Vec<Item> = {
            let tables = self.read();
            let keep = |item: &Item| match filter {
                ItemFilter::ByName(fragment) => contains_ci(&item.name, fragment),
                ItemFilter::ByMinPrice(min) => item.unit_price >= *min,
                ItemFilter::ByMaxPrice(max) => item.unit_price <= *max,
                ItemFilter::ByPriceRange { min, max } => {
                    item.unit_price >= *min && item.unit_price <= *max
                }
            };
            tables.items.iter().filter(|i| keep(i)).cloned().collect()
        };
        match filter {
            ItemFilter::ByName(_) => sort_by_name(&mut matches),
            _ => sort_by_price(&mut matches),
        }
        Ok(matches)
    }

    async fn create_item(&self, draft: ItemDraft) -> Result<Item, AppError> {
        let mut tables = self.write();
        tables.next_item_id += 1;
        let item = Item {
            id: tables.next_item_id,
            name: draft.name,
            description: draft.description,
            unit_price: draft.unit_price,
            merchant_id: draft.merchant_id,
        };
        tables.items.push(item.clone());
        Ok(item)
    }

    async fn update_item(&self, id: Id, draft: ItemDraft) -> Result<Option<Item>, AppError> {
        let mut tables = self.write();
        let Some(item) = tables.items.iter_mut().find(|i| i.id == id) else {
            return Ok(None);
        };
        item.name = draft.name;
        item.description = draft.description;
        item.unit_price = draft.unit_price;
        item.merchant_id = draft.merchant_id;
        Ok(Some(item.clone()))
    }

    async fn delete_item(&self, id: Id) -> Result<bool, AppError> {
        let mut tables = self.write();
        if !tables.items.iter().any(|i| i.id == id) {
            return Ok(false);
        }
        // Invoices whose only join row references this item go with it.
        let doomed: Vec<Id> = tables
            .invoices
            .iter()
            .filter(|inv| {
                let mut rows = tables
                    .invoice_items
                    .iter()
                    .filter(|ii| ii.invoice_id == inv.id);
                matches!((rows.next(), rows.next()), (Some(only), None) if only.item_id == id)
            })
            .map(|inv| inv.id)
            .collect();
        tables.invoices.retain(|inv| !doomed.contains(&inv.id));
        tables
            .invoice_items
            .retain(|ii| !doomed.contains(&ii.invoice_id) && ii.item_id != id);
        tables.items.retain(|i| i.id != id);
        Ok(true)
    }

    async fn create_invoice(&self, customer_id: Id, merchant_id: Id) -> Result<Invoice, AppError> {
        let mut tables = self.write();
        tables.next_invoice_id += 1;
        let invoice = Invoice {
            id: tables.next_invoice_id,
            customer_id,
            merchant_id,
        };
        tables.invoices.push(invoice.clone());
        Ok(invoice)
    }

    async fn get_invoice(&self, id: Id) -> Result<Option<Invoice>, AppError> {
        Ok(self.read().invoices.iter().find(|i| i.id == id).cloned())
    }

    async fn add_invoice_item(
        &self,
        invoice_id: Id,
        item_id: Id,
    ) -> Result<InvoiceItem, AppError> {
        let mut tables = self.write();
        tables.next_invoice_item_id += 1;
        let row = InvoiceItem {
            id: tables.next_invoice_item_id,
            invoice_id,
            item_id,
        };
        tables.invoice_items.push(row.clone());
        Ok(row)
    }

    async fn invoice_items_for_invoice(
        &self,
        invoice_id: Id,
    ) -> Result<Vec<InvoiceItem>, AppError> {
        Ok(self
            .read()
            .invoice_items
            .iter()
            .filter(|ii| ii.invoice_id == invoice_id)
            .cloned()
            .collect())
    }
}

//! PostgreSQL store. Runtime queries with bound parameters only; user input
//! never lands in SQL text. The cascade delete runs inside one transaction.

use crate::error::AppError;
use crate::model::{Id, Invoice, InvoiceItem, Item, ItemDraft, ItemFilter, Merchant};
use crate::store::CatalogStore;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the four tables if absent. The `unit_price > 0` CHECK backs the
    /// application-level validation; it is not a substitute for it.
    pub async fn ensure_tables(&self) -> Result<(), AppError> {
        const DDL: &[&str] = &[
            r#"
            CREATE TABLE IF NOT EXISTS merchants (
                id BIGSERIAL PRIMARY KEY,
                name TEXT NOT NULL
            )
            "#,
            r#"
            CREATE TABLE IF NOT EXISTS items (
                id BIGSERIAL PRIMARY KEY,
                name TEXT NOT NULL,
                description TEXT NOT NULL,
                unit_price DOUBLE PRECISION NOT NULL CHECK (unit_price > 0),
                merchant_id BIGINT NOT NULL REFERENCES merchants(id)
            )
            "#,
            r#"
            CREATE TABLE IF NOT EXISTS invoices (
                id BIGSERIAL PRIMARY KEY,
                customer_id BIGINT NOT NULL,
                merchant_id BIGINT NOT NULL REFERENCES merchants(id)
            )
            "#,
            r#"
            CREATE TABLE IF NOT EXISTS invoice_items (
                id BIGSERIAL PRIMARY KEY,
                invoice_id BIGINT NOT NULL REFERENCES invoices(id),
                item_id BIGINT NOT NULL REFERENCES items(id)
            )
            "#,
        ];
        for ddl in DDL {
            sqlx::query(ddl).execute(&self.pool).await?;
        }
        Ok(())
    }
}

/// `%`-pattern for a contains-match, with LIKE metacharacters in the user
/// fragment neutralized.
fn contains_pattern(fragment: &str) -> String {
    let mut escaped = String::with_capacity(fragment.len());
    for c in fragment.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    format!("%{}%", escaped)
}

fn merchant_from_row(row: &PgRow) -> Result<Merchant, sqlx::Error> {
    Ok(Merchant {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
    })
}

fn item_from_row(row: &PgRow) -> Result<Item, sqlx::Error> {
    Ok(Item {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        unit_price: row.try_get("unit_price")?,
        merchant_id: row.try_get("merchant_id")?,
    })
}

const ITEM_COLUMNS: &str = "id, name, description, unit_price, merchant_id";

#[async_trait::async_trait]
impl CatalogStore for PgStore {
    async fn list_merchants(&self) -> Result<Vec<Merchant>, AppError> {
        let rows = sqlx::query("SELECT id, name FROM merchants ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows
            .iter()
            .map(merchant_from_row)
            .collect::<Result<_, _>>()?)
    }

    async fn get_merchant(&self, id: Id) -> Result<Option<Merchant>, AppError> {
        let row = sqlx::query("SELECT id, name FROM merchants WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.as_ref().map(merchant_from_row).transpose()?)
    }

    async fn find_merchant_by_name(&self, fragment: &str) -> Result<Option<Merchant>, AppError> {
        let sql = "SELECT id, name FROM merchants WHERE name ILIKE $1 \
                   ORDER BY lower(name), id LIMIT 1";
        tracing::debug!(sql = %sql, fragment = %fragment, "merchant find");
        let row = sqlx::query(sql)
            .bind(contains_pattern(fragment))
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.as_ref().map(merchant_from_row).transpose()?)
    }

    async fn create_merchant(&self, name: &str) -> Result<Merchant, AppError> {
        let row = sqlx::query("INSERT INTO merchants (name) VALUES ($1) RETURNING id, name")
            .bind(name)
            .fetch_one(&self.pool)
            .await?;
        Ok(merchant_from_row(&row)?)
    }

    async fn list_items(&self) -> Result<Vec<Item>, AppError> {
        let sql = format!("SELECT {ITEM_COLUMNS} FROM items ORDER BY id");
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;
        Ok(rows.iter().map(item_from_row).collect::<Result<_, _>>()?)
    }

    async fn get_item(&self, id: Id) -> Result<Option<Item>, AppError> {
        let sql = format!("SELECT {ITEM_COLUMNS} FROM items WHERE id = $1");
        let row = sqlx::query(&sql).bind(id).fetch_optional(&self.pool).await?;
        Ok(row.as_ref().map(item_from_row).transpose()?)
    }

    async fn items_for_merchant(&self, merchant_id: Id) -> Result<Vec<Item>, AppError> {
        let sql = format!("SELECT {ITEM_COLUMNS} FROM items WHERE merchant_id = $1 ORDER BY id");
        let rows = sqlx::query(&sql)
            .bind(merchant_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.iter().map(item_from_row).collect::<Result<_, _>>()?)
    }

    async fn filter_items(&self, filter: &ItemFilter) -> Result<Vec<Item>, AppError> {
        let rows = match filter {
            ItemFilter::ByName(fragment) => {
                let sql = format!(
                    "SELECT {ITEM_COLUMNS} FROM items WHERE name ILIKE $1 \
                     ORDER BY lower(name), id"
                );
                tracing::debug!(sql = %sql, fragment = %fragment, "item find");
                sqlx::query(&sql)
                    .bind(contains_pattern(fragment))
                    .fetch_all(&self.pool)
                    .await?
            }
            ItemFilter::ByMinPrice(min) => {
                let sql = format!(
                    "SELECT {ITEM_COLUMNS} FROM items WHERE unit_price >= $1 \
                     ORDER BY unit_price, id"
                );
                sqlx::query(&sql).bind(min).fetch_all(&self.pool).await?
            }
            ItemFilter::ByMaxPrice(max) => {
                let sql = format!(
                    "SELECT {ITEM_COLUMNS} FROM items WHERE unit_price <= $1 \
                     ORDER BY unit_price, id"
                );
                sqlx::query(&sql).bind(max).fetch_all(&self.pool).await?
            }
            ItemFilter::ByPriceRange { min, max } => {
                let sql = format!(
                    "SELECT {ITEM_COLUMNS} FROM items \
                     WHERE unit_price >= $1 AND unit_price <= $2 \
                     ORDER BY unit_price, id"
                );
                sqlx::query(&sql)
                    .bind(min)
                    .bind(max)
                    .fetch_all(&self.pool)
                    .await?
            }
        };
        Ok(rows.iter().map(item_from_row).collect::<Result<_, _>>()?)
    }

    async fn create_item(&self, draft: ItemDraft) -> Result<Item, AppError> {
        let sql = format!(
            "INSERT INTO items (name, description, unit_price, merchant_id) \
             VALUES ($1, $2, $3, $4) RETURNING {ITEM_COLUMNS}"
        );
        let row = sqlx::query(&sql)
            .bind(&draft.name)
            .bind(&draft.description)
            .bind(draft.unit_price)
            .bind(draft.merchant_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(item_from_row(&row)?)
    }

    async fn update_item(&self, id: Id, draft: ItemDraft) -> Result<Option<Item>, AppError> {
        let sql = format!(
            "UPDATE items SET name = $1, description = $2, unit_price = $3, merchant_id = $4 \
             WHERE id = $5 RETURNING {ITEM_COLUMNS}"
        );
        let row = sqlx::query(&sql)
            .bind(&draft.name)
            .bind(&draft.description)
            .bind(draft.unit_price)
            .bind(draft.merchant_id)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.as_ref().map(item_from_row).transpose()?)
    }

    async fn delete_item(&self, id: Id) -> Result<bool, AppError> {
        let mut tx = self.pool.begin().await?;

        let exists = sqlx::query("SELECT id FROM items WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        if exists.is_none() {
            return Ok(false);
        }

        // Invoices whose single join row references this item.
        let doomed: Vec<Id> = sqlx::query(
            "SELECT invoice_id FROM invoice_items \
             GROUP BY invoice_id HAVING COUNT(*) = 1 AND MIN(item_id) = $1",
        )
        .bind(id)
        .fetch_all(&mut *tx)
        .await?
        .iter()
        .map(|row| row.try_get("invoice_id"))
        .collect::<Result<_, _>>()?;

        sqlx::query("DELETE FROM invoice_items WHERE invoice_id = ANY($1)")
            .bind(&doomed)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM invoices WHERE id = ANY($1)")
            .bind(&doomed)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM invoice_items WHERE item_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM items WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        tracing::debug!(item_id = id, invoices = doomed.len(), "cascade delete");
        Ok(true)
    }

    async fn create_invoice(&self, customer_id: Id, merchant_id: Id) -> Result<Invoice, AppError> {
        let row = sqlx::query(
            "INSERT INTO invoices (customer_id, merchant_id) VALUES ($1, $2) \
             RETURNING id, customer_id, merchant_id",
        )
        .bind(customer_id)
        .bind(merchant_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(Invoice {
            id: row.try_get("id").map_err(AppError::from)?,
            customer_id: row.try_get("customer_id").map_err(AppError::from)?,
            merchant_id: row.try_get("merchant_id").map_err(AppError::from)?,
        })
    }

    async fn get_invoice(&self, id: Id) -> Result<Option<Invoice>, AppError> {
        let row = sqlx::query("SELECT id, customer_id, merchant_id FROM invoices WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(|row| {
            Ok(Invoice {
                id: row.try_get("id")?,
                customer_id: row.try_get("customer_id")?,
                merchant_id: row.try_get("merchant_id")?,
            })
        })
        .transpose()
        .map_err(|e: sqlx::Error| e.into())
    }

    async fn add_invoice_item(
        &self,
        invoice_id: Id,
        item_id: Id,
    ) -> Result<InvoiceItem, AppError> {
        let row = sqlx::query(
            "INSERT INTO invoice_items (invoice_id, item_id) VALUES ($1, $2) \
             RETURNING id, invoice_id, item_id",
        )
        .bind(invoice_id)
        .bind(item_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(InvoiceItem {
            id: row.try_get("id").map_err(AppError::from)?,
            invoice_id: row.try_get("invoice_id").map_err(AppError::from)?,
            item_id: row.try_get("item_id").map_err(AppError::from)?,
        })
    }

    async fn invoice_items_for_invoice(
        &self,
        invoice_id: Id,
    ) -> Result<Vec<InvoiceItem>, AppError> {
        let rows = sqlx::query(
            "SELECT id, invoice_id, item_id FROM invoice_items WHERE invoice_id = $1 ORDER BY id",
        )
        .bind(invoice_id)
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter()
            .map(|row| {
                Ok(InvoiceItem {
                    id: row.try_get("id").map_err(AppError::from)?,
                    invoice_id: row.try_get("invoice_id").map_err(AppError::from)?,
                    item_id: row.try_get("item_id").map_err(AppError::from)?,
                })
            })
            .collect()
    }
}

// server/src/stores/catalog.rs

use async_trait::async_trait;
use sqlx::PgPool;
use storefront_core::{Catalog, CoreResult, ProductSnapshot};
use tracing::instrument;
use uuid::Uuid;

use crate::stores::db_err;

/// Live catalog reads against the products table.
pub struct PgCatalog {
  pool: PgPool,
}

impl PgCatalog {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

#[derive(sqlx::FromRow)]
struct ProductRow {
  id: Uuid,
  name: String,
  price: rust_decimal::Decimal,
  stock_quantity: i32,
  vendor_id: Uuid,
}

#[async_trait]
impl Catalog for PgCatalog {
  #[instrument(name = "pg_catalog::product", skip(self))]
  async fn product(&self, product_id: Uuid) -> CoreResult<Option<ProductSnapshot>> {
    let row: Option<ProductRow> =
      sqlx::query_as("SELECT id, name, price, stock_quantity, vendor_id FROM products WHERE id = $1")
        .bind(product_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

    Ok(row.map(|r| ProductSnapshot {
      id: r.id,
      name: r.name,
      price: r.price,
      available_qty: r.stock_quantity,
      vendor_id: r.vendor_id,
    }))
  }
}

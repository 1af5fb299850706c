// core/src/catalog.rs

//! Read-only view of the product catalog.
//!
//! The core never writes to the catalog. It reads a product's current price,
//! availability and vendor when a line is added (to take the snapshot), when
//! the cart is iterated (for display data) and again at checkout (to
//! revalidate quantity and recompute the charge against price drift).

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::error::CoreResult;

/// Current catalog state for one product.
#[derive(Debug, Clone, Serialize)]
pub struct ProductSnapshot {
  pub id: Uuid,
  pub name: String,
  pub price: Decimal,
  pub available_qty: i32,
  pub vendor_id: Uuid,
}

/// Catalog collaborator.
///
/// `product` returns `Ok(None)` for an unknown id; callers decide whether
/// that is an error (`add`), a silent drop (merge, checkout) or a degraded
/// view (iteration).
#[async_trait]
pub trait Catalog: Send + Sync {
  async fn product(&self, product_id: Uuid) -> CoreResult<Option<ProductSnapshot>>;
}

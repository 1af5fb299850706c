// core/src/store/mod.rs

//! Cart line storage seam.
//!
//! Two backends implement [`CartStore`]: the in-memory session store bundled
//! here ([`memory::MemoryCartStore`]) and the server's durable Postgres
//! store. The interface is identical for both; [`crate::cart::CartService`]
//! picks the backend from the [`CartOwner`] variant.

pub mod memory;

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::error::CoreResult;
use crate::identity::CartOwner;

/// One product line in a cart.
///
/// Invariants: at most one line per `product_id` for a given owner (enforced
/// by the stores), and `quantity > 0` (the service layer rejects
/// non-positive quantities before any store write, and stores fail an
/// increment that would overflow rather than wrap; lines only leave a cart
/// through `remove_line` or `clear`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartLine {
  pub product_id: Uuid,
  pub quantity: i32,
  /// Price snapshot taken when the line was first added. Authoritative for
  /// cart totals; never re-read from the catalog on access.
  pub unit_price: Decimal,
  /// Seller snapshot taken when the line was first added.
  pub vendor_id: Uuid,
}

impl CartLine {
  pub fn line_total(&self) -> Decimal {
    self.unit_price * Decimal::from(self.quantity)
  }
}

/// The add-time snapshot a store needs when it has to create the line.
#[derive(Debug, Clone)]
pub struct LineSnapshot {
  pub product_id: Uuid,
  pub unit_price: Decimal,
  pub vendor_id: Uuid,
}

/// How `upsert_line` combines the incoming quantity with an existing line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityWrite {
  /// Sum onto the existing quantity (the default `add` semantics).
  Increment(i32),
  /// Replace the existing quantity (`override_quantity = true`).
  Replace(i32),
}

impl QuantityWrite {
  pub fn quantity(&self) -> i32 {
    match self {
      QuantityWrite::Increment(q) | QuantityWrite::Replace(q) => *q,
    }
  }
}

/// Storage backend for cart lines.
///
/// `upsert_line` is the single atomic fetch-or-insert operation at the store
/// boundary: a backend must apply "create the line, or combine with the
/// existing one" as one store operation, not a read followed by a write.
#[async_trait]
pub trait CartStore: Send + Sync {
  /// Create or update the owner's line for `snapshot.product_id` and return
  /// the resulting line. On update the stored price/vendor snapshot is kept;
  /// only the quantity changes.
  async fn upsert_line(
    &self,
    owner: &CartOwner,
    snapshot: &LineSnapshot,
    write: QuantityWrite,
  ) -> CoreResult<CartLine>;

  /// All lines for the owner, in insertion order. Empty vec for no cart.
  async fn lines(&self, owner: &CartOwner) -> CoreResult<Vec<CartLine>>;

  /// Delete the line if present. Absence is not an error.
  async fn remove_line(&self, owner: &CartOwner, product_id: Uuid) -> CoreResult<()>;

  /// Delete every line for the owner. Idempotent.
  async fn clear(&self, owner: &CartOwner) -> CoreResult<()>;
}

// core/src/cart.rs

//! The cart reconciliation engine.
//!
//! One interface over two storage backends, selected by the [`CartOwner`]
//! variant: anonymous carts go to the session-scoped store, authenticated
//! carts to the durable store. Downstream consumers never branch on the
//! authentication state themselves.

use std::sync::Arc;

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::catalog::{Catalog, ProductSnapshot};
use crate::error::{CoreError, CoreResult};
use crate::identity::CartOwner;
use crate::store::{CartLine, CartStore, LineSnapshot, QuantityWrite};

/// Current catalog display data attached to a line view. Display only: the
/// price shown here may have drifted from the line's snapshot price, and the
/// snapshot price is what totals are computed from.
#[derive(Debug, Clone, Serialize)]
pub struct ProductView {
  pub id: Uuid,
  pub name: String,
  pub price: Decimal,
  pub available_qty: i32,
}

impl From<ProductSnapshot> for ProductView {
  fn from(p: ProductSnapshot) -> Self {
    Self {
      id: p.id,
      name: p.name,
      price: p.price,
      available_qty: p.available_qty,
    }
  }
}

/// One enriched cart line as produced by [`CartService::lines`].
#[derive(Debug, Clone, Serialize)]
pub struct CartLineView {
  /// `None` when the product has vanished from the catalog since it was
  /// added. The line itself survives (snapshot data is still valid);
  /// checkout will reject it.
  pub product: Option<ProductView>,
  pub product_id: Uuid,
  pub quantity: i32,
  pub unit_price: Decimal,
  pub line_total: Decimal,
  pub vendor_id: Uuid,
}

/// Lines of one vendor, for multi-vendor settlement.
#[derive(Debug, Clone, Serialize)]
pub struct VendorGroup {
  pub vendor_id: Uuid,
  pub lines: Vec<CartLineView>,
}

/// Result of merging a session cart into an account cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeReport {
  /// Lines carried over into the account cart.
  pub merged: usize,
  /// Lines dropped because their product no longer exists in the catalog.
  pub dropped: usize,
}

/// The reconciliation engine. Cheap to share; hold it in an `Arc`.
pub struct CartService {
  session_carts: Arc<dyn CartStore>,
  account_carts: Arc<dyn CartStore>,
  catalog: Arc<dyn Catalog>,
}

impl CartService {
  pub fn new(
    session_carts: Arc<dyn CartStore>,
    account_carts: Arc<dyn CartStore>,
    catalog: Arc<dyn Catalog>,
  ) -> Self {
    Self {
      session_carts,
      account_carts,
      catalog,
    }
  }

  /// The one place backend selection happens.
  fn backend(&self, owner: &CartOwner) -> &dyn CartStore {
    match owner {
      CartOwner::Anonymous(_) => self.session_carts.as_ref(),
      CartOwner::Authenticated(_) => self.account_carts.as_ref(),
    }
  }

  /// Adds `quantity` of a product to the owner's cart.
  ///
  /// Creates the line with a price/vendor snapshot when absent. When the
  /// line exists, `override_quantity` replaces the quantity, otherwise the
  /// quantities are summed. Fails with `ProductNotFound` for unknown
  /// products and `Validation` for non-positive quantities, before any
  /// store access.
  #[instrument(name = "cart::add", skip(self))]
  pub async fn add(
    &self,
    owner: &CartOwner,
    product_id: Uuid,
    quantity: i32,
    override_quantity: bool,
  ) -> CoreResult<CartLine> {
    if quantity <= 0 {
      warn!(quantity, "rejected add with non-positive quantity");
      return Err(CoreError::Validation("Quantity must be a positive number.".to_string()));
    }

    let product = self
      .catalog
      .product(product_id)
      .await?
      .ok_or(CoreError::ProductNotFound(product_id))?;

    let snapshot = LineSnapshot {
      product_id: product.id,
      unit_price: product.price,
      vendor_id: product.vendor_id,
    };
    let write = if override_quantity {
      QuantityWrite::Replace(quantity)
    } else {
      QuantityWrite::Increment(quantity)
    };

    let line = self.backend(owner).upsert_line(owner, &snapshot, write).await?;
    info!(%product_id, new_quantity = line.quantity, "cart line upserted");
    Ok(line)
  }

  /// Deletes the product's line if present. A no-op for absent lines.
  #[instrument(name = "cart::remove", skip(self))]
  pub async fn remove(&self, owner: &CartOwner, product_id: Uuid) -> CoreResult<()> {
    self.backend(owner).remove_line(owner, product_id).await
  }

  /// Empties the owner's cart. Idempotent.
  #[instrument(name = "cart::clear", skip(self))]
  pub async fn clear(&self, owner: &CartOwner) -> CoreResult<()> {
    self.backend(owner).clear(owner).await
  }

  /// The enriched, restartable view over the cart: every stored line plus
  /// the product's *current* catalog display data. The snapshot
  /// `unit_price` stays authoritative for `line_total`; the catalog is only
  /// consulted for display. Re-invocable without side effects.
  #[instrument(name = "cart::lines", skip(self))]
  pub async fn lines(&self, owner: &CartOwner) -> CoreResult<Vec<CartLineView>> {
    let stored = self.backend(owner).lines(owner).await?;
    let mut views = Vec::with_capacity(stored.len());
    for line in stored {
      let product = self.catalog.product(line.product_id).await?.map(ProductView::from);
      if product.is_none() {
        debug!(product_id = %line.product_id, "cart line references a vanished product");
      }
      views.push(CartLineView {
        product,
        product_id: line.product_id,
        quantity: line.quantity,
        unit_price: line.unit_price,
        line_total: line.line_total(),
        vendor_id: line.vendor_id,
      });
    }
    Ok(views)
  }

  /// Sum of `unit_price * quantity` over all lines, from the stored
  /// snapshots alone (no catalog access). Zero for an empty cart.
  #[instrument(name = "cart::total_price", skip(self))]
  pub async fn total_price(&self, owner: &CartOwner) -> CoreResult<Decimal> {
    let stored = self.backend(owner).lines(owner).await?;
    Ok(stored.iter().map(CartLine::line_total).sum())
  }

  /// Partitions the enriched view by vendor, one pass, groups ordered by
  /// first-seen vendor.
  #[instrument(name = "cart::group_by_vendor", skip(self))]
  pub async fn group_by_vendor(&self, owner: &CartOwner) -> CoreResult<Vec<VendorGroup>> {
    let mut groups: Vec<VendorGroup> = Vec::new();
    for view in self.lines(owner).await? {
      match groups.iter_mut().find(|g| g.vendor_id == view.vendor_id) {
        Some(group) => group.lines.push(view),
        None => groups.push(VendorGroup {
          vendor_id: view.vendor_id,
          lines: vec![view],
        }),
      }
    }
    Ok(groups)
  }

  /// Moves the session cart's lines into the user's account cart, then
  /// destroys the session cart.
  ///
  /// Called exactly once, at the moment a previously-anonymous identity
  /// authenticates. Quantities are summed with whatever the account cart
  /// already holds (no override). A session line whose product no longer
  /// exists in the catalog is dropped; the merge itself never fails over a
  /// single line.
  #[instrument(name = "cart::merge_session_into_account", skip(self))]
  pub async fn merge_session_into_account(&self, session_id: Uuid, user_id: Uuid) -> CoreResult<MergeReport> {
    let session_owner = CartOwner::Anonymous(session_id);
    let account_owner = CartOwner::Authenticated(user_id);

    let session_lines = self.session_carts.lines(&session_owner).await?;
    let mut report = MergeReport { merged: 0, dropped: 0 };

    for line in session_lines {
      match self.add(&account_owner, line.product_id, line.quantity, false).await {
        Ok(_) => report.merged += 1,
        Err(CoreError::ProductNotFound(product_id)) => {
          warn!(%product_id, "dropping session cart line: product vanished");
          report.dropped += 1;
        }
        Err(other) => return Err(other),
      }
    }

    self.session_carts.clear(&session_owner).await?;
    info!(merged = report.merged, dropped = report.dropped, "session cart merged into account cart");
    Ok(report)
  }
}

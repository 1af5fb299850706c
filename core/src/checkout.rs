// core/src/checkout.rs

//! The checkout orchestrator.
//!
//! Consumes the reconciled cart, revalidates every line against the live
//! catalog, builds the payment provider's line-item list, requests an
//! external checkout session and persists the Order + OrderItems atomically.
//! A line that fails revalidation is skipped with a recorded reason, never
//! fatal to the attempt; the attempt aborts only when the cart is empty, no
//! line survives, the provider call fails, or persistence fails.

use std::sync::Arc;

use async_trait::async_trait;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::cart::CartService;
use crate::catalog::Catalog;
use crate::error::{CoreError, CoreResult};
use crate::identity::RequestIdentity;

/// One provider-facing line item: current product name, current price in
/// minor currency units, requested quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderLineItem {
  pub name: String,
  pub unit_amount_minor: i64,
  pub quantity: i32,
}

/// The external provider's representation of a pending payment.
#[derive(Debug, Clone)]
pub struct CheckoutSession {
  pub session_id: String,
  pub redirect_url: String,
}

/// External payment provider collaborator.
///
/// A failed session creation is fatal to the checkout attempt; the
/// orchestrator does not retry in-process. Callers retry by re-submitting.
#[async_trait]
pub trait PaymentProvider: Send + Sync {
  async fn create_checkout_session(&self, line_items: &[ProviderLineItem]) -> CoreResult<CheckoutSession>;
}

/// Order header to persist once a checkout session exists.
#[derive(Debug, Clone)]
pub struct NewOrder {
  pub checkout_session_id: String,
  /// Sum over surviving lines of current catalog price times quantity.
  pub amount: Decimal,
  pub currency: String,
  /// Empty string for anonymous checkouts.
  pub customer_email: String,
}

/// Immutable quantity snapshot for one surviving line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrderItem {
  pub product_id: Uuid,
  pub quantity: i32,
}

/// Durable order storage collaborator.
#[async_trait]
pub trait OrderRepository: Send + Sync {
  /// Persists the order and all its items inside one atomic transaction and
  /// returns the order id. Partial Order/OrderItem sets must never become
  /// visible.
  async fn create_pending_order(&self, order: &NewOrder, items: &[NewOrderItem]) -> CoreResult<Uuid>;

  /// Transitions the matching order `Pending -> Paid`. Idempotent:
  /// re-applying to an already-paid order succeeds without effect. Fails
  /// with `OrderNotFound` when no order carries this session id.
  async fn mark_paid(&self, checkout_session_id: &str) -> CoreResult<()>;
}

/// Why a cart line was dropped during checkout revalidation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RejectReason {
  /// The product no longer exists in the catalog.
  ProductGone,
  /// Requested quantity exceeds current availability.
  InsufficientStock { available: i32, requested: i32 },
}

/// A dropped line with its reason, surfaced to the caller so clients can
/// show why part of the cart was not charged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RejectedLine {
  pub product_id: Uuid,
  pub reason: RejectReason,
}

/// A successful checkout attempt.
#[derive(Debug, Clone)]
pub struct CheckoutOutcome {
  pub order_id: Uuid,
  pub checkout_session_id: String,
  pub redirect_url: String,
  pub amount: Decimal,
  pub currency: String,
  /// OrderItems actually persisted, a subset of the cart lines.
  pub accepted: Vec<NewOrderItem>,
  /// Cart lines dropped during revalidation. The cart itself keeps them.
  pub rejected: Vec<RejectedLine>,
}

/// Converts a decimal price to minor currency units (cents) for the
/// provider. Rounds to the nearest minor unit.
pub fn to_minor_units(price: Decimal) -> CoreResult<i64> {
  (price * Decimal::ONE_HUNDRED)
    .round()
    .to_i64()
    .ok_or_else(|| CoreError::Validation(format!("price {price} does not fit in minor units")))
}

pub struct CheckoutService {
  carts: Arc<CartService>,
  catalog: Arc<dyn Catalog>,
  provider: Arc<dyn PaymentProvider>,
  orders: Arc<dyn OrderRepository>,
  currency: String,
}

impl CheckoutService {
  pub fn new(
    carts: Arc<CartService>,
    catalog: Arc<dyn Catalog>,
    provider: Arc<dyn PaymentProvider>,
    orders: Arc<dyn OrderRepository>,
    currency: impl Into<String>,
  ) -> Self {
    Self {
      carts,
      catalog,
      provider,
      orders,
      currency: currency.into(),
    }
  }

  /// Runs one checkout attempt for the requester's cart.
  ///
  /// Flow: read cart -> revalidate lines against the live catalog -> create
  /// the provider session -> persist Order + OrderItems atomically. The
  /// order amount is recomputed from *current* catalog prices, not the cart
  /// snapshots, as a deliberate re-check against price drift. The cart is
  /// not cleared here; clearing happens separately once payment is
  /// confirmed, so an abandoned payment loses nothing.
  #[instrument(name = "checkout::begin", skip(self, identity), fields(owner = ?identity.owner))]
  pub async fn begin_checkout(&self, identity: &RequestIdentity) -> CoreResult<CheckoutOutcome> {
    let cart_lines = self.carts.lines(&identity.owner).await?;
    if cart_lines.is_empty() {
      return Err(CoreError::EmptyCart);
    }

    let mut line_items = Vec::new();
    let mut accepted = Vec::new();
    let mut rejected = Vec::new();
    let mut amount = Decimal::ZERO;

    for line in &cart_lines {
      // Revalidate against the catalog as it is *now*, not the snapshot the
      // line was added with.
      let product = match self.catalog.product(line.product_id).await? {
        Some(p) => p,
        None => {
          warn!(product_id = %line.product_id, "skipping line: product gone");
          rejected.push(RejectedLine {
            product_id: line.product_id,
            reason: RejectReason::ProductGone,
          });
          continue;
        }
      };

      if line.quantity > product.available_qty {
        warn!(
          product_id = %line.product_id,
          requested = line.quantity,
          available = product.available_qty,
          "skipping line: insufficient stock"
        );
        rejected.push(RejectedLine {
          product_id: line.product_id,
          reason: RejectReason::InsufficientStock {
            available: product.available_qty,
            requested: line.quantity,
          },
        });
        continue;
      }

      line_items.push(ProviderLineItem {
        name: product.name.clone(),
        unit_amount_minor: to_minor_units(product.price)?,
        quantity: line.quantity,
      });
      accepted.push(NewOrderItem {
        product_id: line.product_id,
        quantity: line.quantity,
      });
      amount += product.price * Decimal::from(line.quantity);
    }

    if accepted.is_empty() {
      return Err(CoreError::NoValidProducts);
    }

    // External call before any persistence: a provider failure leaves no
    // trace in the order store.
    let session = self.provider.create_checkout_session(&line_items).await?;

    let order = NewOrder {
      checkout_session_id: session.session_id.clone(),
      amount,
      currency: self.currency.clone(),
      customer_email: identity.email.clone().unwrap_or_default(),
    };
    let order_id = self.orders.create_pending_order(&order, &accepted).await?;

    info!(
      %order_id,
      session_id = %session.session_id,
      accepted = accepted.len(),
      rejected = rejected.len(),
      %amount,
      "checkout session created, pending order persisted"
    );

    Ok(CheckoutOutcome {
      order_id,
      checkout_session_id: session.session_id,
      redirect_url: session.redirect_url,
      amount,
      currency: self.currency.clone(),
      accepted,
      rejected,
    })
  }
}

// src/lib.rs

//! Storefront core: cart reconciliation and multi-vendor checkout.
//!
//! The crate unifies two cart backends behind a single interface:
//!  - an anonymous, session-scoped cart (in-memory, dies with the session)
//!  - a durable, account-bound cart (one cart per user)
//!
//! Every operation takes an explicit [`CartOwner`] so downstream consumers
//! (checkout, HTTP handlers) never branch on "is this user logged in?".
//! On login the session cart is merged into the account cart and destroyed.
//!
//! Checkout consumes the reconciled cart, revalidates each line against the
//! live catalog (invalid lines are skipped, not fatal), requests an external
//! payment session and persists an Order + OrderItems atomically through the
//! [`OrderRepository`] collaborator.

// Declare modules according to the planned structure
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod error;
pub mod identity;
pub mod store;

// --- Re-exports for the Public API ---

// Identity context threaded through every operation.
pub use crate::identity::{CartOwner, RequestIdentity};

// The reconciliation engine and its views.
pub use crate::cart::{CartLineView, CartService, MergeReport, ProductView, VendorGroup};

// Catalog collaborator.
pub use crate::catalog::{Catalog, ProductSnapshot};

// Cart storage seam and the bundled in-memory backend.
pub use crate::store::memory::MemoryCartStore;
pub use crate::store::{CartLine, CartStore, LineSnapshot, QuantityWrite};

// Checkout orchestration.
pub use crate::checkout::{
  CheckoutOutcome, CheckoutService, CheckoutSession, NewOrder, NewOrderItem, OrderRepository,
  PaymentProvider, ProviderLineItem, RejectReason, RejectedLine,
};

pub use crate::error::{CoreError, CoreResult};

// server/src/state.rs
use crate::config::AppConfig;
use crate::services::sessions::SessionRegistry;
use sqlx::PgPool;
use std::sync::Arc;
use storefront_core::{CartService, CheckoutService, OrderRepository};

#[derive(Clone)]
pub struct AppState {
  pub db_pool: PgPool,
  pub config: Arc<AppConfig>, // Share loaded config
  pub sessions: Arc<SessionRegistry>,
  pub carts: Arc<CartService>,
  pub checkout: Arc<CheckoutService>,
  /// Shared with `checkout`; the webhook handler applies `Pending -> Paid`
  /// transitions through this seam.
  pub orders: Arc<dyn OrderRepository>,
}

// server/src/models/cart_item.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One durable account-cart line. The implicit cart is keyed by `user_id`;
/// `(user_id, product_id)` is unique and `quantity` is always positive.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CartItem {
  pub id: Uuid, // Primary key for the cart_item itself
  pub user_id: Uuid,
  pub product_id: Uuid,
  pub quantity: i32,
  pub unit_price: Decimal, // price snapshot at add-time
  pub vendor_id: Uuid,     // seller snapshot at add-time
  pub added_at: DateTime<Utc>,
}

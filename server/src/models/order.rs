// server/src/models/order.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::{FromRow, Type as SqlxType};
use uuid::Uuid; // Renamed Type to SqlxType to avoid conflict

// Matches order_status_enum in schema.sql. Only the payment webhook moves an
// order out of Pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, SqlxType)]
#[sqlx(type_name = "order_status_enum", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
  Pending,
  Paid,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Order {
  pub id: Uuid,
  /// Opaque identity from the payment provider; webhooks key on this.
  pub checkout_session_id: String,
  pub amount: Decimal,
  pub currency: String,
  /// Empty for anonymous checkouts.
  pub customer_email: String,
  pub status: OrderStatus,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

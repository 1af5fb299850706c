// server/src/models/product.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Product {
  pub id: Uuid,
  pub name: String,
  pub description: Option<String>, // Description can be optional
  pub price: Decimal,
  pub stock_quantity: i32,
  pub vendor_id: Uuid, // The seller responsible for fulfillment
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

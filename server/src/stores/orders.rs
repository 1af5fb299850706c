// server/src/stores/orders.rs

use async_trait::async_trait;
use sqlx::PgPool;
use storefront_core::{CoreError, CoreResult, NewOrder, NewOrderItem, OrderRepository};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::models::OrderStatus;
use crate::stores::db_err;

/// Durable order storage. Order + items are written inside one transaction;
/// a failure anywhere rolls the whole set back.
pub struct PgOrderRepository {
  pool: PgPool,
}

impl PgOrderRepository {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

#[async_trait]
impl OrderRepository for PgOrderRepository {
  #[instrument(name = "pg_orders::create_pending_order", skip(self, order, items), fields(session_id = %order.checkout_session_id))]
  async fn create_pending_order(&self, order: &NewOrder, items: &[NewOrderItem]) -> CoreResult<Uuid> {
    let mut tx = self.pool.begin().await.map_err(db_err)?;

    let order_id: Uuid = sqlx::query_scalar(
      "INSERT INTO orders (id, checkout_session_id, amount, currency, customer_email, status) \
       VALUES ($1, $2, $3, $4, $5, 'pending') RETURNING id",
    )
    .bind(Uuid::new_v4())
    .bind(&order.checkout_session_id)
    .bind(order.amount)
    .bind(&order.currency)
    .bind(&order.customer_email)
    .fetch_one(&mut *tx)
    .await
    .map_err(db_err)?;

    for item in items {
      sqlx::query("INSERT INTO order_items (id, order_id, product_id, quantity) VALUES ($1, $2, $3, $4)")
        .bind(Uuid::new_v4())
        .bind(order_id)
        .bind(item.product_id)
        .bind(item.quantity)
        .execute(&mut *tx)
        .await
        .map_err(db_err)?;
    }

    tx.commit().await.map_err(db_err)?;
    info!(%order_id, items = items.len(), "pending order persisted");
    Ok(order_id)
  }

  #[instrument(name = "pg_orders::mark_paid", skip(self))]
  async fn mark_paid(&self, checkout_session_id: &str) -> CoreResult<()> {
    let status: Option<OrderStatus> =
      sqlx::query_scalar("SELECT status FROM orders WHERE checkout_session_id = $1")
        .bind(checkout_session_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

    match status {
      None => Err(CoreError::OrderNotFound(checkout_session_id.to_string())),
      Some(OrderStatus::Paid) => {
        // Duplicate or out-of-order delivery; already applied.
        info!("order already paid, ignoring duplicate event");
        Ok(())
      }
      Some(OrderStatus::Pending) => {
        sqlx::query(
          "UPDATE orders SET status = 'paid', updated_at = NOW() \
           WHERE checkout_session_id = $1 AND status = 'pending'",
        )
        .bind(checkout_session_id)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        info!("order marked paid");
        Ok(())
      }
    }
  }
}

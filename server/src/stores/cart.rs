// server/src/stores/cart.rs

use async_trait::async_trait;
use sqlx::PgPool;
use storefront_core::{CartLine, CartOwner, CartStore, CoreError, CoreResult, LineSnapshot, QuantityWrite};
use tracing::instrument;
use uuid::Uuid;

use crate::models::CartItem;
use crate::stores::db_err;

/// The durable account-cart backend.
///
/// The upsert is a single `INSERT .. ON CONFLICT DO UPDATE .. RETURNING`
/// statement, so get-or-create-then-combine is one atomic store operation:
/// two concurrent adds for the same product both land, with quantities
/// summed by the database rather than by a racy read-modify-write.
pub struct PgCartStore {
  pool: PgPool,
}

impl PgCartStore {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }

  /// This backend only ever sees authenticated owners; `CartService`
  /// dispatches anonymous carts to the session store.
  fn user_id(owner: &CartOwner) -> CoreResult<Uuid> {
    match owner {
      CartOwner::Authenticated(user_id) => Ok(*user_id),
      CartOwner::Anonymous(_) => Err(CoreError::Internal {
        source: anyhow::anyhow!("anonymous cart routed to the durable store"),
      }),
    }
  }
}

const UPSERT_INCREMENT: &str = r#"
  INSERT INTO cart_items (id, user_id, product_id, quantity, unit_price, vendor_id, added_at)
  VALUES ($1, $2, $3, $4, $5, $6, NOW())
  ON CONFLICT (user_id, product_id)
  DO UPDATE SET quantity = cart_items.quantity + EXCLUDED.quantity
  RETURNING id, user_id, product_id, quantity, unit_price, vendor_id, added_at
"#;

const UPSERT_REPLACE: &str = r#"
  INSERT INTO cart_items (id, user_id, product_id, quantity, unit_price, vendor_id, added_at)
  VALUES ($1, $2, $3, $4, $5, $6, NOW())
  ON CONFLICT (user_id, product_id)
  DO UPDATE SET quantity = EXCLUDED.quantity
  RETURNING id, user_id, product_id, quantity, unit_price, vendor_id, added_at
"#;

#[async_trait]
impl CartStore for PgCartStore {
  #[instrument(name = "pg_cart::upsert_line", skip(self, snapshot))]
  async fn upsert_line(
    &self,
    owner: &CartOwner,
    snapshot: &LineSnapshot,
    write: QuantityWrite,
  ) -> CoreResult<CartLine> {
    let user_id = Self::user_id(owner)?;
    let sql = match write {
      QuantityWrite::Increment(_) => UPSERT_INCREMENT,
      QuantityWrite::Replace(_) => UPSERT_REPLACE,
    };

    // On conflict the stored unit_price/vendor_id snapshot wins; EXCLUDED
    // values only apply to a fresh row. Postgres raises 22003 when the
    // summed quantity leaves the INTEGER range; the stored row is untouched.
    let item: CartItem = sqlx::query_as(sql)
      .bind(Uuid::new_v4())
      .bind(user_id)
      .bind(snapshot.product_id)
      .bind(write.quantity())
      .bind(snapshot.unit_price)
      .bind(snapshot.vendor_id)
      .fetch_one(&self.pool)
      .await
      .map_err(|e| match &e {
        sqlx::Error::Database(db) if db.code().as_deref() == Some("22003") => {
          CoreError::Validation("Quantity exceeds the maximum for a cart line.".to_string())
        }
        _ => db_err(e),
      })?;

    Ok(CartLine {
      product_id: item.product_id,
      quantity: item.quantity,
      unit_price: item.unit_price,
      vendor_id: item.vendor_id,
    })
  }

  #[instrument(name = "pg_cart::lines", skip(self))]
  async fn lines(&self, owner: &CartOwner) -> CoreResult<Vec<CartLine>> {
    let user_id = Self::user_id(owner)?;
    let items: Vec<CartItem> = sqlx::query_as(
      "SELECT id, user_id, product_id, quantity, unit_price, vendor_id, added_at \
       FROM cart_items WHERE user_id = $1 ORDER BY added_at ASC, id ASC",
    )
    .bind(user_id)
    .fetch_all(&self.pool)
    .await
    .map_err(db_err)?;

    Ok(
      items
        .into_iter()
        .map(|item| CartLine {
          product_id: item.product_id,
          quantity: item.quantity,
          unit_price: item.unit_price,
          vendor_id: item.vendor_id,
        })
        .collect(),
    )
  }

  #[instrument(name = "pg_cart::remove_line", skip(self))]
  async fn remove_line(&self, owner: &CartOwner, product_id: Uuid) -> CoreResult<()> {
    let user_id = Self::user_id(owner)?;
    sqlx::query("DELETE FROM cart_items WHERE user_id = $1 AND product_id = $2")
      .bind(user_id)
      .bind(product_id)
      .execute(&self.pool)
      .await
      .map_err(db_err)?;
    Ok(())
  }

  #[instrument(name = "pg_cart::clear", skip(self))]
  async fn clear(&self, owner: &CartOwner) -> CoreResult<()> {
    let user_id = Self::user_id(owner)?;
    sqlx::query("DELETE FROM cart_items WHERE user_id = $1")
      .bind(user_id)
      .execute(&self.pool)
      .await
      .map_err(db_err)?;
    Ok(())
  }
}

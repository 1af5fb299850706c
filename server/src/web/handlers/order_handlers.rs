// server/src/web/handlers/order_handlers.rs

use actix_web::{web, HttpResponse};
use serde_json::json;
use tracing::{instrument, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{Order, OrderItem};
use crate::state::AppState;

// --- Handler Implementation ---

/// `GET /orders/{order_id}`: order status lookup. The checkout response
/// hands the client this id; polling here is how it observes the
/// webhook-driven `pending -> paid` transition.
#[instrument(name = "handler::get_order", skip(app_state, path), fields(order_id = %path.as_ref()))]
pub async fn get_order_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
  let order_id = path.into_inner();

  let order_opt: Option<Order> = sqlx::query_as(
    "SELECT id, checkout_session_id, amount, currency, customer_email, status, created_at, updated_at \
     FROM orders WHERE id = $1",
  )
  .bind(order_id)
  .fetch_optional(&app_state.db_pool)
  .await?;

  let order = match order_opt {
    Some(order) => order,
    None => {
      warn!("Order with ID {} not found.", order_id);
      return Err(AppError::NotFound(format!("Order with ID {} not found.", order_id)));
    }
  };

  let items: Vec<OrderItem> = sqlx::query_as(
    "SELECT id, order_id, product_id, quantity FROM order_items WHERE order_id = $1",
  )
  .bind(order_id)
  .fetch_all(&app_state.db_pool)
  .await?;

  Ok(HttpResponse::Ok().json(json!({ "order": order, "items": items })))
}

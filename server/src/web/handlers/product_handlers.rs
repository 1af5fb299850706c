// server/src/web/handlers/product_handlers.rs

use actix_web::{web, HttpResponse};
use serde_json::json;
use tracing::{error, instrument, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::product::Product;
use crate::state::AppState;

// --- Handler Implementations ---

#[instrument(name = "handler::list_products", skip(app_state))]
pub async fn list_products_handler(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
  let products: Vec<Product> = sqlx::query_as(
    "SELECT id, name, description, price, stock_quantity, vendor_id, created_at, updated_at \
     FROM products ORDER BY name ASC",
  )
  .fetch_all(&app_state.db_pool)
  .await
  .map_err(|e| {
    error!("Failed to fetch products from database: {}", e);
    AppError::Sqlx(e)
  })?;

  Ok(HttpResponse::Ok().json(json!({ "products": products })))
}

#[instrument(name = "handler::get_product", skip(app_state, path), fields(product_id = %path.as_ref()))]
pub async fn get_product_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
  let product_id = path.into_inner();

  let product_opt: Option<Product> = sqlx::query_as(
    "SELECT id, name, description, price, stock_quantity, vendor_id, created_at, updated_at \
     FROM products WHERE id = $1",
  )
  .bind(product_id)
  .fetch_optional(&app_state.db_pool)
  .await
  .map_err(|e| {
    error!("Database error while fetching product {}: {}", product_id, e);
    AppError::Sqlx(e)
  })?;

  match product_opt {
    Some(product) => Ok(HttpResponse::Ok().json(json!({ "product": product }))),
    None => {
      warn!("Product with ID {} not found.", product_id);
      Err(AppError::NotFound(format!("Product with ID {} not found.", product_id)))
    }
  }
}

// server/src/web/handlers/cart_handlers.rs

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::errors::AppError;
use crate::state::AppState;
use crate::web::identity::{Requester, SESSION_TOKEN_HEADER};

// --- Request DTO ---

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CartAction {
  Add,
  Remove,
  Clear,
}

#[derive(Deserialize, Debug)]
pub struct CartActionPayload {
  pub action: CartAction,
  pub product_id: Option<Uuid>,
  pub quantity: Option<i32>,
  pub override_quantity: Option<bool>,
}

impl CartActionPayload {
  /// Shape validation happens before any cart or catalog access.
  fn product_id_required(&self) -> Result<Uuid, AppError> {
    self
      .product_id
      .ok_or_else(|| AppError::Validation("product_id is required for this action.".to_string()))
  }
}

// --- Handler Implementations ---

#[instrument(
    name = "handler::get_cart",
    skip(app_state, requester),
    fields(owner = ?requester.identity.owner)
)]
pub async fn get_cart_handler(
  app_state: web::Data<AppState>,
  requester: Requester,
) -> Result<HttpResponse, AppError> {
  let owner = &requester.identity.owner;

  let data = app_state.carts.lines(owner).await?;
  let cart_total_price = app_state.carts.total_price(owner).await?;
  let cart_grouped_by_vendor = app_state.carts.group_by_vendor(owner).await?;

  Ok(
    HttpResponse::Ok()
      .insert_header((SESSION_TOKEN_HEADER, requester.token.to_string()))
      .json(json!({
          "data": data,
          "cart_total_price": cart_total_price,
          "cart_grouped_by_vendor": cart_grouped_by_vendor,
      })),
  )
}

#[instrument(
    name = "handler::cart_action",
    skip(app_state, payload, requester),
    fields(owner = ?requester.identity.owner, action = ?payload.action)
)]
pub async fn cart_action_handler(
  app_state: web::Data<AppState>,
  payload: web::Json<CartActionPayload>,
  requester: Requester,
) -> Result<HttpResponse, AppError> {
  let owner = &requester.identity.owner;

  match payload.action {
    CartAction::Add => {
      let product_id = payload.product_id_required()?;
      let quantity = payload.quantity.unwrap_or(1);
      let override_quantity = payload.override_quantity.unwrap_or(false);
      let line = app_state
        .carts
        .add(owner, product_id, quantity, override_quantity)
        .await?;
      info!(%product_id, new_quantity = line.quantity, "cart add applied");
    }
    CartAction::Remove => {
      let product_id = payload.product_id_required()?;
      app_state.carts.remove(owner, product_id).await?;
    }
    CartAction::Clear => {
      app_state.carts.clear(owner).await?;
    }
  }

  Ok(
    HttpResponse::Accepted()
      .insert_header((SESSION_TOKEN_HEADER, requester.token.to_string()))
      .json(json!({"message": "Cart updated successfully"})),
  )
}

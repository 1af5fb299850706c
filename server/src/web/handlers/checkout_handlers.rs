// server/src/web/handlers/checkout_handlers.rs

use actix_web::{web, HttpResponse};
use serde_json::json;
use tracing::{info, instrument};

use crate::errors::AppError;
use crate::state::AppState;
use crate::web::identity::{Requester, SESSION_TOKEN_HEADER};

// --- Handler Implementation ---

/// `POST /checkout`: runs one checkout attempt over the requester's
/// reconciled cart. Succeeds with the provider redirect URL as long as at
/// least one line survives revalidation; skipped lines come back in
/// `rejected_lines` with their reasons. The cart is left untouched.
#[instrument(
    name = "handler::start_checkout",
    skip(app_state, requester),
    fields(owner = ?requester.identity.owner)
)]
pub async fn start_checkout_handler(
  app_state: web::Data<AppState>,
  requester: Requester,
) -> Result<HttpResponse, AppError> {
  let outcome = app_state.checkout.begin_checkout(&requester.identity).await?;

  info!(
    order_id = %outcome.order_id,
    session_id = %outcome.checkout_session_id,
    accepted = outcome.accepted.len(),
    rejected = outcome.rejected.len(),
    "checkout attempt succeeded"
  );

  Ok(
    HttpResponse::Created()
      .insert_header((SESSION_TOKEN_HEADER, requester.token.to_string()))
      .json(json!({
          "checkout_url": outcome.redirect_url,
          "order_id": outcome.order_id,
          "session_id": outcome.checkout_session_id,
          "amount": outcome.amount,
          "currency": outcome.currency,
          "rejected_lines": outcome.rejected,
      })),
  )
}

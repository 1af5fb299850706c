// server/src/web/handlers/webhook_handlers.rs

//! Inbound payment-provider events.
//!
//! The provider posts JSON events keyed by checkout session id. Only the
//! capture events move an order `Pending -> Paid`; everything else is
//! acknowledged and ignored. Delivery is at-least-once, so the transition is
//! idempotent and the endpoint answers 200 even for orders it cannot match
//! (a non-2xx would make the provider retry forever).

use actix_web::{web, HttpRequest, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use storefront_core::CoreError;
use tracing::{info, instrument, warn};

use crate::errors::AppError;
use crate::state::AppState;

pub const WEBHOOK_SIGNATURE_HEADER: &str = "X-Webhook-Signature";

#[derive(Deserialize, Debug)]
pub struct PaymentEvent {
  #[serde(rename = "type")]
  pub event_type: String,
  pub session_id: Option<String>,
}

impl PaymentEvent {
  /// Does this event mean "funds captured, mark the order paid"?
  pub fn is_capture(&self) -> bool {
    matches!(self.event_type.as_str(), "payment_intent.succeeded" | "charge.captured")
  }
}

/// An absent signature fails verification the same way a wrong one does.
fn signature_matches(provided: Option<&str>, secret: &str) -> bool {
  provided.map_or(false, |s| s == secret)
}

// --- Handler Implementation ---

#[instrument(name = "handler::payment_webhook", skip(app_state, req, body), fields(payload_len = body.len()))]
pub async fn payment_webhook_handler(
  app_state: web::Data<AppState>,
  req: HttpRequest,
  body: web::Bytes,
) -> Result<HttpResponse, AppError> {
  // Mock signature verification: the provider sends the shared secret
  // verbatim. A real gateway integration would verify an HMAC over the body.
  let signature = req
    .headers()
    .get(WEBHOOK_SIGNATURE_HEADER)
    .and_then(|h| h.to_str().ok());
  if !signature_matches(signature, &app_state.config.webhook_secret) {
    warn!(signature_present = signature.is_some(), "webhook signature verification failed");
    return Err(AppError::Auth("Webhook signature verification failed.".to_string()));
  }

  let event: PaymentEvent = serde_json::from_slice(&body)
    .map_err(|e| AppError::Validation(format!("Invalid webhook payload: {}", e)))?;

  if !event.is_capture() {
    info!(event_type = %event.event_type, "ignoring non-capture event");
    return Ok(HttpResponse::Ok().json(json!({"status": "ignored"})));
  }

  let session_id = match event.session_id {
    Some(id) => id,
    None => {
      warn!(event_type = %event.event_type, "capture event without session_id");
      return Ok(HttpResponse::Ok().json(json!({"status": "ignored"})));
    }
  };

  match app_state.orders.mark_paid(&session_id).await {
    Ok(()) => {
      info!(%session_id, "order paid");
      Ok(HttpResponse::Ok().json(json!({"status": "processed"})))
    }
    Err(CoreError::OrderNotFound(_)) => {
      // Event for an order we never recorded; acknowledge so the provider
      // stops retrying.
      warn!(%session_id, "capture event for unknown order");
      Ok(HttpResponse::Ok().json(json!({"status": "unmatched"})))
    }
    Err(other) => Err(other.into()),
  }
}

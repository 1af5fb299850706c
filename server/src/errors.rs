// server/src/errors.rs

use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use storefront_core::CoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
  #[error("Validation Error: {0}")]
  Validation(String),

  #[error("Authentication Failed: {0}")]
  Auth(String),

  #[error("Resource Not Found: {0}")]
  NotFound(String),

  #[error("Cart is empty")]
  EmptyCart,

  #[error("No valid products available for checkout")]
  NoValidProducts,

  #[error("Payment Provider Error: {0}")]
  Payment(String),

  #[error("Configuration Error: {0}")]
  Config(String),

  #[error("Database Error: {0}")]
  Sqlx(#[from] sqlx::Error),

  #[error("Internal Server Error: {0}")]
  Internal(String), // For miscellaneous errors
}

// The core's taxonomy maps 1:1 onto the HTTP-facing variants.
impl From<CoreError> for AppError {
  fn from(err: CoreError) -> Self {
    match err {
      CoreError::Validation(m) => AppError::Validation(m),
      CoreError::ProductNotFound(id) => AppError::NotFound(format!("Product with ID {} not found.", id)),
      CoreError::OrderNotFound(session_id) => {
        AppError::NotFound(format!("Order for checkout session '{}' not found.", session_id))
      }
      CoreError::EmptyCart => AppError::EmptyCart,
      CoreError::NoValidProducts => AppError::NoValidProducts,
      CoreError::Provider(m) => AppError::Payment(m),
      CoreError::Internal { source } => AppError::Internal(source.to_string()),
    }
  }
}

// Allow anyhow::Error to be converted into AppError::Internal for convenience
// in handlers using `?` on functions returning anyhow::Result.
impl From<anyhow::Error> for AppError {
  fn from(err: anyhow::Error) -> Self {
    if err.is::<sqlx::Error>() {
      return AppError::Sqlx(err.downcast::<sqlx::Error>().unwrap());
    }
    AppError::Internal(err.to_string())
  }
}

impl ResponseError for AppError {
  fn error_response(&self) -> HttpResponse {
    // Log the full error when it's turned into a response
    tracing::error!(application_error = %self, "Responding with error");
    match self {
      AppError::Validation(m) => HttpResponse::BadRequest().json(json!({"error": m})),
      AppError::Auth(m) => HttpResponse::Unauthorized().json(json!({"error": m})),
      AppError::NotFound(m) => HttpResponse::NotFound().json(json!({"error": m})),
      AppError::EmptyCart => HttpResponse::BadRequest().json(json!({"error": "Cart is empty"})),
      AppError::NoValidProducts => {
        HttpResponse::BadRequest().json(json!({"error": "No valid products available"}))
      }
      AppError::Payment(m) => {
        HttpResponse::BadGateway().json(json!({"error": "Payment provider error", "detail": m}))
      }
      AppError::Config(m) => {
        HttpResponse::InternalServerError().json(json!({"error": "Configuration issue", "detail": m}))
      }
      AppError::Sqlx(_) => HttpResponse::InternalServerError().json(json!({"error": "Database operation failed"})),
      AppError::Internal(m) => {
        HttpResponse::InternalServerError().json(json!({"error": "An internal error occurred", "detail": m}))
      }
    }
  }
}

// Define a Result type alias for the application
pub type Result<T, E = AppError> = std::result::Result<T, E>;

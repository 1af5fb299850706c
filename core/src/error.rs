// core/src/error.rs
use anyhow::Error as AnyhowError;
use thiserror::Error;
use uuid::Uuid;

/// Error taxonomy for the cart and checkout core.
///
/// The first four variants are client-visible preconditions; `Provider` and
/// `Internal` are server-side failures. Per-line catalog problems during
/// checkout never surface here at all: the offending line is dropped and
/// reported through [`crate::checkout::RejectedLine`] instead.
#[derive(Debug, Error)]
pub enum CoreError {
  #[error("Validation failed: {0}")]
  Validation(String),

  #[error("Product {0} not found")]
  ProductNotFound(Uuid),

  #[error("Order for checkout session '{0}' not found")]
  OrderNotFound(String),

  #[error("Cart is empty")]
  EmptyCart,

  #[error("No valid products available for checkout")]
  NoValidProducts,

  #[error("Payment provider error: {0}")]
  Provider(String),

  #[error("Internal error: {source}")]
  Internal {
    #[source]
    source: AnyhowError,
  },
}

// Unexpected collaborator failures (store, persistence) arrive as anyhow
// errors and collapse into `Internal`.
impl From<AnyhowError> for CoreError {
  fn from(err: AnyhowError) -> Self {
    CoreError::Internal { source: err }
  }
}

pub type CoreResult<T, E = CoreError> = std::result::Result<T, E>;

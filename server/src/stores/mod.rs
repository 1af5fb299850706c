// server/src/stores/mod.rs

//! Postgres-backed implementations of the core's collaborator traits.

pub mod cart;
pub mod catalog;
pub mod orders;

pub use cart::PgCartStore;
pub use catalog::PgCatalog;
pub use orders::PgOrderRepository;

use storefront_core::CoreError;

/// Collapses an unexpected database failure into the core's `Internal`
/// variant, keeping the sqlx error as the source.
pub(crate) fn db_err(e: sqlx::Error) -> CoreError {
  CoreError::Internal {
    source: anyhow::Error::new(e).context("database operation failed"),
  }
}

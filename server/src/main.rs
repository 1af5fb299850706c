// server/src/main.rs

// Declare modules for the application
mod config;
mod db;
mod errors;
mod models;
mod services;
mod state;
mod stores;
mod web;

use crate::config::AppConfig;
use crate::services::payment_mock::MockPaymentProvider;
use crate::services::sessions::SessionRegistry;
use crate::state::AppState;
use crate::stores::{PgCartStore, PgCatalog, PgOrderRepository};

use actix_web::{web as actix_data, App, HttpServer};
use sqlx::PgPool;
use std::sync::Arc;
use storefront_core::{CartService, CheckoutService, MemoryCartStore, OrderRepository};
use tracing::Level;
use tracing_subscriber::fmt::format::FmtSpan;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
  tracing_subscriber::fmt()
    .with_max_level(Level::INFO)
    .with_env_filter(tracing_subscriber::EnvFilter::from_default_env()) // Allow RUST_LOG override
    .with_span_events(FmtSpan::CLOSE)
    .init();

  tracing::info!("Starting storefront server...");

  let app_config = match AppConfig::from_env() {
    Ok(cfg) => Arc::new(cfg),
    Err(e) => {
      tracing::error!(error = %e, "Failed to load application configuration.");
      panic!("Configuration error: {}", e);
    }
  };

  let db_pool = match PgPool::connect(&app_config.database_url).await {
    Ok(pool) => {
      tracing::info!("Successfully connected to the database.");
      pool
    }
    Err(e) => {
      tracing::error!(error = %e, "Failed to connect to the database.");
      panic!("Database connection error: {}", e);
    }
  };

  if app_config.seed_db {
    if let Err(e) = db::seed_db(&db_pool).await {
      tracing::error!(error = %e, "Failed to seed database.");
    }
  }

  // Wire the two cart backends behind one service: volatile session carts
  // with an idle TTL, durable account carts in Postgres.
  let session_carts = Arc::new(MemoryCartStore::with_idle_ttl(app_config.session_idle_ttl));
  let account_carts = Arc::new(PgCartStore::new(db_pool.clone()));
  let catalog = Arc::new(PgCatalog::new(db_pool.clone()));
  let orders: Arc<dyn OrderRepository> = Arc::new(PgOrderRepository::new(db_pool.clone()));
  let provider = Arc::new(MockPaymentProvider::new(app_config.app_base_url.clone()));

  let carts = Arc::new(CartService::new(session_carts, account_carts, catalog.clone()));
  let checkout = Arc::new(CheckoutService::new(
    carts.clone(),
    catalog,
    provider,
    orders.clone(),
    app_config.currency.clone(),
  ));
  let sessions = Arc::new(SessionRegistry::new(app_config.session_idle_ttl));

  let app_state = AppState {
    db_pool: db_pool.clone(),
    config: app_config.clone(),
    sessions,
    carts,
    checkout,
    orders,
  };

  let server_address = format!("{}:{}", app_config.server_host, app_config.server_port);
  tracing::info!("Attempting to bind server to {}...", server_address);

  HttpServer::new(move || {
    App::new()
      .app_data(actix_data::Data::new(app_state.clone()))
      .wrap(tracing_actix_web::TracingLogger::default())
      .configure(web::routes::configure_app_routes)
  })
  .bind(&server_address)?
  .run()
  .await
}

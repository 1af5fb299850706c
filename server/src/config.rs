// server/src/config.rs

use crate::errors::{AppError, Result};
use dotenvy::dotenv;
use std::env;
use std::time::Duration;

#[derive(Debug, Clone)] // Clone is useful if parts of config are passed around
pub struct AppConfig {
  pub server_host: String,
  pub server_port: u16,
  pub database_url: String,
  pub app_base_url: String,

  /// ISO currency code used for every checkout session.
  pub currency: String,

  /// Anonymous session carts (and auth sessions) idle longer than this are
  /// dropped.
  pub session_idle_ttl: Duration,

  /// Shared secret the mock payment provider signs webhook deliveries with.
  pub webhook_secret: String,

  // Optional: for seeding DB on startup
  pub seed_db: bool,
}

impl AppConfig {
  pub fn from_env() -> Result<Self> {
    dotenv().ok(); // Load .env file if present

    let get_env = |var_name: &str| {
      env::var(var_name).map_err(|e| AppError::Config(format!("Missing environment variable '{}': {}", var_name, e)))
    };

    let server_host = get_env("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let server_port = get_env("SERVER_PORT")
      .unwrap_or_else(|_| "8080".to_string())
      .parse::<u16>()
      .map_err(|e| AppError::Config(format!("Invalid SERVER_PORT: {}", e)))?;
    let database_url = get_env("DATABASE_URL")?;
    let app_base_url = get_env("APP_BASE_URL").unwrap_or_else(|_| format!("http://{}:{}", server_host, server_port));

    let currency = get_env("CURRENCY").unwrap_or_else(|_| "usd".to_string());

    let session_idle_ttl_secs = get_env("SESSION_IDLE_TTL_SECS")
      .unwrap_or_else(|_| "3600".to_string())
      .parse::<u64>()
      .map_err(|e| AppError::Config(format!("Invalid SESSION_IDLE_TTL_SECS: {}", e)))?;

    let webhook_secret = get_env("WEBHOOK_SECRET").unwrap_or_else(|_| "whsec_dev_only".to_string());

    let seed_db = get_env("SEED_DB")
      .unwrap_or_else(|_| "false".to_string())
      .parse::<bool>()
      .map_err(|e| AppError::Config(format!("Invalid SEED_DB value: {}", e)))?;

    tracing::info!("Application configuration loaded successfully.");

    Ok(Self {
      server_host,
      server_port,
      database_url,
      app_base_url,
      currency,
      session_idle_ttl: Duration::from_secs(session_idle_ttl_secs),
      webhook_secret,
      seed_db,
    })
  }
}

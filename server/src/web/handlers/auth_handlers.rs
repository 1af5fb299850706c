// server/src/web/handlers/auth_handlers.rs

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument, warn};

use crate::errors::AppError;
use crate::models::user::User;
use crate::services::auth::{hash_password, verify_password};
use crate::state::AppState;
use crate::web::identity::{Requester, SESSION_TOKEN_HEADER};

// --- Request DTOs ---

#[derive(Deserialize, Debug)]
pub struct SignupPayload {
  pub email: String,
  pub password: String,
}

#[derive(Deserialize, Debug)]
pub struct SigninPayload {
  pub email: String,
  pub password: String,
}

fn validate_email(email: &str) -> Result<(), AppError> {
  // Shape check only; deliverability is not this service's problem.
  let trimmed = email.trim();
  if trimmed.is_empty() || !trimmed.contains('@') || trimmed.len() > 254 {
    return Err(AppError::Validation("A valid email address is required.".to_string()));
  }
  Ok(())
}

// --- Handler Implementations ---

#[instrument(name = "handler::signup", skip(app_state, payload), fields(email = %payload.email))]
pub async fn signup_handler(
  app_state: web::Data<AppState>,
  payload: web::Json<SignupPayload>,
) -> Result<HttpResponse, AppError> {
  validate_email(&payload.email)?;
  if payload.password.len() < 8 {
    return Err(AppError::Validation(
      "Password must be at least 8 characters long.".to_string(),
    ));
  }

  let password_hash = hash_password(&payload.password)?;
  let email = payload.email.trim().to_lowercase();

  let user: User = sqlx::query_as(
    "INSERT INTO users (email, password_hash) VALUES ($1, $2) \
     RETURNING id, email, password_hash, created_at, updated_at",
  )
  .bind(&email)
  .bind(&password_hash)
  .fetch_one(&app_state.db_pool)
  .await
  .map_err(|e| {
    if let sqlx::Error::Database(db_err) = &e {
      if db_err.is_unique_violation() {
        warn!(%email, "signup for already-registered email");
        return AppError::Validation("This email address is already registered.".to_string());
      }
    }
    AppError::Sqlx(e)
  })?;

  info!(user_id = %user.id, "user registered");

  Ok(HttpResponse::Created().json(json!({
      "message": "Account created successfully.",
      "user": user,
  })))
}

/// `POST /auth/signin`: verifies credentials, then performs the one-time
/// cart upgrade: the anonymous session cart is merged into the account cart
/// and the presented session token is bound to the user. The same token keeps
/// working, now resolving to an authenticated identity.
#[instrument(name = "handler::signin", skip(app_state, payload, requester), fields(email = %payload.email))]
pub async fn signin_handler(
  app_state: web::Data<AppState>,
  payload: web::Json<SigninPayload>,
  requester: Requester,
) -> Result<HttpResponse, AppError> {
  validate_email(&payload.email)?;
  let email = payload.email.trim().to_lowercase();

  let user: Option<User> = sqlx::query_as(
    "SELECT id, email, password_hash, created_at, updated_at FROM users WHERE email = $1",
  )
  .bind(&email)
  .fetch_optional(&app_state.db_pool)
  .await?;

  // Same response for unknown email and wrong password.
  let user = match user {
    Some(user) if verify_password(&user.password_hash, &payload.password)? => user,
    _ => {
      warn!(%email, "sign-in rejected");
      return Err(AppError::Auth("Invalid email or password.".to_string()));
    }
  };

  let report = app_state
    .carts
    .merge_session_into_account(requester.token, user.id)
    .await?;
  app_state.sessions.bind_user(requester.token, user.id, &user.email);

  info!(
    user_id = %user.id,
    merged = report.merged,
    dropped = report.dropped,
    "sign-in complete, session upgraded"
  );

  Ok(
    HttpResponse::Ok()
      .insert_header((SESSION_TOKEN_HEADER, requester.token.to_string()))
      .json(json!({
          "message": "Signed in successfully.",
          "session_token": requester.token,
          "user": user,
          "cart_merge": { "merged": report.merged, "dropped": report.dropped },
      })),
  )
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn email_shape_validation() {
    assert!(validate_email("shopper@example.com").is_ok());
    assert!(validate_email("  padded@example.com  ").is_ok());
    assert!(validate_email("").is_err());
    assert!(validate_email("not-an-email").is_err());
  }
}

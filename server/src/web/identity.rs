// server/src/web/identity.rs

//! Per-request identity extraction.
//!
//! The client presents an opaque session token in `X-Session-Token`. A
//! missing, unknown or expired token silently becomes a fresh anonymous
//! session; handlers echo the (possibly new) token back in the response so
//! the client can keep it. The extractor is the only place ambient request
//! state is turned into the explicit [`RequestIdentity`] the core consumes.

use actix_web::{FromRequest, HttpRequest};
use storefront_core::RequestIdentity;
use tracing::warn;
use uuid::Uuid;

use crate::errors::AppError;
use crate::state::AppState;

pub const SESSION_TOKEN_HEADER: &str = "X-Session-Token";

/// The resolved requester: the session token to echo back, plus the identity
/// context threaded into every core call.
#[derive(Debug, Clone)]
pub struct Requester {
  pub token: Uuid,
  pub identity: RequestIdentity,
}

/// Parses the session token header, if present and well-formed.
pub fn token_from_header(req: &HttpRequest) -> Option<Uuid> {
  let raw = req.headers().get(SESSION_TOKEN_HEADER)?.to_str().ok()?;
  match Uuid::parse_str(raw.trim()) {
    Ok(token) => Some(token),
    Err(_) => {
      warn!("malformed {} header, ignoring", SESSION_TOKEN_HEADER);
      None
    }
  }
}

impl FromRequest for Requester {
  type Error = AppError;
  type Future = futures_util::future::Ready<Result<Self, Self::Error>>;

  fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
    let state = match req.app_data::<actix_web::web::Data<AppState>>() {
      Some(state) => state,
      None => {
        return futures_util::future::ready(Err(AppError::Internal(
          "AppState missing from request data".to_string(),
        )))
      }
    };

    let resolved = token_from_header(req).and_then(|token| {
      state
        .sessions
        .resolve(token)
        .map(|identity| Requester { token, identity })
    });

    let requester = resolved.unwrap_or_else(|| {
      let token = state.sessions.mint();
      Requester {
        token,
        identity: RequestIdentity::anonymous(token),
      }
    });

    futures_util::future::ready(Ok(requester))
  }
}

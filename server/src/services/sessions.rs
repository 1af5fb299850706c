// server/src/services/sessions.rs

//! In-process session registry.
//!
//! Maps opaque session tokens to the requester's identity. A token starts
//! anonymous (its uuid doubles as the anonymous cart owner key) and is bound
//! to a user at sign-in; binding is also the moment the session cart is
//! merged into the account cart, so the upgrade happens exactly once per
//! authentication.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use parking_lot::RwLock;
use storefront_core::RequestIdentity;
use tracing::{debug, info};
use uuid::Uuid;

struct SessionEntry {
  user_id: Option<Uuid>,
  email: Option<String>,
  touched_at: Instant,
}

pub struct SessionRegistry {
  sessions: RwLock<HashMap<Uuid, SessionEntry>>,
  idle_ttl: Duration,
}

impl SessionRegistry {
  pub fn new(idle_ttl: Duration) -> Self {
    Self {
      sessions: RwLock::new(HashMap::new()),
      idle_ttl,
    }
  }

  /// Issues a fresh anonymous session token.
  pub fn mint(&self) -> Uuid {
    let token = Uuid::new_v4();
    self.sessions.write().insert(
      token,
      SessionEntry {
        user_id: None,
        email: None,
        touched_at: Instant::now(),
      },
    );
    debug!(%token, "minted anonymous session");
    token
  }

  /// Resolves a presented token to the requester's identity, refreshing the
  /// idle clock. Unknown or expired tokens yield `None`; the caller mints a
  /// replacement.
  pub fn resolve(&self, token: Uuid) -> Option<RequestIdentity> {
    let mut sessions = self.sessions.write();
    let expired = sessions
      .get(&token)
      .map(|e| e.touched_at.elapsed() > self.idle_ttl)
      .unwrap_or(false);
    if expired {
      debug!(%token, "session expired");
      sessions.remove(&token);
      return None;
    }

    let entry = sessions.get_mut(&token)?;
    entry.touched_at = Instant::now();
    Some(match (entry.user_id, entry.email.clone()) {
      (Some(user_id), Some(email)) => RequestIdentity::authenticated(user_id, email),
      _ => RequestIdentity::anonymous(token),
    })
  }

  /// Upgrades the session to an authenticated one. The token itself is kept,
  /// but from now on the identity carries the user, so cart operations hit
  /// the durable backend.
  pub fn bind_user(&self, token: Uuid, user_id: Uuid, email: &str) {
    let mut sessions = self.sessions.write();
    let entry = sessions.entry(token).or_insert_with(|| SessionEntry {
      user_id: None,
      email: None,
      touched_at: Instant::now(),
    });
    entry.user_id = Some(user_id);
    entry.email = Some(email.to_string());
    entry.touched_at = Instant::now();
    info!(%token, %user_id, "session bound to user");
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use storefront_core::CartOwner;

  #[test]
  fn minted_token_resolves_to_anonymous_identity_with_token_as_owner_key() {
    let registry = SessionRegistry::new(Duration::from_secs(60));
    let token = registry.mint();
    let identity = registry.resolve(token).expect("fresh token resolves");
    assert_eq!(identity.owner, CartOwner::Anonymous(token));
    assert!(identity.email.is_none());
  }

  #[test]
  fn binding_a_user_upgrades_the_identity_in_place() {
    let registry = SessionRegistry::new(Duration::from_secs(60));
    let token = registry.mint();
    let user_id = Uuid::new_v4();

    registry.bind_user(token, user_id, "shopper@example.com");

    let identity = registry.resolve(token).expect("token still valid");
    assert_eq!(identity.owner, CartOwner::Authenticated(user_id));
    assert_eq!(identity.email.as_deref(), Some("shopper@example.com"));
  }

  #[test]
  fn unknown_and_expired_tokens_resolve_to_none() {
    let registry = SessionRegistry::new(Duration::from_millis(0));
    assert!(registry.resolve(Uuid::new_v4()).is_none());

    let token = registry.mint();
    std::thread::sleep(Duration::from_millis(5));
    assert!(registry.resolve(token).is_none());
  }
}

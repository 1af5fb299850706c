// core/src/identity.rs

//! The identity context threaded explicitly through every cart and checkout
//! call. There is no ambient request state: the HTTP layer builds a
//! [`RequestIdentity`] once per request and passes it down.

use serde::Serialize;
use uuid::Uuid;

/// Who owns the cart being operated on.
///
/// The variant selects the storage backend: anonymous carts live in the
/// session-scoped store, authenticated carts in the durable store. Both ids
/// are opaque to the core; the session id is whatever the session layer
/// mints, the user id is the account's primary key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum CartOwner {
  Anonymous(Uuid),
  Authenticated(Uuid),
}

impl CartOwner {
  pub fn is_authenticated(&self) -> bool {
    matches!(self, CartOwner::Authenticated(_))
  }

  /// The raw key, regardless of variant. Backends may use it to key their
  /// own storage; dispatch between backends still goes through the variant.
  pub fn key(&self) -> Uuid {
    match self {
      CartOwner::Anonymous(id) | CartOwner::Authenticated(id) => *id,
    }
  }
}

/// Everything the core needs to know about the current requester.
#[derive(Debug, Clone)]
pub struct RequestIdentity {
  pub owner: CartOwner,
  /// Present for authenticated requesters; `None` for guests. Checkout
  /// records an empty customer email for guests.
  pub email: Option<String>,
}

impl RequestIdentity {
  pub fn anonymous(session_id: Uuid) -> Self {
    Self {
      owner: CartOwner::Anonymous(session_id),
      email: None,
    }
  }

  pub fn authenticated(user_id: Uuid, email: impl Into<String>) -> Self {
    Self {
      owner: CartOwner::Authenticated(user_id),
      email: Some(email.into()),
    }
  }
}

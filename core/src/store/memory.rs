// core/src/store/memory.rs

//! In-memory cart backend.
//!
//! Serves two roles: the anonymous, session-scoped cart store in the server
//! (with an idle TTL so carts die with their session) and the account-cart
//! stand-in for tests (without a TTL). Lines are kept in insertion order.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use parking_lot::RwLock;
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};
use crate::identity::CartOwner;
use crate::store::{CartLine, CartStore, LineSnapshot, QuantityWrite};

struct CartEntry {
  lines: Vec<CartLine>,
  touched_at: Instant,
}

impl CartEntry {
  fn new() -> Self {
    Self {
      lines: Vec::new(),
      touched_at: Instant::now(),
    }
  }
}

/// Insertion-ordered in-memory [`CartStore`].
pub struct MemoryCartStore {
  carts: RwLock<HashMap<CartOwner, CartEntry>>,
  /// Carts idle longer than this are dropped on next access. `None`
  /// disables expiry.
  idle_ttl: Option<Duration>,
}

impl MemoryCartStore {
  /// A store whose carts never expire. Suitable as a test double for the
  /// durable account backend.
  pub fn new() -> Self {
    Self {
      carts: RwLock::new(HashMap::new()),
      idle_ttl: None,
    }
  }

  /// A store whose carts are dropped after `idle_ttl` without any access.
  /// This is the session backend: every cart operation counts as session
  /// activity and refreshes the clock.
  pub fn with_idle_ttl(idle_ttl: Duration) -> Self {
    Self {
      carts: RwLock::new(HashMap::new()),
      idle_ttl: Some(idle_ttl),
    }
  }

  /// Number of live (non-expired) carts. Primarily for diagnostics.
  pub fn cart_count(&self) -> usize {
    let now = Instant::now();
    let carts = self.carts.read();
    match self.idle_ttl {
      Some(ttl) => carts.values().filter(|e| now.duration_since(e.touched_at) <= ttl).count(),
      None => carts.len(),
    }
  }

  /// Drops the owner's entry if it has sat idle past the TTL, then refreshes
  /// the idle clock if an entry remains. Called at the top of every
  /// operation while holding the write lock.
  fn expire_and_touch(&self, carts: &mut HashMap<CartOwner, CartEntry>, owner: &CartOwner) {
    if let Some(ttl) = self.idle_ttl {
      let expired = carts
        .get(owner)
        .map(|entry| entry.touched_at.elapsed() > ttl)
        .unwrap_or(false);
      if expired {
        tracing::debug!(?owner, "session cart expired, dropping");
        carts.remove(owner);
      }
    }
    if let Some(entry) = carts.get_mut(owner) {
      entry.touched_at = Instant::now();
    }
  }
}

impl Default for MemoryCartStore {
  fn default() -> Self {
    Self::new()
  }
}

#[async_trait]
impl CartStore for MemoryCartStore {
  async fn upsert_line(
    &self,
    owner: &CartOwner,
    snapshot: &LineSnapshot,
    write: QuantityWrite,
  ) -> CoreResult<CartLine> {
    let mut carts = self.carts.write();
    self.expire_and_touch(&mut carts, owner);
    let entry = carts.entry(*owner).or_insert_with(CartEntry::new);

    if let Some(line) = entry.lines.iter_mut().find(|l| l.product_id == snapshot.product_id) {
      // Existing line: combine quantities, keep the stored price/vendor
      // snapshot untouched. A sum past i32::MAX is rejected, leaving the
      // stored quantity as it was.
      match write {
        QuantityWrite::Increment(q) => {
          line.quantity = line.quantity.checked_add(q).ok_or_else(|| {
            CoreError::Validation("Quantity exceeds the maximum for a cart line.".to_string())
          })?;
        }
        QuantityWrite::Replace(q) => line.quantity = q,
      }
      return Ok(line.clone());
    }

    let line = CartLine {
      product_id: snapshot.product_id,
      quantity: write.quantity(),
      unit_price: snapshot.unit_price,
      vendor_id: snapshot.vendor_id,
    };
    entry.lines.push(line.clone());
    Ok(line)
  }

  async fn lines(&self, owner: &CartOwner) -> CoreResult<Vec<CartLine>> {
    let mut carts = self.carts.write();
    self.expire_and_touch(&mut carts, owner);
    Ok(carts.get(owner).map(|e| e.lines.clone()).unwrap_or_default())
  }

  async fn remove_line(&self, owner: &CartOwner, product_id: Uuid) -> CoreResult<()> {
    let mut carts = self.carts.write();
    self.expire_and_touch(&mut carts, owner);
    if let Some(entry) = carts.get_mut(owner) {
      entry.lines.retain(|l| l.product_id != product_id);
    }
    Ok(())
  }

  async fn clear(&self, owner: &CartOwner) -> CoreResult<()> {
    let mut carts = self.carts.write();
    // No touch here: clearing an anonymous cart is also how the session cart
    // is destroyed after a merge, so the entry goes away entirely.
    carts.remove(owner);
    Ok(())
  }
}

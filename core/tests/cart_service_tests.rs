// tests/cart_service_tests.rs
mod common; // Reference the common module

use std::sync::Arc;
use std::time::Duration;

use common::*;
use storefront_core::{CartOwner, CartService, CoreError, MemoryCartStore};
use uuid::Uuid;

fn guest() -> CartOwner {
  CartOwner::Anonymous(Uuid::new_v4())
}

fn account() -> CartOwner {
  CartOwner::Authenticated(Uuid::new_v4())
}

#[tokio::test]
async fn add_sums_quantities_without_override() {
  setup_tracing();
  let h = harness();
  let vendor = Uuid::new_v4();
  let book = h.catalog.insert("Book 1", dec("15.00"), 10, vendor);
  let owner = account();

  h.carts.add(&owner, book, 2, false).await.unwrap();
  let line = h.carts.add(&owner, book, 3, false).await.unwrap();

  assert_eq!(line.quantity, 5);
  let views = h.carts.lines(&owner).await.unwrap();
  assert_eq!(views.len(), 1);
  assert_eq!(views[0].quantity, 5);
}

#[tokio::test]
async fn add_with_override_replaces_quantity() {
  setup_tracing();
  let h = harness();
  let book = h.catalog.insert("Book 1", dec("15.00"), 10, Uuid::new_v4());
  let owner = guest();

  h.carts.add(&owner, book, 2, false).await.unwrap();
  let line = h.carts.add(&owner, book, 3, true).await.unwrap();

  assert_eq!(line.quantity, 3);
}

#[tokio::test]
async fn add_keeps_price_snapshot_of_first_add() {
  setup_tracing();
  let h = harness();
  let book = h.catalog.insert("Book 1", dec("15.00"), 10, Uuid::new_v4());
  let owner = account();

  h.carts.add(&owner, book, 1, false).await.unwrap();
  h.catalog.set_price(book, dec("99.00"));
  let line = h.carts.add(&owner, book, 1, false).await.unwrap();

  // Snapshot from the first add is authoritative for totals.
  assert_eq!(line.unit_price, dec("15.00"));
  assert_eq!(h.carts.total_price(&owner).await.unwrap(), dec("30.00"));

  // The enriched view still shows the current catalog price for display.
  let views = h.carts.lines(&owner).await.unwrap();
  assert_eq!(views[0].product.as_ref().unwrap().price, dec("99.00"));
  assert_eq!(views[0].line_total, dec("30.00"));
}

#[tokio::test]
async fn add_unknown_product_fails_not_found() {
  setup_tracing();
  let h = harness();
  let owner = guest();

  let err = h.carts.add(&owner, Uuid::new_v4(), 1, false).await.unwrap_err();
  assert!(matches!(err, CoreError::ProductNotFound(_)));
  assert!(h.carts.lines(&owner).await.unwrap().is_empty());
}

#[tokio::test]
async fn add_rejects_non_positive_quantity() {
  setup_tracing();
  let h = harness();
  let book = h.catalog.insert("Book 1", dec("15.00"), 10, Uuid::new_v4());
  let owner = guest();

  for bad_quantity in [0, -1] {
    let err = h.carts.add(&owner, book, bad_quantity, false).await.unwrap_err();
    assert!(matches!(err, CoreError::Validation(_)));
  }
  // The cart never holds a line with quantity <= 0.
  assert!(h.carts.lines(&owner).await.unwrap().is_empty());
}

#[tokio::test]
async fn add_rejects_quantity_sum_past_i32_max() {
  setup_tracing();
  let h = harness();
  let book = h.catalog.insert("Book 1", dec("15.00"), 10, Uuid::new_v4());
  let owner = account();

  h.carts.add(&owner, book, i32::MAX, false).await.unwrap();
  let err = h.carts.add(&owner, book, i32::MAX, false).await.unwrap_err();
  assert!(matches!(err, CoreError::Validation(_)));

  // The stored line is untouched: still positive, still the first quantity.
  let views = h.carts.lines(&owner).await.unwrap();
  assert_eq!(views.len(), 1);
  assert_eq!(views[0].quantity, i32::MAX);
}

#[tokio::test]
async fn no_duplicate_lines_per_product() {
  setup_tracing();
  let h = harness();
  let book = h.catalog.insert("Book 1", dec("15.00"), 10, Uuid::new_v4());
  let owner = account();

  for _ in 0..4 {
    h.carts.add(&owner, book, 1, false).await.unwrap();
  }

  let views = h.carts.lines(&owner).await.unwrap();
  assert_eq!(views.len(), 1);
  assert_eq!(views[0].quantity, 4);
}

#[tokio::test]
async fn remove_deletes_line_and_is_noop_when_absent() {
  setup_tracing();
  let h = harness();
  let book = h.catalog.insert("Book 1", dec("15.00"), 10, Uuid::new_v4());
  let owner = guest();

  h.carts.add(&owner, book, 2, false).await.unwrap();
  h.carts.remove(&owner, book).await.unwrap();
  assert!(h.carts.lines(&owner).await.unwrap().is_empty());

  // Removing again (or removing something never added) is not an error.
  h.carts.remove(&owner, book).await.unwrap();
  h.carts.remove(&owner, Uuid::new_v4()).await.unwrap();
}

#[tokio::test]
async fn clear_empties_cart_and_is_idempotent() {
  setup_tracing();
  let h = harness();
  let vendor = Uuid::new_v4();
  let a = h.catalog.insert("Book 1", dec("15.00"), 10, vendor);
  let b = h.catalog.insert("Book 2", dec("25.00"), 5, vendor);
  let owner = account();

  h.carts.add(&owner, a, 1, false).await.unwrap();
  h.carts.add(&owner, b, 1, false).await.unwrap();

  h.carts.clear(&owner).await.unwrap();
  assert!(h.carts.lines(&owner).await.unwrap().is_empty());
  assert_eq!(h.carts.total_price(&owner).await.unwrap(), dec("0"));

  h.carts.clear(&owner).await.unwrap();
  assert!(h.carts.lines(&owner).await.unwrap().is_empty());
}

#[tokio::test]
async fn total_price_is_exact_decimal_sum() {
  setup_tracing();
  let h = harness();
  let vendor = Uuid::new_v4();
  let a = h.catalog.insert("Book 1", dec("15.00"), 10, vendor);
  let b = h.catalog.insert("Book 2", dec("25.00"), 5, vendor);
  let owner = account();

  h.carts.add(&owner, a, 1, false).await.unwrap();
  h.carts.add(&owner, b, 2, false).await.unwrap();

  assert_eq!(h.carts.total_price(&owner).await.unwrap(), dec("65.00"));
}

#[tokio::test]
async fn lines_view_is_restartable() {
  setup_tracing();
  let h = harness();
  let book = h.catalog.insert("Book 1", dec("15.00"), 10, Uuid::new_v4());
  let owner = guest();
  h.carts.add(&owner, book, 2, false).await.unwrap();

  let first = h.carts.lines(&owner).await.unwrap();
  let second = h.carts.lines(&owner).await.unwrap();
  assert_eq!(first.len(), second.len());
  assert_eq!(first[0].quantity, second[0].quantity);
  assert_eq!(first[0].line_total, second[0].line_total);
}

#[tokio::test]
async fn lines_keep_vanished_products_with_empty_display_data() {
  setup_tracing();
  let h = harness();
  let book = h.catalog.insert("Book 1", dec("15.00"), 10, Uuid::new_v4());
  let owner = account();
  h.carts.add(&owner, book, 2, false).await.unwrap();

  h.catalog.delete(book);

  let views = h.carts.lines(&owner).await.unwrap();
  assert_eq!(views.len(), 1);
  assert!(views[0].product.is_none());
  assert_eq!(views[0].line_total, dec("30.00"));
}

#[tokio::test]
async fn group_by_vendor_partitions_every_line_exactly_once() {
  setup_tracing();
  let h = harness();
  let vendor_a = Uuid::new_v4();
  let vendor_b = Uuid::new_v4();
  let p1 = h.catalog.insert("Book 1", dec("15.00"), 10, vendor_a);
  let p2 = h.catalog.insert("Lamp", dec("40.00"), 3, vendor_b);
  let p3 = h.catalog.insert("Book 2", dec("25.00"), 5, vendor_a);
  let owner = account();

  h.carts.add(&owner, p1, 1, false).await.unwrap();
  h.carts.add(&owner, p2, 1, false).await.unwrap();
  h.carts.add(&owner, p3, 2, false).await.unwrap();

  let groups = h.carts.group_by_vendor(&owner).await.unwrap();
  assert_eq!(groups.len(), 2);
  // Groups appear in first-seen vendor order.
  assert_eq!(groups[0].vendor_id, vendor_a);
  assert_eq!(groups[1].vendor_id, vendor_b);
  // Union of the buckets is the full cart, each line in exactly one bucket.
  let total_lines: usize = groups.iter().map(|g| g.lines.len()).sum();
  assert_eq!(total_lines, 3);
  assert!(groups[0].lines.iter().all(|l| l.vendor_id == vendor_a));
  assert!(groups[1].lines.iter().all(|l| l.vendor_id == vendor_b));
}

#[tokio::test]
async fn two_products_same_seller_yield_one_group() {
  setup_tracing();
  let h = harness();
  let vendor = Uuid::new_v4();
  let p1 = h.catalog.insert("Book 1", dec("15.00"), 10, vendor);
  let p2 = h.catalog.insert("Book 2", dec("25.00"), 5, vendor);
  let owner = guest();

  h.carts.add(&owner, p1, 1, false).await.unwrap();
  h.carts.add(&owner, p2, 1, false).await.unwrap();

  let groups = h.carts.group_by_vendor(&owner).await.unwrap();
  assert_eq!(groups.len(), 1);
  assert_eq!(groups[0].lines.len(), 2);
}

#[tokio::test]
async fn merge_moves_session_lines_and_destroys_session_cart() {
  setup_tracing();
  let h = harness();
  let vendor = Uuid::new_v4();
  let a = h.catalog.insert("Book 1", dec("15.00"), 10, vendor);
  let b = h.catalog.insert("Book 2", dec("25.00"), 5, vendor);
  let session_id = Uuid::new_v4();
  let user_id = Uuid::new_v4();
  let session_owner = CartOwner::Anonymous(session_id);
  let account_owner = CartOwner::Authenticated(user_id);

  h.carts.add(&session_owner, a, 2, false).await.unwrap();
  h.carts.add(&session_owner, b, 1, false).await.unwrap();

  let report = h.carts.merge_session_into_account(session_id, user_id).await.unwrap();
  assert_eq!(report.merged, 2);
  assert_eq!(report.dropped, 0);

  let merged = h.carts.lines(&account_owner).await.unwrap();
  assert_eq!(merged.len(), 2);
  assert_eq!(merged.iter().find(|l| l.product_id == a).unwrap().quantity, 2);
  assert_eq!(merged.iter().find(|l| l.product_id == b).unwrap().quantity, 1);

  assert!(h.carts.lines(&session_owner).await.unwrap().is_empty());
}

#[tokio::test]
async fn merge_sums_into_existing_account_lines() {
  setup_tracing();
  let h = harness();
  let book = h.catalog.insert("Book 1", dec("15.00"), 10, Uuid::new_v4());
  let session_id = Uuid::new_v4();
  let user_id = Uuid::new_v4();

  h.carts.add(&CartOwner::Authenticated(user_id), book, 1, false).await.unwrap();
  h.carts.add(&CartOwner::Anonymous(session_id), book, 2, false).await.unwrap();

  h.carts.merge_session_into_account(session_id, user_id).await.unwrap();

  let views = h.carts.lines(&CartOwner::Authenticated(user_id)).await.unwrap();
  assert_eq!(views.len(), 1);
  assert_eq!(views[0].quantity, 3);
}

#[tokio::test]
async fn merge_drops_lines_for_vanished_products() {
  setup_tracing();
  let h = harness();
  let vendor = Uuid::new_v4();
  let keeps = h.catalog.insert("Book 1", dec("15.00"), 10, vendor);
  let vanishes = h.catalog.insert("Book 2", dec("25.00"), 5, vendor);
  let session_id = Uuid::new_v4();
  let user_id = Uuid::new_v4();
  let session_owner = CartOwner::Anonymous(session_id);

  h.carts.add(&session_owner, keeps, 1, false).await.unwrap();
  h.carts.add(&session_owner, vanishes, 1, false).await.unwrap();
  h.catalog.delete(vanishes);

  let report = h.carts.merge_session_into_account(session_id, user_id).await.unwrap();
  assert_eq!(report.merged, 1);
  assert_eq!(report.dropped, 1);

  let views = h.carts.lines(&CartOwner::Authenticated(user_id)).await.unwrap();
  assert_eq!(views.len(), 1);
  assert_eq!(views[0].product_id, keeps);
  assert!(h.carts.lines(&session_owner).await.unwrap().is_empty());
}

#[tokio::test]
async fn session_cart_expires_after_idle_ttl() {
  setup_tracing();
  let catalog = Arc::new(MemoryCatalog::new());
  let carts = CartService::new(
    Arc::new(MemoryCartStore::with_idle_ttl(Duration::from_millis(20))),
    Arc::new(MemoryCartStore::new()),
    catalog.clone(),
  );
  let book = catalog.insert("Book 1", dec("15.00"), 10, Uuid::new_v4());
  let owner = guest();

  carts.add(&owner, book, 1, false).await.unwrap();
  assert_eq!(carts.lines(&owner).await.unwrap().len(), 1);

  tokio::time::sleep(Duration::from_millis(50)).await;
  assert!(carts.lines(&owner).await.unwrap().is_empty());
}

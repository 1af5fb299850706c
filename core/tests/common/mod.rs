// tests/common/mod.rs
#![allow(dead_code)] // Allow unused code in this common test module

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use rust_decimal::Decimal;
use tracing::Level;
use uuid::Uuid;

use storefront_core::{
  Catalog, CartService, CheckoutService, CheckoutSession, CoreError, CoreResult, MemoryCartStore,
  NewOrder, NewOrderItem, OrderRepository, PaymentProvider, ProductSnapshot, ProviderLineItem,
};

// --- In-memory catalog collaborator ---

#[derive(Default)]
pub struct MemoryCatalog {
  products: RwLock<HashMap<Uuid, ProductSnapshot>>,
}

impl MemoryCatalog {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn insert(&self, name: &str, price: Decimal, available_qty: i32, vendor_id: Uuid) -> Uuid {
    let id = Uuid::new_v4();
    self.products.write().insert(
      id,
      ProductSnapshot {
        id,
        name: name.to_string(),
        price,
        available_qty,
        vendor_id,
      },
    );
    id
  }

  pub fn set_price(&self, product_id: Uuid, price: Decimal) {
    self.products.write().get_mut(&product_id).expect("product").price = price;
  }

  pub fn set_available(&self, product_id: Uuid, available_qty: i32) {
    self
      .products
      .write()
      .get_mut(&product_id)
      .expect("product")
      .available_qty = available_qty;
  }

  pub fn delete(&self, product_id: Uuid) {
    self.products.write().remove(&product_id);
  }
}

#[async_trait]
impl Catalog for MemoryCatalog {
  async fn product(&self, product_id: Uuid) -> CoreResult<Option<ProductSnapshot>> {
    Ok(self.products.read().get(&product_id).cloned())
  }
}

// --- In-memory payment provider collaborator ---

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderState {
  Pending,
  Paid,
}

#[derive(Default)]
pub struct MockProvider {
  pub fail_next: AtomicBool,
  pub sessions_created: AtomicUsize,
  pub last_line_items: Mutex<Vec<ProviderLineItem>>,
}

impl MockProvider {
  pub fn new() -> Self {
    Self::default()
  }
}

#[async_trait]
impl PaymentProvider for MockProvider {
  async fn create_checkout_session(&self, line_items: &[ProviderLineItem]) -> CoreResult<CheckoutSession> {
    if self.fail_next.swap(false, Ordering::SeqCst) {
      return Err(CoreError::Provider("simulated provider outage".to_string()));
    }
    *self.last_line_items.lock() = line_items.to_vec();
    let n = self.sessions_created.fetch_add(1, Ordering::SeqCst);
    Ok(CheckoutSession {
      session_id: format!("cs_test_{n}"),
      redirect_url: format!("https://pay.example.com/cs_test_{n}"),
    })
  }
}

// --- In-memory order repository collaborator ---

pub struct StoredOrder {
  pub id: Uuid,
  pub order: NewOrder,
  pub items: Vec<NewOrderItem>,
  pub state: OrderState,
}

#[derive(Default)]
pub struct MemoryOrders {
  pub orders: Mutex<Vec<StoredOrder>>,
}

impl MemoryOrders {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn order_count(&self) -> usize {
    self.orders.lock().len()
  }

  pub fn state_of(&self, checkout_session_id: &str) -> Option<OrderState> {
    self
      .orders
      .lock()
      .iter()
      .find(|o| o.order.checkout_session_id == checkout_session_id)
      .map(|o| o.state)
  }
}

#[async_trait]
impl OrderRepository for MemoryOrders {
  async fn create_pending_order(&self, order: &NewOrder, items: &[NewOrderItem]) -> CoreResult<Uuid> {
    let id = Uuid::new_v4();
    self.orders.lock().push(StoredOrder {
      id,
      order: order.clone(),
      items: items.to_vec(),
      state: OrderState::Pending,
    });
    Ok(id)
  }

  async fn mark_paid(&self, checkout_session_id: &str) -> CoreResult<()> {
    let mut orders = self.orders.lock();
    let order = orders
      .iter_mut()
      .find(|o| o.order.checkout_session_id == checkout_session_id)
      .ok_or_else(|| CoreError::OrderNotFound(checkout_session_id.to_string()))?;
    // Re-applying "paid" is a no-op, not an error.
    order.state = OrderState::Paid;
    Ok(())
  }
}

// --- Harness wiring the whole core together over in-memory collaborators ---

pub struct Harness {
  pub catalog: Arc<MemoryCatalog>,
  pub provider: Arc<MockProvider>,
  pub orders: Arc<MemoryOrders>,
  pub carts: Arc<CartService>,
  pub checkout: CheckoutService,
}

pub fn harness() -> Harness {
  let catalog = Arc::new(MemoryCatalog::new());
  let provider = Arc::new(MockProvider::new());
  let orders = Arc::new(MemoryOrders::new());
  let carts = Arc::new(CartService::new(
    Arc::new(MemoryCartStore::new()),
    Arc::new(MemoryCartStore::new()),
    catalog.clone(),
  ));
  let checkout = CheckoutService::new(
    carts.clone(),
    catalog.clone(),
    provider.clone(),
    orders.clone(),
    "usd",
  );
  Harness {
    catalog,
    provider,
    orders,
    carts,
    checkout,
  }
}

pub fn dec(s: &str) -> Decimal {
  s.parse().expect("decimal literal")
}

// --- Helper for Tracing Setup (call once per test run if needed) ---
use once_cell::sync::Lazy;
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer() // Important for tests to capture output
    .try_init()
    .ok(); // Allow multiple initializations in tests (ok if fails)
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}

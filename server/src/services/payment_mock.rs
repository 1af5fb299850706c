// server/src/services/payment_mock.rs

//! Mock payment provider.
//!
//! Stands in for the external checkout-session API: it manufactures session
//! ids and redirect URLs with simulated network latency, and rejects
//! obviously broken requests the way a real provider would. Swap in a real
//! implementation of [`PaymentProvider`] to integrate an actual gateway.

use async_trait::async_trait;
use storefront_core::{CheckoutSession, CoreError, CoreResult, PaymentProvider, ProviderLineItem};
use tracing::{info, instrument};
use uuid::Uuid;

pub struct MockPaymentProvider {
  /// Base URL the manufactured redirect URLs point at.
  base_url: String,
}

impl MockPaymentProvider {
  pub fn new(base_url: impl Into<String>) -> Self {
    Self {
      base_url: base_url.into(),
    }
  }
}

#[async_trait]
impl PaymentProvider for MockPaymentProvider {
  #[instrument(name = "payment_mock::create_checkout_session", skip(self, line_items), fields(line_count = line_items.len()))]
  async fn create_checkout_session(&self, line_items: &[ProviderLineItem]) -> CoreResult<CheckoutSession> {
    if line_items.is_empty() {
      return Err(CoreError::Provider("At least one line item is required".to_string()));
    }
    let total_minor: i64 = line_items
      .iter()
      .map(|li| li.unit_amount_minor * i64::from(li.quantity))
      .sum();
    if total_minor <= 0 {
      return Err(CoreError::Provider("Amount must be greater than zero".to_string()));
    }

    tokio::time::sleep(std::time::Duration::from_millis(50)).await; // Simulate network latency

    let session_id = format!("cs_mock_{}", Uuid::new_v4().simple());
    let redirect_url = format!("{}/mock-pay/{}", self.base_url, session_id);
    info!(%session_id, total_minor, "mock checkout session created");

    Ok(CheckoutSession {
      session_id,
      redirect_url,
    })
  }
}

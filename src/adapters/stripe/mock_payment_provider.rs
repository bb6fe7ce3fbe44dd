//! Mock payment provider for testing.
//!
//! Provides a configurable mock implementation of `PaymentProvider` for unit
//! and integration tests. Supports:
//! - Pre-configured responses
//! - Error injection
//! - Call tracking

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::ports::{
    CreatePaymentIntentRequest, CreatePriceRequest, CreateProductRequest, PaymentError,
    PaymentIntent, PaymentProvider, ProviderPrice, ProviderProduct,
};

/// Mock payment provider for testing.
///
/// # Example
///
/// ```ignore
/// let mock = MockPaymentProvider::new();
///
/// // Configure responses
/// mock.set_payment_intent(PaymentIntent { id: "pi_123".into(), ... });
///
/// // Inject errors
/// mock.set_error(PaymentError::provider("Test failure"));
///
/// // Use in tests
/// let result = mock.create_payment_intent(request).await;
/// ```
#[derive(Default)]
pub struct MockPaymentProvider {
    /// Inner state (thread-safe for async tests).
    inner: Arc<Mutex<MockState>>,
}

/// Internal mutable state.
#[derive(Default)]
struct MockState {
    /// Next payment intent to return.
    next_intent: Option<PaymentIntent>,

    /// Next product to return.
    next_product: Option<ProviderProduct>,

    /// Next price to return.
    next_price: Option<ProviderPrice>,

    /// Error to return on next call.
    next_error: Option<PaymentError>,

    /// Specific errors by method name.
    method_errors: HashMap<String, PaymentError>,

    /// Track method calls for assertions.
    call_log: Vec<MethodCall>,
}

/// Recorded method call for assertions.
#[derive(Debug, Clone)]
pub struct MethodCall {
    pub method: String,
    pub args: Vec<String>,
}

impl MockPaymentProvider {
    /// Create a new mock provider with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Configuration Methods
    // ════════════════════════════════════════════════════════════════════════════

    /// Set the intent to return on next `create_payment_intent` call.
    pub fn set_payment_intent(&self, intent: PaymentIntent) {
        self.inner.lock().unwrap().next_intent = Some(intent);
    }

    /// Set the product to return on next `create_product` call.
    pub fn set_product(&self, product: ProviderProduct) {
        self.inner.lock().unwrap().next_product = Some(product);
    }

    /// Set the price to return on next `create_price` call.
    pub fn set_price(&self, price: ProviderPrice) {
        self.inner.lock().unwrap().next_price = Some(price);
    }

    /// Set an error to return on the next call to any method.
    pub fn set_error(&self, error: PaymentError) {
        self.inner.lock().unwrap().next_error = Some(error);
    }

    /// Set an error for a specific method.
    pub fn set_method_error(&self, method: &str, error: PaymentError) {
        self.inner
            .lock()
            .unwrap()
            .method_errors
            .insert(method.to_string(), error);
    }

    /// Clear all configured errors.
    pub fn clear_errors(&self) {
        let mut state = self.inner.lock().unwrap();
        state.next_error = None;
        state.method_errors.clear();
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Call Tracking
    // ════════════════════════════════════════════════════════════════════════════

    /// Get all recorded method calls.
    pub fn calls(&self) -> Vec<MethodCall> {
        self.inner.lock().unwrap().call_log.clone()
    }

    /// Check if a method was called.
    pub fn was_called(&self, method: &str) -> bool {
        self.inner
            .lock()
            .unwrap()
            .call_log
            .iter()
            .any(|c| c.method == method)
    }

    /// Get count of calls to a method.
    pub fn call_count(&self, method: &str) -> usize {
        self.inner
            .lock()
            .unwrap()
            .call_log
            .iter()
            .filter(|c| c.method == method)
            .count()
    }

    /// Clear the call log.
    pub fn clear_calls(&self) {
        self.inner.lock().unwrap().call_log.clear();
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Internal Helpers
    // ════════════════════════════════════════════════════════════════════════════

    fn record_call(&self, method: &str, args: Vec<String>) {
        self.inner.lock().unwrap().call_log.push(MethodCall {
            method: method.to_string(),
            args,
        });
    }

    fn check_error(&self, method: &str) -> Result<(), PaymentError> {
        let mut state = self.inner.lock().unwrap();

        // Check method-specific error first
        if let Some(error) = state.method_errors.get(method) {
            return Err(error.clone());
        }

        // Check global error (consumes it)
        if let Some(error) = state.next_error.take() {
            return Err(error);
        }

        Ok(())
    }
}

impl Clone for MockPaymentProvider {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

fn short_id() -> String {
    uuid::Uuid::new_v4()
        .to_string()
        .split('-')
        .next()
        .unwrap_or("0000")
        .to_string()
}

#[async_trait]
impl PaymentProvider for MockPaymentProvider {
    async fn create_payment_intent(
        &self,
        request: CreatePaymentIntentRequest,
    ) -> Result<PaymentIntent, PaymentError> {
        self.record_call(
            "create_payment_intent",
            vec![request.amount.to_string(), request.currency.clone()],
        );
        self.check_error("create_payment_intent")?;

        let mut state = self.inner.lock().unwrap();

        let intent = state.next_intent.take().unwrap_or_else(|| {
            let id = format!("pi_mock_{}", short_id());
            PaymentIntent {
                client_secret: format!("{}_secret_{}", id, short_id()),
                id,
                amount: request.amount,
                currency: request.currency,
            }
        });

        Ok(intent)
    }

    async fn create_product(
        &self,
        request: CreateProductRequest,
    ) -> Result<ProviderProduct, PaymentError> {
        self.record_call("create_product", vec![request.name.clone()]);
        self.check_error("create_product")?;

        let mut state = self.inner.lock().unwrap();

        let product = state.next_product.take().unwrap_or_else(|| ProviderProduct {
            id: format!("prod_mock_{}", short_id()),
            name: request.name,
        });

        Ok(product)
    }

    async fn create_price(
        &self,
        request: CreatePriceRequest,
    ) -> Result<ProviderPrice, PaymentError> {
        self.record_call(
            "create_price",
            vec![request.product_id.clone(), request.unit_amount.to_string()],
        );
        self.check_error("create_price")?;

        let mut state = self.inner.lock().unwrap();

        let price = state.next_price.take().unwrap_or_else(|| ProviderPrice {
            id: format!("price_mock_{}", short_id()),
            product_id: request.product_id,
            unit_amount: request.unit_amount,
        });

        Ok(price)
    }
}

//! Stripe payment provider adapter.
//!
//! Implements the `PaymentProvider` trait for Stripe API integration.
//! Covers payment-intent creation for checkout plus catalog provisioning
//! (products and recurring prices).
//!
//! # Security
//!
//! - Secrets handled via `secrecy::SecretString`
//! - API key sent via HTTP basic auth, never logged
//!
//! # Configuration
//!
//! ```ignore
//! let config = StripeConfig::new(api_key);
//! let adapter = StripePaymentAdapter::new(config);
//! ```

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};

use crate::ports::{
    CreatePaymentIntentRequest, CreatePriceRequest, CreateProductRequest, PaymentError,
    PaymentErrorCode, PaymentIntent, PaymentProvider, ProviderPrice, ProviderProduct,
};

use super::wire::{StripePaymentIntent, StripePrice, StripeProduct};

/// Stripe API configuration.
#[derive(Clone)]
pub struct StripeConfig {
    /// Stripe secret API key (sk_live_... or sk_test_...).
    api_key: SecretString,

    /// Base URL for Stripe API (default: https://api.stripe.com).
    api_base_url: String,
}

impl StripeConfig {
    /// Create a new Stripe configuration.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: SecretString::new(api_key.into()),
            api_base_url: "https://api.stripe.com".to_string(),
        }
    }

    /// Set a custom API base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }
}

/// Stripe payment provider adapter.
///
/// Implements `PaymentProvider` for Stripe API integration.
pub struct StripePaymentAdapter {
    config: StripeConfig,
    http_client: reqwest::Client,
}

impl StripePaymentAdapter {
    /// Create a new Stripe adapter with the given configuration.
    pub fn new(config: StripeConfig) -> Self {
        Self {
            config,
            http_client: reqwest::Client::new(),
        }
    }
}

/// Form parameters for POST /v1/payment_intents.
fn intent_params(request: &CreatePaymentIntentRequest) -> Vec<(String, String)> {
    let mut params = vec![
        ("amount".to_string(), request.amount.to_string()),
        ("currency".to_string(), request.currency.clone()),
        (
            "automatic_payment_methods[enabled]".to_string(),
            "true".to_string(),
        ),
    ];

    if let Some(email) = &request.customer_email {
        params.push(("receipt_email".to_string(), email.clone()));
    }

    // Metadata keys in sorted order so request bodies are stable
    let mut keys: Vec<&String> = request.metadata.keys().collect();
    keys.sort();
    for key in keys {
        params.push((format!("metadata[{}]", key), request.metadata[key].clone()));
    }

    params
}

/// Form parameters for POST /v1/products.
fn product_params(request: &CreateProductRequest) -> Vec<(String, String)> {
    let mut params = vec![("name".to_string(), request.name.clone())];

    if let Some(description) = &request.description {
        params.push(("description".to_string(), description.clone()));
    }

    params
}

/// Form parameters for POST /v1/prices.
fn price_params(request: &CreatePriceRequest) -> Vec<(String, String)> {
    vec![
        ("product".to_string(), request.product_id.clone()),
        ("unit_amount".to_string(), request.unit_amount.to_string()),
        ("currency".to_string(), request.currency.clone()),
        (
            "recurring[interval]".to_string(),
            request.interval.to_string(),
        ),
    ]
}

#[async_trait]
impl PaymentProvider for StripePaymentAdapter {
    async fn create_payment_intent(
        &self,
        request: CreatePaymentIntentRequest,
    ) -> Result<PaymentIntent, PaymentError> {
        let url = format!("{}/v1/payment_intents", self.config.api_base_url);
        let params = intent_params(&request);

        let mut builder = self
            .http_client
            .post(&url)
            .basic_auth(self.config.api_key.expose_secret(), Option::<&str>::None)
            .form(&params);

        // Stripe takes the idempotency key as a header, not a form field
        if let Some(key) = &request.idempotency_key {
            builder = builder.header("Idempotency-Key", key);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| PaymentError::network(e.to_string()))?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!(error = %error_text, "Stripe create_payment_intent failed");
            return Err(PaymentError::new(
                PaymentErrorCode::ProviderError,
                format!("Stripe API error: {}", error_text),
            ));
        }

        let stripe_intent: StripePaymentIntent = response.json().await.map_err(|e| {
            PaymentError::new(
                PaymentErrorCode::ProviderError,
                format!("Failed to parse Stripe response: {}", e),
            )
        })?;

        Ok(PaymentIntent {
            id: stripe_intent.id,
            client_secret: stripe_intent.client_secret,
            amount: stripe_intent.amount,
            currency: stripe_intent.currency,
        })
    }

    async fn create_product(
        &self,
        request: CreateProductRequest,
    ) -> Result<ProviderProduct, PaymentError> {
        let url = format!("{}/v1/products", self.config.api_base_url);

        let response = self
            .http_client
            .post(&url)
            .basic_auth(self.config.api_key.expose_secret(), Option::<&str>::None)
            .form(&product_params(&request))
            .send()
            .await
            .map_err(|e| PaymentError::network(e.to_string()))?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!(error = %error_text, "Stripe create_product failed");
            return Err(PaymentError::new(
                PaymentErrorCode::ProviderError,
                format!("Stripe API error: {}", error_text),
            ));
        }

        let stripe_product: StripeProduct = response.json().await.map_err(|e| {
            PaymentError::new(
                PaymentErrorCode::ProviderError,
                format!("Failed to parse Stripe response: {}", e),
            )
        })?;

        Ok(ProviderProduct {
            id: stripe_product.id,
            name: stripe_product.name,
        })
    }

    async fn create_price(
        &self,
        request: CreatePriceRequest,
    ) -> Result<ProviderPrice, PaymentError> {
        let url = format!("{}/v1/prices", self.config.api_base_url);

        let response = self
            .http_client
            .post(&url)
            .basic_auth(self.config.api_key.expose_secret(), Option::<&str>::None)
            .form(&price_params(&request))
            .send()
            .await
            .map_err(|e| PaymentError::network(e.to_string()))?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!(error = %error_text, "Stripe create_price failed");
            return Err(PaymentError::new(
                PaymentErrorCode::ProviderError,
                format!("Stripe API error: {}", error_text),
            ));
        }

        let stripe_price: StripePrice = response.json().await.map_err(|e| {
            PaymentError::new(
                PaymentErrorCode::ProviderError,
                format!("Failed to parse Stripe response: {}", e),
            )
        })?;

        Ok(ProviderPrice {
            id: stripe_price.id,
            product_id: stripe_price.product,
            unit_amount: stripe_price.unit_amount,
        })
    }
}

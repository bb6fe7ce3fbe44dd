//! Payment provider port for external payment processing.
//!
//! Defines the contract for payment gateway integrations (e.g., Stripe).
//! Payment completion itself happens on the client against the provider;
//! this port covers what the backend needs: creating payment intents for
//! checkout and provisioning the product catalog.
//!
//! # Design
//!
//! - **Gateway agnostic**: Interface works with any payment provider
//! - **Minor units**: All amounts are integer minor units (cents)
//! - **Idempotent**: Operations can be safely retried

use crate::domain::billing::BillingInterval;
use crate::domain::foundation::{DomainError, ErrorCode};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Port for payment provider integrations.
///
/// Implementations must ensure idempotency for all operations.
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    /// Create a payment intent for a checkout.
    ///
    /// Returns the intent id and the client secret the frontend uses to
    /// confirm the payment.
    async fn create_payment_intent(
        &self,
        request: CreatePaymentIntentRequest,
    ) -> Result<PaymentIntent, PaymentError>;

    /// Create a product in the payment system.
    ///
    /// Used by catalog provisioning; one product per plan.
    async fn create_product(
        &self,
        request: CreateProductRequest,
    ) -> Result<ProviderProduct, PaymentError>;

    /// Create a recurring price attached to a product.
    async fn create_price(&self, request: CreatePriceRequest)
        -> Result<ProviderPrice, PaymentError>;
}

/// Request to create a payment intent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePaymentIntentRequest {
    /// Amount in minor units.
    pub amount: i64,

    /// ISO currency code (lowercase, e.g. "usd").
    pub currency: String,

    /// Customer email for the provider's receipt (optional).
    pub customer_email: Option<String>,

    /// Free-form metadata attached to the intent (plan id, user id).
    pub metadata: HashMap<String, String>,

    /// Idempotency key for safe retries.
    pub idempotency_key: Option<String>,
}

/// Payment intent in the payment system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentIntent {
    /// Provider's intent ID.
    pub id: String,

    /// Secret the frontend uses to confirm the payment.
    pub client_secret: String,

    /// Amount in minor units.
    pub amount: i64,

    /// ISO currency code.
    pub currency: String,
}

/// Request to create a product.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProductRequest {
    /// Product display name.
    pub name: String,

    /// Product description (optional).
    pub description: Option<String>,
}

/// Product in the payment system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderProduct {
    /// Provider's product ID.
    pub id: String,

    /// Product display name.
    pub name: String,
}

/// Request to create a recurring price.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePriceRequest {
    /// Provider's product ID the price belongs to.
    pub product_id: String,

    /// Unit amount in minor units.
    pub unit_amount: i64,

    /// ISO currency code.
    pub currency: String,

    /// Recurring billing interval.
    pub interval: BillingInterval,
}

/// Price in the payment system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderPrice {
    /// Provider's price ID.
    pub id: String,

    /// Provider's product ID.
    pub product_id: String,

    /// Unit amount in minor units.
    pub unit_amount: i64,
}

/// Errors from payment provider operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentError {
    /// Error code for categorization.
    pub code: PaymentErrorCode,

    /// Human-readable message.
    pub message: String,

    /// Provider's error code (if available).
    pub provider_code: Option<String>,

    /// Whether the operation can be retried.
    pub retryable: bool,
}

impl PaymentError {
    /// Create a new payment error.
    pub fn new(code: PaymentErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            provider_code: None,
            retryable: code.is_retryable(),
        }
    }

    /// Create with provider code.
    pub fn with_provider_code(mut self, code: impl Into<String>) -> Self {
        self.provider_code = Some(code.into());
        self
    }

    /// Create a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::NetworkError, message)
    }

    /// Create an authentication error.
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::AuthenticationError, message)
    }

    /// Create an invalid request error.
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::InvalidRequest, message)
    }

    /// Create a provider error.
    pub fn provider(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::ProviderError, message)
    }
}

impl std::fmt::Display for PaymentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for PaymentError {}

impl From<PaymentError> for DomainError {
    fn from(err: PaymentError) -> Self {
        let code = match err.code {
            PaymentErrorCode::CardDeclined => ErrorCode::PaymentFailed,
            PaymentErrorCode::InvalidRequest => ErrorCode::ValidationFailed,
            _ => ErrorCode::ExternalServiceError,
        };

        DomainError::new(code, err.message)
    }
}

/// Payment error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentErrorCode {
    /// Network connectivity issue.
    NetworkError,

    /// API authentication failed.
    AuthenticationError,

    /// Card was declined.
    CardDeclined,

    /// Request rejected by the provider as malformed.
    InvalidRequest,

    /// Rate limit exceeded.
    RateLimitExceeded,

    /// Provider API error.
    ProviderError,

    /// Unknown error.
    Unknown,
}

impl PaymentErrorCode {
    /// Check if this error type is typically retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            PaymentErrorCode::NetworkError | PaymentErrorCode::RateLimitExceeded
        )
    }
}

impl std::fmt::Display for PaymentErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PaymentErrorCode::NetworkError => "network_error",
            PaymentErrorCode::AuthenticationError => "authentication_error",
            PaymentErrorCode::CardDeclined => "card_declined",
            PaymentErrorCode::InvalidRequest => "invalid_request",
            PaymentErrorCode::RateLimitExceeded => "rate_limit_exceeded",
            PaymentErrorCode::ProviderError => "provider_error",
            PaymentErrorCode::Unknown => "unknown",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Trait object safety test
    #[test]
    fn payment_provider_is_object_safe() {
        fn _accepts_dyn(_provider: &dyn PaymentProvider) {}
    }

    #[test]
    fn payment_error_retryable() {
        assert!(PaymentErrorCode::NetworkError.is_retryable());
        assert!(PaymentErrorCode::RateLimitExceeded.is_retryable());

        assert!(!PaymentErrorCode::CardDeclined.is_retryable());
        assert!(!PaymentErrorCode::InvalidRequest.is_retryable());
    }

    #[test]
    fn payment_error_display() {
        let err = PaymentError::invalid_request("Amount must be positive");
        assert!(err.to_string().contains("invalid_request"));
        assert!(err.to_string().contains("Amount must be positive"));
    }

    #[test]
    fn payment_error_carries_provider_code() {
        let err = PaymentError::provider("boom").with_provider_code("api_error");
        assert_eq!(err.provider_code.as_deref(), Some("api_error"));
    }

    #[test]
    fn card_declined_converts_to_payment_failed() {
        let payment_err = PaymentError::new(PaymentErrorCode::CardDeclined, "Declined");
        let domain_err: DomainError = payment_err.into();
        assert_eq!(domain_err.code, ErrorCode::PaymentFailed);
        assert!(domain_err.message.contains("Declined"));
    }

    #[test]
    fn network_error_converts_to_external_service_error() {
        let payment_err = PaymentError::network("timeout");
        let domain_err: DomainError = payment_err.into();
        assert_eq!(domain_err.code, ErrorCode::ExternalServiceError);
    }
}

//! Stripe-specific types for REST responses.
//!
//! These types represent Stripe API objects as the REST endpoints return
//! them. They are designed to:
//! - Parse actual Stripe JSON accurately
//! - Map to the provider-agnostic port types for further processing

use serde::{Deserialize, Serialize};

// ════════════════════════════════════════════════════════════════════════════════
// Stripe Object Types
// ════════════════════════════════════════════════════════════════════════════════

/// Stripe PaymentIntent object.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StripePaymentIntent {
    /// Unique intent identifier (pi_...).
    pub id: String,

    /// Secret the client uses to confirm the payment.
    pub client_secret: String,

    /// Amount in minor currency units.
    pub amount: i64,

    /// ISO currency code (lowercase).
    pub currency: String,

    /// Intent status (requires_payment_method, succeeded, ...).
    pub status: String,

    /// Custom metadata attached to the intent.
    #[serde(default)]
    pub metadata: std::collections::HashMap<String, String>,
}

/// Stripe Product object.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StripeProduct {
    /// Unique product identifier (prod_...).
    pub id: String,

    /// Product display name.
    pub name: String,

    /// Whether the product is available for purchase.
    #[serde(default)]
    pub active: bool,

    /// Product description.
    pub description: Option<String>,
}

/// Stripe Price object.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StripePrice {
    /// Unique price identifier (price_...).
    pub id: String,

    /// Product the price belongs to (prod_...).
    pub product: String,

    /// Unit amount in minor currency units.
    pub unit_amount: i64,

    /// ISO currency code (lowercase).
    pub currency: String,

    /// Recurrence descriptor, absent for one-time prices.
    pub recurring: Option<StripeRecurrence>,
}

/// Recurrence descriptor on a recurring price.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StripeRecurrence {
    /// Billing interval (month, year, ...).
    pub interval: String,
}

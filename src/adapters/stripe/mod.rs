//! Stripe payment provider adapter.
//!
//! Implements the `PaymentProvider` port for Stripe integration, including:
//! - Payment intents for checkout
//! - Catalog provisioning (products and recurring prices)
//!
//! # Security
//!
//! - All secrets are handled via `secrecy::SecretString`
//! - The API key travels only in HTTP basic auth
//!
//! # Configuration
//!
//! The secret API key arrives through the application configuration
//! (`payment.stripe_api_key`); see `crate::config`.

mod mock_payment_provider;
mod stripe_adapter;
mod wire;

pub use mock_payment_provider::MockPaymentProvider;
pub use stripe_adapter::{StripeConfig, StripePaymentAdapter};
pub use wire::{StripePaymentIntent, StripePrice, StripeProduct, StripeRecurrence};

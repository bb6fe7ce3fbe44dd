//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `AccountRepository` - Billing account persistence with conditional writes
//! - `PlanCatalog` - In-memory plan lookup loaded once per process
//! - `PaymentProvider` - Payment intents and catalog provisioning

mod account_repository;
mod payment_provider;
mod plan_catalog;

pub use account_repository::AccountRepository;
pub use payment_provider::{
    CreatePaymentIntentRequest, CreatePriceRequest, CreateProductRequest, PaymentError,
    PaymentErrorCode, PaymentIntent, PaymentProvider, ProviderPrice, ProviderProduct,
};
pub use plan_catalog::PlanCatalog;

//! HTTP adapter for billing endpoints.
//!
//! Exposes the billing domain via REST API:
//! - `GET /api/users?external_id=` - Fetch the billing account for a user
//! - `POST /api/users` - Create a subscribed account directly
//! - `POST /api/users/sync` - Mirror an identity-provider user into billing
//! - `POST /api/users/upgrade` - Prorated mid-cycle plan change
//! - `POST /api/users/cancel` - Cancel at the end of the current cycle
//! - `POST /api/payments/intent` - Open a payment intent for checkout
//! - `POST /api/payments/success` - Record a settled payment
//! - `GET /api/plans` - List the plan catalog
//! - `POST /api/admin/provision-catalog` - Provision the catalog at the provider

pub mod dto;
pub mod handlers;
pub mod routes;

pub use dto::*;
pub use handlers::{BillingApiError, BillingAppState};
pub use routes::{admin_routes, billing_router, payment_routes, plan_routes, user_routes};

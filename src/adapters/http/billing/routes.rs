//! Axum router configuration for billing endpoints.
//!
//! This module defines the route structure for billing-related API endpoints
//! and wires them to their corresponding handlers.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{
    cancel_subscription, create_account, create_payment_intent, get_account, list_plans,
    provision_catalog, record_payment, sync_account, upgrade_plan, BillingAppState,
};

/// Create the user-facing account router.
///
/// # Routes
///
/// - `GET /?external_id=` - Fetch the billing account for a user
/// - `POST /` - Create a subscribed account directly
/// - `POST /sync` - Mirror an identity-provider user into billing
/// - `POST /upgrade` - Prorated mid-cycle plan change
/// - `POST /cancel` - Cancel at the end of the current cycle
pub fn user_routes() -> Router<BillingAppState> {
    Router::new()
        .route("/", get(get_account).post(create_account))
        .route("/sync", post(sync_account))
        .route("/upgrade", post(upgrade_plan))
        .route("/cancel", post(cancel_subscription))
}

/// Create the payment router.
///
/// # Routes
///
/// - `POST /intent` - Open a payment intent for checkout
/// - `POST /success` - Record a settled payment
pub fn payment_routes() -> Router<BillingAppState> {
    Router::new()
        .route("/intent", post(create_payment_intent))
        .route("/success", post(record_payment))
}

/// Create the plan catalog router.
///
/// # Routes
///
/// - `GET /` - List the plan catalog
pub fn plan_routes() -> Router<BillingAppState> {
    Router::new().route("/", get(list_plans))
}

/// Create the admin router.
///
/// These endpoints are operator actions, not part of the user-facing
/// surface; deployments front them with their own access control.
///
/// # Routes
///
/// - `POST /provision-catalog` - Mint catalog products and prices at the
///   payment provider
pub fn admin_routes() -> Router<BillingAppState> {
    Router::new().route("/provision-catalog", post(provision_catalog))
}

/// Create the complete billing module router.
///
/// Combines account, payment, plan and admin routes into a single router
/// suitable for mounting at `/api`.
///
/// # Example
///
/// ```ignore
/// use axum::Router;
/// use crate::adapters::http::billing::{billing_router, BillingAppState};
///
/// let app_state = BillingAppState { /* ... */ };
/// let app = Router::new()
///     .nest("/api", billing_router())
///     .with_state(app_state);
/// ```
pub fn billing_router() -> Router<BillingAppState> {
    Router::new()
        .nest("/users", user_routes())
        .nest("/payments", payment_routes())
        .nest("/plans", plan_routes())
        .nest("/admin", admin_routes())
}

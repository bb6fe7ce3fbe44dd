//! HTTP handlers for billing endpoints.
//!
//! These handlers connect Axum routes to application layer command/query handlers.

use std::sync::Arc;

use axum::extract::{Json, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::application::handlers::billing::{
    CancelSubscriptionCommand, CancelSubscriptionHandler, CreateAccountCommand,
    CreateAccountHandler, CreatePaymentIntentCommand, CreatePaymentIntentHandler,
    GetAccountHandler, GetAccountQuery, ProvisionCatalogCommand, ProvisionCatalogHandler,
    RecordPaymentCommand, RecordPaymentHandler, SyncAccountCommand, SyncAccountHandler,
    UpgradePlanCommand, UpgradePlanHandler,
};
use crate::domain::billing::BillingError;
use crate::domain::foundation::{ExternalUserId, PlanId};
use crate::ports::{AccountRepository, PaymentProvider, PlanCatalog};

use super::dto::{
    AccountResponse, CancelSubscriptionRequest, CheckoutRequest, CheckoutResponse,
    CreateAccountRequest, ErrorResponse, GetAccountParams, PlanListResponse, PlanResponse,
    ProvisionCatalogResponse, ProvisionedPlanResponse, RecordPaymentRequest,
    RecordPaymentResponse, SyncAccountRequest, SyncAccountResponse, UpgradePlanRequest,
    UpgradePlanResponse, UpgradeQuoteResponse,
};

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared application state containing all dependencies.
///
/// This struct is cloned for each request and contains Arc-wrapped dependencies
/// for efficient sharing across handlers.
#[derive(Clone)]
pub struct BillingAppState {
    pub account_repository: Arc<dyn AccountRepository>,
    pub plan_catalog: Arc<dyn PlanCatalog>,
    pub payment_provider: Arc<dyn PaymentProvider>,
    /// ISO currency code applied when a request doesn't name one.
    pub default_currency: String,
}

impl BillingAppState {
    /// Create handlers on demand from the shared state.
    pub fn get_account_handler(&self) -> GetAccountHandler {
        GetAccountHandler::new(self.account_repository.clone())
    }

    pub fn sync_account_handler(&self) -> SyncAccountHandler {
        SyncAccountHandler::new(self.account_repository.clone())
    }

    pub fn create_account_handler(&self) -> CreateAccountHandler {
        CreateAccountHandler::new(self.account_repository.clone(), self.plan_catalog.clone())
    }

    pub fn upgrade_plan_handler(&self) -> UpgradePlanHandler {
        UpgradePlanHandler::new(self.account_repository.clone(), self.plan_catalog.clone())
    }

    pub fn cancel_subscription_handler(&self) -> CancelSubscriptionHandler {
        CancelSubscriptionHandler::new(self.account_repository.clone())
    }

    pub fn create_payment_intent_handler(&self) -> CreatePaymentIntentHandler {
        CreatePaymentIntentHandler::new(self.plan_catalog.clone(), self.payment_provider.clone())
    }

    pub fn record_payment_handler(&self) -> RecordPaymentHandler {
        RecordPaymentHandler::new(self.account_repository.clone(), self.plan_catalog.clone())
    }

    pub fn provision_catalog_handler(&self) -> ProvisionCatalogHandler {
        ProvisionCatalogHandler::new(self.plan_catalog.clone(), self.payment_provider.clone())
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Query Handlers (GET endpoints)
// ════════════════════════════════════════════════════════════════════════════════

/// GET /api/users?external_id= - Fetch the billing account for a user
pub async fn get_account(
    State(state): State<BillingAppState>,
    Query(params): Query<GetAccountParams>,
) -> Result<impl IntoResponse, BillingApiError> {
    let handler = state.get_account_handler();
    let query = GetAccountQuery {
        external_id: ExternalUserId::new(params.external_id)?,
    };

    let account = handler.handle(query).await?;

    Ok(Json(AccountResponse::from(account)))
}

/// GET /api/plans - List the plan catalog
pub async fn list_plans(
    State(state): State<BillingAppState>,
) -> Result<impl IntoResponse, BillingApiError> {
    let plans = state.plan_catalog.all();

    let response = PlanListResponse {
        plans: plans.into_iter().map(PlanResponse::from).collect(),
    };

    Ok(Json(response))
}

// ════════════════════════════════════════════════════════════════════════════════
// Command Handlers (POST endpoints)
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/users/sync - Mirror an identity-provider user into billing
pub async fn sync_account(
    State(state): State<BillingAppState>,
    Json(request): Json<SyncAccountRequest>,
) -> Result<impl IntoResponse, BillingApiError> {
    let handler = state.sync_account_handler();
    let cmd = SyncAccountCommand {
        external_id: ExternalUserId::new(request.external_id)?,
        email: request.email,
    };

    let result = handler.handle(cmd).await?;

    let status = if result.created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    let response = SyncAccountResponse {
        account: AccountResponse::from(result.account),
        created: result.created,
    };

    Ok((status, Json(response)))
}

/// POST /api/users - Create a subscribed account directly
pub async fn create_account(
    State(state): State<BillingAppState>,
    Json(request): Json<CreateAccountRequest>,
) -> Result<impl IntoResponse, BillingApiError> {
    let handler = state.create_account_handler();
    let cmd = CreateAccountCommand {
        external_id: ExternalUserId::new(request.external_id)?,
        email: request.email,
        plan_id: PlanId::new(request.plan_id)?,
    };

    let result = handler.handle(cmd).await?;

    Ok((
        StatusCode::CREATED,
        Json(AccountResponse::from(result.account)),
    ))
}

/// POST /api/users/upgrade - Prorated mid-cycle plan change
pub async fn upgrade_plan(
    State(state): State<BillingAppState>,
    Json(request): Json<UpgradePlanRequest>,
) -> Result<impl IntoResponse, BillingApiError> {
    let handler = state.upgrade_plan_handler();
    let cmd = UpgradePlanCommand {
        external_id: ExternalUserId::new(request.external_id)?,
        plan_id: PlanId::new(request.plan_id)?,
        payment_intent_id: request.payment_intent_id,
    };

    let result = handler.handle(cmd).await?;

    let response = UpgradePlanResponse {
        account: AccountResponse::from(result.account),
        quote: UpgradeQuoteResponse::from(result.quote),
    };

    Ok(Json(response))
}

/// POST /api/users/cancel - Cancel at the end of the current cycle
pub async fn cancel_subscription(
    State(state): State<BillingAppState>,
    Json(request): Json<CancelSubscriptionRequest>,
) -> Result<impl IntoResponse, BillingApiError> {
    let handler = state.cancel_subscription_handler();
    let cmd = CancelSubscriptionCommand {
        external_id: ExternalUserId::new(request.external_id)?,
    };

    let result = handler.handle(cmd).await?;

    Ok(Json(AccountResponse::from(result.account)))
}

/// POST /api/payments/intent - Open a payment intent for checkout
pub async fn create_payment_intent(
    State(state): State<BillingAppState>,
    Json(request): Json<CheckoutRequest>,
) -> Result<impl IntoResponse, BillingApiError> {
    let handler = state.create_payment_intent_handler();
    let cmd = CreatePaymentIntentCommand {
        plan_id: request.plan_id.map(PlanId::new).transpose()?,
        amount: request.amount,
        quantity: request.quantity,
        currency: request
            .currency
            .unwrap_or_else(|| state.default_currency.clone()),
        customer_email: request.customer_email,
        idempotency_key: request.idempotency_key,
    };

    let result = handler.handle(cmd).await?;

    let response = CheckoutResponse {
        client_secret: result.client_secret,
        payment_intent_id: result.payment_intent_id,
        amount: result.amount,
        currency: result.currency,
    };

    Ok((StatusCode::CREATED, Json(response)))
}

/// POST /api/payments/success - Record a settled payment
pub async fn record_payment(
    State(state): State<BillingAppState>,
    Json(request): Json<RecordPaymentRequest>,
) -> Result<impl IntoResponse, BillingApiError> {
    let handler = state.record_payment_handler();
    let cmd = RecordPaymentCommand {
        external_id: ExternalUserId::new(request.external_id)?,
        plan_id: PlanId::new(request.plan_id)?,
        payment_intent_id: request.payment_intent_id,
        amount: request.amount,
    };

    let result = handler.handle(cmd).await?;

    let response = RecordPaymentResponse {
        account: AccountResponse::from(result.account),
        kind: result.kind,
    };

    Ok(Json(response))
}

/// POST /api/admin/provision-catalog - Mint catalog products and prices
/// at the payment provider
pub async fn provision_catalog(
    State(state): State<BillingAppState>,
) -> Result<impl IntoResponse, BillingApiError> {
    let handler = state.provision_catalog_handler();
    let cmd = ProvisionCatalogCommand {
        currency: state.default_currency.clone(),
    };

    let result = handler.handle(cmd).await?;

    let response = ProvisionCatalogResponse {
        provisioned: result
            .provisioned
            .into_iter()
            .map(|p| ProvisionedPlanResponse {
                plan_id: p.plan_id.to_string(),
                product_id: p.product_id,
                price_id: p.price_id,
            })
            .collect(),
    };

    Ok(Json(response))
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// API error type that converts domain errors to HTTP responses.
pub struct BillingApiError(BillingError);

impl From<BillingError> for BillingApiError {
    fn from(err: BillingError) -> Self {
        Self(err)
    }
}

impl From<crate::domain::foundation::DomainError> for BillingApiError {
    fn from(err: crate::domain::foundation::DomainError) -> Self {
        Self(BillingError::from(err))
    }
}

impl From<crate::domain::foundation::ValidationError> for BillingApiError {
    fn from(err: crate::domain::foundation::ValidationError) -> Self {
        Self(BillingError::from(crate::domain::foundation::DomainError::from(err)))
    }
}

impl IntoResponse for BillingApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, error_code) = match &self.0 {
            BillingError::MissingField(_) => (StatusCode::BAD_REQUEST, "MISSING_FIELD"),
            BillingError::ValidationFailed { .. } => (StatusCode::BAD_REQUEST, "VALIDATION_FAILED"),
            BillingError::AccountNotFound(_) => (StatusCode::NOT_FOUND, "ACCOUNT_NOT_FOUND"),
            BillingError::PlanNotFound(_) => (StatusCode::NOT_FOUND, "PLAN_NOT_FOUND"),
            BillingError::AlreadyExists(_) => (StatusCode::CONFLICT, "ACCOUNT_EXISTS"),
            BillingError::InvalidState { .. } => {
                (StatusCode::CONFLICT, "INVALID_STATE_TRANSITION")
            }
            BillingError::VersionConflict => (StatusCode::CONFLICT, "VERSION_CONFLICT"),
            BillingError::PaymentFailed { .. } => {
                (StatusCode::PAYMENT_REQUIRED, "PAYMENT_FAILED")
            }
            BillingError::Persistence(_) => (StatusCode::INTERNAL_SERVER_ERROR, "DATABASE_ERROR"),
        };

        // Use the error's built-in message() method for consistent messaging
        let message = self.0.message();
        let body = ErrorResponse::new(error_code, message);
        (status, Json(body)).into_response()
    }
}

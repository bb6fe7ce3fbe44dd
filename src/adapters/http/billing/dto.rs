//! HTTP DTOs (Data Transfer Objects) for billing endpoints.
//!
//! These types define the JSON request/response structure for the billing API.
//! They serve as the boundary between HTTP and the application layer.

use crate::domain::billing::{BillingAccount, PaymentKind, Plan, Subscription, SubscriptionStatus, UpgradeQuote};
use serde::{Deserialize, Serialize};

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Request to mirror an identity-provider user into a billing account.
#[derive(Debug, Clone, Deserialize)]
pub struct SyncAccountRequest {
    /// Identity provider's stable user id.
    pub external_id: String,
    /// Current email on the identity provider.
    pub email: String,
}

/// Request to create a subscribed account directly.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateAccountRequest {
    pub external_id: String,
    pub email: String,
    /// Catalog plan to subscribe to.
    pub plan_id: String,
}

/// Query parameters for account lookup.
#[derive(Debug, Clone, Deserialize)]
pub struct GetAccountParams {
    pub external_id: String,
}

/// Request to open a payment intent for checkout.
///
/// Either `plan_id` or `amount` must be present; an explicit amount
/// overrides the plan's catalog price.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutRequest {
    #[serde(default)]
    pub plan_id: Option<String>,
    /// Explicit unit amount in minor units.
    #[serde(default)]
    pub amount: Option<i64>,
    /// Unit multiplier, at least 1.
    #[serde(default = "default_quantity")]
    pub quantity: i64,
    /// ISO currency code; the configured default applies when absent.
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub customer_email: Option<String>,
    /// Caller-supplied key to make retries safe at the provider.
    #[serde(default)]
    pub idempotency_key: Option<String>,
}

fn default_quantity() -> i64 {
    1
}

/// Request to record a settled payment.
#[derive(Debug, Clone, Deserialize)]
pub struct RecordPaymentRequest {
    pub external_id: String,
    pub plan_id: String,
    pub payment_intent_id: String,
    /// Settled amount in minor units, echoed into the payment history.
    pub amount: f64,
}

/// Request to move a subscriber to a different plan mid-cycle.
#[derive(Debug, Clone, Deserialize)]
pub struct UpgradePlanRequest {
    pub external_id: String,
    /// The plan to move to.
    pub plan_id: String,
    pub payment_intent_id: String,
}

/// Request to cancel at the end of the current cycle.
#[derive(Debug, Clone, Deserialize)]
pub struct CancelSubscriptionRequest {
    pub external_id: String,
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Full billing account view.
#[derive(Debug, Clone, Serialize)]
pub struct AccountResponse {
    /// Account ID.
    pub id: String,
    /// Identity provider's user id.
    pub external_id: String,
    /// Email, empty until the first identity sync lands.
    pub email: String,
    /// Current plan snapshot.
    pub subscription: SubscriptionResponse,
    /// Credit balance in minor units.
    pub credits: f64,
    /// Whether the account currently has paid access.
    pub has_access: bool,
    /// Payment log, oldest first.
    pub payment_history: Vec<PaymentRecordResponse>,
    /// When the account was created (ISO 8601).
    pub created_at: String,
    /// Last modification time (ISO 8601).
    pub updated_at: String,
}

impl From<BillingAccount> for AccountResponse {
    fn from(account: BillingAccount) -> Self {
        let has_access = account.has_access();
        Self {
            id: account.id.to_string(),
            external_id: account.external_id.to_string(),
            email: account.email,
            subscription: SubscriptionResponse::from(account.subscription),
            credits: account.credits,
            has_access,
            payment_history: account
                .payment_history
                .into_iter()
                .map(PaymentRecordResponse::from)
                .collect(),
            created_at: account.created_at.as_datetime().to_rfc3339(),
            updated_at: account.updated_at.as_datetime().to_rfc3339(),
        }
    }
}

/// Plan snapshot within an account response.
#[derive(Debug, Clone, Serialize)]
pub struct SubscriptionResponse {
    pub plan_id: Option<String>,
    pub plan_name: Option<String>,
    /// Plan price at assignment time, minor units.
    pub price: Option<i64>,
    /// Cycle start (ISO 8601).
    pub start_date: Option<String>,
    /// Cycle end (ISO 8601).
    pub end_date: Option<String>,
    pub status: SubscriptionStatus,
}

impl From<Subscription> for SubscriptionResponse {
    fn from(subscription: Subscription) -> Self {
        Self {
            plan_id: subscription.plan_id.map(|id| id.to_string()),
            plan_name: subscription.plan_name,
            price: subscription.price,
            start_date: subscription
                .start_date
                .map(|d| d.as_datetime().to_rfc3339()),
            end_date: subscription.end_date.map(|d| d.as_datetime().to_rfc3339()),
            status: subscription.status,
        }
    }
}

/// One payment history entry.
#[derive(Debug, Clone, Serialize)]
pub struct PaymentRecordResponse {
    pub payment_intent_id: String,
    /// Charged amount in minor units.
    pub amount: f64,
    pub plan_id: String,
    pub plan_name: String,
    /// When the payment was recorded (ISO 8601).
    pub date: String,
    pub kind: PaymentKind,
    /// Raw prorated cost, upgrade entries only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prorated_amount: Option<f64>,
    /// Credits applied against the charge, upgrade entries only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credit_applied: Option<f64>,
}

impl From<crate::domain::billing::PaymentRecord> for PaymentRecordResponse {
    fn from(record: crate::domain::billing::PaymentRecord) -> Self {
        Self {
            payment_intent_id: record.payment_intent_id,
            amount: record.amount,
            plan_id: record.plan_id.to_string(),
            plan_name: record.plan_name,
            date: record.date.as_datetime().to_rfc3339(),
            kind: record.kind,
            prorated_amount: record.prorated_amount,
            credit_applied: record.credit_applied,
        }
    }
}

/// Response for identity sync: the account plus whether it was created.
#[derive(Debug, Clone, Serialize)]
pub struct SyncAccountResponse {
    pub account: AccountResponse,
    /// True when this sync created the account.
    pub created: bool,
}

/// Response for checkout initiation.
#[derive(Debug, Clone, Serialize)]
pub struct CheckoutResponse {
    /// Client-side confirmation secret.
    pub client_secret: String,
    pub payment_intent_id: String,
    /// Total amount the intent was opened for, minor units.
    pub amount: i64,
    pub currency: String,
}

/// Response for a recorded payment.
#[derive(Debug, Clone, Serialize)]
pub struct RecordPaymentResponse {
    pub account: AccountResponse,
    /// Whether this was the account's initial payment or a renewal.
    pub kind: PaymentKind,
}

/// Response for a plan upgrade: mutated account plus the proration breakdown.
#[derive(Debug, Clone, Serialize)]
pub struct UpgradePlanResponse {
    pub account: AccountResponse,
    pub quote: UpgradeQuoteResponse,
}

/// Proration breakdown for display.
#[derive(Debug, Clone, Serialize)]
pub struct UpgradeQuoteResponse {
    /// Whole days left in the cycle, rounded up.
    pub days_remaining: i64,
    /// Unspent value of the old plan over those days.
    pub current_remaining_value: f64,
    /// Value of the new plan over the same days.
    pub new_remaining_value: f64,
    /// Raw upgrade cost before credits.
    pub upgrade_amount: f64,
    /// What the subscriber pays now.
    pub final_amount: f64,
    /// Portion of the prior balance consumed.
    pub credit_applied: f64,
    /// Credit balance after the upgrade.
    pub remaining_credits: f64,
}

impl From<UpgradeQuote> for UpgradeQuoteResponse {
    fn from(quote: UpgradeQuote) -> Self {
        Self {
            days_remaining: quote.days_remaining,
            current_remaining_value: quote.current_remaining_value,
            new_remaining_value: quote.new_remaining_value,
            upgrade_amount: quote.upgrade_amount,
            final_amount: quote.final_amount,
            credit_applied: quote.credit_applied,
            remaining_credits: quote.remaining_credits,
        }
    }
}

/// One catalog plan for the public listing.
#[derive(Debug, Clone, Serialize)]
pub struct PlanResponse {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Monthly price in minor units.
    pub price: i64,
    /// Provider price id, present once provisioned.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_id: Option<String>,
    pub features: Vec<String>,
}

impl From<Plan> for PlanResponse {
    fn from(plan: Plan) -> Self {
        Self {
            id: plan.id.to_string(),
            name: plan.name,
            description: plan.description,
            price: plan.price,
            price_id: plan.price_id,
            features: plan.features,
        }
    }
}

/// Response for the catalog listing.
#[derive(Debug, Clone, Serialize)]
pub struct PlanListResponse {
    pub plans: Vec<PlanResponse>,
}

/// One provisioned plan in the admin provisioning response.
#[derive(Debug, Clone, Serialize)]
pub struct ProvisionedPlanResponse {
    pub plan_id: String,
    pub product_id: String,
    pub price_id: String,
}

/// Response for provider catalog provisioning.
#[derive(Debug, Clone, Serialize)]
pub struct ProvisionCatalogResponse {
    pub provisioned: Vec<ProvisionedPlanResponse>,
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Response DTO
// ════════════════════════════════════════════════════════════════════════════════

/// Standard error response for API errors.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling.
    pub error_code: String,
    /// Human-readable error message.
    pub message: String,
    /// Additional details (optional).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    /// Create a new error response.
    pub fn new(error_code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error_code: error_code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Create an error response with details.
    pub fn with_details(
        error_code: impl Into<String>,
        message: impl Into<String>,
        details: serde_json::Value,
    ) -> Self {
        Self {
            error_code: error_code.into(),
            message: message.into(),
            details: Some(details),
        }
    }
}

//! Payment history entries.
//!
//! Every successful payment appends one record to the account's history.
//! The list is append-only: records are never reordered, edited, or
//! deleted, so it doubles as the audit trail for the credits balance.

use crate::domain::foundation::{PlanId, Timestamp};
use serde::{Deserialize, Serialize};

/// What kind of payment a history entry records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentKind {
    /// First payment on an account with an empty history.
    Initial,

    /// Mid-cycle plan change produced by the proration engine.
    Upgrade,

    /// Kept for stored-data compatibility; no operation produces it.
    Downgrade,

    /// Repeat payment on an account that already has history.
    Renewal,
}

impl std::fmt::Display for PaymentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PaymentKind::Initial => "initial",
            PaymentKind::Upgrade => "upgrade",
            PaymentKind::Downgrade => "downgrade",
            PaymentKind::Renewal => "renewal",
        };
        write!(f, "{}", s)
    }
}

/// One payment on a billing account.
///
/// Amounts are in minor currency units. `amount` is what the subscriber
/// was actually charged; on upgrade entries `prorated_amount` is the raw
/// prorated cost before credits and `credit_applied` is the portion of
/// the pre-existing balance that offset it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentRecord {
    /// Payment-provider intent reference.
    pub payment_intent_id: String,

    /// Charged amount in minor units.
    pub amount: f64,

    /// Plan the payment was for, denormalized at payment time.
    pub plan_id: PlanId,
    pub plan_name: String,

    /// When the payment was recorded.
    pub date: Timestamp,

    /// Entry kind.
    pub kind: PaymentKind,

    /// Raw prorated upgrade cost, present only on upgrade entries.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prorated_amount: Option<f64>,

    /// Credits applied against the charge, present only on upgrade entries.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credit_applied: Option<f64>,
}

impl PaymentRecord {
    /// Creates a plain payment record (initial or renewal).
    pub fn new(
        kind: PaymentKind,
        payment_intent_id: impl Into<String>,
        amount: f64,
        plan_id: PlanId,
        plan_name: impl Into<String>,
        date: Timestamp,
    ) -> Self {
        Self {
            payment_intent_id: payment_intent_id.into(),
            amount,
            plan_id,
            plan_name: plan_name.into(),
            date,
            kind,
            prorated_amount: None,
            credit_applied: None,
        }
    }

    /// Creates an upgrade record carrying the proration breakdown.
    pub fn upgrade(
        payment_intent_id: impl Into<String>,
        amount: f64,
        prorated_amount: f64,
        credit_applied: f64,
        plan_id: PlanId,
        plan_name: impl Into<String>,
        date: Timestamp,
    ) -> Self {
        Self {
            payment_intent_id: payment_intent_id.into(),
            amount,
            plan_id,
            plan_name: plan_name.into(),
            date,
            kind: PaymentKind::Upgrade,
            prorated_amount: Some(prorated_amount),
            credit_applied: Some(credit_applied),
        }
    }
}

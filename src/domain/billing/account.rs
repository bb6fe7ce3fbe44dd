//! Billing account aggregate.
//!
//! One record per user, keyed by the identity provider's external id.
//! The record carries the current subscription snapshot, the credit
//! balance, and the append-only payment history; every mutating
//! operation reads the whole record, changes it in memory, and writes it
//! back as a single document.
//!
//! # Design Decisions
//!
//! - **One record per external id**: unique constraint enforced by the
//!   repository.
//! - **Amounts as f64 minor units**: the 30-day daily rate produces
//!   fractional remainders, and the balance stores them.
//! - **Denormalized snapshot**: plan fields are copied at assignment
//!   time; later catalog edits do not rewrite live subscriptions.
//! - **Versioned writes**: `version` is the value observed at read time;
//!   the repository only applies an update when it still matches.

use crate::domain::foundation::{
    AccountId, DomainError, ErrorCode, ExternalUserId, StateMachine, Timestamp,
};
use serde::{Deserialize, Serialize};

use super::{PaymentKind, PaymentRecord, Plan, SubscriptionStatus, UpgradeQuote};
use crate::domain::foundation::PlanId;

/// The current plan snapshot embedded in an account.
///
/// All plan fields are optional because a synced-but-never-paid account
/// has none of them; `status` alone is always present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subscription {
    pub plan_id: Option<PlanId>,
    pub plan_name: Option<String>,

    /// Plan price at assignment time, minor units.
    pub price: Option<i64>,

    /// When this plan assignment began.
    pub start_date: Option<Timestamp>,

    /// When the current billing cycle ends. Carried over unchanged by an
    /// upgrade; only assignment and renewal move it.
    pub end_date: Option<Timestamp>,

    pub status: SubscriptionStatus,
}

impl Subscription {
    /// Snapshot for an account with no paid plan.
    pub fn none() -> Self {
        Self {
            plan_id: None,
            plan_name: None,
            price: None,
            start_date: None,
            end_date: None,
            status: SubscriptionStatus::Expired,
        }
    }

    /// Returns true if the snapshot currently points at the given plan.
    pub fn is_plan(&self, plan_id: &PlanId) -> bool {
        self.plan_id.as_ref() == Some(plan_id)
    }
}

impl Default for Subscription {
    fn default() -> Self {
        Self::none()
    }
}

/// Billing account aggregate.
///
/// # Invariants
///
/// - `credits >= 0` at all times.
/// - `payment_history` only grows, in order.
/// - An upgrade never moves `subscription.end_date`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillingAccount {
    /// Internal identifier.
    pub id: AccountId,

    /// Identity provider's stable user id.
    pub external_id: ExternalUserId,

    /// Email from the identity provider. Empty when the record was
    /// created by a payment that arrived before the first sync.
    pub email: String,

    /// Current plan snapshot.
    pub subscription: Subscription,

    /// Credit balance in minor units.
    pub credits: f64,

    /// Append-only payment log, oldest first.
    pub payment_history: Vec<PaymentRecord>,

    /// Version observed at read time; the repository bumps it on write.
    pub version: i64,

    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl BillingAccount {
    /// Creates an account for a user who has synced but never paid.
    pub fn create_unsubscribed(
        id: AccountId,
        external_id: ExternalUserId,
        email: impl Into<String>,
    ) -> Self {
        let now = Timestamp::now();
        Self {
            id,
            external_id,
            email: email.into(),
            subscription: Subscription::none(),
            credits: 0.0,
            payment_history: Vec::new(),
            version: 1,
            created_at: now,
            updated_at: now,
        }
    }

    /// Creates an account already subscribed to a plan.
    ///
    /// Used by the direct-creation path; the cycle starts at `now` and
    /// runs one 30-day interval. No payment entry is written here.
    pub fn create_subscribed(
        id: AccountId,
        external_id: ExternalUserId,
        email: impl Into<String>,
        plan: &Plan,
        now: Timestamp,
    ) -> Self {
        let created = Timestamp::now();
        Self {
            id,
            external_id,
            email: email.into(),
            subscription: Subscription {
                plan_id: Some(plan.id.clone()),
                plan_name: Some(plan.name.clone()),
                price: Some(plan.price),
                start_date: Some(now),
                end_date: Some(now.add_months(1)),
                status: SubscriptionStatus::Active,
            },
            credits: 0.0,
            payment_history: Vec::new(),
            version: 1,
            created_at: created,
            updated_at: created,
        }
    }

    /// Refreshes the email from the identity provider.
    pub fn sync_email(&mut self, email: impl Into<String>) {
        self.email = email.into();
        self.updated_at = Timestamp::now();
    }

    /// Records a successful payment and starts a fresh 30-day cycle.
    ///
    /// The entry is typed `initial` on an empty history and `renewal`
    /// afterwards, whatever plan the payment was for. Returns the kind
    /// that was recorded.
    ///
    /// # Errors
    ///
    /// Returns an error if the status cannot transition to active.
    pub fn record_payment(
        &mut self,
        plan: &Plan,
        payment_intent_id: impl Into<String>,
        amount: f64,
        now: Timestamp,
    ) -> Result<PaymentKind, DomainError> {
        self.transition_to(SubscriptionStatus::Active)?;

        let kind = if self.payment_history.is_empty() {
            PaymentKind::Initial
        } else {
            PaymentKind::Renewal
        };
        self.payment_history.push(PaymentRecord::new(
            kind,
            payment_intent_id,
            amount,
            plan.id.clone(),
            plan.name.clone(),
            now,
        ));

        self.subscription = Subscription {
            plan_id: Some(plan.id.clone()),
            plan_name: Some(plan.name.clone()),
            price: Some(plan.price),
            start_date: Some(now),
            end_date: Some(now.add_months(1)),
            status: self.subscription.status,
        };
        self.updated_at = Timestamp::now();
        Ok(kind)
    }

    /// Applies a computed upgrade quote to the account.
    ///
    /// Replaces the plan fields, moves `start_date` to `now`, keeps the
    /// cycle end where it was, settles the credit balance, and appends
    /// the upgrade entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the status cannot transition to active.
    pub fn apply_upgrade(
        &mut self,
        plan: &Plan,
        quote: &UpgradeQuote,
        payment_intent_id: impl Into<String>,
        now: Timestamp,
    ) -> Result<(), DomainError> {
        self.transition_to(SubscriptionStatus::Active)?;

        self.subscription = Subscription {
            plan_id: Some(plan.id.clone()),
            plan_name: Some(plan.name.clone()),
            price: Some(plan.price),
            start_date: Some(now),
            // The cycle boundary survives the upgrade.
            end_date: self.subscription.end_date,
            status: self.subscription.status,
        };
        self.credits = quote.remaining_credits;
        self.payment_history.push(PaymentRecord::upgrade(
            payment_intent_id,
            quote.final_amount,
            quote.upgrade_amount,
            quote.credit_applied,
            plan.id.clone(),
            plan.name.clone(),
            now,
        ));
        self.updated_at = Timestamp::now();
        Ok(())
    }

    /// Cancels the subscription. Only the status changes; the plan
    /// fields and cycle end stay put.
    ///
    /// # Errors
    ///
    /// Returns an error if the current status cannot be cancelled.
    pub fn cancel(&mut self) -> Result<(), DomainError> {
        self.transition_to(SubscriptionStatus::Cancelled)?;
        self.updated_at = Timestamp::now();
        Ok(())
    }

    /// Check if this account currently has access to paid features.
    ///
    /// A cancelled subscription keeps access until its cycle end passes.
    pub fn has_access(&self) -> bool {
        if !self.subscription.status.has_access() {
            return false;
        }

        if self.subscription.status == SubscriptionStatus::Cancelled {
            return match self.subscription.end_date {
                Some(end) => Timestamp::now() <= end,
                None => false,
            };
        }

        true
    }

    /// Transition the subscription status using the state machine.
    fn transition_to(&mut self, target: SubscriptionStatus) -> Result<(), DomainError> {
        self.subscription.status =
            self.subscription.status.transition_to(target).map_err(|_| {
                DomainError::new(
                    ErrorCode::InvalidStateTransition,
                    format!(
                        "Cannot transition subscription from {:?} to {:?}",
                        self.subscription.status, target
                    ),
                )
            })?;
        Ok(())
    }
}

//! Subscription status state machine.
//!
//! Defines the lifecycle of the subscription snapshot embedded in a
//! billing account and the transitions payments and cancellation drive.

use crate::domain::foundation::StateMachine;
use serde::{Deserialize, Serialize};

/// Status of the current subscription snapshot.
///
/// A freshly-synced account that has never paid starts as `Expired`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    /// No paid plan in effect. Initial state for synced accounts; never
    /// re-entered later (there is no expiry sweep).
    Expired,

    /// Paid plan in effect for the current cycle.
    Active,

    /// User requested cancellation. The plan snapshot, including the
    /// cycle end date, is left intact; access continues until period end.
    Cancelled,
}

impl SubscriptionStatus {
    /// Returns true if this status grants access to paid features.
    ///
    /// Cancelled still grants access: cancellation only flips the status
    /// and the cycle runs out on its own.
    pub fn has_access(&self) -> bool {
        matches!(
            self,
            SubscriptionStatus::Active | SubscriptionStatus::Cancelled
        )
    }
}

impl Default for SubscriptionStatus {
    fn default() -> Self {
        SubscriptionStatus::Expired
    }
}

impl StateMachine for SubscriptionStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use SubscriptionStatus::*;
        matches!(
            (self, target),
            // From EXPIRED
            (Expired, Active) // First successful payment
            // From ACTIVE
                | (Active, Active) // Upgrade or renewal
                | (Active, Cancelled)
            // From CANCELLED
                | (Cancelled, Active) // Reactivation by a new payment
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use SubscriptionStatus::*;
        match self {
            Expired => vec![Active],
            Active => vec![Active, Cancelled],
            Cancelled => vec![Active],
        }
    }
}

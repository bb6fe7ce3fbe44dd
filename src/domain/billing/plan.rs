//! Plan catalog entries.
//!
//! A plan is a read-only pricing definition loaded from the catalog at
//! startup. The subscription snapshot on an account denormalizes the plan
//! fields at assignment time, so catalog edits never rewrite history.

use crate::domain::foundation::{PlanId, ValidationError};
use serde::{Deserialize, Serialize};

/// Length of one billing cycle in days.
///
/// Every interval is modeled as exactly 30 days; there is no
/// calendar-month-length awareness anywhere in the billing math.
pub const BILLING_CYCLE_DAYS: i64 = 30;

/// Billing interval for a plan.
///
/// Only a fixed 30-day month is modeled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BillingInterval {
    Month,
}

impl Default for BillingInterval {
    fn default() -> Self {
        BillingInterval::Month
    }
}

impl std::fmt::Display for BillingInterval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BillingInterval::Month => write!(f, "month"),
        }
    }
}

/// A plan available for purchase.
///
/// Prices are in minor currency units (cents) per billing interval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    /// Catalog identifier, unique within the catalog.
    pub id: PlanId,

    /// Display label.
    pub name: String,

    /// Marketing description shown on the storefront.
    #[serde(default)]
    pub description: String,

    /// Price in minor currency units per interval.
    pub price: i64,

    /// Payment-provider price reference, set once the catalog has been
    /// provisioned at the provider.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_id: Option<String>,

    /// Billing interval.
    #[serde(default)]
    pub interval: BillingInterval,

    /// Feature bullet points for display.
    #[serde(default)]
    pub features: Vec<String>,
}

impl Plan {
    /// Validates catalog-entry invariants.
    ///
    /// Called by the catalog adapter after loading; a file that fails here
    /// is rejected at startup rather than producing broken quotes later.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.is_empty() {
            return Err(ValidationError::empty_field("name"));
        }
        if self.price < 0 {
            return Err(ValidationError::out_of_range(
                "price",
                0,
                i64::MAX,
                self.price,
            ));
        }
        Ok(())
    }
}

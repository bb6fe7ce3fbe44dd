//! Billing domain module.
//!
//! Handles plan catalog entries, subscription lifecycle, payment history,
//! and upgrade proration.
//!
//! # Module Structure
//!
//! - `account` - BillingAccount aggregate and subscription snapshot
//! - `errors` - Billing error taxonomy
//! - `payment` - Payment history records
//! - `plan` - Plan catalog entry
//! - `proration` - Mid-cycle upgrade quote arithmetic
//! - `status` - SubscriptionStatus state machine

mod account;
mod errors;
mod payment;
mod plan;
mod proration;
mod status;

pub use account::{BillingAccount, Subscription};
pub use errors::BillingError;
pub use payment::{PaymentKind, PaymentRecord};
pub use plan::{BillingInterval, Plan, BILLING_CYCLE_DAYS};
pub use proration::UpgradeQuote;
pub use status::SubscriptionStatus;

//! Billing handlers.
//!
//! Command and query handlers for the billing account lifecycle including:
//!
//! ## Commands
//! - Mirroring identity-provider users into billing accounts
//! - Creating subscribed accounts directly
//! - Opening payment intents for checkout
//! - Recording settled payments and resetting the billing cycle
//! - Prorated plan upgrades
//! - Cancelling subscriptions
//! - Provisioning the plan catalog with the payment provider
//!
//! ## Queries
//! - Get billing account details

mod cancel_subscription;
mod create_account;
mod create_payment_intent;
mod get_account;
mod provision_catalog;
mod record_payment;
mod sync_account;
mod upgrade_plan;

// Commands
pub use cancel_subscription::{
    CancelSubscriptionCommand, CancelSubscriptionHandler, CancelSubscriptionResult,
};
pub use create_account::{CreateAccountCommand, CreateAccountHandler, CreateAccountResult};
pub use create_payment_intent::{
    CreatePaymentIntentCommand, CreatePaymentIntentHandler, CreatePaymentIntentResult,
};
pub use provision_catalog::{
    ProvisionCatalogCommand, ProvisionCatalogHandler, ProvisionCatalogResult, ProvisionedPlan,
};
pub use record_payment::{RecordPaymentCommand, RecordPaymentHandler, RecordPaymentResult};
pub use sync_account::{SyncAccountCommand, SyncAccountHandler, SyncAccountResult};
pub use upgrade_plan::{UpgradePlanCommand, UpgradePlanHandler, UpgradePlanResult};

// Queries
pub use get_account::{GetAccountHandler, GetAccountQuery};

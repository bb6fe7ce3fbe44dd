//! Plan catalog port for subscription plan lookup.
//!
//! The catalog is the source of truth for plan prices. Upgrade quotes and
//! payment recording always price against the catalog entry, never against
//! amounts supplied by the caller.
//!
//! # Design
//!
//! - **Synchronous**: The catalog is loaded once per process; lookups are
//!   in-memory reads
//! - **Read-only**: Nothing in the request path mutates the catalog

use crate::domain::billing::Plan;
use crate::domain::foundation::PlanId;

/// Port for plan catalog lookups.
pub trait PlanCatalog: Send + Sync {
    /// Find a plan by id.
    ///
    /// Returns `None` if the plan is not in the catalog.
    fn find(&self, plan_id: &PlanId) -> Option<Plan>;

    /// All plans in the catalog, in file order.
    fn all(&self) -> Vec<Plan>;
}

//! JSON file plan catalog adapter.
//!
//! Loads the plan catalog from a JSON file once at startup. The file holds
//! an array of plan entries; every entry is validated and plan ids must be
//! unique. Lookups after loading are in-memory reads, so the request path
//! never touches the filesystem.

use std::path::Path;

use thiserror::Error;

use crate::domain::billing::Plan;
use crate::domain::foundation::PlanId;
use crate::ports::PlanCatalog;

/// Errors raised while loading the catalog file.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read catalog file: {0}")]
    Io(String),

    #[error("Failed to parse catalog file: {0}")]
    Parse(String),

    #[error("Invalid plan '{plan_id}' in catalog: {reason}")]
    InvalidPlan { plan_id: String, reason: String },

    #[error("Duplicate plan id '{0}' in catalog")]
    DuplicatePlanId(String),
}

/// Plan catalog backed by a JSON file loaded at startup.
pub struct JsonPlanCatalog {
    plans: Vec<Plan>,
}

impl JsonPlanCatalog {
    /// Load and validate the catalog from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| CatalogError::Io(format!("{}: {}", path.display(), e)))?;

        let plans: Vec<Plan> = serde_json::from_str(&raw)
            .map_err(|e| CatalogError::Parse(format!("{}: {}", path.display(), e)))?;

        let catalog = Self::from_plans(plans)?;

        if catalog.plans.is_empty() {
            tracing::warn!(path = %path.display(), "Plan catalog is empty");
        } else {
            tracing::info!(
                path = %path.display(),
                count = catalog.plans.len(),
                "Loaded plan catalog"
            );
        }

        Ok(catalog)
    }

    /// Build a catalog from already-parsed plans, validating each entry.
    pub fn from_plans(plans: Vec<Plan>) -> Result<Self, CatalogError> {
        for plan in &plans {
            plan.validate().map_err(|e| CatalogError::InvalidPlan {
                plan_id: plan.id.to_string(),
                reason: e.to_string(),
            })?;
        }

        for (i, plan) in plans.iter().enumerate() {
            if plans[..i].iter().any(|other| other.id == plan.id) {
                return Err(CatalogError::DuplicatePlanId(plan.id.to_string()));
            }
        }

        Ok(Self { plans })
    }
}

impl PlanCatalog for JsonPlanCatalog {
    fn find(&self, plan_id: &PlanId) -> Option<Plan> {
        self.plans.iter().find(|p| &p.id == plan_id).cloned()
    }

    fn all(&self) -> Vec<Plan> {
        self.plans.clone()
    }
}

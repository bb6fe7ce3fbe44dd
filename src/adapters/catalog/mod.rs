//! Plan catalog adapters - Sources of plan pricing definitions.

mod json_catalog;

pub use json_catalog::{CatalogError, JsonPlanCatalog};

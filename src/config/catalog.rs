//! Plan catalog configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Plan catalog configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogConfig {
    /// Path to the plan catalog JSON file
    #[serde(default = "default_path")]
    pub path: String,
}

impl CatalogConfig {
    /// Validate catalog configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.path.is_empty() {
            return Err(ValidationError::MissingRequired("CATALOG_PATH"));
        }
        Ok(())
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            path: default_path(),
        }
    }
}

fn default_path() -> String {
    "plans.json".to_string()
}

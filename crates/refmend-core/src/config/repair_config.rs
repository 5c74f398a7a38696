//! Which child tables get their orphaned references repaired.

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;
use crate::models::ReferenceLink;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepairConfig {
    /// Processed in this order.
    pub links: Vec<ReferenceLink>,
}

impl Default for RepairConfig {
    fn default() -> Self {
        Self {
            links: vec![
                ReferenceLink::new("movies", "profile_id", "profiles"),
                ReferenceLink::new("import_lists", "profile_id", "profiles"),
            ],
        }
    }
}

impl RepairConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.links.is_empty() {
            return Err(ConfigError::NoLinks);
        }
        self.links.iter().try_for_each(ReferenceLink::validate)
    }
}

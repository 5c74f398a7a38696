//! A registered (child table, parent table) pair.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

/// Names the child table, its reference column, and the parent table it
/// points into. Every name is interpolated into SQL, so `validate()` must
/// pass before the link is handed to a store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceLink {
    pub child_table: String,
    #[serde(default = "default_id_column")]
    pub child_id_column: String,
    pub reference_column: String,
    pub parent_table: String,
    #[serde(default = "default_id_column")]
    pub parent_id_column: String,
}

fn default_id_column() -> String {
    "id".to_string()
}

impl ReferenceLink {
    /// Link using `id` as the primary key column on both sides.
    pub fn new(child_table: &str, reference_column: &str, parent_table: &str) -> Self {
        Self {
            child_table: child_table.to_string(),
            child_id_column: default_id_column(),
            reference_column: reference_column.to_string(),
            parent_table: parent_table.to_string(),
            parent_id_column: default_id_column(),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            ("child_table", &self.child_table),
            ("child_id_column", &self.child_id_column),
            ("reference_column", &self.reference_column),
            ("parent_table", &self.parent_table),
            ("parent_id_column", &self.parent_id_column),
        ];
        for (field, value) in fields {
            if !is_sql_identifier(value) {
                return Err(ConfigError::InvalidIdentifier {
                    field: field.to_string(),
                    value: value.clone(),
                });
            }
        }
        Ok(())
    }
}

impl fmt::Display for ReferenceLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{} -> {}.{}",
            self.child_table, self.reference_column, self.parent_table, self.parent_id_column
        )
    }
}

/// `[A-Za-z_][A-Za-z0-9_]*`
pub fn is_sql_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

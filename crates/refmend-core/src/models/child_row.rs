use serde::{Deserialize, Serialize};

/// One child row as seen by the repair pass.
///
/// `reference` is `None` when the column is NULL; a NULL reference never
/// matches a parent and is repaired like any other orphan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChildRow {
    pub id: i64,
    pub reference: Option<i64>,
}

impl ChildRow {
    pub fn new(id: i64, reference: Option<i64>) -> Self {
        Self { id, reference }
    }
}

use serde::{Deserialize, Serialize};

/// A single column of a [`crate::Table`].
///
/// `r#type` carries the SQL type text verbatim (e.g. `VARCHAR(255)`,
/// `DECIMAL(10,2)`) — normalization for comparison purposes happens in the
/// differ, not here, so that a `Column` always reflects exactly what the
/// parser or introspector saw.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub r#type: String,
    pub nullable: bool,
    pub default: Option<String>,
}

impl Column {
    pub fn new(name: impl Into<String>, r#type: impl Into<String>, nullable: bool) -> Self {
        Self {
            name: name.into(),
            r#type: r#type.into(),
            nullable,
            default: None,
        }
    }

    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }
}

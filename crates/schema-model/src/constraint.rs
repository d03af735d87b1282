use serde::{Deserialize, Serialize};

/// Action taken on the child rows of a foreign key when the parent row is
/// deleted or updated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReferentialAction {
    Cascade,
    Restrict,
    SetNull,
    SetDefault,
}

impl ReferentialAction {
    /// Maps a catalog/SQL action keyword to the enumerated value. Unknown
    /// spellings (including Postgres's `NO ACTION`, which this model treats
    /// the same as "absent") return `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "CASCADE" => Some(Self::Cascade),
            "RESTRICT" => Some(Self::Restrict),
            "SET NULL" => Some(Self::SetNull),
            "SET DEFAULT" => Some(Self::SetDefault),
            _ => None,
        }
    }

    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Cascade => "CASCADE",
            Self::Restrict => "RESTRICT",
            Self::SetNull => "SET NULL",
            Self::SetDefault => "SET DEFAULT",
        }
    }
}

/// Ordered primary key columns. Equality ignores `name`: databases
/// frequently auto-generate PK constraint names, so two primary keys with
/// the same column composition are considered the same constraint
/// regardless of what either side calls it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrimaryKeyConstraint {
    pub name: Option<String>,
    pub columns: Vec<String>,
}

impl PrimaryKeyConstraint {
    pub fn new(columns: Vec<String>) -> Self {
        Self { name: None, columns }
    }

    pub fn named(name: impl Into<String>, columns: Vec<String>) -> Self {
        Self {
            name: Some(name.into()),
            columns,
        }
    }

    /// Composition equality used by the differ: same columns, same order.
    pub fn same_composition(&self, other: &Self) -> bool {
        self.columns == other.columns
    }
}

impl PartialEq for PrimaryKeyConstraint {
    fn eq(&self, other: &Self) -> bool {
        self.same_composition(other)
    }
}

impl Eq for PrimaryKeyConstraint {}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignKeyConstraint {
    pub name: Option<String>,
    pub columns: Vec<String>,
    pub referenced_table: String,
    pub referenced_columns: Vec<String>,
    pub on_delete: Option<ReferentialAction>,
    pub on_update: Option<ReferentialAction>,
    pub deferrable: Option<bool>,
    pub initially_deferred: Option<bool>,
}

impl ForeignKeyConstraint {
    pub fn new(columns: Vec<String>, referenced_table: impl Into<String>, referenced_columns: Vec<String>) -> Self {
        Self {
            name: None,
            columns,
            referenced_table: referenced_table.into(),
            referenced_columns,
            on_delete: None,
            on_update: None,
            deferrable: None,
            initially_deferred: None,
        }
    }

    /// `true` when `self` and `other` differ in anything but the name —
    /// referenced table, columns, referential actions, or deferrability.
    pub fn differs_ignoring_name(&self, other: &Self) -> bool {
        self.columns != other.columns
            || self.referenced_table != other.referenced_table
            || self.referenced_columns != other.referenced_columns
            || self.on_delete != other.on_delete
            || self.on_update != other.on_update
            || self.deferrable != other.deferrable
            || self.initially_deferred != other.initially_deferred
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckConstraint {
    pub name: Option<String>,
    pub expression: String,
}

impl CheckConstraint {
    pub fn new(expression: impl Into<String>) -> Self {
        Self {
            name: None,
            expression: expression.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UniqueConstraint {
    pub name: Option<String>,
    pub columns: Vec<String>,
    pub deferrable: Option<bool>,
    pub initially_deferred: Option<bool>,
}

impl UniqueConstraint {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            name: None,
            columns,
            deferrable: None,
            initially_deferred: None,
        }
    }
}

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IndexMethod {
    Btree,
    Hash,
    Gist,
    Spgist,
    Gin,
    Brin,
}

impl Default for IndexMethod {
    fn default() -> Self {
        Self::Btree
    }
}

impl IndexMethod {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "btree" => Some(Self::Btree),
            "hash" => Some(Self::Hash),
            "gist" => Some(Self::Gist),
            "spgist" => Some(Self::Spgist),
            "gin" => Some(Self::Gin),
            "brin" => Some(Self::Brin),
            _ => None,
        }
    }

    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Btree => "btree",
            Self::Hash => "hash",
            Self::Gist => "gist",
            Self::Spgist => "spgist",
            Self::Gin => "gin",
            Self::Brin => "brin",
        }
    }
}

/// A btree/hash/gist/... index, a partial index, or an expression index.
///
/// Invariant (enforced by [`crate::Schema::validate`], not by this type):
/// `columns` is non-empty XOR `expression` is `Some`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Index {
    pub name: String,
    pub table_name: String,
    pub columns: Vec<String>,
    pub method: IndexMethod,
    pub unique: bool,
    pub concurrent: bool,
    pub predicate: Option<String>,
    pub expression: Option<String>,
    pub storage_params: IndexMap<String, String>,
    pub tablespace: Option<String>,
}

impl Index {
    pub fn new(name: impl Into<String>, table_name: impl Into<String>, columns: Vec<String>) -> Self {
        Self {
            name: name.into(),
            table_name: table_name.into(),
            columns,
            method: IndexMethod::default(),
            unique: false,
            concurrent: false,
            predicate: None,
            expression: None,
            storage_params: IndexMap::new(),
            tablespace: None,
        }
    }

    pub fn is_expression_index(&self) -> bool {
        self.expression.is_some()
    }

    /// Equality used by the index differ: table, method, uniqueness, exact
    /// (order-sensitive) column list, predicate, expression, storage
    /// parameters (unordered), and tablespace. Deliberately ignores `name`
    /// (matching is done on name by the caller) and `concurrent` (a planner
    /// execution detail, not a property of the index itself).
    pub fn same_definition(&self, other: &Self) -> bool {
        self.table_name == other.table_name
            && self.method == other.method
            && self.unique == other.unique
            && self.columns == other.columns
            && self.predicate == other.predicate
            && self.expression == other.expression
            && self.storage_params == other.storage_params
            && self.tablespace == other.tablespace
    }
}

use indexmap::IndexMap;

/// A single value as reported by the catalog. A row is a mapping from
/// column name to one of these: string, number, boolean, null, or array.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Array(Vec<SqlValue>),
}

impl SqlValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            SqlValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            SqlValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            SqlValue::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[SqlValue]> {
        match self {
            SqlValue::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, SqlValue::Null)
    }
}

impl From<&str> for SqlValue {
    fn from(value: &str) -> Self {
        SqlValue::Text(value.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(value: String) -> Self {
        SqlValue::Text(value)
    }
}

impl From<bool> for SqlValue {
    fn from(value: bool) -> Self {
        SqlValue::Bool(value)
    }
}

impl From<i64> for SqlValue {
    fn from(value: i64) -> Self {
        SqlValue::Int(value)
    }
}

/// A single catalog row keyed by column name. `IndexMap` keeps row
/// iteration order deterministic, matching the describer's own preference
/// (it depends on `indexmap` throughout).
pub type Row = IndexMap<String, SqlValue>;

/// The fixed external interface this crate consumes — deliberately the
/// only way it ever touches a live database. Implementations typically
/// wrap a connection pool; this crate only ever issues read-only catalog
/// queries through it.
pub trait DatabaseConnection {
    fn query(&self, sql: &str, params: &[SqlValue]) -> Result<Vec<Row>, crate::IntrospectError>;
}

use thiserror::Error;

/// Invariant violations raised by [`crate::Schema::validate`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("index `{index}` references table `{table}` which does not exist in the schema")]
    IndexReferencesUnknownTable { index: String, table: String },

    #[error("index `{0}` has both columns and an expression; it must have exactly one")]
    IndexHasColumnsAndExpression(String),

    #[error("enum type `{0}` has no values")]
    EmptyEnum(String),

    #[error("table `{table}` has a duplicate column name `{column}`")]
    DuplicateColumn { table: String, column: String },

    #[error("constraint name `{0}` is used more than once in table `{1}`")]
    DuplicateConstraintName(String, String),

    #[error("foreign key `{name}` on table `{table}` has {local} local column(s) but {referenced} referenced column(s)")]
    ForeignKeyColumnCountMismatch {
        table: String,
        name: String,
        local: usize,
        referenced: usize,
    },
}

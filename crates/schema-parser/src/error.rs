use schema_model::ModelError;
use thiserror::Error;

/// Errors raised while turning DDL text into a [`schema_model::Schema`].
///
/// These are fatal: the pipeline aborts rather than returning a partial
/// schema. Non-fatal issues (unknown expression shapes, PK conflicts,
/// unknown referential actions) are reported as warnings instead — see
/// [`crate::ParsedSchema::warnings`].
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("statement not supported in declarative schema: {0}")]
    UnsupportedStatement(String),

    #[error("ENUM types must have at least one value (type `{0}`)")]
    EmptyEnum(String),

    #[error("failed to parse SQL: {0}")]
    Syntax(#[from] sqlparser::parser::ParserError),

    #[error(transparent)]
    Model(#[from] ModelError),
}

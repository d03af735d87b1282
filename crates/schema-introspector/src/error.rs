use thiserror::Error;

#[derive(Debug, Error)]
pub enum IntrospectError {
    #[error("introspection query `{query}` failed: {message}")]
    QueryFailed { query: &'static str, message: String },

    #[error(transparent)]
    Model(#[from] schema_model::ModelError),
}

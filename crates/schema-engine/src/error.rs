use thiserror::Error;

use schema_differ::DifferError;
use schema_introspector::IntrospectError;
use schema_model::ModelError;
use schema_parser::ParseError;

/// Aggregates every sub-crate's error type, mirroring the layered-error
/// idiom used throughout the rest of this workspace: each crate defines
/// its own enum and the top crate wraps each with `#[from]`.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Introspect(#[from] IntrospectError),

    /// Wraps `schema_differ::DifferError`, which itself wraps a dependency
    /// cycle (`DependencyError`) before it ever reaches this boundary.
    #[error(transparent)]
    Differ(#[from] DifferError),
}

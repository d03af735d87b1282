use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DependencyError {
    #[error("circular foreign-key dependency: {0:?}")]
    Cycle(Vec<Vec<String>>),
}

#[derive(Debug, Error)]
pub enum DifferError {
    #[error(transparent)]
    Dependency(#[from] DependencyError),
}

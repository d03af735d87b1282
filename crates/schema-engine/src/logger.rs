//! Logging is injected as a collaborator interface rather than resolved
//! from a global — callers that want to assert on warnings in tests can
//! supply their own [`Logger`] without this crate ever touching a global
//! subscriber.

pub trait Logger {
    fn info(&self, message: &str);
    fn warning(&self, message: &str);
    fn error(&self, message: &str);
}

/// Forwards to the `tracing` crate, matching the structured-logging
/// backbone used throughout the rest of this workspace.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn info(&self, message: &str) {
        tracing::info!("{message}");
    }

    fn warning(&self, message: &str) {
        tracing::warn!("{message}");
    }

    fn error(&self, message: &str) {
        tracing::error!("{message}");
    }
}

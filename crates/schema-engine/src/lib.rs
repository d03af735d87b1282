//! The public entry point for the Parse → Introspect → Diff → Plan
//! pipeline. Each stage also lives in its own crate and can be driven
//! independently; this crate wires them together behind a small surface.

mod error;
mod logger;

pub use error::EngineError;
pub use logger::{Logger, TracingLogger};
pub use schema_differ::{MigrationPlan, PlannerOptions};
pub use schema_introspector::DatabaseConnection;
pub use schema_model::Schema;

/// Parses DDL text into a validated [`Schema`], discarding any non-fatal
/// warnings. Callers that need the warnings should go through
/// [`generate_plan`], which routes them to a [`Logger`].
pub fn parse_and_validate(ddl: &str) -> Result<Schema, EngineError> {
    Ok(schema_parser::parse_ddl(ddl)?.schema)
}

/// Reads the live catalog behind `conn` into a [`Schema`].
pub fn introspect(conn: &dyn DatabaseConnection) -> Result<Schema, EngineError> {
    Ok(schema_introspector::introspect(conn)?)
}

/// Computes the migration plan that transforms `current` into `desired`.
pub fn diff(desired: &Schema, current: &Schema, options: PlannerOptions) -> Result<MigrationPlan, EngineError> {
    Ok(schema_differ::diff(desired, current, options)?)
}

/// Runs the full pipeline: parse the desired DDL, introspect the live
/// database behind `current`, and diff the two into a migration plan.
/// Non-fatal warnings surfaced while parsing are delivered to `logger`
/// rather than dropped.
pub fn generate_plan(
    desired_ddl: &str,
    current: &dyn DatabaseConnection,
    options: PlannerOptions,
    logger: &dyn Logger,
) -> Result<MigrationPlan, EngineError> {
    let parsed = schema_parser::parse_ddl(desired_ddl)?;
    for warning in &parsed.warnings {
        logger.warning(warning);
    }
    logger.info(&format!("parsed {} table(s) from desired schema", parsed.schema.tables.len()));

    let current_schema = schema_introspector::introspect(current)?;
    logger.info(&format!("introspected {} table(s) from current schema", current_schema.tables.len()));

    let plan = schema_differ::diff(&parsed.schema, &current_schema, options)?;
    logger.info(&format!(
        "generated plan: {} transactional, {} concurrent statement(s)",
        plan.transactional.len(),
        plan.concurrent.len()
    ));

    Ok(plan)
}

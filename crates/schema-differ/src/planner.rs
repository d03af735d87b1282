use schema_model::Schema;
use schema_sql::{render_add_foreign_key, render_create_index, render_create_table, render_drop_table};

use crate::column_diff::diff_columns;
use crate::constraint_diff::{diff_checks, diff_foreign_keys, diff_uniques};
use crate::dependency::DependencyResolver;
use crate::error::DifferError;
use crate::index_diff::diff_indexes;
use crate::pk_diff::diff_primary_key;

#[derive(Debug, Clone, Copy)]
pub struct PlannerOptions {
    /// Emit `CONCURRENTLY` for index creations, unless an individual index
    /// overrides via its own `concurrent` flag.
    pub use_concurrent_indexes: bool,
    /// Emit `DROP INDEX CONCURRENTLY` for index drops.
    pub use_concurrent_drops: bool,
}

impl Default for PlannerOptions {
    fn default() -> Self {
        Self {
            use_concurrent_indexes: true,
            use_concurrent_drops: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MigrationPlan {
    pub transactional: Vec<String>,
    pub concurrent: Vec<String>,
    pub has_changes: bool,
}

/// Computes the ordered, partitioned migration plan that transforms
/// `current` into `desired`: existing tables (PK drops, column changes,
/// PK adds, index diffs, constraint diffs), then new tables, then dropped
/// tables.
pub fn diff(desired: &Schema, current: &Schema, options: PlannerOptions) -> Result<MigrationPlan, DifferError> {
    let mut statements: Vec<String> = Vec::new();
    let mut check_counter = 0usize;

    let desired_order = DependencyResolver::new(desired).creation_order()?;

    for table_name in &desired_order {
        let (Some(current_table), Some(desired_table)) = (current.table(table_name), desired.table(table_name)) else {
            continue;
        };

        let (pk_drops, pk_adds) = diff_primary_key(table_name, current_table, desired_table);
        statements.extend(pk_drops);

        let column_diff = diff_columns(table_name, current_table, desired_table);
        statements.extend(column_diff.statements);

        statements.extend(pk_adds);
        statements.extend(diff_indexes(current_table, desired_table, &options));
        statements.extend(diff_checks(table_name, current_table, desired_table, &mut check_counter));
        statements.extend(diff_foreign_keys(table_name, current_table, desired_table, &column_diff.dropped_columns));
        statements.extend(diff_uniques(table_name, current_table, desired_table));
    }

    for table_name in &desired_order {
        if current.has_table(table_name) {
            continue;
        }
        let Some(table) = desired.table(table_name) else { continue };

        statements.push(render_create_table(table));
        for fk in &table.foreign_keys {
            statements.push(render_add_foreign_key(table_name, fk));
        }
        for index in &table.indexes {
            statements.push(render_create_index(index, index.concurrent || options.use_concurrent_indexes));
        }
    }

    let current_deletion_order = DependencyResolver::new(current).deletion_order()?;
    for table_name in &current_deletion_order {
        if !desired.has_table(table_name) {
            statements.push(render_drop_table(table_name));
        }
    }

    Ok(partition(statements))
}

fn partition(statements: Vec<String>) -> MigrationPlan {
    let mut plan = MigrationPlan::default();
    for statement in statements {
        if statement.contains("CONCURRENTLY") {
            plan.concurrent.push(statement);
        } else {
            plan.transactional.push(statement);
        }
    }
    plan.has_changes = !plan.transactional.is_empty() || !plan.concurrent.is_empty();
    plan
}

#[cfg(test)]
mod tests {
    use schema_model::{Column, ForeignKeyConstraint, Index, PrimaryKeyConstraint, Table};

    use super::*;

    #[test]
    fn empty_schemas_produce_an_empty_plan() {
        let plan = diff(&Schema::new(), &Schema::new(), PlannerOptions::default()).unwrap();
        assert!(!plan.has_changes);
        assert!(plan.transactional.is_empty());
        assert!(plan.concurrent.is_empty());
    }

    #[test]
    fn creates_table_with_composite_primary_key() {
        let mut table = Table::new("user_roles");
        table.columns.push(Column::new("user_id", "INTEGER", false));
        table.columns.push(Column::new("role_id", "INTEGER", false));
        table.primary_key = Some(PrimaryKeyConstraint::new(vec!["user_id".into(), "role_id".into()]));

        let mut desired = Schema::new();
        desired.tables.push(table);

        let plan = diff(&desired, &Schema::new(), PlannerOptions::default()).unwrap();
        assert_eq!(
            plan.transactional,
            vec!["CREATE TABLE user_roles (\n  user_id INTEGER NOT NULL,\n  role_id INTEGER NOT NULL,\n  PRIMARY KEY (user_id, role_id)\n);"
                .to_string()]
        );
        assert!(plan.has_changes);
    }

    #[test]
    fn dropping_fk_source_column_does_not_emit_explicit_fk_drop() {
        let mut current_users = Table::new("users");
        current_users.columns.push(Column::new("id", "INTEGER", false));
        let mut current_orders = Table::new("orders");
        current_orders.columns.push(Column::new("id", "INTEGER", false));
        current_orders.columns.push(Column::new("user_id", "INTEGER", true));
        current_orders
            .foreign_keys
            .push(ForeignKeyConstraint::new(vec!["user_id".into()], "users", vec!["id".into()]));

        let mut current = Schema::new();
        current.tables.push(current_users.clone());
        current.tables.push(current_orders);

        let mut desired_orders = Table::new("orders");
        desired_orders.columns.push(Column::new("id", "INTEGER", false));

        let mut desired = Schema::new();
        desired.tables.push(current_users);
        desired.tables.push(desired_orders);

        let plan = diff(&desired, &current, PlannerOptions::default()).unwrap();
        assert!(plan.transactional.contains(&"ALTER TABLE orders DROP COLUMN user_id;".to_string()));
        assert!(!plan.transactional.iter().any(|s| s.contains("DROP CONSTRAINT fk_orders_users")));
    }

    #[test]
    fn modifies_column_type_with_default_drop_and_using_clause() {
        let mut current_table = Table::new("t");
        current_table.columns.push(Column::new("col", "VARCHAR(50)", true).with_default("'0'"));
        let mut current = Schema::new();
        current.tables.push(current_table);

        let mut desired_table = Table::new("t");
        desired_table.columns.push(Column::new("col", "INTEGER", true));
        let mut desired = Schema::new();
        desired.tables.push(desired_table);

        let plan = diff(&desired, &current, PlannerOptions::default()).unwrap();
        assert_eq!(
            plan.transactional,
            vec![
                "ALTER TABLE t ALTER COLUMN col DROP DEFAULT;".to_string(),
                "ALTER TABLE t ALTER COLUMN col TYPE INTEGER USING TRUNC(col::DECIMAL)::integer;".to_string(),
            ]
        );
    }

    #[test]
    fn index_modification_is_partitioned_into_concurrent_batch() {
        let mut current_table = Table::new("t");
        current_table.indexes.push(Index::new("idx", "t", vec!["a".into()]));
        let mut current = Schema::new();
        current.tables.push(current_table);

        let mut desired_table = Table::new("t");
        desired_table.indexes.push(Index::new("idx", "t", vec!["a".into(), "b".into()]));
        let mut desired = Schema::new();
        desired.tables.push(desired_table);

        let plan = diff(&desired, &current, PlannerOptions::default()).unwrap();
        assert!(plan.concurrent.contains(&"DROP INDEX CONCURRENTLY idx;".to_string()));
        assert!(plan.concurrent.contains(&"CREATE INDEX CONCURRENTLY idx ON t (a, b);".to_string()));
        assert!(plan.transactional.is_empty());
    }

    #[test]
    fn drops_tables_no_longer_desired_with_cascade() {
        let mut current = Schema::new();
        current.tables.push(Table::new("legacy"));

        let plan = diff(&Schema::new(), &current, PlannerOptions::default()).unwrap();
        assert_eq!(plan.transactional, vec!["DROP TABLE legacy CASCADE;".to_string()]);
    }

    #[test]
    fn every_statement_ends_with_exactly_one_semicolon() {
        let mut table = Table::new("t");
        table.columns.push(Column::new("id", "INTEGER", false));
        let mut desired = Schema::new();
        desired.tables.push(table);

        let plan = diff(&desired, &Schema::new(), PlannerOptions::default()).unwrap();
        for statement in plan.transactional.iter().chain(plan.concurrent.iter()) {
            assert!(statement.ends_with(';'));
            assert!(!statement.ends_with(";;"));
        }
    }
}

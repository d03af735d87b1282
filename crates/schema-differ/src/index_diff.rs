use schema_model::Table;
use schema_sql::{render_create_index, render_drop_index};

use crate::planner::PlannerOptions;

/// Match desired vs. current indexes by name. Matching-but-different
/// indexes produce a drop-then-recreate pair; unmatched desired indexes
/// are created; unmatched current indexes are dropped.
pub fn diff_indexes(current: &Table, desired: &Table, options: &PlannerOptions) -> Vec<String> {
    let mut statements = Vec::new();

    for desired_index in &desired.indexes {
        match current.indexes.iter().find(|i| i.name == desired_index.name) {
            Some(current_index) if current_index.same_definition(desired_index) => {}
            Some(_) => {
                statements.push(render_drop_index(&desired_index.name, options.use_concurrent_drops));
                statements.push(create_statement(desired_index, options));
            }
            None => statements.push(create_statement(desired_index, options)),
        }
    }

    for current_index in &current.indexes {
        if !desired.indexes.iter().any(|i| i.name == current_index.name) {
            statements.push(render_drop_index(&current_index.name, options.use_concurrent_drops));
        }
    }

    statements
}

fn create_statement(index: &schema_model::Index, options: &PlannerOptions) -> String {
    render_create_index(index, index.concurrent || options.use_concurrent_indexes)
}

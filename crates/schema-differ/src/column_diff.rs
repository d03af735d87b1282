use schema_model::{Column, Table};
use schema_sql::{
    render_add_column, render_alter_column_type, render_drop_column, render_drop_default, render_drop_not_null,
    render_set_default, render_set_not_null,
};

use crate::pair::interleave;
use crate::type_convert::{is_nextval_default, normalize_type, target_type_for_alter, using_clause};

pub struct ColumnDiffResult {
    pub statements: Vec<String>,
    pub dropped_columns: Vec<String>,
}

/// Add/drop/modify columns, matched by name, in their interleaved order.
pub fn diff_columns(table_name: &str, current: &Table, desired: &Table) -> ColumnDiffResult {
    let mut statements = Vec::new();
    let mut dropped_columns = Vec::new();

    for pair in interleave(&current.columns, &desired.columns, |c: &Column| c.name.clone()) {
        match (pair.previous(), pair.next()) {
            (Some(existing), Some(wanted)) => {
                if columns_are_different(existing, wanted) {
                    statements.extend(modify_column(table_name, existing, wanted));
                }
            }
            (Some(existing), None) => {
                statements.push(render_drop_column(table_name, &existing.name));
                dropped_columns.push(existing.name.clone());
            }
            (None, Some(wanted)) => statements.push(render_add_column(table_name, wanted)),
            (None, None) => unreachable!("interleave never yields an empty pair"),
        }
    }

    ColumnDiffResult { statements, dropped_columns }
}

/// Two SERIAL-related exceptions aside, compares normalized type, default
/// (`null` and absent treated as equivalent), and nullability.
pub fn columns_are_different(current: &Column, desired: &Column) -> bool {
    if is_serial_exception(current, desired) {
        return current.nullable != desired.nullable;
    }

    normalize_type(&current.r#type) != normalize_type(&desired.r#type)
        || normalize_default(&current.default) != normalize_default(&desired.default)
        || current.nullable != desired.nullable
}

/// Desired `SERIAL` against a current `integer` column with a
/// `nextval(...)` default is not a type-or-default difference — that is
/// exactly what Postgres expands `SERIAL` into. Desired `INTEGER` against
/// the same current column *is* a difference: the user means to strip the
/// sequence.
fn is_serial_exception(current: &Column, desired: &Column) -> bool {
    desired.r#type.trim().eq_ignore_ascii_case("SERIAL")
        && normalize_type(&current.r#type) == "INTEGER"
        && is_nextval_default(&current.default)
}

fn normalize_default(default: &Option<String>) -> Option<String> {
    match default {
        Some(text) if text.trim().eq_ignore_ascii_case("null") => None,
        other => other.clone(),
    }
}

/// Synthesizes the minimal ordered statement sequence for a modified
/// column: drop a changing default before a type change, change the type
/// (with `USING` when required), set/drop the default, then flip
/// nullability.
fn modify_column(table_name: &str, current: &Column, desired: &Column) -> Vec<String> {
    let mut statements = Vec::new();

    let type_changing = normalize_type(&current.r#type) != normalize_type(&desired.r#type);
    let default_changing = normalize_default(&current.default) != normalize_default(&desired.default);
    let nullability_changing = current.nullable != desired.nullable;

    let mut default_already_dropped = false;
    if type_changing && current.default.is_some() && default_changing {
        statements.push(render_drop_default(table_name, &current.name));
        default_already_dropped = true;
    }

    if type_changing {
        let target = target_type_for_alter(&desired.r#type);
        let using = using_clause(&current.name, &current.r#type, &target);
        statements.push(render_alter_column_type(table_name, &current.name, &target, using.as_deref()));
    }

    if default_changing && !default_already_dropped {
        match &desired.default {
            Some(expr) => statements.push(render_set_default(table_name, &current.name, expr)),
            None => statements.push(render_drop_default(table_name, &current.name)),
        }
    }

    if nullability_changing {
        if desired.nullable {
            statements.push(render_drop_not_null(table_name, &current.name));
        } else {
            statements.push(render_set_not_null(table_name, &current.name));
        }
    }

    statements
}

use std::collections::HashSet;

use schema_model::{CheckConstraint, ForeignKeyConstraint, Table, UniqueConstraint};
use schema_sql::{
    render_add_check, render_add_foreign_key, render_add_unique, render_drop_check, render_drop_foreign_key,
    render_drop_unique,
};

/// Synthesized key for an unnamed foreign key, built from its shape. Two
/// FKs from the same columns to the same referenced table under different
/// (absent) names collide under this key; that collision is tolerated
/// rather than disambiguated further.
fn fk_key(fk: &ForeignKeyConstraint) -> String {
    fk.name.clone().unwrap_or_else(|| format!("fk_{}_{}", fk.columns.join("_"), fk.referenced_table))
}

fn unique_key(unique: &UniqueConstraint) -> String {
    unique.name.clone().unwrap_or_else(|| format!("unique_{}", unique.columns.join("_")))
}

fn check_key(check: &CheckConstraint) -> String {
    check.name.clone().unwrap_or_else(|| check.expression.clone())
}

fn named_fk(fk: &ForeignKeyConstraint, table_name: &str) -> ForeignKeyConstraint {
    if fk.name.is_some() {
        return fk.clone();
    }
    let mut named = fk.clone();
    named.name = Some(format!("fk_{table_name}_{}", fk.referenced_table));
    named
}

fn named_unique(unique: &UniqueConstraint, table_name: &str) -> UniqueConstraint {
    if unique.name.is_some() {
        return unique.clone();
    }
    let mut named = unique.clone();
    named.name = Some(format!("unique_{table_name}_{}", unique.columns.join("_")));
    named
}

fn named_check(check: &CheckConstraint, table_name: &str, counter: &mut usize) -> CheckConstraint {
    if check.name.is_some() {
        return check.clone();
    }
    *counter += 1;
    CheckConstraint {
        name: Some(format!("check_{table_name}_{counter}")),
        expression: check.expression.clone(),
    }
}

fn fk_depends_on_dropped_column(fk: &ForeignKeyConstraint, dropped: &HashSet<&str>) -> bool {
    fk.columns.iter().any(|c| dropped.contains(c.as_str()))
}

/// A difference in referenced table, columns, actions, or deferrable
/// flags triggers drop + recreate. Explicit drops are skipped when any of
/// the FK's columns is being dropped in the column-diff step, since that
/// column drop implicitly cascade-drops the FK.
pub fn diff_foreign_keys(table_name: &str, current: &Table, desired: &Table, dropped_columns: &[String]) -> Vec<String> {
    let mut statements = Vec::new();
    let dropped: HashSet<&str> = dropped_columns.iter().map(String::as_str).collect();

    for desired_fk in &desired.foreign_keys {
        let key = fk_key(desired_fk);
        match current.foreign_keys.iter().find(|fk| fk_key(fk) == key) {
            Some(current_fk) if !current_fk.differs_ignoring_name(desired_fk) => {}
            Some(current_fk) => {
                if !fk_depends_on_dropped_column(current_fk, &dropped) {
                    statements.push(drop_fk_statement(table_name, current_fk));
                }
                statements.push(render_add_foreign_key(table_name, &named_fk(desired_fk, table_name)));
            }
            None => statements.push(render_add_foreign_key(table_name, &named_fk(desired_fk, table_name))),
        }
    }

    for current_fk in &current.foreign_keys {
        let key = fk_key(current_fk);
        let still_desired = desired.foreign_keys.iter().any(|fk| fk_key(fk) == key);
        if !still_desired && !fk_depends_on_dropped_column(current_fk, &dropped) {
            statements.push(drop_fk_statement(table_name, current_fk));
        }
    }

    statements
}

fn drop_fk_statement(table_name: &str, fk: &ForeignKeyConstraint) -> String {
    let name = named_fk(fk, table_name).name.expect("named_fk always assigns a name");
    render_drop_foreign_key(table_name, &name)
}

/// Check-constraint expression changes trigger drop + recreate.
pub fn diff_checks(table_name: &str, current: &Table, desired: &Table, counter: &mut usize) -> Vec<String> {
    let mut statements = Vec::new();

    for desired_check in &desired.checks {
        let key = check_key(desired_check);
        match current.checks.iter().find(|c| check_key(c) == key) {
            Some(current_check) if current_check.expression == desired_check.expression => {}
            Some(current_check) => {
                statements.push(drop_check_statement(table_name, current_check, counter));
                statements.push(render_add_check(table_name, &named_check(desired_check, table_name, counter)));
            }
            None => statements.push(render_add_check(table_name, &named_check(desired_check, table_name, counter))),
        }
    }

    for current_check in &current.checks {
        let key = check_key(current_check);
        if !desired.checks.iter().any(|c| check_key(c) == key) {
            statements.push(drop_check_statement(table_name, current_check, counter));
        }
    }

    statements
}

fn drop_check_statement(table_name: &str, check: &CheckConstraint, counter: &mut usize) -> String {
    let name = named_check(check, table_name, counter).name.expect("named_check always assigns a name");
    render_drop_check(table_name, &name)
}

pub fn diff_uniques(table_name: &str, current: &Table, desired: &Table) -> Vec<String> {
    let mut statements = Vec::new();

    for desired_unique in &desired.uniques {
        let key = unique_key(desired_unique);
        match current.uniques.iter().find(|u| unique_key(u) == key) {
            Some(current_unique) if current_unique.columns == desired_unique.columns => {}
            Some(current_unique) => {
                statements.push(drop_unique_statement(table_name, current_unique));
                statements.push(render_add_unique(table_name, &named_unique(desired_unique, table_name)));
            }
            None => statements.push(render_add_unique(table_name, &named_unique(desired_unique, table_name))),
        }
    }

    for current_unique in &current.uniques {
        let key = unique_key(current_unique);
        if !desired.uniques.iter().any(|u| unique_key(u) == key) {
            statements.push(drop_unique_statement(table_name, current_unique));
        }
    }

    statements
}

fn drop_unique_statement(table_name: &str, unique: &UniqueConstraint) -> String {
    let name = named_unique(unique, table_name).name.expect("named_unique always assigns a name");
    render_drop_unique(table_name, &name)
}

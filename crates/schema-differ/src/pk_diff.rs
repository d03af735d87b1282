use schema_model::{PrimaryKeyConstraint, Table};
use schema_sql::{render_add_primary_key, render_drop_primary_key};

/// States: none→none (noop), none→some (add), some→none (drop),
/// some→some with the same column composition (noop), some→some with a
/// different composition (drop + add). Returns `(drops, adds)` so the
/// caller can interleave column changes between them.
pub fn diff_primary_key(table_name: &str, current: &Table, desired: &Table) -> (Vec<String>, Vec<String>) {
    let mut drops = Vec::new();
    let mut adds = Vec::new();

    match (&current.primary_key, &desired.primary_key) {
        (None, None) => {}
        (None, Some(pk)) => adds.push(render_add_primary_key(table_name, &named(table_name, pk))),
        (Some(pk), None) => drops.push(render_drop_primary_key(table_name, &current_name(table_name, pk))),
        (Some(current_pk), Some(desired_pk)) => {
            if !current_pk.same_composition(desired_pk) {
                drops.push(render_drop_primary_key(table_name, &current_name(table_name, current_pk)));
                adds.push(render_add_primary_key(table_name, &named(table_name, desired_pk)));
            }
        }
    }

    (drops, adds)
}

fn named(table_name: &str, pk: &PrimaryKeyConstraint) -> PrimaryKeyConstraint {
    match &pk.name {
        Some(_) => pk.clone(),
        None => PrimaryKeyConstraint::named(format!("pk_{table_name}"), pk.columns.clone()),
    }
}

fn current_name(table_name: &str, pk: &PrimaryKeyConstraint) -> String {
    pk.name.clone().unwrap_or_else(|| format!("pk_{table_name}"))
}

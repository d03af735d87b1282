//! Statement and fragment rendering shared by the differ's planner.
use itertools::Itertools;
use schema_model::{CheckConstraint, Column, ForeignKeyConstraint, Index, PrimaryKeyConstraint, Table, UniqueConstraint};

use crate::quote::quote_ident;

const INDENT: &str = "  ";

/// `name type [NOT NULL] [DEFAULT expr]`
pub fn render_column(column: &Column) -> String {
    let mut out = format!("{} {}", quote_ident(&column.name), column.r#type);
    if !column.nullable {
        out.push_str(" NOT NULL");
    }
    if let Some(default) = &column.default {
        out.push_str(" DEFAULT ");
        out.push_str(default);
    }
    out
}

/// `[CONSTRAINT name] PRIMARY KEY (cols)` — the table-level fragment used
/// both inline in `CREATE TABLE` and in `ADD CONSTRAINT`.
pub fn render_primary_key_fragment(pk: &PrimaryKeyConstraint) -> String {
    let cols = pk.columns.iter().map(|c| quote_ident(c)).join(", ");
    match &pk.name {
        Some(name) => format!("CONSTRAINT {} PRIMARY KEY ({cols})", quote_ident(name)),
        None => format!("PRIMARY KEY ({cols})"),
    }
}

pub fn render_unique_fragment(unique: &UniqueConstraint) -> String {
    let cols = unique.columns.iter().map(|c| quote_ident(c)).join(", ");
    match &unique.name {
        Some(name) => format!("CONSTRAINT {} UNIQUE ({cols})", quote_ident(name)),
        None => format!("UNIQUE ({cols})"),
    }
}

pub fn render_check_fragment(check: &CheckConstraint) -> String {
    match &check.name {
        Some(name) => format!("CONSTRAINT {} CHECK ({})", quote_ident(name), check.expression),
        None => format!("CHECK ({})", check.expression),
    }
}

pub fn render_foreign_key_fragment(fk: &ForeignKeyConstraint) -> String {
    let cols = fk.columns.iter().map(|c| quote_ident(c)).join(", ");
    let ref_cols = fk.referenced_columns.iter().map(|c| quote_ident(c)).join(", ");
    let mut out = match &fk.name {
        Some(name) => format!("CONSTRAINT {} FOREIGN KEY ({cols})", quote_ident(name)),
        None => format!("FOREIGN KEY ({cols})"),
    };
    out.push_str(&format!(" REFERENCES {} ({ref_cols})", quote_ident(&fk.referenced_table)));
    if let Some(action) = fk.on_delete {
        out.push_str(&format!(" ON DELETE {}", action.as_sql()));
    }
    if let Some(action) = fk.on_update {
        out.push_str(&format!(" ON UPDATE {}", action.as_sql()));
    }
    if fk.deferrable == Some(true) {
        out.push_str(" DEFERRABLE");
        if fk.initially_deferred == Some(true) {
            out.push_str(" INITIALLY DEFERRED");
        }
    }
    out
}

/// Full `CREATE TABLE` statement: columns, then an inline primary key,
/// checks, and uniques. Foreign keys are deliberately excluded — they are
/// appended afterwards as `ADD CONSTRAINT` statements so a freshly created
/// table never references a sibling table that may not exist yet.
pub fn render_create_table(table: &Table) -> String {
    let mut lines: Vec<String> = table.columns.iter().map(render_column).collect();

    if let Some(pk) = &table.primary_key {
        lines.push(render_primary_key_fragment(pk));
    }
    for check in &table.checks {
        lines.push(render_check_fragment(check));
    }
    for unique in &table.uniques {
        lines.push(render_unique_fragment(unique));
    }

    format!(
        "CREATE TABLE {} (\n{INDENT}{}\n);",
        quote_ident(&table.name),
        lines.join(&format!(",\n{INDENT}"))
    )
}

pub fn render_drop_table(table_name: &str) -> String {
    format!("DROP TABLE {} CASCADE;", quote_ident(table_name))
}

pub fn render_add_column(table: &str, column: &Column) -> String {
    format!("ALTER TABLE {} ADD COLUMN {};", quote_ident(table), render_column(column))
}

pub fn render_drop_column(table: &str, column: &str) -> String {
    format!("ALTER TABLE {} DROP COLUMN {};", quote_ident(table), quote_ident(column))
}

pub fn render_alter_column_type(table: &str, column: &str, target_type: &str, using: Option<&str>) -> String {
    let using_clause = using.map(|u| format!(" USING {u}")).unwrap_or_default();
    format!(
        "ALTER TABLE {} ALTER COLUMN {} TYPE {}{};",
        quote_ident(table),
        quote_ident(column),
        target_type,
        using_clause
    )
}

pub fn render_set_default(table: &str, column: &str, default: &str) -> String {
    format!(
        "ALTER TABLE {} ALTER COLUMN {} SET DEFAULT {};",
        quote_ident(table),
        quote_ident(column),
        default
    )
}

pub fn render_drop_default(table: &str, column: &str) -> String {
    format!(
        "ALTER TABLE {} ALTER COLUMN {} DROP DEFAULT;",
        quote_ident(table),
        quote_ident(column)
    )
}

pub fn render_set_not_null(table: &str, column: &str) -> String {
    format!(
        "ALTER TABLE {} ALTER COLUMN {} SET NOT NULL;",
        quote_ident(table),
        quote_ident(column)
    )
}

pub fn render_drop_not_null(table: &str, column: &str) -> String {
    format!(
        "ALTER TABLE {} ALTER COLUMN {} DROP NOT NULL;",
        quote_ident(table),
        quote_ident(column)
    )
}

pub fn render_add_primary_key(table: &str, pk: &PrimaryKeyConstraint) -> String {
    format!("ALTER TABLE {} ADD {};", quote_ident(table), render_primary_key_fragment(pk))
}

pub fn render_drop_primary_key(table: &str, constraint_name: &str) -> String {
    format!(
        "ALTER TABLE {} DROP CONSTRAINT {};",
        quote_ident(table),
        quote_ident(constraint_name)
    )
}

pub fn render_add_foreign_key(table: &str, fk: &ForeignKeyConstraint) -> String {
    format!("ALTER TABLE {} ADD {};", quote_ident(table), render_foreign_key_fragment(fk))
}

pub fn render_drop_foreign_key(table: &str, constraint_name: &str) -> String {
    format!(
        "ALTER TABLE {} DROP CONSTRAINT {};",
        quote_ident(table),
        quote_ident(constraint_name)
    )
}

pub fn render_add_check(table: &str, check: &CheckConstraint) -> String {
    format!("ALTER TABLE {} ADD {};", quote_ident(table), render_check_fragment(check))
}

pub fn render_drop_check(table: &str, constraint_name: &str) -> String {
    format!(
        "ALTER TABLE {} DROP CONSTRAINT {};",
        quote_ident(table),
        quote_ident(constraint_name)
    )
}

pub fn render_add_unique(table: &str, unique: &UniqueConstraint) -> String {
    format!("ALTER TABLE {} ADD {};", quote_ident(table), render_unique_fragment(unique))
}

pub fn render_drop_unique(table: &str, constraint_name: &str) -> String {
    format!(
        "ALTER TABLE {} DROP CONSTRAINT {};",
        quote_ident(table),
        quote_ident(constraint_name)
    )
}

/// `CREATE [UNIQUE] INDEX [CONCURRENTLY] name ON table [USING method]
/// (columns|expression) [WHERE ...] [WITH (k=v, ...)] [TABLESPACE ...];`
pub fn render_create_index(index: &Index, concurrently: bool) -> String {
    let mut out = String::from("CREATE ");
    if index.unique {
        out.push_str("UNIQUE ");
    }
    out.push_str("INDEX ");
    if concurrently {
        out.push_str("CONCURRENTLY ");
    }
    out.push_str(&quote_ident(&index.name));
    out.push_str(" ON ");
    out.push_str(&quote_ident(&index.table_name));

    if index.method != schema_model::IndexMethod::Btree {
        out.push_str(&format!(" USING {}", index.method.as_sql()));
    }

    let body = if let Some(expr) = &index.expression {
        format!("({expr})")
    } else {
        format!("({})", index.columns.iter().map(|c| quote_ident(c)).join(", "))
    };
    out.push(' ');
    out.push_str(&body);

    if let Some(predicate) = &index.predicate {
        out.push_str(&format!(" WHERE {predicate}"));
    }

    if !index.storage_params.is_empty() {
        let params = index
            .storage_params
            .iter()
            .map(|(k, v)| format!("{k} = {v}"))
            .join(", ");
        out.push_str(&format!(" WITH ({params})"));
    }

    if let Some(tablespace) = &index.tablespace {
        out.push_str(&format!(" TABLESPACE {}", quote_ident(tablespace)));
    }

    out.push(';');
    out
}

pub fn render_drop_index(index_name: &str, concurrently: bool) -> String {
    if concurrently {
        format!("DROP INDEX CONCURRENTLY {};", quote_ident(index_name))
    } else {
        format!("DROP INDEX {};", quote_ident(index_name))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use schema_model::Column;

    use super::*;

    #[test]
    fn renders_create_table_with_composite_primary_key() {
        let mut table = Table::new("user_roles");
        table.columns.push(Column::new("user_id", "INTEGER", false));
        table.columns.push(Column::new("role_id", "INTEGER", false));
        table.primary_key = Some(PrimaryKeyConstraint::new(vec!["user_id".into(), "role_id".into()]));

        assert_eq!(
            render_create_table(&table),
            "CREATE TABLE user_roles (\n  user_id INTEGER NOT NULL,\n  role_id INTEGER NOT NULL,\n  PRIMARY KEY (user_id, role_id)\n);"
        );
    }

    #[test]
    fn renders_create_index_concurrently() {
        let index = Index::new("idx", "t", vec!["a".into(), "b".into()]);
        assert_eq!(render_create_index(&index, true), "CREATE INDEX CONCURRENTLY idx ON t (a, b);");
    }

    #[test]
    fn renders_drop_index_concurrently() {
        assert_eq!(render_drop_index("idx", true), "DROP INDEX CONCURRENTLY idx;");
    }
}

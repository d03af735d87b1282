//! Catalog query text and row-to-model mapping, one pair per concern:
//! tables, columns, primary keys, foreign keys, checks, uniques, indexes,
//! enums. The queries are conceptual — written against the
//! `information_schema`/`pg_catalog` views for readability, not tuned for
//! a specific PostgreSQL version.

use std::collections::BTreeMap;

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use schema_model::{CheckConstraint, Column, EnumType, ForeignKeyConstraint, Index, IndexMethod, PrimaryKeyConstraint, ReferentialAction, UniqueConstraint};

use crate::connection::Row;

pub const TABLES_QUERY: &str = "SELECT table_name \
     FROM information_schema.tables \
     WHERE table_schema = current_schema() AND table_type = 'BASE TABLE' \
     ORDER BY table_name";

pub const COLUMNS_QUERY: &str = "SELECT column_name, data_type, character_maximum_length, \
            numeric_precision, numeric_scale, is_nullable, column_default \
     FROM information_schema.columns \
     WHERE table_schema = current_schema() AND table_name = $1 \
     ORDER BY ordinal_position";

pub const PRIMARY_KEYS_QUERY: &str = "SELECT tc.constraint_name, kcu.column_name \
     FROM information_schema.table_constraints tc \
     JOIN information_schema.key_column_usage kcu \
       ON tc.constraint_name = kcu.constraint_name AND tc.table_schema = kcu.table_schema \
     WHERE tc.constraint_type = 'PRIMARY KEY' AND tc.table_schema = current_schema() AND tc.table_name = $1 \
     ORDER BY kcu.ordinal_position";

pub const FOREIGN_KEYS_QUERY: &str = "SELECT tc.constraint_name, kcu.column_name AS local_column, \
            kcu.ordinal_position, ccu.table_name AS referenced_table, ccu.column_name AS referenced_column, \
            rc.update_rule, rc.delete_rule \
     FROM information_schema.table_constraints tc \
     JOIN information_schema.key_column_usage kcu \
       ON tc.constraint_name = kcu.constraint_name AND tc.table_schema = kcu.table_schema \
     JOIN information_schema.referential_constraints rc \
       ON tc.constraint_name = rc.constraint_name AND tc.table_schema = rc.constraint_schema \
     JOIN information_schema.constraint_column_usage ccu \
       ON rc.unique_constraint_name = ccu.constraint_name AND rc.unique_constraint_schema = ccu.table_schema \
     WHERE tc.constraint_type = 'FOREIGN KEY' AND tc.table_schema = current_schema() AND tc.table_name = $1 \
     ORDER BY kcu.ordinal_position";

pub const CHECK_CONSTRAINTS_QUERY: &str = "SELECT con.conname AS constraint_name, pg_get_constraintdef(con.oid) AS definition \
     FROM pg_constraint con \
     JOIN pg_class rel ON rel.oid = con.conrelid \
     WHERE con.contype = 'c' AND rel.relname = $1";

pub const UNIQUE_CONSTRAINTS_QUERY: &str = "SELECT tc.constraint_name, kcu.column_name \
     FROM information_schema.table_constraints tc \
     JOIN information_schema.key_column_usage kcu \
       ON tc.constraint_name = kcu.constraint_name AND tc.table_schema = kcu.table_schema \
     WHERE tc.constraint_type = 'UNIQUE' AND tc.table_schema = current_schema() AND tc.table_name = $1 \
     ORDER BY kcu.ordinal_position";

pub const INDEXES_QUERY: &str = "SELECT ic.relname AS index_name, am.amname AS method, idx.indisunique AS is_unique, \
            pg_get_expr(idx.indpred, idx.indrelid) AS predicate, \
            pg_get_expr(idx.indexprs, idx.indrelid) AS expression, \
            ic.reloptions AS storage_params, ts.spcname AS tablespace, \
            ARRAY(SELECT attname FROM pg_attribute \
                  WHERE attrelid = idx.indrelid AND attnum = ANY(idx.indkey) \
                  ORDER BY array_position(idx.indkey, attnum)) AS columns \
     FROM pg_index idx \
     JOIN pg_class ic ON ic.oid = idx.indexrelid \
     JOIN pg_class tc ON tc.oid = idx.indrelid \
     JOIN pg_am am ON am.oid = ic.relam \
     LEFT JOIN pg_tablespace ts ON ts.oid = ic.reltablespace \
     WHERE tc.relname = $1 AND idx.indisprimary = false \
       AND NOT EXISTS (SELECT 1 FROM pg_constraint con WHERE con.conindid = idx.indexrelid AND con.contype = 'u')";

pub const ENUMS_QUERY: &str = "SELECT t.typname AS enum_name, e.enumlabel AS value \
     FROM pg_type t \
     JOIN pg_enum e ON e.enumtypid = t.oid \
     ORDER BY t.typname, e.enumsortorder";

pub fn map_tables(rows: &[Row]) -> Vec<String> {
    rows.iter()
        .filter_map(|row| row.get("table_name").and_then(|v| v.as_str()).map(str::to_string))
        .collect()
}

pub fn map_columns(rows: &[Row]) -> Vec<Column> {
    rows.iter()
        .filter_map(|row| {
            let name = row.get("column_name")?.as_str()?.to_string();
            let data_type = row.get("data_type")?.as_str()?.to_string();
            let data_type = with_type_parameters(&data_type, row);
            let nullable = row
                .get("is_nullable")
                .and_then(|v| v.as_str())
                .map(|s| s.eq_ignore_ascii_case("YES"))
                .unwrap_or(true);
            let default = row
                .get("column_default")
                .filter(|v| !v.is_null())
                .and_then(|v| v.as_str())
                .map(str::to_string);

            let mut column = Column::new(name, data_type, nullable);
            column.default = default;
            Some(column)
        })
        .collect()
}

/// `information_schema.columns.data_type` never carries a type's length or
/// precision/scale (e.g. it reports `character varying`, not
/// `character varying(255)`) — those live in the separate
/// `character_maximum_length`/`numeric_precision`/`numeric_scale` columns
/// `COLUMNS_QUERY` selects alongside it. Append them back on so the result
/// matches what `schema-parser` produces for the same declared type, or an
/// introspected table diffs against an identical desired schema forever.
fn with_type_parameters(data_type: &str, row: &Row) -> String {
    let length = row.get("character_maximum_length").and_then(|v| v.as_int());
    if let Some(length) = length {
        return format!("{data_type}({length})");
    }

    // `numeric_precision`/`numeric_scale` are populated for every exact and
    // approximate numeric type, including plain `integer` (precision 32,
    // scale 0) — only `numeric`/`decimal` actually carry them in DDL text,
    // so restrict the suffix to those or every INTEGER column would grow a
    // spurious, un-parseable `(32,0)`.
    let is_arbitrary_precision = matches!(data_type.to_ascii_lowercase().as_str(), "numeric" | "decimal");
    if !is_arbitrary_precision {
        return data_type.to_string();
    }

    let precision = row.get("numeric_precision").and_then(|v| v.as_int());
    let scale = row.get("numeric_scale").and_then(|v| v.as_int());
    match (precision, scale) {
        (Some(precision), Some(scale)) => format!("{data_type}({precision},{scale})"),
        (Some(precision), None) => format!("{data_type}({precision})"),
        _ => data_type.to_string(),
    }
}

pub fn map_primary_key(rows: &[Row]) -> Option<PrimaryKeyConstraint> {
    if rows.is_empty() {
        return None;
    }
    let name = rows[0].get("constraint_name").and_then(|v| v.as_str()).map(str::to_string);
    let columns = rows
        .iter()
        .filter_map(|row| row.get("column_name").and_then(|v| v.as_str()).map(str::to_string))
        .collect();
    Some(PrimaryKeyConstraint { name, columns })
}

pub fn map_unique_constraints(rows: &[Row]) -> Vec<UniqueConstraint> {
    group_by_constraint_name(rows)
        .into_iter()
        .map(|(name, group)| UniqueConstraint {
            name: Some(name),
            columns: group
                .iter()
                .filter_map(|row| row.get("column_name").and_then(|v| v.as_str()).map(str::to_string))
                .collect(),
            deferrable: None,
            initially_deferred: None,
        })
        .collect()
}

pub fn map_foreign_keys(rows: &[Row]) -> Vec<ForeignKeyConstraint> {
    group_by_constraint_name(rows)
        .into_iter()
        .map(|(name, group)| {
            let columns = group
                .iter()
                .filter_map(|row| row.get("local_column").and_then(|v| v.as_str()).map(str::to_string))
                .collect();
            let referenced_columns = group
                .iter()
                .filter_map(|row| row.get("referenced_column").and_then(|v| v.as_str()).map(str::to_string))
                .collect();
            let referenced_table = group
                .first()
                .and_then(|row| row.get("referenced_table"))
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .to_string();
            let on_delete = group
                .first()
                .and_then(|row| row.get("delete_rule"))
                .and_then(|v| v.as_str())
                .and_then(ReferentialAction::parse);
            let on_update = group
                .first()
                .and_then(|row| row.get("update_rule"))
                .and_then(|v| v.as_str())
                .and_then(ReferentialAction::parse);

            ForeignKeyConstraint {
                name: Some(name),
                columns,
                referenced_table,
                referenced_columns,
                on_delete,
                on_update,
                deferrable: None,
                initially_deferred: None,
            }
        })
        .collect()
}

pub fn map_check_constraints(rows: &[Row]) -> Vec<CheckConstraint> {
    rows.iter()
        .filter_map(|row| {
            let name = row.get("constraint_name").and_then(|v| v.as_str()).map(str::to_string);
            let definition = row.get("definition").and_then(|v| v.as_str())?;
            Some(CheckConstraint {
                name,
                expression: strip_check_wrapper(definition),
            })
        })
        .collect()
}

/// `pg_get_constraintdef` returns `CHECK ((price > 0))` — strip the
/// `CHECK (...)` wrapper, leaving the bare expression text.
fn strip_check_wrapper(definition: &str) -> String {
    static CHECK_WRAPPER: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)^\s*CHECK\s*\((.*)\)\s*$").unwrap());
    CHECK_WRAPPER
        .captures(definition)
        .map(|caps| caps[1].trim().to_string())
        .unwrap_or_else(|| definition.trim().to_string())
}

pub fn map_indexes(table_name: &str, rows: &[Row]) -> Vec<Index> {
    rows.iter()
        .filter_map(|row| {
            let name = row.get("index_name")?.as_str()?.to_string();
            let method = row
                .get("method")
                .and_then(|v| v.as_str())
                .and_then(IndexMethod::parse)
                .unwrap_or_default();
            let unique = row.get("is_unique").and_then(|v| v.as_bool()).unwrap_or(false);
            let predicate = row.get("predicate").filter(|v| !v.is_null()).and_then(|v| v.as_str()).map(str::to_string);
            let expression = row
                .get("expression")
                .filter(|v| !v.is_null())
                .and_then(|v| v.as_str())
                .map(str::to_string);
            let tablespace = row
                .get("tablespace")
                .filter(|v| !v.is_null())
                .and_then(|v| v.as_str())
                .map(str::to_string);
            let storage_params = row
                .get("storage_params")
                .and_then(|v| v.as_array())
                .map(parse_reloptions)
                .unwrap_or_default();

            let columns = if expression.is_none() {
                row.get("columns")
                    .and_then(|v| v.as_array())
                    .map(|items| items.iter().filter_map(|i| i.as_str().map(str::to_string)).collect())
                    .unwrap_or_default()
            } else {
                Vec::new()
            };

            Some(Index {
                name,
                table_name: table_name.to_string(),
                columns,
                method,
                unique,
                concurrent: false,
                predicate,
                expression,
                storage_params,
                tablespace,
            })
        })
        .collect()
}

/// `reloptions` comes back from the catalog as an array of `key=value`
/// text tokens (e.g. `{fillfactor=70}`).
fn parse_reloptions(tokens: &[crate::SqlValue]) -> IndexMap<String, String> {
    let mut params = IndexMap::new();
    for token in tokens {
        if let Some(text) = token.as_str() {
            if let Some((key, value)) = text.split_once('=') {
                params.insert(key.trim().to_string(), value.trim().to_string());
            }
        }
    }
    params
}

pub fn map_enums(rows: &[Row]) -> Vec<EnumType> {
    let mut grouped: IndexMap<String, Vec<String>> = IndexMap::new();
    for row in rows {
        let Some(name) = row.get("enum_name").and_then(|v| v.as_str()) else { continue };
        let Some(value) = row.get("value").and_then(|v| v.as_str()) else { continue };
        grouped.entry(name.to_string()).or_default().push(value.to_string());
    }
    grouped.into_iter().map(|(name, values)| EnumType { name, values }).collect()
}

/// Groups rows by `constraint_name`, preserving the original row order
/// within each group (the caller has already ordered rows by column
/// position) as well as first-seen group order.
fn group_by_constraint_name<'a>(rows: &'a [Row]) -> Vec<(String, Vec<&'a Row>)> {
    let mut order: Vec<String> = Vec::new();
    let mut groups: BTreeMap<String, Vec<&Row>> = BTreeMap::new();

    for row in rows {
        let Some(name) = row.get("constraint_name").and_then(|v| v.as_str()) else { continue };
        if !groups.contains_key(name) {
            order.push(name.to_string());
        }
        groups.entry(name.to_string()).or_default().push(row);
    }

    order
        .into_iter()
        .map(|name| {
            let group = groups.remove(&name).unwrap_or_default();
            (name, group)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn strips_check_wrapper() {
        assert_eq!(strip_check_wrapper("CHECK ((price > 0))"), "(price > 0)");
    }

    #[test]
    fn parses_reloptions_tokens() {
        let tokens = vec![crate::SqlValue::Text("fillfactor=70".to_string())];
        let params = parse_reloptions(&tokens);
        assert_eq!(params.get("fillfactor").map(String::as_str), Some("70"));
    }

    fn column_row(data_type: &str, length: Option<i64>, precision: Option<i64>, scale: Option<i64>) -> Row {
        let mut row = Row::new();
        row.insert("column_name".to_string(), crate::SqlValue::Text("c".to_string()));
        row.insert("data_type".to_string(), crate::SqlValue::Text(data_type.to_string()));
        row.insert(
            "character_maximum_length".to_string(),
            length.map(crate::SqlValue::Int).unwrap_or(crate::SqlValue::Null),
        );
        row.insert(
            "numeric_precision".to_string(),
            precision.map(crate::SqlValue::Int).unwrap_or(crate::SqlValue::Null),
        );
        row.insert(
            "numeric_scale".to_string(),
            scale.map(crate::SqlValue::Int).unwrap_or(crate::SqlValue::Null),
        );
        row.insert("is_nullable".to_string(), crate::SqlValue::Text("YES".to_string()));
        row.insert("column_default".to_string(), crate::SqlValue::Null);
        row
    }

    #[test]
    fn preserves_character_varying_length() {
        let rows = vec![column_row("character varying", Some(255), None, None)];
        let columns = map_columns(&rows);
        assert_eq!(columns[0].r#type, "character varying(255)");
    }

    #[test]
    fn preserves_numeric_precision_and_scale() {
        let rows = vec![column_row("numeric", None, Some(10), Some(2))];
        let columns = map_columns(&rows);
        assert_eq!(columns[0].r#type, "numeric(10,2)");
    }

    #[test]
    fn plain_integer_precision_is_not_appended() {
        let rows = vec![column_row("integer", None, Some(32), Some(0))];
        let columns = map_columns(&rows);
        assert_eq!(columns[0].r#type, "integer");
    }
}

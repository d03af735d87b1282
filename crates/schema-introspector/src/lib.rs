//! Reads the live catalog of a PostgreSQL database, through an injected
//! [`DatabaseConnection`], into a [`schema_model::Schema`] — the same
//! normalized model [`schema_parser`](../schema_parser) produces from DDL
//! text, so the differ can compare the two without caring where either side
//! came from.

mod catalog;
mod connection;
mod error;

use schema_model::Schema;

pub use connection::{DatabaseConnection, Row, SqlValue};
pub use error::IntrospectError;

/// Introspects every base table, its columns, constraints and indexes, and
/// every enum type, in the connection's current schema, and assembles the
/// result into a [`Schema`].
///
/// Queries run one table at a time (mirroring how the describer this crate
/// is descended from works): first enumerate table names, then issue the
/// per-concern queries against each table in turn.
pub fn introspect(conn: &dyn DatabaseConnection) -> Result<Schema, IntrospectError> {
    let mut schema = Schema::new();

    let table_rows = run(conn, catalog::TABLES_QUERY, &[])?;
    for table_name in catalog::map_tables(&table_rows) {
        schema.tables.push(introspect_table(conn, &table_name)?);
    }

    let enum_rows = run(conn, catalog::ENUMS_QUERY, &[])?;
    schema.enums = catalog::map_enums(&enum_rows);

    schema.validate()?;
    Ok(schema)
}

fn introspect_table(conn: &dyn DatabaseConnection, table_name: &str) -> Result<schema_model::Table, IntrospectError> {
    let param = [SqlValue::from(table_name)];

    let mut table = schema_model::Table::new(table_name);
    table.columns = catalog::map_columns(&run(conn, catalog::COLUMNS_QUERY, &param)?);
    table.primary_key = catalog::map_primary_key(&run(conn, catalog::PRIMARY_KEYS_QUERY, &param)?);
    table.foreign_keys = catalog::map_foreign_keys(&run(conn, catalog::FOREIGN_KEYS_QUERY, &param)?);
    table.checks = catalog::map_check_constraints(&run(conn, catalog::CHECK_CONSTRAINTS_QUERY, &param)?);
    table.uniques = catalog::map_unique_constraints(&run(conn, catalog::UNIQUE_CONSTRAINTS_QUERY, &param)?);
    table.indexes = catalog::map_indexes(table_name, &run(conn, catalog::INDEXES_QUERY, &param)?);

    Ok(table)
}

fn run(conn: &dyn DatabaseConnection, query: &'static str, params: &[SqlValue]) -> Result<Vec<Row>, IntrospectError> {
    conn.query(query, params).map_err(|err| match err {
        IntrospectError::QueryFailed { message, .. } => IntrospectError::QueryFailed { query, message },
        other => other,
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use indexmap::IndexMap;

    use super::*;

    /// An in-memory stand-in for a live connection: keyed by the exact
    /// query text, so tests wire up canned rows per catalog query.
    struct FakeConnection {
        responses: HashMap<&'static str, Vec<Row>>,
    }

    impl DatabaseConnection for FakeConnection {
        fn query(&self, sql: &str, _params: &[SqlValue]) -> Result<Vec<Row>, IntrospectError> {
            Ok(self.responses.get(sql).cloned().unwrap_or_default())
        }
    }

    fn row(pairs: &[(&str, SqlValue)]) -> Row {
        let mut row = IndexMap::new();
        for (key, value) in pairs {
            row.insert(key.to_string(), value.clone());
        }
        row
    }

    #[test]
    fn introspects_a_single_table_with_primary_key() {
        let mut responses = HashMap::new();
        responses.insert(
            catalog::TABLES_QUERY,
            vec![row(&[("table_name", SqlValue::from("users"))])],
        );
        responses.insert(
            catalog::COLUMNS_QUERY,
            vec![
                row(&[
                    ("column_name", SqlValue::from("id")),
                    ("data_type", SqlValue::from("integer")),
                    ("is_nullable", SqlValue::from("NO")),
                    ("column_default", SqlValue::Null),
                ]),
                row(&[
                    ("column_name", SqlValue::from("email")),
                    ("data_type", SqlValue::from("text")),
                    ("is_nullable", SqlValue::from("YES")),
                    ("column_default", SqlValue::Null),
                ]),
            ],
        );
        responses.insert(
            catalog::PRIMARY_KEYS_QUERY,
            vec![row(&[
                ("constraint_name", SqlValue::from("users_pkey")),
                ("column_name", SqlValue::from("id")),
            ])],
        );

        let conn = FakeConnection { responses };
        let schema = introspect(&conn).unwrap();

        assert_eq!(schema.tables.len(), 1);
        let users = schema.table("users").unwrap();
        assert_eq!(users.columns.len(), 2);
        assert!(!users.columns[0].nullable);
        assert!(users.columns[1].nullable);
        assert_eq!(users.primary_key.as_ref().unwrap().columns, vec!["id".to_string()]);
    }

    #[test]
    fn introspects_foreign_keys_grouped_by_constraint_name() {
        let mut responses = HashMap::new();
        responses.insert(
            catalog::TABLES_QUERY,
            vec![row(&[("table_name", SqlValue::from("orders"))])],
        );
        responses.insert(catalog::COLUMNS_QUERY, vec![]);
        responses.insert(
            catalog::FOREIGN_KEYS_QUERY,
            vec![row(&[
                ("constraint_name", SqlValue::from("orders_user_id_fkey")),
                ("local_column", SqlValue::from("user_id")),
                ("referenced_table", SqlValue::from("users")),
                ("referenced_column", SqlValue::from("id")),
                ("delete_rule", SqlValue::from("CASCADE")),
                ("update_rule", SqlValue::from("NO ACTION")),
            ])],
        );

        let conn = FakeConnection { responses };
        let schema = introspect(&conn).unwrap();

        let orders = schema.table("orders").unwrap();
        assert_eq!(orders.foreign_keys.len(), 1);
        let fk = &orders.foreign_keys[0];
        assert_eq!(fk.referenced_table, "users");
        assert_eq!(fk.on_delete, Some(schema_model::ReferentialAction::Cascade));
        assert_eq!(fk.on_update, None);
    }

    #[test]
    fn introspects_enums_grouped_and_sorted() {
        let mut responses = HashMap::new();
        responses.insert(catalog::TABLES_QUERY, vec![]);
        responses.insert(
            catalog::ENUMS_QUERY,
            vec![
                row(&[("enum_name", SqlValue::from("status")), ("value", SqlValue::from("active"))]),
                row(&[("enum_name", SqlValue::from("status")), ("value", SqlValue::from("inactive"))]),
            ],
        );

        let conn = FakeConnection { responses };
        let schema = introspect(&conn).unwrap();

        assert_eq!(schema.enums.len(), 1);
        assert_eq!(schema.enums[0].name, "status");
        assert_eq!(schema.enums[0].values, vec!["active".to_string(), "inactive".to_string()]);
    }

    #[test]
    fn introspects_index_with_storage_params_and_predicate() {
        let mut responses = HashMap::new();
        responses.insert(
            catalog::TABLES_QUERY,
            vec![row(&[("table_name", SqlValue::from("events"))])],
        );
        responses.insert(catalog::COLUMNS_QUERY, vec![]);
        responses.insert(
            catalog::INDEXES_QUERY,
            vec![row(&[
                ("index_name", SqlValue::from("idx_events_active")),
                ("method", SqlValue::from("btree")),
                ("is_unique", SqlValue::from(false)),
                ("predicate", SqlValue::from("active = true")),
                ("expression", SqlValue::Null),
                (
                    "storage_params",
                    SqlValue::Array(vec![SqlValue::from("fillfactor=70")]),
                ),
                ("tablespace", SqlValue::Null),
                ("columns", SqlValue::Array(vec![SqlValue::from("id")])),
            ])],
        );

        let conn = FakeConnection { responses };
        let schema = introspect(&conn).unwrap();

        let index = &schema.table("events").unwrap().indexes[0];
        assert_eq!(index.predicate.as_deref(), Some("active = true"));
        assert_eq!(index.storage_params.get("fillfactor").map(String::as_str), Some("70"));
        assert_eq!(index.columns, vec!["id".to_string()]);
    }
}

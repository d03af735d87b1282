//! Parses PostgreSQL DDL text (`CREATE TABLE`, `CREATE INDEX`,
//! `CREATE TYPE ... AS ENUM`) into a [`schema_model::Schema`].
//!
//! Imperative DDL (`ALTER TABLE`, `DROP TABLE`, `DROP INDEX`) is rejected:
//! this pipeline is declarative, so callers describe the desired end state
//! and never how to get there.

mod error;
mod extract;

use schema_model::Schema;
use sqlparser::ast::Statement;
use sqlparser::dialect::PostgreSqlDialect;
use sqlparser::parser::Parser;

pub use error::ParseError;
pub use extract::column::normalize_type_name;

/// The result of a successful parse: the schema plus any non-fatal
/// warnings collected along the way (unknown expression shapes, PK
/// conflicts, dangling index references).
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedSchema {
    pub schema: Schema,
    pub warnings: Vec<String>,
}

/// Strips a leading `schema.` qualifier matching `default_schema` from an
/// already-rendered name. Names qualified with any other schema, or
/// unqualified names, pass through unchanged.
pub(crate) fn strip_schema_qualifier(name: &str, default_schema: Option<&str>) -> String {
    match (default_schema, name.split_once('.')) {
        (Some(schema), Some((prefix, rest))) if prefix.eq_ignore_ascii_case(schema) => rest.to_string(),
        _ => name.to_string(),
    }
}

pub fn parse_ddl(sql: &str) -> Result<ParsedSchema, ParseError> {
    parse_ddl_with_schema(sql, None)
}

/// Parses DDL the same way [`parse_ddl`] does, additionally stripping a
/// `default_schema` qualifier (e.g. `public.`) from table, type, and
/// foreign-key target names before they enter the unqualified
/// [`schema_model::Schema`].
pub fn parse_ddl_with_schema(sql: &str, default_schema: Option<&str>) -> Result<ParsedSchema, ParseError> {
    let statements = Parser::parse_sql(&PostgreSqlDialect {}, sql)?;

    let mut schema = Schema::new();
    let mut warnings = Vec::new();
    let mut pending_indexes = Vec::new();

    for statement in statements {
        match statement {
            Statement::CreateTable(create_table) => {
                let table = extract::table::extract_create_table(&create_table, default_schema, &mut warnings)?;
                schema.tables.push(table);
            }
            Statement::CreateIndex(create_index) => {
                pending_indexes.push(extract::index::extract_create_index(&create_index, default_schema, &mut warnings));
            }
            Statement::CreateType { name, representation } => {
                schema
                    .enums
                    .push(extract::enum_type::extract_create_type_enum(&name, default_schema, &representation)?);
            }
            Statement::AlterTable { .. } => {
                return Err(ParseError::UnsupportedStatement(
                    "ALTER TABLE is not supported in declarative schema".to_string(),
                ))
            }
            Statement::Drop { object_type, .. } => {
                return Err(ParseError::UnsupportedStatement(format!(
                    "DROP {object_type:?} is not supported in declarative schema"
                )))
            }
            other => {
                return Err(ParseError::UnsupportedStatement(format!(
                    "{other} is not supported in declarative schema"
                )))
            }
        }
    }

    for index in pending_indexes {
        match schema.tables.iter_mut().find(|t| t.name == index.table_name) {
            Some(table) => table.indexes.push(index),
            None => warnings.push(format!(
                "index `{}` references table `{}`, which this DDL never declares; dropping it",
                index.name, index.table_name
            )),
        }
    }

    schema.validate()?;

    Ok(ParsedSchema { schema, warnings })
}

#[cfg(test)]
mod tests {
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn parses_table_with_composite_primary_key() {
        let parsed = parse_ddl("CREATE TABLE user_roles (user_id INTEGER, role_id INTEGER, PRIMARY KEY (user_id, role_id));").unwrap();
        assert_eq!(parsed.schema.tables.len(), 1);
        let table = &parsed.schema.tables[0];
        assert_eq!(table.name, "user_roles");
        assert!(!table.columns[0].nullable);
        assert_eq!(
            table.primary_key.as_ref().unwrap().columns,
            vec!["user_id".to_string(), "role_id".to_string()]
        );
    }

    #[test]
    fn rejects_alter_table() {
        let err = parse_ddl("ALTER TABLE foo ADD COLUMN bar INTEGER;").unwrap_err();
        assert!(matches!(err, ParseError::UnsupportedStatement(_)));
    }

    #[test]
    fn rejects_drop_table() {
        let err = parse_ddl("DROP TABLE foo;").unwrap_err();
        assert!(matches!(err, ParseError::UnsupportedStatement(_)));
    }

    #[test]
    fn rejects_empty_enum() {
        let err = parse_ddl("CREATE TYPE status AS ENUM ();");
        assert!(err.is_err());
    }

    #[test]
    fn parses_enum_type() {
        let parsed = parse_ddl("CREATE TYPE status AS ENUM ('active', 'inactive');").unwrap();
        assert_eq!(parsed.schema.enums.len(), 1);
        assert_eq!(parsed.schema.enums[0].values, vec!["active".to_string(), "inactive".to_string()]);
    }

    #[test]
    fn table_level_primary_key_wins_over_column_level() {
        let parsed = parse_ddl(
            "CREATE TABLE t (id INTEGER PRIMARY KEY, other INTEGER, CONSTRAINT pk_t PRIMARY KEY (other));",
        )
        .unwrap();
        assert_eq!(parsed.schema.tables[0].primary_key.as_ref().unwrap().columns, vec!["other".to_string()]);
        assert!(!parsed.warnings.is_empty());
    }

    #[test]
    fn parses_foreign_key_and_index() {
        let parsed = parse_ddl(indoc! {"
            CREATE TABLE users (id INTEGER PRIMARY KEY);
            CREATE TABLE orders (id INTEGER PRIMARY KEY, user_id INTEGER REFERENCES users(id));
            CREATE INDEX idx_orders_user_id ON orders (user_id);
        "})
        .unwrap();

        let orders = parsed.schema.table("orders").unwrap();
        assert_eq!(orders.foreign_keys[0].referenced_table, "users");
        assert_eq!(orders.indexes[0].columns, vec!["user_id".to_string()]);
    }

    #[test]
    fn strips_the_default_schema_qualifier_from_table_and_fk_names() {
        let parsed = parse_ddl_with_schema(
            "CREATE TABLE public.users (id INTEGER PRIMARY KEY);\n\
             CREATE TABLE public.orders (id INTEGER PRIMARY KEY, user_id INTEGER REFERENCES public.users(id));",
            Some("public"),
        )
        .unwrap();

        assert!(parsed.schema.has_table("users"));
        let orders = parsed.schema.table("orders").unwrap();
        assert_eq!(orders.foreign_keys[0].referenced_table, "users");
    }

    #[test]
    fn leaves_names_qualified_with_a_different_schema_untouched() {
        let parsed =
            parse_ddl_with_schema("CREATE TABLE audit.events (id INTEGER PRIMARY KEY);", Some("public")).unwrap();
        assert!(parsed.schema.has_table("audit.events"));
    }
}

use schema_model::Column;
use schema_sql::serialize_expr;
use sqlparser::ast::{ColumnDef, ColumnOption, GeneratedAs};

/// Renders a `DataType` as an uppercased type name with any parameters
/// joined by comma inside parentheses.
pub fn normalize_type_name(data_type: &sqlparser::ast::DataType) -> String {
    data_type.to_string().to_ascii_uppercase()
}

fn is_identity_column(column: &ColumnDef) -> bool {
    column.options.iter().any(|opt| {
        matches!(
            &opt.option,
            ColumnOption::Generated { generated_as: GeneratedAs::Always | GeneratedAs::ByDefault, .. }
        )
    })
}

/// Extracts name, type, nullability, and default from a `ColumnDef`. A
/// column is nullable unless it carries `NOT NULL` or `PRIMARY KEY`
/// (column-level constraints, which imply non-null, are read alongside this
/// by [`crate::extract::constraint::column_level_primary_key`]).
///
/// `GENERATED ALWAYS|BY DEFAULT AS IDENTITY` columns get no explicit
/// `DEFAULT` clause in Postgres DDL, but behave like `SERIAL` underneath: a
/// sequence-backed default is synthesized here (`nextval(...)`) so the
/// differ's SERIAL/`nextval` equivalence rule covers both spellings.
pub fn extract_column(column: &ColumnDef, table_name: &str, warnings: &mut Vec<String>) -> Column {
    let has_not_null = column
        .options
        .iter()
        .any(|opt| matches!(opt.option, ColumnOption::NotNull));

    let is_inline_primary_key = column.options.iter().any(|opt| {
        matches!(
            opt.option,
            ColumnOption::Unique { is_primary: true, .. }
        )
    });

    let default = column.options.iter().find_map(|opt| match &opt.option {
        ColumnOption::Default(expr) => Some(serialize_expr(expr, warnings)),
        _ => None,
    });

    let default = default.or_else(|| {
        is_identity_column(column).then(|| format!("nextval('{table_name}_{}_seq'::regclass)", column.name.value))
    });

    let mut col = Column::new(
        column.name.value.clone(),
        normalize_type_name(&column.data_type),
        !has_not_null && !is_inline_primary_key,
    );
    col.default = default;
    col
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlparser::dialect::PostgreSqlDialect;
    use sqlparser::parser::Parser;

    fn parse_column(sql: &str) -> ColumnDef {
        let statements = Parser::parse_sql(&PostgreSqlDialect {}, sql).unwrap();
        match &statements[0] {
            sqlparser::ast::Statement::CreateTable(create_table) => create_table.columns[0].clone(),
            other => panic!("expected CREATE TABLE, got {other:?}"),
        }
    }

    #[test]
    fn identity_column_gets_a_sequence_default() {
        let column = parse_column("CREATE TABLE t (id INTEGER GENERATED ALWAYS AS IDENTITY);");
        let mut warnings = Vec::new();
        let extracted = extract_column(&column, "t", &mut warnings);
        assert_eq!(extracted.default.as_deref(), Some("nextval('t_id_seq'::regclass)"));
    }

    #[test]
    fn plain_column_has_no_default() {
        let column = parse_column("CREATE TABLE t (name TEXT);");
        let mut warnings = Vec::new();
        let extracted = extract_column(&column, "t", &mut warnings);
        assert!(extracted.default.is_none());
    }
}

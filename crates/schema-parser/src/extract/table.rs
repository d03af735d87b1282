use schema_model::Table;
use sqlparser::ast::CreateTable;

use super::column::extract_column;
use super::constraint::{
    column_level_check, column_level_foreign_key, column_level_primary_key, column_level_unique,
    table_constraint_check, table_constraint_foreign_key, table_constraint_primary_key, table_constraint_unique,
};
use crate::error::ParseError;
use crate::strip_schema_qualifier;

pub fn extract_create_table(
    create_table: &CreateTable,
    default_schema: Option<&str>,
    warnings: &mut Vec<String>,
) -> Result<Table, ParseError> {
    let name = strip_schema_qualifier(&create_table.name.to_string(), default_schema);
    let mut table = Table::new(name.clone());

    for column in &create_table.columns {
        table.columns.push(extract_column(column, &name, warnings));

        if let Some(fk) = column_level_foreign_key(column, default_schema) {
            table.foreign_keys.push(fk);
        }
        if let Some(check) = column_level_check(column, warnings) {
            table.checks.push(check);
        }
        if let Some(unique) = column_level_unique(column) {
            table.uniques.push(unique);
        }
    }

    let column_level_pk = create_table.columns.iter().find_map(column_level_primary_key);
    let table_level_pk = create_table.constraints.iter().find_map(table_constraint_primary_key);

    table.primary_key = match (column_level_pk, table_level_pk) {
        (Some(_), Some(table_level)) => {
            warnings.push(format!(
                "table `{}` has both a column-level and a table-level PRIMARY KEY; using the table-level definition",
                table.name
            ));
            Some(table_level)
        }
        (Some(column_level), None) => Some(column_level),
        (None, Some(table_level)) => Some(table_level),
        (None, None) => None,
    };

    for constraint in &create_table.constraints {
        if let Some(fk) = table_constraint_foreign_key(constraint, default_schema) {
            table.foreign_keys.push(fk);
        }
        if let Some(check) = table_constraint_check(constraint, warnings) {
            table.checks.push(check);
        }
        if let Some(unique) = table_constraint_unique(constraint) {
            table.uniques.push(unique);
        }
    }

    Ok(table)
}

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::{EnumType, ModelError, Table};

/// An ordered collection of tables plus a collection of enum types.
///
/// `Schema` values are produced by the parser or the introspector and are
/// immutable once returned: the differ takes two `&Schema` references and
/// never mutates either.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Schema {
    pub tables: Vec<Table>,
    pub enums: Vec<EnumType>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.name == name)
    }

    pub fn has_table(&self, name: &str) -> bool {
        self.table(name).is_some()
    }

    pub fn r#enum(&self, name: &str) -> Option<&EnumType> {
        self.enums.iter().find(|e| e.name == name)
    }

    /// Checks the structural invariants every schema must hold:
    ///
    /// 1. every index's `table_name` references an existing table,
    /// 2. an index has columns xor an expression, never both non-empty,
    /// 3. enum types have at least one value,
    /// 4. column names and constraint names are unique within a table,
    /// 5. foreign-key column counts match referenced-column counts.
    ///
    /// A table having at most one primary key isn't checked here — it's
    /// structurally guaranteed by `Table::primary_key` being a single
    /// `Option<PrimaryKeyConstraint>` rather than a collection.
    pub fn validate(&self) -> Result<(), ModelError> {
        for e in &self.enums {
            if e.values.is_empty() {
                return Err(ModelError::EmptyEnum(e.name.clone()));
            }
        }

        for table in &self.tables {
            let mut seen_columns = HashSet::new();
            for column in &table.columns {
                if !seen_columns.insert(column.name.as_str()) {
                    return Err(ModelError::DuplicateColumn {
                        table: table.name.clone(),
                        column: column.name.clone(),
                    });
                }
            }

            let mut seen_constraint_names = HashSet::new();
            let mut note_name = |name: &Option<String>| -> Result<(), ModelError> {
                if let Some(name) = name {
                    if !seen_constraint_names.insert(name.clone()) {
                        return Err(ModelError::DuplicateConstraintName(name.clone(), table.name.clone()));
                    }
                }
                Ok(())
            };

            if let Some(pk) = &table.primary_key {
                note_name(&pk.name)?;
            }
            for fk in &table.foreign_keys {
                note_name(&fk.name)?;
                if fk.columns.len() != fk.referenced_columns.len() {
                    return Err(ModelError::ForeignKeyColumnCountMismatch {
                        table: table.name.clone(),
                        name: fk.name.clone().unwrap_or_else(|| format!("fk_{}_{}", table.name, fk.referenced_table)),
                        local: fk.columns.len(),
                        referenced: fk.referenced_columns.len(),
                    });
                }
            }
            for check in &table.checks {
                note_name(&check.name)?;
            }
            for unique in &table.uniques {
                note_name(&unique.name)?;
            }

            for index in &table.indexes {
                if !self.has_table(&index.table_name) {
                    return Err(ModelError::IndexReferencesUnknownTable {
                        index: index.name.clone(),
                        table: index.table_name.clone(),
                    });
                }

                let has_columns = !index.columns.is_empty();
                let has_expression = index.expression.is_some();
                if has_columns == has_expression {
                    return Err(ModelError::IndexHasColumnsAndExpression(index.name.clone()));
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{Column, ForeignKeyConstraint, Index, PrimaryKeyConstraint};

    #[test]
    fn empty_schema_is_valid() {
        assert!(Schema::new().validate().is_ok());
    }

    #[test]
    fn empty_enum_is_rejected() {
        let mut schema = Schema::new();
        schema.enums.push(EnumType::new("status", vec![]));
        assert_eq!(schema.validate(), Err(ModelError::EmptyEnum("status".into())));
    }

    #[test]
    fn index_referencing_unknown_table_is_rejected() {
        let mut schema = Schema::new();
        let mut table = Table::new("users");
        table.indexes.push(Index::new("idx_missing", "ghosts", vec!["id".into()]));
        schema.tables.push(table);

        assert_eq!(
            schema.validate(),
            Err(ModelError::IndexReferencesUnknownTable {
                index: "idx_missing".into(),
                table: "ghosts".into(),
            })
        );
    }

    #[test]
    fn index_with_both_columns_and_expression_is_rejected() {
        let mut schema = Schema::new();
        let mut table = Table::new("users");
        let mut index = Index::new("idx_both", "users", vec!["id".into()]);
        index.expression = Some("lower(email)".into());
        table.indexes.push(index);
        schema.tables.push(table);

        assert_eq!(
            schema.validate(),
            Err(ModelError::IndexHasColumnsAndExpression("idx_both".into()))
        );
    }

    #[test]
    fn duplicate_column_name_is_rejected() {
        let mut schema = Schema::new();
        let mut table = Table::new("users");
        table.columns.push(Column::new("id", "INTEGER", false));
        table.columns.push(Column::new("id", "TEXT", true));
        schema.tables.push(table);

        assert_eq!(
            schema.validate(),
            Err(ModelError::DuplicateColumn {
                table: "users".into(),
                column: "id".into(),
            })
        );
    }

    #[test]
    fn fk_column_count_mismatch_is_rejected() {
        let mut schema = Schema::new();
        let mut users = Table::new("users");
        users.columns.push(Column::new("id", "INTEGER", false));
        schema.tables.push(users);

        let mut orders = Table::new("orders");
        orders.foreign_keys.push(ForeignKeyConstraint::new(
            vec!["user_id".into(), "user_region".into()],
            "users",
            vec!["id".into()],
        ));
        schema.tables.push(orders);

        assert!(matches!(
            schema.validate(),
            Err(ModelError::ForeignKeyColumnCountMismatch { .. })
        ));
    }

    #[test]
    fn primary_key_equality_ignores_name() {
        let a = PrimaryKeyConstraint::named("pk_a", vec!["id".into()]);
        let b = PrimaryKeyConstraint::named("pk_b", vec!["id".into()]);
        assert_eq!(a, b);
    }
}

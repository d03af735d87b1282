use schema_model::{CheckConstraint, ForeignKeyConstraint, PrimaryKeyConstraint, ReferentialAction, UniqueConstraint};
use schema_sql::serialize_expr;
use sqlparser::ast::{ColumnDef, ColumnOption, TableConstraint};

use crate::strip_schema_qualifier;

fn map_action(action: &sqlparser::ast::ReferentialAction) -> Option<ReferentialAction> {
    use sqlparser::ast::ReferentialAction as Pg;
    match action {
        Pg::Cascade => Some(ReferentialAction::Cascade),
        Pg::Restrict => Some(ReferentialAction::Restrict),
        Pg::SetNull => Some(ReferentialAction::SetNull),
        Pg::SetDefault => Some(ReferentialAction::SetDefault),
        Pg::NoAction => None,
    }
}

pub fn column_level_primary_key(column: &ColumnDef) -> Option<PrimaryKeyConstraint> {
    column.options.iter().find_map(|opt| match &opt.option {
        ColumnOption::Unique { is_primary: true, .. } => Some(PrimaryKeyConstraint {
            name: opt.name.as_ref().map(|n| n.value.clone()),
            columns: vec![column.name.value.clone()],
        }),
        _ => None,
    })
}

pub fn column_level_unique(column: &ColumnDef) -> Option<UniqueConstraint> {
    column.options.iter().find_map(|opt| match &opt.option {
        ColumnOption::Unique { is_primary: false, .. } => Some(UniqueConstraint {
            name: Some(opt.name.as_ref().map(|n| n.value.clone()).unwrap_or_else(|| format!("{}_unique", column.name.value))),
            columns: vec![column.name.value.clone()],
            deferrable: None,
            initially_deferred: None,
        }),
        _ => None,
    })
}

pub fn column_level_check(column: &ColumnDef, warnings: &mut Vec<String>) -> Option<CheckConstraint> {
    column.options.iter().find_map(|opt| match &opt.option {
        ColumnOption::Check(expr) => Some(CheckConstraint {
            name: Some(
                opt.name
                    .as_ref()
                    .map(|n| n.value.clone())
                    .unwrap_or_else(|| format!("{}_check", column.name.value)),
            ),
            expression: serialize_expr(expr, warnings),
        }),
        _ => None,
    })
}

pub fn column_level_foreign_key(column: &ColumnDef, default_schema: Option<&str>) -> Option<ForeignKeyConstraint> {
    column.options.iter().find_map(|opt| match &opt.option {
        ColumnOption::ForeignKey {
            foreign_table,
            referred_columns,
            on_delete,
            on_update,
            ..
        } => Some(ForeignKeyConstraint {
            name: opt.name.as_ref().map(|n| n.value.clone()),
            columns: vec![column.name.value.clone()],
            referenced_table: strip_schema_qualifier(&foreign_table.to_string(), default_schema),
            referenced_columns: referred_columns.iter().map(|c| c.value.clone()).collect(),
            on_delete: on_delete.as_ref().and_then(map_action),
            on_update: on_update.as_ref().and_then(map_action),
            deferrable: None,
            initially_deferred: None,
        }),
        _ => None,
    })
}

pub fn table_constraint_primary_key(constraint: &TableConstraint) -> Option<PrimaryKeyConstraint> {
    match constraint {
        TableConstraint::PrimaryKey { name, columns, .. } => Some(PrimaryKeyConstraint {
            name: name.as_ref().map(|n| n.value.clone()),
            columns: columns.iter().map(|c| c.to_string()).collect(),
        }),
        _ => None,
    }
}

pub fn table_constraint_foreign_key(
    constraint: &TableConstraint,
    default_schema: Option<&str>,
) -> Option<ForeignKeyConstraint> {
    match constraint {
        TableConstraint::ForeignKey {
            name,
            columns,
            foreign_table,
            referred_columns,
            on_delete,
            on_update,
            ..
        } => Some(ForeignKeyConstraint {
            name: name.as_ref().map(|n| n.value.clone()),
            columns: columns.iter().map(|c| c.to_string()).collect(),
            referenced_table: strip_schema_qualifier(&foreign_table.to_string(), default_schema),
            referenced_columns: referred_columns.iter().map(|c| c.to_string()).collect(),
            on_delete: on_delete.as_ref().and_then(map_action),
            on_update: on_update.as_ref().and_then(map_action),
            deferrable: None,
            initially_deferred: None,
        }),
        _ => None,
    }
}

pub fn table_constraint_unique(constraint: &TableConstraint) -> Option<UniqueConstraint> {
    match constraint {
        TableConstraint::Unique { name, columns, .. } => Some(UniqueConstraint {
            name: name.as_ref().map(|n| n.value.clone()),
            columns: columns.iter().map(|c| c.to_string()).collect(),
            deferrable: None,
            initially_deferred: None,
        }),
        _ => None,
    }
}

pub fn table_constraint_check(constraint: &TableConstraint, warnings: &mut Vec<String>) -> Option<CheckConstraint> {
    match constraint {
        TableConstraint::Check { name, expr, .. } => Some(CheckConstraint {
            name: name.as_ref().map(|n| n.value.clone()),
            expression: serialize_expr(expr, warnings),
        }),
        _ => None,
    }
}

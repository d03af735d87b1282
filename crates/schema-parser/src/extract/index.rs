use indexmap::IndexMap;
use schema_model::{Index, IndexMethod};
use schema_sql::serialize_expr;
use sqlparser::ast::{CreateIndex, Expr};

use crate::strip_schema_qualifier;

/// Decides columns-vs-expression: a single parenthesized item that isn't a
/// bare identifier is an expression index.
fn is_plain_column_reference(expr: &Expr) -> bool {
    matches!(expr, Expr::Identifier(_) | Expr::CompoundIdentifier(_))
}

fn identifier_text(expr: &Expr) -> Option<String> {
    match expr {
        Expr::Identifier(ident) => Some(ident.value.clone()),
        Expr::CompoundIdentifier(parts) => parts.last().map(|p| p.value.clone()),
        _ => None,
    }
}

pub fn extract_create_index(create_index: &CreateIndex, default_schema: Option<&str>, warnings: &mut Vec<String>) -> Index {
    let name = create_index
        .name
        .as_ref()
        .map(|n| n.to_string())
        .unwrap_or_default();
    let table_name = strip_schema_qualifier(&create_index.table_name.to_string(), default_schema);

    let exprs: Vec<&Expr> = create_index.columns.iter().map(|ic| &ic.expr).collect();

    let (columns, expression) = if exprs.len() == 1 && !is_plain_column_reference(exprs[0]) {
        (Vec::new(), Some(serialize_expr(exprs[0], warnings)))
    } else {
        let cols = exprs
            .iter()
            .filter_map(|e| identifier_text(e))
            .collect::<Vec<_>>();
        if cols.len() != exprs.len() {
            warnings.push(format!("index `{name}` has a column item that is not a plain identifier"));
        }
        (cols, None)
    };

    let method = create_index
        .using
        .as_ref()
        .and_then(|using| IndexMethod::parse(&using.to_string()))
        .unwrap_or_default();

    let predicate = create_index.predicate.as_ref().map(|expr| serialize_expr(expr, warnings));

    let storage_params = parse_storage_params(&create_index.with, warnings);

    Index {
        name,
        table_name,
        columns,
        method,
        unique: create_index.unique,
        concurrent: create_index.concurrently,
        predicate,
        expression,
        storage_params,
        // sqlparser's generic AST has no TABLESPACE clause for CREATE INDEX
        // (a Postgres-only extension); the introspector recovers it
        // straight from the catalog instead. See DESIGN.md.
        tablespace: None,
    }
}

fn parse_storage_params(with: &[Expr], warnings: &mut Vec<String>) -> IndexMap<String, String> {
    let mut params = IndexMap::new();
    for expr in with {
        match expr {
            Expr::BinaryOp { left, op: sqlparser::ast::BinaryOperator::Eq, right } => {
                if let Some(key) = identifier_text(left) {
                    params.insert(key, serialize_expr(right, warnings));
                } else {
                    warnings.push("unrecognized WITH storage parameter key".to_string());
                }
            }
            other => {
                let text = other.to_string();
                if let Some((key, value)) = text.split_once('=') {
                    params.insert(key.trim().to_string(), value.trim().to_string());
                } else {
                    warnings.push(format!("unrecognized WITH storage parameter: {text}"));
                }
            }
        }
    }
    params
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlparser::dialect::PostgreSqlDialect;
    use sqlparser::parser::Parser;

    fn parse_index(sql: &str) -> Index {
        let statements = Parser::parse_sql(&PostgreSqlDialect {}, sql).unwrap();
        let mut warnings = Vec::new();
        match &statements[0] {
            sqlparser::ast::Statement::CreateIndex(create_index) => extract_create_index(create_index, None, &mut warnings),
            other => panic!("expected CREATE INDEX, got {other:?}"),
        }
    }

    #[test]
    fn plain_column_index() {
        let index = parse_index("CREATE INDEX idx ON t (a, b);");
        assert_eq!(index.columns, vec!["a".to_string(), "b".to_string()]);
        assert!(index.expression.is_none());
    }

    #[test]
    fn expression_index() {
        let index = parse_index("CREATE INDEX idx ON t (lower(email));");
        assert!(index.columns.is_empty());
        assert_eq!(index.expression.as_deref(), Some("LOWER(email)"));
    }

    #[test]
    fn unique_concurrent_index() {
        let index = parse_index("CREATE UNIQUE INDEX CONCURRENTLY idx ON t (a);");
        assert!(index.unique);
        assert!(index.concurrent);
    }
}

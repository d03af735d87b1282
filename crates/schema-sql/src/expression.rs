//! The recursive expression serializer shared by the parser (for rendering
//! default/check expressions back out as text) and the differ (for
//! comparing two predicates/expressions for equality).
//!
//! Unrecognized CST shapes degrade to the literal `"unknown_expression"`
//! placeholder rather than panicking — the long tail of PostgreSQL
//! expression syntax is wide, and a parser that crashes on an exotic
//! `CHECK` expression is worse than one that tolerates it with a warning.
use itertools::Itertools;
use sqlparser::ast::{
    BinaryOperator, CastKind, Expr, Function, FunctionArg, FunctionArgExpr, FunctionArguments, UnaryOperator, Value,
};

use crate::quote::quote_ident;

const UNKNOWN_EXPRESSION: &str = "unknown_expression";

/// Niladic SQL-99 keyword constants that PostgreSQL allows without a
/// trailing `()` — `sqlparser` represents them as zero-argument function
/// calls, so we special-case them here to round-trip without parentheses.
const NILADIC_KEYWORDS: &[&str] = &[
    "CURRENT_TIMESTAMP",
    "CURRENT_DATE",
    "CURRENT_TIME",
    "CURRENT_USER",
    "SESSION_USER",
    "LOCALTIME",
    "LOCALTIMESTAMP",
];

/// Serializes `expr` into canonical SQL text, appending a human-readable
/// warning to `warnings` for every subtree it could not recognize.
pub fn serialize_expr(expr: &Expr, warnings: &mut Vec<String>) -> String {
    match expr {
        Expr::Value(value) => serialize_value(value),
        Expr::Identifier(ident) => quote_ident(&ident.value),
        Expr::CompoundIdentifier(parts) => parts.iter().map(|p| quote_ident(&p.value)).join("."),
        Expr::Nested(inner) => format!("({})", serialize_expr(inner, warnings)),
        Expr::UnaryOp { op, expr: inner } => {
            let symbol = match op {
                UnaryOperator::Plus => "+",
                UnaryOperator::Minus => "-",
                UnaryOperator::Not => "NOT ",
                _ => {
                    warnings.push(format!("unknown unary operator {op:?}"));
                    return UNKNOWN_EXPRESSION.to_string();
                }
            };
            format!("{symbol}{}", serialize_expr(inner, warnings))
        }
        Expr::BinaryOp { left, op, right } => match binary_operator_symbol(op) {
            Some(symbol) => format!(
                "{} {} {}",
                serialize_expr(left, warnings),
                symbol,
                serialize_expr(right, warnings)
            ),
            None => {
                warnings.push(format!("unknown binary operator {op:?}"));
                UNKNOWN_EXPRESSION.to_string()
            }
        },
        Expr::Cast { expr: inner, data_type, kind, .. } => match kind {
            CastKind::DoubleColon | CastKind::Cast => {
                format!(
                    "{}::{}",
                    serialize_expr(inner, warnings),
                    data_type.to_string().to_ascii_uppercase()
                )
            }
            _ => {
                warnings.push(format!("unsupported cast kind {kind:?}"));
                UNKNOWN_EXPRESSION.to_string()
            }
        },
        Expr::IsNull(inner) => format!("{} IS NULL", serialize_expr(inner, warnings)),
        Expr::IsNotNull(inner) => format!("{} IS NOT NULL", serialize_expr(inner, warnings)),
        Expr::Between { expr: inner, negated, low, high } => format!(
            "{}{} BETWEEN {} AND {}",
            serialize_expr(inner, warnings),
            if *negated { " NOT" } else { "" },
            serialize_expr(low, warnings),
            serialize_expr(high, warnings),
        ),
        Expr::InList { expr: inner, list, negated } => format!(
            "{}{} IN ({})",
            serialize_expr(inner, warnings),
            if *negated { " NOT" } else { "" },
            list.iter().map(|e| serialize_expr(e, warnings)).join(", "),
        ),
        Expr::Case { operand, conditions, results, else_result, .. } => {
            let mut out = String::from("CASE");
            if let Some(operand) = operand {
                out.push(' ');
                out.push_str(&serialize_expr(operand, warnings));
            }
            for (cond, res) in conditions.iter().zip(results.iter()) {
                out.push_str(&format!(
                    " WHEN {} THEN {}",
                    serialize_expr(cond, warnings),
                    serialize_expr(res, warnings)
                ));
            }
            if let Some(else_result) = else_result {
                out.push_str(&format!(" ELSE {}", serialize_expr(else_result, warnings)));
            }
            out.push_str(" END");
            out
        }
        Expr::Function(function) => serialize_function(function, warnings),
        other => {
            warnings.push(format!("unrecognized expression shape: {other:?}"));
            UNKNOWN_EXPRESSION.to_string()
        }
    }
}

fn binary_operator_symbol(op: &BinaryOperator) -> Option<&'static str> {
    use BinaryOperator::*;
    Some(match op {
        Plus => "+",
        Minus => "-",
        Multiply => "*",
        Divide => "/",
        Modulo => "%",
        StringConcat => "||",
        Gt => ">",
        Lt => "<",
        GtEq => ">=",
        LtEq => "<=",
        Eq => "=",
        NotEq => "<>",
        And => "AND",
        Or => "OR",
        PGRegexMatch => "~",
        PGRegexIMatch => "~*",
        PGRegexNotMatch => "!~",
        PGRegexNotIMatch => "!~*",
        BitwiseAnd => "&",
        BitwiseOr => "|",
        BitwiseXor => "#",
        _ => return None,
    })
}

fn serialize_function(function: &Function, warnings: &mut Vec<String>) -> String {
    let name = function.name.to_string().to_ascii_uppercase();

    match &function.args {
        FunctionArguments::None if NILADIC_KEYWORDS.contains(&name.as_str()) => name,
        FunctionArguments::None => format!("{name}()"),
        FunctionArguments::List(list) => {
            let args = list
                .args
                .iter()
                .map(|arg| serialize_function_arg(arg, warnings))
                .join(", ");
            format!("{name}({args})")
        }
        FunctionArguments::Subquery(_) => {
            warnings.push(format!("unsupported subquery argument in function `{name}`"));
            UNKNOWN_EXPRESSION.to_string()
        }
    }
}

fn serialize_function_arg(arg: &FunctionArg, warnings: &mut Vec<String>) -> String {
    match arg {
        FunctionArg::Unnamed(FunctionArgExpr::Expr(expr)) => serialize_expr(expr, warnings),
        FunctionArg::Unnamed(FunctionArgExpr::Wildcard) => "*".to_string(),
        FunctionArg::Named { name, arg: FunctionArgExpr::Expr(expr), .. } => {
            format!("{} => {}", name.value, serialize_expr(expr, warnings))
        }
        _ => {
            warnings.push("unrecognized function argument shape".to_string());
            UNKNOWN_EXPRESSION.to_string()
        }
    }
}

fn serialize_value(value: &Value) -> String {
    match value {
        Value::Number(n, _) => n.clone(),
        Value::SingleQuotedString(s) | Value::DoubleQuotedString(s) => format!("'{}'", s.replace('\'', "''")),
        Value::Boolean(b) => if *b { "TRUE" } else { "FALSE" }.to_string(),
        Value::Null => "NULL".to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlparser::dialect::PostgreSqlDialect;
    use sqlparser::parser::Parser;

    fn parse_expr(sql: &str) -> Expr {
        let full = format!("SELECT {sql}");
        let statements = Parser::parse_sql(&PostgreSqlDialect {}, &full).unwrap();
        match &statements[0] {
            sqlparser::ast::Statement::Query(query) => match query.body.as_ref() {
                sqlparser::ast::SetExpr::Select(select) => match &select.projection[0] {
                    sqlparser::ast::SelectItem::UnnamedExpr(expr) => expr.clone(),
                    other => panic!("unexpected projection: {other:?}"),
                },
                other => panic!("unexpected query body: {other:?}"),
            },
            other => panic!("unexpected statement: {other:?}"),
        }
    }

    fn render(sql: &str) -> String {
        let mut warnings = Vec::new();
        let text = serialize_expr(&parse_expr(sql), &mut warnings);
        assert!(warnings.is_empty(), "unexpected warnings for `{sql}`: {warnings:?}");
        text
    }

    #[test]
    fn renders_function_calls() {
        assert_eq!(render("NOW()"), "NOW()");
    }

    #[test]
    fn renders_niladic_keyword_without_parens() {
        assert_eq!(render("CURRENT_TIMESTAMP"), "CURRENT_TIMESTAMP");
    }

    #[test]
    fn renders_negative_numbers() {
        assert_eq!(render("-1"), "-1");
    }

    #[test]
    fn renders_cast_expressions() {
        assert_eq!(render("'{}'::jsonb"), "'{}'::JSONB");
    }

    #[test]
    fn renders_binary_expressions() {
        assert_eq!(render("price > 0"), "price > 0");
    }
}

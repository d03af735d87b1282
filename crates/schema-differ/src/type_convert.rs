//! Type normalization and `USING`-clause synthesis for the column differ.

/// Maps catalog/DDL type spellings onto a normalized form so syntactically
/// different but equivalent type declarations compare equal.
pub fn normalize_type(raw: &str) -> String {
    let trimmed = raw.trim();
    let lower = trimmed.to_ascii_lowercase();

    if let Some(rest) = lower.strip_prefix("character varying") {
        return format!("VARCHAR{}", rest.trim());
    }
    match lower.as_str() {
        "text" => "TEXT".to_string(),
        "boolean" => "BOOLEAN".to_string(),
        "timestamp without time zone" => "TIMESTAMP".to_string(),
        _ => trimmed.to_ascii_uppercase(),
    }
}

pub fn is_nextval_default(default: &Option<String>) -> bool {
    default
        .as_deref()
        .map(|d| d.trim().to_ascii_lowercase().starts_with("nextval("))
        .unwrap_or(false)
}

/// `SERIAL` cannot appear as the target of `ALTER COLUMN ... TYPE`;
/// substitute `INTEGER` and let the sequence itself go untouched.
pub fn target_type_for_alter(desired_type: &str) -> String {
    if desired_type.trim().eq_ignore_ascii_case("SERIAL") {
        "INTEGER".to_string()
    } else {
        desired_type.trim().to_string()
    }
}

/// Synthesizes the `USING` clause needed when converting from a textual
/// type to numeric or boolean. Returns `None` when a plain
/// `ALTER COLUMN ... TYPE` is sufficient.
pub fn using_clause(column: &str, from_type: &str, to_type: &str) -> Option<String> {
    let from = normalize_type(from_type);
    let to = normalize_type(to_type);

    let from_is_textual = from.starts_with("VARCHAR") || from == "TEXT";
    if !from_is_textual {
        return None;
    }

    if to.starts_with("DECIMAL") || to.starts_with("NUMERIC") {
        Some(format!("{column}::{}", target_type_for_alter(to_type)))
    } else if to == "INTEGER" || to.starts_with("INT") {
        Some(format!("TRUNC({column}::DECIMAL)::integer"))
    } else if to == "BOOLEAN" {
        Some(format!("{column}::boolean"))
    } else {
        None
    }
}

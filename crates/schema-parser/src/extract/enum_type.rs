use schema_model::EnumType;
use sqlparser::ast::{ObjectName, UserDefinedTypeRepresentation};

use crate::error::ParseError;
use crate::strip_schema_qualifier;

fn strip_quotes(raw: &str) -> String {
    let trimmed = raw.trim();
    trimmed
        .strip_prefix('\'')
        .and_then(|s| s.strip_suffix('\''))
        .unwrap_or(trimmed)
        .to_string()
}

pub fn extract_create_type_enum(
    name: &ObjectName,
    default_schema: Option<&str>,
    representation: &UserDefinedTypeRepresentation,
) -> Result<EnumType, ParseError> {
    let name_text = strip_schema_qualifier(&name.to_string(), default_schema);
    match representation {
        UserDefinedTypeRepresentation::Enum { labels } => {
            let values: Vec<String> = labels.iter().map(|l| strip_quotes(&l.to_string())).collect();
            if values.is_empty() {
                return Err(ParseError::EmptyEnum(name_text));
            }
            Ok(EnumType::new(name_text, values))
        }
        other => Err(ParseError::UnsupportedStatement(format!(
            "CREATE TYPE ... AS {other:?} (only AS ENUM is supported in declarative schema)"
        ))),
    }
}

/// Identifiers are emitted verbatim when they are unreserved lowercase
/// names. Anything else is double-quoted, since emitting `SELECT` or
/// `My Table` unquoted would simply fail to parse back.
pub fn quote_ident(name: &str) -> String {
    if needs_quoting(name) {
        format!("\"{}\"", name.replace('"', "\"\""))
    } else {
        name.to_string()
    }
}

fn needs_quoting(name: &str) -> bool {
    let mut chars = name.chars();
    let starts_ok = matches!(chars.next(), Some(c) if c.is_ascii_lowercase() || c == '_');
    let rest_ok = chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_');
    !(starts_ok && rest_ok) || is_reserved(name)
}

fn is_reserved(name: &str) -> bool {
    matches!(
        name.to_ascii_uppercase().as_str(),
        "SELECT" | "TABLE" | "INDEX" | "ORDER" | "GROUP" | "USER" | "CHECK" | "DEFAULT" | "PRIMARY" | "FOREIGN"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercase_identifiers_pass_through() {
        assert_eq!(quote_ident("user_id"), "user_id");
    }

    #[test]
    fn mixed_case_is_quoted() {
        assert_eq!(quote_ident("UserId"), "\"UserId\"");
    }

    #[test]
    fn reserved_words_are_quoted() {
        assert_eq!(quote_ident("order"), "\"order\"");
    }
}

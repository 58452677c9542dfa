use chrono::NaiveDate;

pub const SQL_NULL: &str = "NULL";

/// Renders a free-text field as a SQL string literal, or `NULL` when blank.
///
/// Single quotes are doubled and line breaks become spaces. No other escaping
/// happens, so the result is only safe for dialects where `''` is the sole
/// quote escape.
pub fn sql_literal(value: &str) -> String {
    if value.trim().is_empty() {
        return SQL_NULL.to_string();
    }
    let escaped = value.replace('\'', "''").replace(['\n', '\r'], " ");
    format!("'{}'", escaped.trim())
}

/// Parses a birth date with an explicitly configured format.
///
/// Without a format there is nothing to parse and the column stays `NULL`;
/// the source format is never guessed.
pub fn parse_birth_date(
    value: &str,
    format: Option<&str>,
) -> Result<Option<NaiveDate>, chrono::ParseError> {
    let value = value.trim();
    match format {
        Some(format) if !value.is_empty() => NaiveDate::parse_from_str(value, format).map(Some),
        _ => Ok(None),
    }
}

pub fn date_literal(date: Option<NaiveDate>) -> String {
    match date {
        Some(date) => format!("'{}'", date.format("%Y-%m-%d")),
        None => SQL_NULL.to_string(),
    }
}

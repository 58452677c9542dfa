mod validation;

use crate::reader::RawLine;

pub use validation::{validate_record, Rejection};

/// Positional columns of the client export.
pub const EXPECTED_COLUMNS: usize = 8;

/// Target column for each positional field, in input order.
pub const CLIENT_COLUMNS: [&str; EXPECTED_COLUMNS] = [
    "id",
    "nome_cliente",
    "tel_celular",
    "email",
    "nacionalidade",
    "obs",
    "cpf",
    "data_nasc",
];

/// Trimmed fields of one export line, before the identifier is checked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRecord {
    pub line: u64,
    pub id: String,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub nationality: String,
    pub notes: String,
    pub tax_id: String,
    pub birth_date: String,
    /// The line had fewer than [`EXPECTED_COLUMNS`] fields
    pub was_padded: bool,
}

/// A client row that passed identifier validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientRecord {
    pub id: u64,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub nationality: String,
    pub notes: String,
    pub tax_id: String,
    pub birth_date: String,
}

/// Maps a line's positional fields onto the client schema.
///
/// Missing trailing fields become empty strings, fields past the eighth are
/// ignored.
pub fn parse_record(raw_line: &RawLine) -> RawRecord {
    let mut fields: Vec<String> = raw_line
        .fields
        .iter()
        .take(EXPECTED_COLUMNS)
        .map(|field| field.trim().to_string())
        .collect();

    let was_padded = fields.len() < EXPECTED_COLUMNS;
    if was_padded {
        tracing::debug!(
            "Line {} has {} of {} columns, padding with empty values",
            raw_line.line,
            fields.len(),
            EXPECTED_COLUMNS
        );
        fields.resize(EXPECTED_COLUMNS, String::new());
    }

    let mut fields = fields.into_iter();
    let mut next = || fields.next().unwrap_or_default();

    RawRecord {
        line: raw_line.line,
        id: next(),
        name: next(),
        phone: next(),
        email: next(),
        nationality: next(),
        notes: next(),
        tax_id: next(),
        birth_date: next(),
        was_padded,
    }
}

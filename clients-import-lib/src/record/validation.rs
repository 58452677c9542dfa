use super::{ClientRecord, RawRecord};
use std::fmt;

/// Why a row was kept out of the import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    MissingId,
    ZeroId,
    NonNumericId(String),
    IdOutOfRange(String),
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::MissingId => write!(f, "identifier is missing"),
            Rejection::ZeroId => write!(f, "identifier is zero"),
            Rejection::NonNumericId(id) => {
                write!(f, "identifier '{}' is not a positive integer", id)
            }
            Rejection::IdOutOfRange(id) => {
                write!(f, "identifier '{}' is too large", id)
            }
        }
    }
}

/// Accepts a row only when its identifier is a positive integer.
///
/// Placeholder rows in exports carry an empty or `0` id and must not turn
/// into primary keys.
pub fn validate_record(raw: RawRecord) -> Result<ClientRecord, Rejection> {
    if raw.id.is_empty() {
        return Err(Rejection::MissingId);
    }
    if raw.id == "0" {
        return Err(Rejection::ZeroId);
    }

    // u64 parsing alone would also accept a leading `+`
    if !raw.id.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Rejection::NonNumericId(raw.id));
    }

    let id = match raw.id.parse::<u64>() {
        Ok(0) => return Err(Rejection::ZeroId),
        Ok(id) => id,
        Err(_) => return Err(Rejection::IdOutOfRange(raw.id)),
    };

    Ok(ClientRecord {
        id,
        name: raw.name,
        phone: raw.phone,
        email: raw.email,
        nationality: raw.nationality,
        notes: raw.notes,
        tax_id: raw.tax_id,
        birth_date: raw.birth_date,
    })
}

use crate::error::ImportError;
use csv::{ReaderBuilder, Terminator};
use std::path::Path;

/// One non-blank source line, already split on the delimiter.
#[derive(Debug, Clone)]
pub struct RawLine {
    /// Source line as reported by the CSV reader, for diagnostics
    pub line: u64,
    pub fields: Vec<String>,
}

impl RawLine {
    fn is_blank(&self) -> bool {
        self.fields.iter().all(|field| field.trim().is_empty()) && self.fields.len() <= 1
    }
}

/// Reads the whole export into memory and returns its data lines.
///
/// Blank lines are dropped and the first remaining line is treated as the
/// header and skipped by position. Quote characters carry no meaning, so a
/// delimiter inside a field shifts the columns after it. Bytes that are not
/// valid UTF-8 are decoded as U+FFFD instead of failing the run.
pub fn read_lines<P: AsRef<Path>>(path: P, delimiter: u8) -> Result<Vec<RawLine>, ImportError> {
    let path = path.as_ref();
    tracing::debug!("Reading client export from {}", path.display());
    let contents = std::fs::read(path)?;
    split_lines(&contents, delimiter)
}

pub(crate) fn split_lines(contents: &[u8], delimiter: u8) -> Result<Vec<RawLine>, ImportError> {
    let mut rdr = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .terminator(Terminator::Any(b'\n'))
        .from_reader(contents);

    let mut lines = Vec::new();
    for result in rdr.byte_records() {
        let record = result?;
        let line = record.position().map(|pos| pos.line()).unwrap_or_default();
        let fields = record
            .iter()
            .map(|field| String::from_utf8_lossy(field).into_owned())
            .collect();
        let raw_line = RawLine { line, fields };
        if raw_line.is_blank() {
            continue;
        }
        lines.push(raw_line);
    }

    if let Some(header) = lines.first() {
        tracing::debug!(
            "Skipping header on line {} ({} columns)",
            header.line,
            header.fields.len()
        );
    }

    Ok(lines.into_iter().skip(1).collect())
}

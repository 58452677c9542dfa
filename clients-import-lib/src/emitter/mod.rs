use crate::error::ImportError;
use crate::normalize::{date_literal, sql_literal};
use crate::record::{ClientRecord, CLIENT_COLUMNS};
use chrono::NaiveDate;
use std::fs;
use std::path::Path;

/// The import script: leading comments, then the statements that run inside
/// a single transaction.
#[derive(Debug, Clone)]
pub struct SqlStatementList {
    table: String,
    source_name: String,
    inserts: Vec<String>,
}

impl SqlStatementList {
    pub fn new(table: impl Into<String>, source_name: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            source_name: source_name.into(),
            inserts: Vec::new(),
        }
    }

    pub fn push_record(&mut self, record: &ClientRecord, birth_date: Option<NaiveDate>) {
        self.inserts.push(insert_statement(&self.table, record, birth_date));
    }

    pub fn insert_count(&self) -> usize {
        self.inserts.len()
    }

    pub fn inserts(&self) -> &[String] {
        &self.inserts
    }

    pub fn render(&self) -> String {
        let mut lines = Vec::with_capacity(self.inserts.len() + 6);
        lines.push("-- Import clients data from CSV".to_string());
        lines.push(format!("-- This file was generated from {}", self.source_name));
        lines.push(String::new());
        lines.push("BEGIN;".to_string());
        lines.extend(self.inserts.iter().cloned());
        lines.push(String::new());
        lines.push("COMMIT;".to_string());
        lines.join("\n")
    }

    /// Writes the whole script in one call, replacing any existing file.
    pub fn save(&self, output_path: &Path) -> Result<(), ImportError> {
        if let Some(parent) = output_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| {
                    ImportError::Processing(format!(
                        "Failed to create directory for SQL script: {}",
                        e
                    ))
                })?;
            }
        }

        fs::write(output_path, self.render()).map_err(|e| {
            ImportError::Processing(format!(
                "Failed to write SQL script to {}: {}",
                output_path.display(),
                e
            ))
        })?;

        tracing::info!("Saved SQL script to {}", output_path.to_string_lossy());
        Ok(())
    }
}

pub fn insert_statement(
    table: &str,
    record: &ClientRecord,
    birth_date: Option<NaiveDate>,
) -> String {
    let values = [
        record.id.to_string(),
        sql_literal(&record.name),
        sql_literal(&record.phone),
        sql_literal(&record.email),
        sql_literal(&record.nationality),
        sql_literal(&record.notes),
        sql_literal(&record.tax_id),
        date_literal(birth_date),
    ];
    format!(
        "INSERT INTO {} ({}) VALUES ({});",
        table,
        CLIENT_COLUMNS.join(", "),
        values.join(", ")
    )
}

use crate::config::ImportConfig;
use crate::emitter::SqlStatementList;
use crate::error::{ImportError, ProcessingOutcome, ProcessingState};
use crate::normalize::parse_birth_date;
use crate::reader::read_lines;
use crate::record::{parse_record, validate_record};
use std::path::PathBuf;

/// Counts and diagnostics from one run.
#[derive(Debug)]
pub struct ImportSummary {
    pub inserted: usize,
    pub rejected: usize,
    pub padded: usize,
    /// Where the script went; `None` for a dry run
    pub output_path: Option<PathBuf>,
    pub outcome: ProcessingOutcome,
}

pub struct Processor {
    config: ImportConfig,
    is_strict: bool,
    processing_state: ProcessingState,
}

impl Processor {
    pub fn new(config: ImportConfig, is_strict: bool) -> Self {
        tracing::info!("Creating processor for input: {:?}", config.input_path);
        Self {
            config,
            is_strict,
            processing_state: ProcessingState::new(),
        }
    }

    /// Runs the full pipeline and writes the script to the configured output.
    pub fn process(mut self) -> Result<ImportSummary, ImportError> {
        self.config.validate()?;
        let (script, rejected, padded) = self.build_script()?;
        script.save(&self.config.output_path)?;

        tracing::info!("Processing completed successfully");
        Ok(ImportSummary {
            inserted: script.insert_count(),
            rejected,
            padded,
            output_path: Some(self.config.output_path),
            outcome: ProcessingOutcome::from_state(self.processing_state),
        })
    }

    /// Same pipeline as [`Processor::process`] without touching the output.
    pub fn dry_run(mut self) -> Result<ImportSummary, ImportError> {
        self.config.validate()?;
        let (script, rejected, padded) = self.build_script()?;

        Ok(ImportSummary {
            inserted: script.insert_count(),
            rejected,
            padded,
            output_path: None,
            outcome: ProcessingOutcome::from_state(self.processing_state),
        })
    }

    fn build_script(&mut self) -> Result<(SqlStatementList, usize, usize), ImportError> {
        let input_path = &self.config.input_path;
        tracing::info!("Reading client export from {}", input_path.display());
        let lines = read_lines(input_path, self.config.delimiter_byte())?;
        tracing::debug!("Read {} data lines", lines.len());

        let source_name = input_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| input_path.display().to_string());
        let mut script = SqlStatementList::new(self.config.table.clone(), source_name);

        let birth_date_format = self.config.birth_date_format.clone();
        let mut rejected = 0;
        let mut padded = 0;

        for raw_line in &lines {
            let raw_record = parse_record(raw_line);
            let line = raw_record.line;
            if raw_record.was_padded {
                padded += 1;
            }

            let record = match validate_record(raw_record) {
                Ok(record) => record,
                Err(rejection) => {
                    if self.is_strict {
                        return Err(ImportError::InvalidRecord {
                            line,
                            reason: rejection.to_string(),
                        });
                    }
                    tracing::debug!("Skipping line {}: {}", line, rejection);
                    self.processing_state.add_warning(
                        format!("Skipped line {}: {}", line, rejection),
                        Some("id_validation".to_string()),
                    );
                    rejected += 1;
                    continue;
                }
            };

            let birth_date =
                match parse_birth_date(&record.birth_date, birth_date_format.as_deref()) {
                    Ok(date) => date,
                    Err(e) => {
                        let message = format!(
                            "Birth date '{}' of client {} does not match format '{}': {}",
                            record.birth_date,
                            record.id,
                            birth_date_format.as_deref().unwrap_or_default(),
                            e
                        );
                        if self.is_strict {
                            return Err(ImportError::InvalidRecord {
                                line,
                                reason: message,
                            });
                        }
                        self.processing_state.add_warning(
                            format!("{}, writing NULL", message),
                            Some("date_validation".to_string()),
                        );
                        None
                    }
                };

            script.push_record(&record, birth_date);
        }

        if rejected > 0 {
            tracing::warn!("Skipped {} rows with a missing or invalid identifier", rejected);
        }

        Ok((script, rejected, padded))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const HEADER: &str = "id;nome_cliente;tel_celular;email;nacionalidade;obs;cpf;data_nasc";

    fn setup(rows: &[&str]) -> (TempDir, ImportConfig) {
        let dir = tempfile::tempdir().unwrap();
        let input_path = dir.path().join("cliente.csv");
        let mut contents = String::from(HEADER);
        for row in rows {
            contents.push('\n');
            contents.push_str(row);
        }
        fs::write(&input_path, contents).unwrap();
        let config = ImportConfig::new(input_path, dir.path().join("import_clients_data.sql"));
        (dir, config)
    }

    fn insert_lines(script: &str) -> Vec<&str> {
        script
            .lines()
            .filter(|line| line.starts_with("INSERT INTO"))
            .collect()
    }

    #[test]
    fn test_jane_scenario() {
        let (_dir, config) =
            setup(&["1;Jane O'Brien;555-1234;jane@x.com;US;Likes tea;123-45;1990-01-01"]);
        let output_path = config.output_path.clone();

        let summary = Processor::new(config, false).process().unwrap();
        assert_eq!(summary.inserted, 1);
        assert_eq!(summary.output_path, Some(output_path.clone()));

        let script = fs::read_to_string(output_path).unwrap();
        assert!(script.contains(
            "INSERT INTO clients (id, nome_cliente, tel_celular, email, nacionalidade, obs, cpf, data_nasc) VALUES (1, 'Jane O''Brien', '555-1234', 'jane@x.com', 'US', 'Likes tea', '123-45', NULL);"
        ));
        assert!(matches!(summary.outcome, ProcessingOutcome::Success));
    }

    #[test]
    fn test_ghost_row_produces_no_insert() {
        let (_dir, config) = setup(&["0;Ghost;;;;;;"]);
        let output_path = config.output_path.clone();

        let summary = Processor::new(config, false).process().unwrap();
        assert_eq!(summary.inserted, 0);
        assert_eq!(summary.rejected, 1);
        assert_eq!(summary.outcome.warnings().len(), 1);

        let script = fs::read_to_string(output_path).unwrap();
        assert!(insert_lines(&script).is_empty());
    }

    #[test]
    fn test_header_only_input() {
        let (_dir, config) = setup(&[]);
        let output_path = config.output_path.clone();

        let summary = Processor::new(config, false).process().unwrap();
        assert_eq!(summary.inserted, 0);

        let script = fs::read_to_string(output_path).unwrap();
        assert!(script.ends_with("BEGIN;\n\nCOMMIT;"));
        assert!(insert_lines(&script).is_empty());
    }

    #[test]
    fn test_order_and_rejections() {
        let (_dir, config) = setup(&[
            "3;Carla;;;;;;",
            ";Sem id;;;;;;",
            "abc;Letters;;;;;;",
            "1;Ana",
            "",
            "0;Ghost;;;;;;",
            "2;Bruno;  ;;;;;",
        ]);
        let output_path = config.output_path.clone();

        let summary = Processor::new(config, false).process().unwrap();
        assert_eq!(summary.inserted, 3);
        assert_eq!(summary.rejected, 3);
        assert_eq!(summary.padded, 1);

        let script = fs::read_to_string(output_path).unwrap();
        let inserts = insert_lines(&script);
        assert!(inserts[0].contains("VALUES (3, 'Carla', NULL"));
        assert!(inserts[1].contains("VALUES (1, 'Ana', NULL, NULL, NULL, NULL, NULL, NULL);"));
        assert!(inserts[2].contains("VALUES (2, 'Bruno', NULL"));
        assert!(!script.contains("''"));
    }

    #[test]
    fn test_birth_date_is_null_without_format() {
        let (_dir, config) = setup(&["5;Eva;;;;;;17/06/1984"]);
        let output_path = config.output_path.clone();

        Processor::new(config, false).process().unwrap();
        let script = fs::read_to_string(output_path).unwrap();
        assert!(insert_lines(&script)[0].ends_with(", NULL);"));
    }

    #[test]
    fn test_birth_date_with_configured_format() {
        let (_dir, mut config) = setup(&["5;Eva;;;;;;17/06/1984", "6;Rui;;;;;;1984-06-17"]);
        config.birth_date_format = Some("%d/%m/%Y".to_string());
        let output_path = config.output_path.clone();

        let summary = Processor::new(config, false).process().unwrap();
        let script = fs::read_to_string(output_path).unwrap();
        let inserts = insert_lines(&script);
        assert!(inserts[0].ends_with(", '1984-06-17');"));
        assert!(inserts[1].ends_with(", NULL);"));

        let warnings = summary.outcome.warnings();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].source.as_deref(), Some("date_validation"));
    }

    #[test]
    fn test_strict_mode_fails_on_invalid_id() {
        let (_dir, config) = setup(&["1;Ana;;;;;;", "x;Bad;;;;;;"]);
        let output_path = config.output_path.clone();

        let result = Processor::new(config, true).process();
        assert!(matches!(result, Err(ImportError::InvalidRecord { .. })));
        assert!(!output_path.exists());
    }

    #[test]
    fn test_missing_input_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let config = ImportConfig::new(dir.path().join("missing.csv"), dir.path().join("out.sql"));
        let output_path = config.output_path.clone();

        let result = Processor::new(config, false).process();
        assert!(matches!(result, Err(ImportError::Io(_))));
        assert!(!output_path.exists());
    }

    #[test]
    fn test_dry_run_writes_nothing() {
        let (_dir, config) = setup(&["1;Ana;;;;;;", "0;Ghost;;;;;;"]);
        let output_path = config.output_path.clone();

        let summary = Processor::new(config, false).dry_run().unwrap();
        assert_eq!(summary.inserted, 1);
        assert_eq!(summary.rejected, 1);
        assert!(summary.output_path.is_none());
        assert!(!output_path.exists());
    }

    #[test]
    fn test_rerun_regenerates_same_output() {
        let (_dir, config) = setup(&["1;Ana;;;;;;", "2;Bia;;;;;;"]);
        let output_path = config.output_path.clone();

        Processor::new(config.clone(), false).process().unwrap();
        let first = fs::read_to_string(&output_path).unwrap();
        Processor::new(config, false).process().unwrap();
        let second = fs::read_to_string(&output_path).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_custom_delimiter_and_table() {
        let dir = tempfile::tempdir().unwrap();
        let input_path = dir.path().join("export.txt");
        fs::write(&input_path, "id|nome\n9|Iris|555\n").unwrap();
        let config = ImportConfig {
            table: "legacy.clients".to_string(),
            delimiter: '|',
            ..ImportConfig::new(input_path, dir.path().join("out.sql"))
        };
        let output_path = config.output_path.clone();

        Processor::new(config, false).process().unwrap();
        let script = fs::read_to_string(output_path).unwrap();
        assert!(script.contains("-- This file was generated from export.txt"));
        assert!(script.contains("INSERT INTO legacy.clients (id, "));
        assert!(script.contains("VALUES (9, 'Iris', '555', NULL"));
    }

    #[test]
    fn test_invalid_utf8_row_does_not_abort() {
        let dir = tempfile::tempdir().unwrap();
        let input_path = dir.path().join("cliente.csv");
        fs::write(&input_path, b"id;nome\n1;Ana\n2;Jo\xE3o\n3;Bia\n").unwrap();
        let config = ImportConfig::new(input_path, dir.path().join("out.sql"));
        let output_path = config.output_path.clone();

        let summary = Processor::new(config, false).process().unwrap();
        assert_eq!(summary.inserted, 3);

        let script = fs::read_to_string(output_path).unwrap();
        let inserts = insert_lines(&script);
        assert!(inserts[0].contains("VALUES (1, 'Ana'"));
        assert!(inserts[1].contains("VALUES (2, 'Jo\u{FFFD}o'"));
        assert!(inserts[2].contains("VALUES (3, 'Bia'"));
    }

    #[test]
    fn test_output_write_failure_is_fatal() {
        let (dir, mut config) = setup(&["1;Ana;;;;;;"]);
        let blocker = dir.path().join("file.txt");
        fs::write(&blocker, "").unwrap();
        config.output_path = blocker.join("out.sql");
        let output_path = config.output_path.clone();

        let result = Processor::new(config, false).process();
        assert!(matches!(result, Err(ImportError::Processing(_))));
        assert!(!output_path.exists());
    }

    #[test]
    fn test_signed_and_oversized_ids_are_skipped() {
        let (_dir, config) = setup(&[
            "+5;Plus;;;;;;",
            "123456789012345678901;Big;;;;;;",
            "6;Ok;;;;;;",
        ]);
        let output_path = config.output_path.clone();

        let summary = Processor::new(config, false).process().unwrap();
        assert_eq!(summary.inserted, 1);
        assert_eq!(summary.rejected, 2);
        let warnings = summary.outcome.warnings();
        assert!(warnings[1].message.contains("too large"));

        let script = fs::read_to_string(output_path).unwrap();
        let inserts = insert_lines(&script);
        assert_eq!(inserts.len(), 1);
        assert!(inserts[0].contains("VALUES (6, 'Ok'"));
    }
}

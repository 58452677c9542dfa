use crate::error::ImportError;
use chrono::format::{Item, StrftimeItems};
use json_comments::StripComments;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_INPUT_PATH: &str = "cliente.csv";
pub const DEFAULT_OUTPUT_PATH: &str = "import_clients_data.sql";
pub const DEFAULT_TABLE: &str = "clients";
pub const DEFAULT_DELIMITER: char = ';';

fn default_input_path() -> PathBuf {
    PathBuf::from(DEFAULT_INPUT_PATH)
}

fn default_output_path() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT_PATH)
}

fn default_table() -> String {
    DEFAULT_TABLE.to_string()
}

fn default_delimiter() -> char {
    DEFAULT_DELIMITER
}

/// Where to read the client export, where to write the script, and how to
/// shape the generated statements.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ImportConfig {
    #[serde(rename = "inputPath", default = "default_input_path")]
    pub input_path: PathBuf,
    #[serde(rename = "outputPath", default = "default_output_path")]
    pub output_path: PathBuf,
    #[serde(default = "default_table")]
    pub table: String,
    #[serde(default = "default_delimiter")]
    pub delimiter: char,
    /// chrono format of the birth date column. Unset means birth dates are
    /// always written as NULL.
    #[serde(default, rename = "birthDateFormat")]
    pub birth_date_format: Option<String>,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            input_path: default_input_path(),
            output_path: default_output_path(),
            table: default_table(),
            delimiter: default_delimiter(),
            birth_date_format: None,
        }
    }
}

impl ImportConfig {
    pub fn new<P: Into<PathBuf>>(input_path: P, output_path: P) -> Self {
        Self {
            input_path: input_path.into(),
            output_path: output_path.into(),
            ..Default::default()
        }
    }

    /// Loads a JSON config (comments allowed). Relative paths inside it are
    /// resolved against the config file's directory.
    pub fn from_file<P: Into<PathBuf>>(path: P) -> Result<Self, ImportError> {
        let path = path.into();
        tracing::info!("Loading import config from {:?}", path);
        let file = std::fs::File::open(&path)?;
        let mut config: ImportConfig = serde_json::from_reader(StripComments::new(file))?;

        if let Some(base_path) = path.parent() {
            config.input_path = resolve_path(base_path, &config.input_path);
            config.output_path = resolve_path(base_path, &config.output_path);
        }

        tracing::info!("Successfully loaded import config: {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ImportError> {
        tracing::info!("Validating import config...");

        if self.input_path.as_os_str().is_empty() {
            return Err(ImportError::InvalidConfig(
                "inputPath must not be empty".into(),
            ));
        }

        if self.output_path.as_os_str().is_empty() {
            return Err(ImportError::InvalidConfig(
                "outputPath must not be empty".into(),
            ));
        }

        if self.input_path == self.output_path {
            return Err(ImportError::InvalidConfig(format!(
                "outputPath would overwrite the input file: {}",
                self.output_path.display()
            )));
        }

        if !is_sql_identifier(&self.table) {
            tracing::error!("Invalid table name: {}", self.table);
            return Err(ImportError::InvalidConfig(format!(
                "table must be a plain SQL identifier (optionally schema-qualified), got '{}'",
                self.table
            )));
        }

        if !self.delimiter.is_ascii() || matches!(self.delimiter, '\'' | '"' | '\n' | '\r') {
            return Err(ImportError::InvalidConfig(format!(
                "delimiter must be a single ASCII character other than a quote or line break, got {:?}",
                self.delimiter
            )));
        }

        if let Some(format) = &self.birth_date_format {
            if format.trim().is_empty()
                || StrftimeItems::new(format).any(|item| matches!(item, Item::Error))
            {
                return Err(ImportError::InvalidConfig(format!(
                    "birthDateFormat is not a valid date format: '{}'",
                    format
                )));
            }
        }

        tracing::info!("Import config validation successful");
        Ok(())
    }

    pub(crate) fn delimiter_byte(&self) -> u8 {
        // validate() guarantees an ASCII delimiter
        self.delimiter as u8
    }
}

fn resolve_path(base_path: &Path, path: &Path) -> PathBuf {
    if path.is_relative() {
        base_path.join(path)
    } else {
        path.to_path_buf()
    }
}

fn is_sql_identifier(name: &str) -> bool {
    !name.is_empty()
        && name.split('.').all(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) if first.is_ascii_alphabetic() || first == '_' => {
                    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
                }
                _ => false,
            }
        })
}

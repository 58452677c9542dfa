//! Client Export Import Library
//!
//! This library converts a semicolon-delimited client export into a SQL
//! script that inserts every valid client inside one transaction.

mod config;
mod emitter;
mod error;
mod normalize;
mod processor;
mod reader;
mod record;

pub use config::{ImportConfig, DEFAULT_INPUT_PATH, DEFAULT_OUTPUT_PATH, DEFAULT_TABLE};
pub use emitter::{insert_statement, SqlStatementList};
pub use error::{ImportError, ProcessingMessage, ProcessingOutcome};
pub use normalize::{date_literal, parse_birth_date, sql_literal};
pub use processor::{ImportSummary, Processor};
pub use reader::{read_lines, RawLine};
pub use record::{
    parse_record, validate_record, ClientRecord, RawRecord, Rejection, CLIENT_COLUMNS,
    EXPECTED_COLUMNS,
};

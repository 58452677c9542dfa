use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Invalid config: {0}")]
    InvalidConfig(String),
    #[error("Invalid record on line {line}: {reason}")]
    InvalidRecord { line: u64, reason: String },
    #[error("Processing error: {0}")]
    Processing(String),
}

#[derive(Debug, Clone)]
pub struct ProcessingMessage {
    pub message: String,
    pub source: Option<String>,
}

impl ProcessingMessage {
    pub fn new(message: impl Into<String>, source: Option<String>) -> Self {
        Self {
            message: message.into(),
            source,
        }
    }
}

/// Non-fatal diagnostics gathered while a run skips or downgrades rows.
#[derive(Debug, Default, Clone)]
pub struct ProcessingState {
    warnings: Vec<ProcessingMessage>,
}

impl ProcessingState {
    pub fn new() -> Self {
        Self {
            warnings: Vec::new(),
        }
    }

    pub fn add_warning(&mut self, message: impl Into<String>, source: Option<String>) {
        self.warnings.push(ProcessingMessage::new(message, source));
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

#[derive(Debug)]
pub enum ProcessingOutcome {
    Success,
    SuccessWithWarnings(Vec<ProcessingMessage>),
}

impl ProcessingOutcome {
    pub fn from_state(state: ProcessingState) -> Self {
        if state.has_warnings() {
            ProcessingOutcome::SuccessWithWarnings(state.warnings)
        } else {
            ProcessingOutcome::Success
        }
    }

    pub fn warnings(&self) -> &[ProcessingMessage] {
        match self {
            ProcessingOutcome::Success => &[],
            ProcessingOutcome::SuccessWithWarnings(warnings) => warnings,
        }
    }
}

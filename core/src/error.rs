use thiserror::Error;

#[derive(Error, Debug)]
pub enum CaseError {
    #[error("Invalid configuration: {0}")]
    ConfigInvalid(String),

    #[error("Cannot open data source {path} (sheet '{sheet}'): {reason}")]
    SourceOpen {
        path:   String,
        sheet:  String,
        reason: String,
    },

    #[error("Cannot read row {row}: {reason}")]
    SourceRead { row: usize, reason: String },

    #[error("Invalid column label '{label}'")]
    InvalidColumnLabel { label: String },

    #[error("Column {label} (index {index}) is out of range for a row of {width} cells")]
    ColumnOutOfRange {
        label: String,
        index: usize,
        width: usize,
    },

    #[error("{party} record failed validation: {details}")]
    ValidationFailed { party: String, details: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Remote rejected the case (code -1): {body}")]
    RemoteRejected { body: String },

    #[error("Session cookie rejected, refresh the cookie before retrying: {body}")]
    FatalAuth { body: String },
}

impl CaseError {
    /// True for failures that end the whole run rather than a single row.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::FatalAuth { .. } | Self::ConfigInvalid(_))
    }
}

pub type CaseResult<T> = Result<T, CaseError>;

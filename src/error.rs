use std::path::PathBuf;
use thiserror::Error;

use crate::ledger::RoomId;

#[derive(Error, Debug)]
pub enum RentError {
    #[error("Config directory not found at {0}. Run 'rentbook init' to create it.")]
    ConfigNotFound(PathBuf),

    #[error("Config file not found: {0}")]
    ConfigFileNotFound(PathBuf),

    #[error("Failed to parse config file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Failed to parse store file {path}: {source}")]
    StateParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Config directory already exists at {0}")]
    AlreadyInitialized(PathBuf),

    #[error("Store already holds {0} room(s); refusing to seed again")]
    AlreadySeeded(usize),

    #[error("Invalid {field}: {message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    #[error("Room {0} not found")]
    RoomNotFound(RoomId),

    #[error("{backend} store unavailable: {reason}")]
    StoreUnavailable { backend: String, reason: String },

    #[error("Invalid month '{0}'. Expected YYYY-MM (e.g., 2024-05)")]
    InvalidMonth(String),

    #[error("Invalid date '{0}'. Expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl RentError {
    pub(crate) fn validation(field: &'static str, message: impl Into<String>) -> Self {
        RentError::Validation {
            field,
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, RentError>;

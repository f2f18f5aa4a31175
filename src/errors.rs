//! Error types for the remedy journal.
//!
//! This module defines the error types that categorize the failures that can
//! occur while validating input, talking to the remote store, and rendering
//! exports.

use std::{fmt, io};

use thiserror::Error;

/// Identifies which user-supplied field failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Date,
    Time,
    Remedy,
    EventDate,
    EventTime,
    Description,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Field::Date => "date",
            Field::Time => "time",
            Field::Remedy => "remedy",
            Field::EventDate => "event date",
            Field::EventTime => "event time",
            Field::Description => "description",
        };
        f.write_str(name)
    }
}

/// Raised by the date/time normalizer when an input has an unsupported shape.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unsupported format: {input:?}")]
pub struct InvalidFormat {
    pub input: String,
}

/// The main error type for the remedy journal.
#[derive(Error, Debug)]
pub enum JournalError {
    /// Errors related to local file I/O operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Errors related to serialization/deserialization operations.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Errors raised while building the spreadsheet.
    #[error("Spreadsheet error: {0}")]
    Spreadsheet(#[from] rust_xlsxwriter::XlsxError),

    /// A date or time field did not match any accepted format.
    #[error("Invalid {field} format: {value:?}")]
    InvalidFormat { field: Field, value: String },

    /// A mandatory field was left empty.
    #[error("The {field} field is required")]
    MissingField { field: Field },

    /// Record was not found when performing an operation.
    #[error("Record not found: {id}")]
    RecordNotFound { id: String },

    /// Event index outside of the record's event list.
    #[error("Event {index} not found in record {id} ({len} events)")]
    EventIndexOutOfRange { id: String, index: usize, len: usize },

    /// The journal could not be persisted to any backend.
    #[error("Failed to save the journal")]
    WriteFailed,

    /// Errors related to configuration.
    #[error("Configuration error: {message}")]
    ConfigError { message: String },
}

/// Failures reported by a remote blob store.
#[derive(Error, Debug)]
pub enum RemoteError {
    /// The object changed since it was last observed, or already exists.
    #[error("remote object conflict: {path}")]
    Conflict { path: String },

    #[error("remote object not found: {path}")]
    NotFound { path: String },

    /// Token rejected by the remote store.
    #[error("remote store rejected the credential (HTTP {status})")]
    Unauthorized { status: u16 },

    #[error("remote store returned HTTP {status} for {path}")]
    Status { status: u16, path: String },

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Downloaded document could not be parsed.
    #[error("malformed remote document: {0}")]
    Malformed(#[from] serde_json::Error),
}

impl RemoteError {
    pub fn is_conflict(&self) -> bool {
        matches!(self, RemoteError::Conflict { .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, RemoteError::NotFound { .. })
    }
}

//! Error types for the health_core library.

use chrono::{NaiveDate, NaiveDateTime};
use std::io;
use uuid::Uuid;

use crate::{Category, Unit};

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for health_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Malformed input to a logging operation; nothing was recorded
    #[error("Validation error: {0}")]
    Validation(String),

    /// A move event whose start and end fall on different calendar dates
    #[error("Move events must start and end on the same day (start {start}, end {end})")]
    CrossDayUnsupported {
        start: NaiveDateTime,
        end: NaiveDateTime,
    },

    /// No conversion rule exists from the record's unit to the requested one
    #[error("Cannot convert {category} record {record_id} from {from} to {to}")]
    UnconvertibleUnit {
        record_id: Uuid,
        category: Category,
        from: Unit,
        to: Unit,
    },

    /// Period requested with a start date after its end date
    #[error("Invalid date range: {start} is after {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    /// Generic error
    #[error("{0}")]
    Other(String),
}

//! Error types for this crate.
//!
//! None of these conditions is fatal: validation failures reject a single
//! mutation, persistence failures degrade to in-memory-only operation, and a
//! missing forecast simply means no forecast is shown.

use std::io;

use thiserror::Error;

use crate::date_key::DateKey;

/// The main error type of this crate.
#[derive(Error, Debug)]
pub enum Error {
    /// Errors related to file I/O on the storage backend.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Errors related to (de)serializing the reminder index.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A reminder field could not be parsed or violates its constraints.
    #[error("invalid {field}: {message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    /// A deletion targeted a date-key that was never populated.
    #[error("no reminders stored under key {key}")]
    NotFound { key: DateKey },

    /// The weather service could not provide a forecast (network failure,
    /// non-success status, or an unparseable body).
    #[error("weather forecast unavailable: {0}")]
    WeatherUnavailable(String),
}

pub type Result<T> = std::result::Result<T, Error>;

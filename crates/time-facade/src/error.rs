//! Error types for time-facade operations.
//!
//! Only configuration and registry problems are errors. Bad date input is
//! never an error: it produces an invalid [`TimeValue`](crate::TimeValue).

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimeError {
    #[error("Unsupported time library type: {0}")]
    UnsupportedBackend(String),

    #[error("Time library instance not initialized")]
    NotInitialized,

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Invalid locale: {0}")]
    InvalidLocale(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, TimeError>;

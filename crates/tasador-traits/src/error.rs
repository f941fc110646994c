//! Error types for the Tasador toolkit.
//!
//! This module defines the error type shared by every Tasador crate. The
//! three valuation-specific variants (`MissingData`, `Configuration` and
//! `DataSource`) separate an undefined valuation from a misconfigured model
//! and from a failing data collaborator.

use thiserror::Error;

/// The main error type for Tasador operations.
#[derive(Debug, Error)]
pub enum TasadorError {
    /// A fundamental needed to produce a value is absent (e.g. shares outstanding).
    #[error("Missing data: {0}")]
    MissingData(String),

    /// The model was invoked with unusable parameters.
    ///
    /// Raised when growth assumptions are unset or non-finite, or when the
    /// WACC makes the discount denominator `1 + wacc` non-positive.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The fundamentals collaborator failed (network, parse, timeout).
    #[error("Data source error: {0}")]
    DataSource(String),

    /// Error due to invalid or malformed data.
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Error when a required column is missing from a table.
    #[error("Missing required column: {0}")]
    MissingColumn(String),

    /// Error from Polars operations.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// Filesystem error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error when a date is out of range or invalid.
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    /// Generic error for other cases.
    #[error("Error: {0}")]
    Other(String),
}

impl TasadorError {
    /// Short, stable label for the error kind.
    ///
    /// Used as the marker written into batch output rows.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::MissingData(_) => "missing_data",
            Self::Configuration(_) => "configuration",
            Self::DataSource(_) => "data_source",
            Self::InvalidData(_) => "invalid_data",
            Self::MissingColumn(_) => "missing_column",
            Self::Polars(_) => "polars",
            Self::Io(_) => "io",
            Self::InvalidDate(_) => "invalid_date",
            Self::Other(_) => "other",
        }
    }
}

impl From<String> for TasadorError {
    fn from(s: String) -> Self {
        Self::Other(s)
    }
}

impl From<&str> for TasadorError {
    fn from(s: &str) -> Self {
        Self::Other(s.to_string())
    }
}

/// A specialized Result type for Tasador operations.
pub type Result<T> = std::result::Result<T, TasadorError>;

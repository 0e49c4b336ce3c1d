//! The module contains the errors the engine can throw.
//!
//! They fall in three groups:
//!
//! - validation: [`MissingField`], raised before anything reaches the store.
//! - parsing: [`InvalidAmount`], [`InvalidDate`], [`InvalidMonth`],
//!   [`UnknownLabel`] and [`Csv`], raised while reading user or backup input.
//! - cache consistency: [`StaleMonth`], raised when data for a month that is
//!   not the selected one tries to enter the cache.
//!
//!  [`MissingField`]: EngineError::MissingField
//!  [`InvalidAmount`]: EngineError::InvalidAmount
//!  [`InvalidDate`]: EngineError::InvalidDate
//!  [`InvalidMonth`]: EngineError::InvalidMonth
//!  [`UnknownLabel`]: EngineError::UnknownLabel
//!  [`Csv`]: EngineError::Csv
//!  [`StaleMonth`]: EngineError::StaleMonth
use thiserror::Error;

use crate::MonthKey;

/// Engine custom errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Invalid date: {0}")]
    InvalidDate(String),
    #[error("Invalid month: {0}")]
    InvalidMonth(String),
    #[error("Unknown {field}: \"{value}\"")]
    UnknownLabel { field: &'static str, value: String },
    #[error("CSV error: {0}")]
    Csv(String),
    #[error("Stale data for {got}, selected month is {selected}")]
    StaleMonth { selected: String, got: MonthKey },
}

impl EngineError {
    /// Returns `true` for errors caught before any network call.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::MissingField(_))
    }
}

impl From<csv::Error> for EngineError {
    fn from(value: csv::Error) -> Self {
        Self::Csv(value.to_string())
    }
}

//! Error types for schedule generation.
//!
//! Configuration problems fail fast at the entry point. Data-quality gaps
//! (unclassifiable text, missing productivity entries) are not errors; they
//! are recovered locally and reported as [`Diagnostic`](crate::models::Diagnostic)s.

use chrono::NaiveDate;
use thiserror::Error;

use crate::validation::ValidationError;

/// Invalid configuration or input values.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigError {
    #[error("calendar has no working days configured")]
    NoWorkingDays,

    #[error("rainy-day buffer must be within 0..=100 percent, got {value}")]
    InvalidRainyBuffer { value: f64 },

    #[error("Ramadan window starting {start} has productivity factor {factor}; expected 0 < factor <= 1")]
    InvalidProductivityFactor { start: NaiveDate, factor: f64 },

    #[error("Ramadan window ends ({end}) before it starts ({start})")]
    InvalidRamadanWindow { start: NaiveDate, end: NaiveDate },

    #[error("BOQ item '{item_id}' has invalid quantity {quantity}; expected a positive finite number")]
    InvalidQuantity { item_id: String, quantity: f64 },

    #[error("BOQ item '{item_id}' has negative unit price {unit_price}")]
    NegativeUnitPrice { item_id: String, unit_price: f64 },

    #[error("productivity rate '{activity_type}' is invalid: {reason}")]
    InvalidRate {
        activity_type: String,
        reason: String,
    },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
}

/// Top-level error for schedule generation.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ScheduleError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("validation failed with {} error(s): {}", .0.len(), summarize(.0))]
    Validation(Vec<ValidationError>),

    #[error("date arithmetic overflowed after {0}")]
    DateOutOfRange(NaiveDate),
}

impl From<Vec<ValidationError>> for ScheduleError {
    fn from(errors: Vec<ValidationError>) -> Self {
        Self::Validation(errors)
    }
}

fn summarize(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, ScheduleError>;

//! Error types for quote validation
//!
//! Comprehensive error taxonomy using thiserror

use thiserror::Error;

/// Rejection of a quote request before any pricing is attempted
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("plannedDistanceKm must be >= 0, got {0}")]
    NegativeDistance(f64),

    #[error("plannedDistanceKm must be a finite number")]
    NonFiniteDistance,

    #[error("parcelCount must be >= 1, got {0}")]
    ParcelCountTooLow(i64),

    #[error("parcelCount {0} exceeds the supported maximum")]
    ParcelCountTooHigh(i64),
}

/// Pricing parameters that cannot produce a well-defined rate
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParameterError {
    #[error("{field} must be a finite number")]
    NonFinite { field: &'static str },

    #[error("minRate {min_rate} exceeds maxRate {max_rate}")]
    InvertedBounds { min_rate: f64, max_rate: f64 },

    #[error("config version must not be empty")]
    EmptyVersion,
}

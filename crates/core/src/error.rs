//! Error types for test-data generation and the measurement harness
//!
//! The lookup structures and `dedupe` are total and never fail; only the
//! collaborators that build synthetic inputs can reject a request.

use thiserror::Error;

/// Harness errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(
        "Unsatisfiable duplicate rate: num_unique = {num_unique} with num_elems = {num_elems}, dup_rate = {dup_rate:.2}"
    )]
    UnsatisfiableDupRate {
        num_elems: usize,
        dup_rate: f64,
        num_unique: usize,
    },

    #[error("Fractional element count: {num_elems} * {rate:.2} is not a whole number")]
    FractionalCount { num_elems: usize, rate: f64 },

    #[error("Unknown finder: {0} (expected 'slice' or 'map')")]
    UnknownFinder(String),
}

/// Result type alias for harness operations
pub type Result<T> = std::result::Result<T, Error>;

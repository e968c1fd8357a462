//! Error types for snapshot parsing, validation and configuration

use thiserror::Error;

/// Result alias used throughout the library.
pub type Result<T> = std::result::Result<T, RouterError>;

/// Errors raised at the boundary of the routing core.
///
/// The allocator and router never return these: an infeasible order is
/// signalled by an empty result, not an error.
#[derive(Debug, Error)]
pub enum RouterError {
    /// A wire field could not be parsed as a finite decimal number
    #[error("invalid number in `{field}`: {value:?}")]
    InvalidNumber {
        /// Field name as it appears on the wire
        field: &'static str,
        /// Raw value that failed to parse
        value: String,
    },

    /// A pool snapshot parsed but violates a pool invariant
    #[error("invalid pool {id}: {reason}")]
    InvalidPool {
        /// Pool identifier
        id: String,
        /// What is wrong with it
        reason: String,
    },

    /// Order parameters are unusable
    #[error("invalid order: {0}")]
    InvalidOrder(String),

    /// Router tunables are unusable
    #[error("invalid router config: {0}")]
    InvalidConfig(String),

    /// JSON (de)serialization failure
    #[error("serialization error: {0}")]
    SerdeJson(#[from] serde_json::Error),

    /// CSV write failure
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// I/O failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

//! Error types for the projection and classification engine

use thiserror::Error;

/// Errors raised by section projection and classifier construction.
///
/// Unclassifiable raw records are not errors: they resolve to `None`,
/// an empty attribute map, or the classifier's default code.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum XsError {
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    #[error("Degenerate geometry: {0}")]
    DegenerateGeometry(String),

    #[error("Invalid depth interval: base {base} must lie below top {top}")]
    InvalidInterval { top: f64, base: f64 },

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl XsError {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        XsError::Configuration(msg.into())
    }

    pub(crate) fn degenerate(msg: impl Into<String>) -> Self {
        XsError::DegenerateGeometry(msg.into())
    }
}

pub type XsResult<T> = Result<T, XsError>;

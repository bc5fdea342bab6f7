//! Errors raised while building a constraint table

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConstraintError {
    #[error("constraint name must not be empty")]
    EmptyName,

    #[error("duplicate constraint for field '{0}'")]
    DuplicateField(String),

    #[error("bounds for '{field}' are inverted: {min} > {max}")]
    InvertedBounds { field: String, min: f64, max: f64 },

    #[error("bounds for '{0}' must be finite")]
    NonFiniteBound(String),
}

/// Result type for constraint table construction
pub type Result<T> = std::result::Result<T, ConstraintError>;

//! Parse errors for S-language names and call text.

use thiserror::Error;

/// Errors that occur while parsing variables, labels, constants and calls.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Not of the form `y`, `x<n>` or `z<n>` (n ≥ 1).
    #[error("invalid variable '{0}'")]
    InvalidVariable(String),

    /// Not of the form `L<n>` or `EXIT`.
    #[error("invalid label '{0}'")]
    InvalidLabel(String),

    /// Constant is not a non-negative integer.
    #[error("invalid constant '{0}'")]
    InvalidConstant(String),

    /// Call text does not follow `(NAME,arg,...)`.
    #[error("invalid call '{text}': {reason}")]
    InvalidCall { text: String, reason: &'static str },
}

//! Error types for the S-language assembler.

use thiserror::Error;

/// Errors produced while reading program text. Every variant carries the
/// 1-based line number.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AsmError {
    /// An unrecognized instruction mnemonic was encountered.
    #[error("line {line}: unknown mnemonic '{token}'")]
    UnknownMnemonic { line: usize, token: String },

    /// An instruction did not have enough arguments.
    #[error("line {line}: {mnemonic} expects {expected} argument(s)")]
    MissingArgument {
        line: usize,
        mnemonic: &'static str,
        expected: usize,
    },

    /// A constant could not be parsed or is out of range.
    #[error("line {line}: invalid number '{token}'")]
    InvalidNumber { line: usize, token: String },

    /// A token appeared where it was not expected.
    #[error("line {line}: unexpected token '{token}'")]
    UnexpectedToken { line: usize, token: String },

    #[error("line {line}: invalid variable '{token}'")]
    InvalidVariable { line: usize, token: String },

    #[error("line {line}: invalid label '{token}'")]
    InvalidLabel { line: usize, token: String },

    /// A program or function name is not an identifier.
    #[error("line {line}: invalid name '{token}'")]
    InvalidName { line: usize, token: String },

    #[error("line {line}: invalid call '{token}': {reason}")]
    InvalidCall {
        line: usize,
        token: String,
        reason: &'static str,
    },

    /// A `(` without its matching `)`.
    #[error("line {line}: unterminated call")]
    UnterminatedCall { line: usize },

    /// A label prefix with no instruction after it.
    #[error("line {line}: label '{label}' is not followed by an instruction")]
    DanglingLabel { line: usize, label: String },

    /// `FUNCTION` inside another function block.
    #[error("line {line}: FUNCTION inside a function block")]
    NestedFunction { line: usize },

    /// `FUNCTION` block without `END`.
    #[error("line {line}: function '{name}' is never closed with END")]
    UnclosedFunction { line: usize, name: String },

    /// `END` outside a function block.
    #[error("line {line}: END without FUNCTION")]
    StrayEnd { line: usize },
}

//! Verification errors for the S-language verifier.
//!
//! Every error names the definition it was found in, and instruction-level
//! errors include the 0-based instruction index (`at`). The verifier collects
//! ALL errors, not just the first.

use slang_common::Label;
use thiserror::Error;

/// Errors found while validating a module.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerifyError {
    // --- Structural ---
    /// A program or function with no instructions.
    #[error("{function}: definition has no instructions")]
    EmptyDefinition { function: String },

    /// Two auxiliary functions share a name.
    #[error("function '{name}' is defined more than once")]
    DuplicateFunction { name: String },

    // --- Labels ---
    /// The same label attached to two instructions.
    #[error("{function}: label {label} at instruction {at} is already attached at instruction {first}")]
    DuplicateLabel {
        function: String,
        label: Label,
        at: usize,
        first: usize,
    },

    /// `EXIT` used as an instruction's own label.
    #[error("{function}: EXIT cannot label instruction {at}")]
    ExitAsLabel { function: String, at: usize },

    /// Jump to a label no instruction carries.
    #[error("{function}: jump to undefined label {label} at instruction {at}")]
    UndefinedLabel {
        function: String,
        label: Label,
        at: usize,
    },

    // --- Calls ---
    /// Call to a function the module does not define.
    #[error("{function}: call to unknown function '{name}' at instruction {at}")]
    UnknownFunction {
        function: String,
        name: String,
        at: usize,
    },

    /// Call with a different number of arguments than the callee's inputs.
    #[error("{function}: '{callee}' expects {expected} arguments, got {found} at instruction {at}")]
    ArityMismatch {
        function: String,
        callee: String,
        expected: usize,
        found: usize,
        at: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_duplicate_label() {
        let e = VerifyError::DuplicateLabel {
            function: "Main".to_string(),
            label: Label::Named(2),
            at: 5,
            first: 1,
        };
        assert_eq!(
            e.to_string(),
            "Main: label L2 at instruction 5 is already attached at instruction 1"
        );
    }

    #[test]
    fn display_undefined_label() {
        let e = VerifyError::UndefinedLabel {
            function: "Main".to_string(),
            label: Label::Named(9),
            at: 0,
        };
        assert_eq!(e.to_string(), "Main: jump to undefined label L9 at instruction 0");
    }

    #[test]
    fn display_arity_mismatch() {
        let e = VerifyError::ArityMismatch {
            function: "Main".to_string(),
            callee: "Add".to_string(),
            expected: 2,
            found: 3,
            at: 4,
        };
        assert_eq!(
            e.to_string(),
            "Main: 'Add' expects 2 arguments, got 3 at instruction 4"
        );
    }

    #[test]
    fn display_empty_definition() {
        let e = VerifyError::EmptyDefinition {
            function: "Id".to_string(),
        };
        assert_eq!(e.to_string(), "Id: definition has no instructions");
    }
}

//! Engine errors.
//!
//! Each one aborts the current run, expansion or collapse. Expansion and
//! collapse never leave a partially rewritten instruction list behind.

use slang_common::Label;
use thiserror::Error;

/// Errors that occur while expanding, collapsing or running a function.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// A jump named a label that is not attached to any instruction.
    #[error("jump to undefined label {label} at instruction {at}")]
    UndefinedLabelJump { label: Label, at: usize },

    /// A composition instruction named a function missing from the registry.
    #[error("unknown function '{name}'")]
    UnknownFunctionReference { name: String },

    /// A call passed a different number of arguments than the callee declares.
    #[error("function '{function}' expects {expected} arguments, got {found}")]
    ArgumentCountMismatch {
        function: String,
        expected: usize,
        found: usize,
    },

    /// A targeted expand or collapse named a signature not in the list.
    #[error("no instruction with signature '{signature}'")]
    MalformedDerivationRequest { signature: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_undefined_label() {
        let e = EngineError::UndefinedLabelJump {
            label: Label::Named(4),
            at: 2,
        };
        assert_eq!(e.to_string(), "jump to undefined label L4 at instruction 2");
    }

    #[test]
    fn display_argument_count() {
        let e = EngineError::ArgumentCountMismatch {
            function: "Add".to_string(),
            expected: 2,
            found: 1,
        };
        assert_eq!(e.to_string(), "function 'Add' expects 2 arguments, got 1");
    }

    #[test]
    fn display_malformed_request() {
        let e = EngineError::MalformedDerivationRequest {
            signature: "abc".to_string(),
        };
        assert_eq!(e.to_string(), "no instruction with signature 'abc'");
    }
}

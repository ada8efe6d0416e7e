//! S-language verifier: load-time validation of modules.
//!
//! The verifier checks a [`Module`] BEFORE it is handed to the engine, which
//! assumes every jump resolves and every call matches its callee. It collects
//! ALL errors (not just the first) and returns them.
//!
//! # Usage
//!
//! ```
//! use slang_common::{Definition, Instruction, Label, Module, Variable};
//! use slang_verifier::verify;
//!
//! let module = Module::new(
//!     Definition::new(
//!         "Main",
//!         vec![
//!             Instruction::increase(Variable::RESULT).labeled(Label::Named(1)),
//!             Instruction::jump_zero(Variable::input(1), Label::Named(1)),
//!         ],
//!     ),
//!     vec![],
//! );
//!
//! assert!(verify(&module).is_ok());
//! ```
//!
//! # Passes
//!
//! 1. **Structural**: non-empty definitions, unique function names
//! 2. **Labels**: unique labels, no `EXIT` label, every jump resolves
//! 3. **Calls**: every callee exists and gets the right number of arguments

pub mod calls;
pub mod error;
pub mod labels;
pub mod structural;

pub use error::VerifyError;

use slang_common::Module;

/// Verify a module for correctness.
///
/// Returns `Ok(())` if the module passes all checks, or
/// `Err(Vec<VerifyError>)` with all errors found.
pub fn verify(module: &Module) -> Result<(), Vec<VerifyError>> {
    let mut all_errors = Vec::new();

    // Pass 1: Structural
    all_errors.extend(structural::check_structural(module));

    // Pass 2: Labels, per definition
    for def in std::iter::once(&module.program).chain(&module.functions) {
        all_errors.extend(labels::check_labels(def));
    }

    // Pass 3: Calls
    all_errors.extend(calls::check_calls(module));

    if all_errors.is_empty() {
        Ok(())
    } else {
        Err(all_errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slang_common::{Definition, Instruction, Label, Variable};

    #[test]
    fn minimal_valid_program() {
        let module = Module::new(
            Definition::new("Main", vec![Instruction::increase(Variable::RESULT)]),
            vec![],
        );
        assert!(verify(&module).is_ok());
    }

    #[test]
    fn empty_program() {
        let module = Module::new(Definition::new("Main", vec![]), vec![]);
        let errors = verify(&module).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| matches!(e, VerifyError::EmptyDefinition { .. })));
    }

    #[test]
    fn multiple_errors_collected() {
        let module = Module::new(
            Definition::new(
                "Main",
                vec![
                    Instruction::goto_label(Label::Named(4)),
                    Instruction::quote(Variable::RESULT, "(Nope,x1)".parse().unwrap()),
                ],
            ),
            vec![],
        );
        let errors = verify(&module).unwrap_err();
        assert_eq!(errors.len(), 2, "expected two errors, got: {errors:?}");
    }
}

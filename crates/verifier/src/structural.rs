//! Structural pass: non-empty definitions and unique function names.

use std::collections::BTreeSet;

use slang_common::Module;

use crate::error::VerifyError;

/// Run the structural validation pass.
pub fn check_structural(module: &Module) -> Vec<VerifyError> {
    let mut errors = Vec::new();

    for def in std::iter::once(&module.program).chain(&module.functions) {
        if def.instructions.is_empty() {
            errors.push(VerifyError::EmptyDefinition {
                function: def.name.clone(),
            });
        }
    }

    let mut seen = BTreeSet::new();
    let mut reported = BTreeSet::new();
    for def in &module.functions {
        if !seen.insert(def.name.as_str()) && reported.insert(def.name.as_str()) {
            errors.push(VerifyError::DuplicateFunction {
                name: def.name.clone(),
            });
        }
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use slang_common::{Definition, Instruction, Variable};

    fn body() -> Vec<Instruction> {
        vec![Instruction::increase(Variable::RESULT)]
    }

    #[test]
    fn valid_module() {
        let m = Module::new(Definition::new("P", body()), vec![Definition::new("F", body())]);
        assert!(check_structural(&m).is_empty());
    }

    #[test]
    fn empty_program_and_function() {
        let m = Module::new(Definition::new("P", vec![]), vec![Definition::new("F", vec![])]);
        assert_eq!(check_structural(&m).len(), 2);
    }

    #[test]
    fn duplicate_reported_once() {
        let m = Module::new(
            Definition::new("P", body()),
            vec![
                Definition::new("F", body()),
                Definition::new("F", body()),
                Definition::new("F", body()),
            ],
        );
        assert_eq!(
            check_structural(&m),
            vec![VerifyError::DuplicateFunction {
                name: "F".to_string()
            }]
        );
    }
}

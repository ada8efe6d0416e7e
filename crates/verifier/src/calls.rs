//! Call pass: every function referenced by QUOTE or JUMP_EQUAL_FUNCTION,
//! including those nested in arguments, exists and receives exactly as many
//! arguments as it has declared inputs.

use std::collections::BTreeMap;

use slang_common::{Argument, Call, Definition, Module};

use crate::error::VerifyError;

/// Run the call pass over every definition of the module.
pub fn check_calls(module: &Module) -> Vec<VerifyError> {
    let arity: BTreeMap<&str, usize> = module
        .functions
        .iter()
        .map(|f| (f.name.as_str(), f.inputs().len()))
        .collect();

    let mut errors = Vec::new();
    for def in std::iter::once(&module.program).chain(&module.functions) {
        check_definition(def, &arity, &mut errors);
    }
    errors
}

fn check_definition(def: &Definition, arity: &BTreeMap<&str, usize>, errors: &mut Vec<VerifyError>) {
    for (at, instr) in def.instructions.iter().enumerate() {
        if let Some(call) = instr.call() {
            check_call(call, def, at, arity, errors);
        }
    }
}

fn check_call(
    call: &Call,
    def: &Definition,
    at: usize,
    arity: &BTreeMap<&str, usize>,
    errors: &mut Vec<VerifyError>,
) {
    match arity.get(call.function.as_str()) {
        None => errors.push(VerifyError::UnknownFunction {
            function: def.name.clone(),
            name: call.function.clone(),
            at,
        }),
        Some(&expected) if expected != call.arguments.len() => {
            errors.push(VerifyError::ArityMismatch {
                function: def.name.clone(),
                callee: call.function.clone(),
                expected,
                found: call.arguments.len(),
                at,
            })
        }
        Some(_) => {}
    }
    for arg in &call.arguments {
        if let Argument::Call(inner) = arg {
            check_call(inner, def, at, arity, errors);
        }
    }
}

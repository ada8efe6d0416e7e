//! Lowering degree: how many expansion rounds an instruction needs before
//! only basic instructions remain.
//!
//! Fixed kinds take their degree from the kind table. A composition
//! instruction is one round more than the deepest thing its expansion emits:
//! the tail (an assignment for QUOTE, a variable comparison for
//! JUMP_EQUAL_FUNCTION), every instruction of the inlined callee body, and a
//! QUOTE for every function-valued argument. The zeroing of callee state
//! sits below the tail and never raises the count. A function already being
//! measured further up the call chain contributes 0, so recursive functions
//! get a finite answer.

use slang_common::{Argument, Call, Instruction, Op, OpKind};

use crate::function::Function;
use crate::program::Registry;

pub(crate) fn function_degree(function: &Function, registry: &Registry) -> u32 {
    let mut visiting = vec![function.name().to_string()];
    body_degree(function, registry, &mut visiting)
}

/// Degree of a single instruction as it would be expanded inside a function
/// resolved against `registry`.
pub fn instruction_degree(instr: &Instruction, registry: &Registry) -> u32 {
    degree_of(instr, registry, &mut Vec::new())
}

fn body_degree(function: &Function, registry: &Registry, visiting: &mut Vec<String>) -> u32 {
    function
        .instructions()
        .map(|i| degree_of(i, registry, visiting))
        .max()
        .unwrap_or(0)
}

fn degree_of(instr: &Instruction, registry: &Registry, visiting: &mut Vec<String>) -> u32 {
    match &instr.op {
        Op::Quote { call } => 1 + tail_degree(OpKind::Assignment).max(call_degree(call, registry, visiting)),
        Op::JumpEqualFunction { call, .. } => {
            1 + tail_degree(OpKind::JumpEqualVariable).max(call_degree(call, registry, visiting))
        }
        _ => instr.kind().degree().unwrap_or(0),
    }
}

fn tail_degree(kind: OpKind) -> u32 {
    kind.degree().unwrap_or(0)
}

fn call_degree(call: &Call, registry: &Registry, visiting: &mut Vec<String>) -> u32 {
    let body = match registry.get(&call.function) {
        Some(callee) if !visiting.contains(&call.function) => {
            visiting.push(call.function.clone());
            let d = body_degree(callee, registry, visiting);
            visiting.pop();
            d
        }
        _ => 0,
    };
    let arguments = call
        .arguments
        .iter()
        .map(|arg| match arg {
            Argument::Variable(_) => tail_degree(OpKind::Assignment),
            Argument::Call(inner) => {
                1 + tail_degree(OpKind::Assignment).max(call_degree(inner, registry, visiting))
            }
        })
        .max()
        .unwrap_or(0);
    body.max(arguments)
}

#[cfg(test)]
mod tests {
    use super::*;
    use slang_common::{Definition, Label, Variable};

    fn successor() -> Function {
        Function::from_definition(&Definition::new(
            "Successor",
            vec![
                Instruction::assignment(Variable::RESULT, Variable::input(1)),
                Instruction::increase(Variable::RESULT),
            ],
        ))
    }

    fn registry() -> Registry {
        let mut r = Registry::new();
        r.insert(successor());
        r
    }

    #[test]
    fn fixed_kinds_use_the_table() {
        let r = Registry::new();
        let jec = Instruction::jump_equal_constant(Variable::input(1), 3, Label::Named(1));
        assert_eq!(instruction_degree(&jec, &r), 3);
        assert_eq!(instruction_degree(&Instruction::increase(Variable::RESULT), &r), 0);
    }

    #[test]
    fn quote_is_one_above_callee_and_tail() {
        let r = registry();
        let quote = Instruction::quote(Variable::RESULT, "(Successor,x1)".parse().unwrap());
        assert_eq!(instruction_degree(&quote, &r), 3);

        let nested = Instruction::quote(Variable::RESULT, "(Successor,(Successor,x1))".parse().unwrap());
        assert_eq!(instruction_degree(&nested, &r), 4);
    }

    #[test]
    fn jump_equal_function_has_deeper_tail() {
        let r = registry();
        let jef = Instruction::jump_equal_function(
            Variable::input(2),
            "(Successor,x1)".parse().unwrap(),
            Label::Exit,
        );
        assert_eq!(instruction_degree(&jef, &r), 4);
    }

    #[test]
    fn recursive_function_terminates() {
        let mut r = Registry::new();
        r.insert(Function::from_definition(&Definition::new(
            "Loop",
            vec![Instruction::quote(Variable::RESULT, "(Loop,x1)".parse().unwrap())],
        )));
        let quote = Instruction::quote(Variable::RESULT, "(Loop,x1)".parse().unwrap());
        assert_eq!(instruction_degree(&quote, &r), 4);
    }
}

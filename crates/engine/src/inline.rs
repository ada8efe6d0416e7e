//! Inlining of QUOTE and JUMP_EQUAL_FUNCTION.
//!
//! The callee body is copied in with every variable and named label renamed
//! to fresh ones:
//!
//! ```text
//!     v ← v                     anchor, takes the instruction's label
//!     r ← 0, z ← 0              result and callee work variables
//!     s1 ← a1 … sn ← an         bind arguments (QUOTE for call arguments)
//!     <callee body, renamed>    callee y becomes r
//!     v ← r                     QUOTE
//!     IF v = r GOTO target      JUMP_EQUAL_FUNCTION
//! ```
//!
//! A jump to `EXIT` inside the body is redirected to a label attached to the
//! tail, unless the jumping instruction is itself the last generated one, in
//! which case `EXIT` is kept.

use std::collections::BTreeMap;

use slang_common::{Argument, Call, Instruction, Label, Variable};

use crate::error::EngineError;
use crate::expand::Expander;

impl Expander<'_> {
    pub(crate) fn inline(
        &mut self,
        v: Variable,
        call: &Call,
        target: Option<Label>,
    ) -> Result<Vec<Instruction>, EngineError> {
        let registry = self.registry;
        let callee = registry
            .get(&call.function)
            .ok_or_else(|| EngineError::UnknownFunctionReference {
                name: call.function.clone(),
            })?;
        if callee.inputs().len() != call.arguments.len() {
            return Err(EngineError::ArgumentCountMismatch {
                function: call.function.clone(),
                expected: callee.inputs().len(),
                found: call.arguments.len(),
            });
        }

        let mut out = vec![Instruction::neutral(v)];

        let result = self.fresh_work();
        let mut renamed: BTreeMap<Variable, Variable> = BTreeMap::new();
        renamed.insert(Variable::RESULT, result);
        let mut bindings = Vec::with_capacity(call.arguments.len());
        for (input, arg) in callee.inputs().iter().zip(&call.arguments) {
            let slot = self.fresh_work();
            renamed.insert(*input, slot);
            bindings.push(match arg {
                Argument::Variable(a) => Instruction::assignment(slot, *a),
                Argument::Call(inner) => Instruction::quote(slot, inner.clone()),
            });
        }
        let mut locals = vec![result];
        for var in callee.variables() {
            if !renamed.contains_key(var) {
                let fresh = self.fresh_work();
                renamed.insert(*var, fresh);
                locals.push(fresh);
            }
        }

        // Inside a loop the same copy runs again, so callee state starts at 0
        // on every entry.
        out.extend(locals.into_iter().map(Instruction::zero_variable));
        out.extend(bindings);

        let mut relabeled: BTreeMap<Label, Label> = BTreeMap::new();
        for instr in callee.instructions() {
            for label in [Some(instr.label), instr.target()].into_iter().flatten() {
                if label.is_named() && !relabeled.contains_key(&label) {
                    let fresh = self.fresh_label();
                    relabeled.insert(label, fresh);
                }
            }
        }

        for instr in callee.instructions() {
            let mut copy = instr.clone();
            copy.map_variables(&|var| renamed.get(&var).copied().unwrap_or(var));
            copy.map_labels(&|l| relabeled.get(&l).copied().unwrap_or(l));
            out.push(copy);
        }

        out.push(match target {
            None => Instruction::assignment(v, result),
            Some(target) => Instruction::jump_equal_variable(v, result, target),
        });

        self.redirect_exit(&mut out, 1);
        Ok(out)
    }

    /// Redirects jumps to `EXIT` in `ops[from..]` to a fresh label placed
    /// on the last instruction. A jump that is itself the last instruction
    /// keeps `EXIT`.
    pub(crate) fn redirect_exit(&mut self, ops: &mut [Instruction], from: usize) {
        let last = ops.len().saturating_sub(1);
        let mut exit_label = None;
        for i in from..ops.len() {
            if i == last || ops[i].target() != Some(Label::Exit) {
                continue;
            }
            let label = match exit_label {
                Some(label) => label,
                None => {
                    let label = self.fresh_label();
                    exit_label = Some(label);
                    label
                }
            };
            if let Some(target) = ops[i].target_mut() {
                *target = label;
            }
        }
        if let (Some(label), Some(tail)) = (exit_label, ops.last_mut()) {
            tail.label = label;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use slang_common::Definition;

    use super::*;
    use crate::arena::Arena;
    use crate::context::NameGen;
    use crate::function::Function;
    use crate::program::Registry;

    fn expander<'a>(arena: &'a mut Arena, names: &'a mut NameGen, registry: &'a Registry) -> Expander<'a> {
        let variables: BTreeSet<Variable> = [Variable::RESULT, Variable::input(1)].into_iter().collect();
        Expander::new(arena, names, BTreeSet::new(), variables, registry)
    }

    #[test]
    fn exit_jump_before_tail_is_redirected() {
        let (mut arena, mut names, registry) = (Arena::new(), NameGen::default(), Registry::new());
        let mut ex = expander(&mut arena, &mut names, &registry);
        let mut ops = vec![
            Instruction::neutral(Variable::RESULT),
            Instruction::jump_zero(Variable::work(1), Label::Exit),
            Instruction::goto_label(Label::Exit),
            Instruction::assignment(Variable::RESULT, Variable::work(1)),
        ];
        ex.redirect_exit(&mut ops, 1);
        assert_eq!(ops[1].target(), Some(Label::Named(1)));
        assert_eq!(ops[2].target(), Some(Label::Named(1)));
        assert_eq!(ops[3].label, Label::Named(1));
    }

    #[test]
    fn exit_jump_in_last_position_is_kept() {
        let (mut arena, mut names, registry) = (Arena::new(), NameGen::default(), Registry::new());
        let mut ex = expander(&mut arena, &mut names, &registry);
        let mut ops = vec![
            Instruction::neutral(Variable::RESULT),
            Instruction::increase(Variable::work(1)),
            Instruction::jump_equal_variable(Variable::RESULT, Variable::work(1), Label::Exit),
        ];
        ex.redirect_exit(&mut ops, 1);
        assert_eq!(ops[2].target(), Some(Label::Exit));
        assert_eq!(ops[2].label, Label::Empty);
        assert_eq!(names, NameGen::default());
    }

    #[test]
    fn callee_state_is_zeroed_before_arguments_are_bound() {
        let mut registry = Registry::new();
        registry.insert(Function::from_definition(&Definition::new(
            "Keep",
            vec![
                Instruction::increase(Variable::work(1)),
                Instruction::assignment(Variable::RESULT, Variable::input(1)),
            ],
        )));
        let (mut arena, mut names) = (Arena::new(), NameGen::default());
        let mut ex = expander(&mut arena, &mut names, &registry);
        let call: Call = "(Keep,x1)".parse().unwrap();

        let ops = ex.inline(Variable::RESULT, &call, None).unwrap();
        let text: Vec<String> = ops.iter().map(ToString::to_string).collect();
        assert_eq!(
            text,
            ["y ← y", "z1 ← 0", "z3 ← 0", "z2 ← x1", "z3 ← z3 + 1", "z1 ← z2", "y ← z1"]
        );
    }
}

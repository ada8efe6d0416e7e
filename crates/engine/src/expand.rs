//! Expansion: rewriting synthetic instructions into lower-degree ones.
//!
//! Every rewrite produces children of the rewritten node in the arena, so the
//! derivation tree can be folded back by collapse. The rewritten
//! instruction's own label moves to its first child. Fresh labels and work
//! variables come from the function's generators and never collide with
//! names already in use.

use std::collections::BTreeSet;

use slang_common::{Instruction, Label, Op, Variable};
use tracing::debug;

use crate::arena::{Arena, OpId};
use crate::context::NameGen;
use crate::error::EngineError;
use crate::function::Function;
use crate::program::Registry;

pub(crate) struct Expander<'a> {
    arena: &'a mut Arena,
    names: &'a mut NameGen,
    labels: BTreeSet<Label>,
    variables: BTreeSet<Variable>,
    pub(crate) registry: &'a Registry,
}

impl<'a> Expander<'a> {
    pub(crate) fn new(
        arena: &'a mut Arena,
        names: &'a mut NameGen,
        labels: BTreeSet<Label>,
        variables: BTreeSet<Variable>,
        registry: &'a Registry,
    ) -> Self {
        Self {
            arena,
            names,
            labels,
            variables,
            registry,
        }
    }

    pub(crate) fn fresh_label(&mut self) -> Label {
        self.names.label(&mut self.labels)
    }

    pub(crate) fn fresh_work(&mut self) -> Variable {
        self.names.work(&mut self.variables)
    }

    /// Expands node `id` `depth` rounds deep, returning the ids that replace
    /// it in the sequence. Depth 0 and basic instructions stay as they are.
    pub(crate) fn expand(&mut self, id: OpId, depth: u32) -> Result<Vec<OpId>, EngineError> {
        let instr = self.arena.get(id).instruction.clone();
        if depth == 0 || instr.kind().is_basic() {
            return Ok(vec![id]);
        }

        let mut children = self.rewrite(&instr)?;
        if let Some(first) = children.first_mut() {
            first.label = instr.label;
        }

        let mut out = Vec::with_capacity(children.len());
        for (ordinal, child) in children.into_iter().enumerate() {
            let child_id = self.arena.push_child(id, ordinal, child);
            out.extend(self.expand(child_id, depth - 1)?);
        }
        Ok(out)
    }

    /// One round of rewriting. The first returned instruction is unlabeled;
    /// the caller attaches the original label to it.
    fn rewrite(&mut self, instr: &Instruction) -> Result<Vec<Instruction>, EngineError> {
        let v = instr.variable;
        let rewritten = match &instr.op {
            Op::Increase | Op::Decrease | Op::JumpNotZero { .. } | Op::Neutral => {
                vec![instr.clone().labeled(Label::Empty)]
            }
            Op::ZeroVariable => self.zero_variable(v),
            Op::GotoLabel { target } => self.goto_label(*target),
            Op::ConstantAssignment { constant } => self.constant_assignment(v, *constant),
            Op::Assignment { source } => self.assignment(v, *source),
            Op::JumpZero { target } => self.jump_zero(v, *target),
            Op::JumpEqualConstant { constant, target } => self.jump_equal_constant(v, *constant, *target),
            Op::JumpEqualVariable { other, target } => self.jump_equal_variable(v, *other, *target),
            Op::Quote { call } => self.inline(v, call, None)?,
            Op::JumpEqualFunction { call, target } => self.inline(v, call, Some(*target))?,
        };
        Ok(rewritten)
    }

    /// ```text
    ///     IF v ≠ 0 GOTO Lb
    ///     z ← z + 1
    ///     IF z ≠ 0 GOTO Le
    /// Lb: v ← v - 1
    ///     IF v ≠ 0 GOTO Lb
    /// Le: v ← v
    /// ```
    fn zero_variable(&mut self, v: Variable) -> Vec<Instruction> {
        let body = self.fresh_label();
        let end = self.fresh_label();
        let z = self.fresh_work();
        vec![
            Instruction::jump_not_zero(v, body),
            Instruction::increase(z),
            Instruction::jump_not_zero(z, end),
            Instruction::decrease(v).labeled(body),
            Instruction::jump_not_zero(v, body),
            Instruction::neutral(v).labeled(end),
        ]
    }

    fn goto_label(&mut self, target: Label) -> Vec<Instruction> {
        let z = self.fresh_work();
        vec![Instruction::increase(z), Instruction::jump_not_zero(z, target)]
    }

    /// ```text
    ///     v ← 0
    ///     z ← z + 1        (k times)
    ///     IF z ≠ 0 GOTO Lp
    ///     GOTO La
    /// Lp: z ← z - 1
    ///     v ← v + 1
    ///     IF z ≠ 0 GOTO Lp
    /// La: v ← v
    /// ```
    fn constant_assignment(&mut self, v: Variable, constant: u64) -> Vec<Instruction> {
        let pump = self.fresh_label();
        let after = self.fresh_label();
        let z = self.fresh_work();
        let mut out = vec![Instruction::zero_variable(v)];
        out.extend((0..constant).map(|_| Instruction::increase(z)));
        out.extend([
            Instruction::jump_not_zero(z, pump),
            Instruction::goto_label(after),
            Instruction::decrease(z).labeled(pump),
            Instruction::increase(v),
            Instruction::jump_not_zero(z, pump),
            Instruction::neutral(v).labeled(after),
        ]);
        out
    }

    /// Drains `source` into a work variable, then pours it back into both
    /// `source` and `v`.
    ///
    /// ```text
    ///     v ← 0
    ///     IF src ≠ 0 GOTO Ld
    ///     GOTO Le
    /// Ld: src ← src - 1
    ///     z ← z + 1
    ///     IF src ≠ 0 GOTO Ld
    /// Lr: z ← z - 1
    ///     v ← v + 1
    ///     src ← src + 1
    ///     IF z ≠ 0 GOTO Lr
    /// Le: v ← v
    /// ```
    fn assignment(&mut self, v: Variable, source: Variable) -> Vec<Instruction> {
        if v == source {
            return vec![Instruction::neutral(v)];
        }
        let drain = self.fresh_label();
        let refill = self.fresh_label();
        let end = self.fresh_label();
        let z = self.fresh_work();
        vec![
            Instruction::zero_variable(v),
            Instruction::jump_not_zero(source, drain),
            Instruction::goto_label(end),
            Instruction::decrease(source).labeled(drain),
            Instruction::increase(z),
            Instruction::jump_not_zero(source, drain),
            Instruction::decrease(z).labeled(refill),
            Instruction::increase(v),
            Instruction::increase(source),
            Instruction::jump_not_zero(z, refill),
            Instruction::neutral(v).labeled(end),
        ]
    }

    fn jump_zero(&mut self, v: Variable, target: Label) -> Vec<Instruction> {
        let skip = self.fresh_label();
        vec![
            Instruction::jump_not_zero(v, skip),
            Instruction::goto_label(target),
            Instruction::neutral(v).labeled(skip),
        ]
    }

    /// ```text
    ///     z ← v
    ///     IF z = 0 GOTO Ln   ┐
    ///     z ← z - 1          ┘ k times
    ///     IF z ≠ 0 GOTO Ln
    ///     GOTO target
    /// Ln: v ← v
    /// ```
    fn jump_equal_constant(&mut self, v: Variable, constant: u64, target: Label) -> Vec<Instruction> {
        let not_equal = self.fresh_label();
        let z = self.fresh_work();
        let mut out = vec![Instruction::assignment(z, v)];
        for _ in 0..constant {
            out.push(Instruction::jump_zero(z, not_equal));
            out.push(Instruction::decrease(z));
        }
        out.extend([
            Instruction::jump_not_zero(z, not_equal),
            Instruction::goto_label(target),
            Instruction::neutral(v).labeled(not_equal),
        ]);
        out
    }

    /// ```text
    ///     z1 ← v
    ///     z2 ← w
    /// Ls: IF z1 = 0 GOTO Lc
    ///     IF z2 = 0 GOTO Ln
    ///     z1 ← z1 - 1
    ///     z2 ← z2 - 1
    ///     GOTO Ls
    /// Lc: IF z2 = 0 GOTO target
    /// Ln: v ← v
    /// ```
    fn jump_equal_variable(&mut self, v: Variable, other: Variable, target: Label) -> Vec<Instruction> {
        let step = self.fresh_label();
        let check = self.fresh_label();
        let not_equal = self.fresh_label();
        let z1 = self.fresh_work();
        let z2 = self.fresh_work();
        vec![
            Instruction::assignment(z1, v),
            Instruction::assignment(z2, other),
            Instruction::jump_zero(z1, check).labeled(step),
            Instruction::jump_zero(z2, not_equal),
            Instruction::decrease(z1),
            Instruction::decrease(z2),
            Instruction::goto_label(step),
            Instruction::jump_zero(z2, target).labeled(check),
            Instruction::neutral(v).labeled(not_equal),
        ]
    }
}

impl Function {
    /// Expands every instruction `degree` rounds deep.
    ///
    /// On error the function is left exactly as it was.
    pub fn expand(&mut self, degree: u32, registry: &Registry) -> Result<(), EngineError> {
        let before = self.len();
        let positions: Vec<usize> = (0..self.len()).collect();
        self.expand_positions(&positions, degree, registry)?;
        debug!(function = self.name(), degree, before, after = self.len(), "expanded");
        Ok(())
    }

    /// Expands only the instruction whose signature or digest is `key`.
    pub fn expand_single(&mut self, key: &str, degree: u32, registry: &Registry) -> Result<(), EngineError> {
        let position = self.find(key)?;
        let before = self.len();
        self.expand_positions(&[position], degree, registry)?;
        debug!(function = self.name(), key, degree, before, after = self.len(), "expanded one");
        Ok(())
    }

    fn expand_positions(
        &mut self,
        positions: &[usize],
        degree: u32,
        registry: &Registry,
    ) -> Result<(), EngineError> {
        let checkpoint = self.arena.len();
        let saved_names = self.context.names().clone();
        let labels = self.labels_in_use();
        let variables = self.variables_in_use();

        let mut expander = Expander::new(
            &mut self.arena,
            self.context.names_mut(),
            labels,
            variables,
            registry,
        );
        let mut sequence = Vec::with_capacity(self.sequence.len());
        let mut result = Ok(());
        for (pos, &id) in self.sequence.iter().enumerate() {
            if !positions.contains(&pos) {
                sequence.push(id);
                continue;
            }
            match expander.expand(id, degree) {
                Ok(ids) => sequence.extend(ids),
                Err(e) => {
                    result = Err(e);
                    break;
                }
            }
        }

        if let Err(e) = result {
            self.arena.truncate(checkpoint);
            self.context.set_names(saved_names);
            return Err(e);
        }
        self.sequence = sequence;
        self.rebuild();
        Ok(())
    }
}

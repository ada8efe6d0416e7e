//! S-language instructions.
//!
//! An [`Instruction`] is a primary variable, an optional attached label and
//! an [`Op`] carrying the kind-specific operands. Derivation bookkeeping
//! (parent, signature) lives with the engine, not here.

use std::collections::BTreeSet;
use std::fmt;

use crate::call::Call;
use crate::kind::OpKind;
use crate::label::Label;
use crate::variable::Variable;

/// Kind-specific operands.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Op {
    Increase,
    Decrease,
    JumpNotZero { target: Label },
    Neutral,
    ZeroVariable,
    GotoLabel { target: Label },
    ConstantAssignment { constant: u64 },
    Assignment { source: Variable },
    JumpZero { target: Label },
    JumpEqualConstant { constant: u64, target: Label },
    JumpEqualVariable { other: Variable, target: Label },
    Quote { call: Call },
    JumpEqualFunction { call: Call, target: Label },
}

/// A single instruction.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Instruction {
    /// Label attached to this instruction (the jump target that lands here).
    pub label: Label,
    /// Primary variable. `y` for `GOTO_LABEL`, which has none of its own.
    pub variable: Variable,
    pub op: Op,
}

impl Instruction {
    pub fn new(variable: Variable, op: Op) -> Self {
        Self {
            label: Label::Empty,
            variable,
            op,
        }
    }

    /// Returns this instruction with `label` attached.
    pub fn labeled(mut self, label: Label) -> Self {
        self.label = label;
        self
    }

    pub fn increase(v: Variable) -> Self {
        Self::new(v, Op::Increase)
    }

    pub fn decrease(v: Variable) -> Self {
        Self::new(v, Op::Decrease)
    }

    pub fn jump_not_zero(v: Variable, target: Label) -> Self {
        Self::new(v, Op::JumpNotZero { target })
    }

    pub fn neutral(v: Variable) -> Self {
        Self::new(v, Op::Neutral)
    }

    pub fn zero_variable(v: Variable) -> Self {
        Self::new(v, Op::ZeroVariable)
    }

    pub fn goto_label(target: Label) -> Self {
        Self::new(Variable::RESULT, Op::GotoLabel { target })
    }

    pub fn constant_assignment(v: Variable, constant: u64) -> Self {
        Self::new(v, Op::ConstantAssignment { constant })
    }

    pub fn assignment(v: Variable, source: Variable) -> Self {
        Self::new(v, Op::Assignment { source })
    }

    pub fn jump_zero(v: Variable, target: Label) -> Self {
        Self::new(v, Op::JumpZero { target })
    }

    pub fn jump_equal_constant(v: Variable, constant: u64, target: Label) -> Self {
        Self::new(v, Op::JumpEqualConstant { constant, target })
    }

    pub fn jump_equal_variable(v: Variable, other: Variable, target: Label) -> Self {
        Self::new(v, Op::JumpEqualVariable { other, target })
    }

    pub fn quote(v: Variable, call: Call) -> Self {
        Self::new(v, Op::Quote { call })
    }

    pub fn jump_equal_function(v: Variable, call: Call, target: Label) -> Self {
        Self::new(v, Op::JumpEqualFunction { call, target })
    }

    pub fn kind(&self) -> OpKind {
        match self.op {
            Op::Increase => OpKind::Increase,
            Op::Decrease => OpKind::Decrease,
            Op::JumpNotZero { .. } => OpKind::JumpNotZero,
            Op::Neutral => OpKind::Neutral,
            Op::ZeroVariable => OpKind::ZeroVariable,
            Op::GotoLabel { .. } => OpKind::GotoLabel,
            Op::ConstantAssignment { .. } => OpKind::ConstantAssignment,
            Op::Assignment { .. } => OpKind::Assignment,
            Op::JumpZero { .. } => OpKind::JumpZero,
            Op::JumpEqualConstant { .. } => OpKind::JumpEqualConstant,
            Op::JumpEqualVariable { .. } => OpKind::JumpEqualVariable,
            Op::Quote { .. } => OpKind::Quote,
            Op::JumpEqualFunction { .. } => OpKind::JumpEqualFunction,
        }
    }

    /// Jump target, for the jump family and `GOTO_LABEL`.
    pub fn target(&self) -> Option<Label> {
        match &self.op {
            Op::JumpNotZero { target }
            | Op::GotoLabel { target }
            | Op::JumpZero { target }
            | Op::JumpEqualConstant { target, .. }
            | Op::JumpEqualVariable { target, .. }
            | Op::JumpEqualFunction { target, .. } => Some(*target),
            _ => None,
        }
    }

    pub fn target_mut(&mut self) -> Option<&mut Label> {
        match &mut self.op {
            Op::JumpNotZero { target }
            | Op::GotoLabel { target }
            | Op::JumpZero { target }
            | Op::JumpEqualConstant { target, .. }
            | Op::JumpEqualVariable { target, .. }
            | Op::JumpEqualFunction { target, .. } => Some(target),
            _ => None,
        }
    }

    /// Call of a composition instruction.
    pub fn call(&self) -> Option<&Call> {
        match &self.op {
            Op::Quote { call } | Op::JumpEqualFunction { call, .. } => Some(call),
            _ => None,
        }
    }

    /// Every variable this instruction reads or writes, call arguments included.
    pub fn variables(&self) -> BTreeSet<Variable> {
        let mut out = BTreeSet::new();
        if !matches!(self.op, Op::GotoLabel { .. }) {
            out.insert(self.variable);
        }
        match &self.op {
            Op::Assignment { source: other } | Op::JumpEqualVariable { other, .. } => {
                out.insert(*other);
            }
            Op::Quote { call } | Op::JumpEqualFunction { call, .. } => {
                out.extend(call.variables());
            }
            _ => {}
        }
        out
    }

    /// Rewrites every variable through `f`.
    pub fn map_variables(&mut self, f: &impl Fn(Variable) -> Variable) {
        if !matches!(self.op, Op::GotoLabel { .. }) {
            self.variable = f(self.variable);
        }
        match &mut self.op {
            Op::Assignment { source: other } | Op::JumpEqualVariable { other, .. } => {
                *other = f(*other);
            }
            Op::Quote { call } | Op::JumpEqualFunction { call, .. } => call.map_variables(f),
            _ => {}
        }
    }

    /// Rewrites the attached label and the jump target through `f`.
    pub fn map_labels(&mut self, f: &impl Fn(Label) -> Label) {
        self.label = f(self.label);
        if let Some(target) = self.target_mut() {
            *target = f(*target);
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let v = self.variable;
        match &self.op {
            Op::Increase => write!(f, "{v} ← {v} + 1"),
            Op::Decrease => write!(f, "{v} ← {v} - 1"),
            Op::JumpNotZero { target } => write!(f, "IF {v} ≠ 0 GOTO {target}"),
            Op::Neutral => write!(f, "{v} ← {v}"),
            Op::ZeroVariable => write!(f, "{v} ← 0"),
            Op::GotoLabel { target } => write!(f, "GOTO {target}"),
            Op::ConstantAssignment { constant } => write!(f, "{v} ← {constant}"),
            Op::Assignment { source } => write!(f, "{v} ← {source}"),
            Op::JumpZero { target } => write!(f, "IF {v} = 0 GOTO {target}"),
            Op::JumpEqualConstant { constant, target } => {
                write!(f, "IF {v} = {constant} GOTO {target}")
            }
            Op::JumpEqualVariable { other, target } => write!(f, "IF {v} = {other} GOTO {target}"),
            Op::Quote { call } => write!(f, "{v} ← {call}"),
            Op::JumpEqualFunction { call, target } => write!(f, "IF {v} = {call} GOTO {target}"),
        }
    }
}

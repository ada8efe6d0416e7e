//! The thirteen instruction kinds and their fixed metadata.
//!
//! Cycles are charged per executed instruction, credit is the billing weight
//! summed into a function's cost, and the degree is the number of expansion
//! rounds needed to reach basic form.

use std::fmt;
use std::str::FromStr;

/// Identifies the operation an instruction performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OpKind {
    // Basic
    /// `v ← v + 1`
    Increase,
    /// `v ← v - 1`, clamped at 0.
    Decrease,
    /// `IF v ≠ 0 GOTO L`
    JumpNotZero,
    /// `v ← v`
    Neutral,

    // Synthetic
    /// `v ← 0`
    ZeroVariable,
    /// `GOTO L`
    GotoLabel,
    /// `v ← k`
    ConstantAssignment,
    /// `v ← w`
    Assignment,
    /// `IF v = 0 GOTO L`
    JumpZero,
    /// `IF v = k GOTO L`
    JumpEqualConstant,
    /// `IF v = w GOTO L`
    JumpEqualVariable,
    /// `v ← (F, args…)`
    Quote,
    /// `IF v = (F, args…) GOTO L`
    JumpEqualFunction,
}

/// Architecture generation an instruction kind belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Generation {
    I,
    II,
    III,
    IV,
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Generation::I => "I",
            Generation::II => "II",
            Generation::III => "III",
            Generation::IV => "IV",
        })
    }
}

/// All 13 kinds, in declaration order.
pub const ALL_KINDS: [OpKind; 13] = [
    OpKind::Increase,
    OpKind::Decrease,
    OpKind::JumpNotZero,
    OpKind::Neutral,
    OpKind::ZeroVariable,
    OpKind::GotoLabel,
    OpKind::ConstantAssignment,
    OpKind::Assignment,
    OpKind::JumpZero,
    OpKind::JumpEqualConstant,
    OpKind::JumpEqualVariable,
    OpKind::Quote,
    OpKind::JumpEqualFunction,
];

impl OpKind {
    /// Returns the assembly mnemonic for this kind.
    pub fn mnemonic(&self) -> &'static str {
        match self {
            OpKind::Increase => "INCREASE",
            OpKind::Decrease => "DECREASE",
            OpKind::JumpNotZero => "JUMP_NOT_ZERO",
            OpKind::Neutral => "NEUTRAL",
            OpKind::ZeroVariable => "ZERO_VARIABLE",
            OpKind::GotoLabel => "GOTO_LABEL",
            OpKind::ConstantAssignment => "CONSTANT_ASSIGNMENT",
            OpKind::Assignment => "ASSIGNMENT",
            OpKind::JumpZero => "JUMP_ZERO",
            OpKind::JumpEqualConstant => "JUMP_EQUAL_CONSTANT",
            OpKind::JumpEqualVariable => "JUMP_EQUAL_VARIABLE",
            OpKind::Quote => "QUOTE",
            OpKind::JumpEqualFunction => "JUMP_EQUAL_FUNCTION",
        }
    }

    /// Fixed cycle cost of executing one instruction of this kind.
    pub fn cycles(&self) -> u64 {
        match self {
            OpKind::Neutral => 0,
            OpKind::Increase | OpKind::Decrease | OpKind::ZeroVariable | OpKind::GotoLabel => 1,
            OpKind::JumpNotZero
            | OpKind::ConstantAssignment
            | OpKind::JumpZero
            | OpKind::JumpEqualConstant
            | OpKind::JumpEqualVariable => 2,
            OpKind::Assignment => 4,
            OpKind::Quote => 5,
            OpKind::JumpEqualFunction => 6,
        }
    }

    /// Billing weight summed into a function's cost.
    pub fn credit(&self) -> u64 {
        match self.generation() {
            Generation::I => 5,
            Generation::II => 100,
            Generation::III => 500,
            Generation::IV => 1000,
        }
    }

    pub fn generation(&self) -> Generation {
        match self {
            OpKind::Increase | OpKind::Decrease | OpKind::JumpNotZero | OpKind::Neutral => {
                Generation::I
            }
            OpKind::ZeroVariable | OpKind::GotoLabel | OpKind::ConstantAssignment => Generation::II,
            OpKind::Assignment
            | OpKind::JumpZero
            | OpKind::JumpEqualConstant
            | OpKind::JumpEqualVariable => Generation::III,
            OpKind::Quote | OpKind::JumpEqualFunction => Generation::IV,
        }
    }

    /// Expansion rounds needed to reach basic form.
    ///
    /// `None` for the composition kinds, whose degree depends on the callee
    /// and the call arguments.
    pub fn degree(&self) -> Option<u32> {
        match self {
            OpKind::Increase | OpKind::Decrease | OpKind::JumpNotZero | OpKind::Neutral => Some(0),
            OpKind::ZeroVariable | OpKind::GotoLabel => Some(1),
            OpKind::ConstantAssignment | OpKind::Assignment | OpKind::JumpZero => Some(2),
            OpKind::JumpEqualConstant | OpKind::JumpEqualVariable => Some(3),
            OpKind::Quote | OpKind::JumpEqualFunction => None,
        }
    }

    pub fn is_basic(&self) -> bool {
        self.generation() == Generation::I
    }

    /// True for Quote and JumpEqualFunction.
    pub fn is_composition(&self) -> bool {
        matches!(self, OpKind::Quote | OpKind::JumpEqualFunction)
    }

    /// Single-letter class tag: `B` for basic, `S` for synthetic.
    pub fn class_tag(&self) -> char {
        if self.is_basic() {
            'B'
        } else {
            'S'
        }
    }
}

impl fmt::Display for OpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

impl FromStr for OpKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ALL_KINDS
            .iter()
            .copied()
            .find(|k| k.mnemonic().eq_ignore_ascii_case(s))
            .ok_or(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mnemonics_round_trip() {
        for kind in ALL_KINDS {
            assert_eq!(kind.mnemonic().parse::<OpKind>(), Ok(kind));
        }
        assert_eq!("quote".parse::<OpKind>(), Ok(OpKind::Quote));
        assert!("HALT".parse::<OpKind>().is_err());
    }

    #[test]
    fn exactly_four_basic_kinds() {
        let basic: Vec<_> = ALL_KINDS.iter().filter(|k| k.is_basic()).collect();
        assert_eq!(
            basic,
            [
                &OpKind::Increase,
                &OpKind::Decrease,
                &OpKind::JumpNotZero,
                &OpKind::Neutral
            ]
        );
    }

    #[test]
    fn metadata_table() {
        let expected: [(OpKind, u64, u64, Generation); 13] = [
            (OpKind::Increase, 1, 5, Generation::I),
            (OpKind::Decrease, 1, 5, Generation::I),
            (OpKind::JumpNotZero, 2, 5, Generation::I),
            (OpKind::Neutral, 0, 5, Generation::I),
            (OpKind::ZeroVariable, 1, 100, Generation::II),
            (OpKind::GotoLabel, 1, 100, Generation::II),
            (OpKind::ConstantAssignment, 2, 100, Generation::II),
            (OpKind::Assignment, 4, 500, Generation::III),
            (OpKind::JumpZero, 2, 500, Generation::III),
            (OpKind::JumpEqualConstant, 2, 500, Generation::III),
            (OpKind::JumpEqualVariable, 2, 500, Generation::III),
            (OpKind::Quote, 5, 1000, Generation::IV),
            (OpKind::JumpEqualFunction, 6, 1000, Generation::IV),
        ];
        for (kind, cycles, credit, generation) in expected {
            assert_eq!(kind.cycles(), cycles, "{kind}");
            assert_eq!(kind.credit(), credit, "{kind}");
            assert_eq!(kind.generation(), generation, "{kind}");
        }
    }

    #[test]
    fn only_composition_kinds_lack_fixed_degree() {
        for kind in ALL_KINDS {
            assert_eq!(kind.degree().is_none(), kind.is_composition(), "{kind}");
        }
    }

    #[test]
    fn class_tags() {
        assert_eq!(OpKind::Neutral.class_tag(), 'B');
        assert_eq!(OpKind::GotoLabel.class_tag(), 'S');
    }
}

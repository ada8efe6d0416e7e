//! Derivation signatures.
//!
//! A signature names one instruction instance by its ancestry: source
//! instructions are keyed by their source position, derived instructions by
//! their parent's signature plus their ordinal among the siblings. Each
//! segment also records kind, attached label and rendering, so the key stays
//! readable in listings. The 48-bit blake3 digest is a short handle for the
//! same key.

use std::fmt;

use crate::instruction::Instruction;

/// Unique key of an instruction instance within one function.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Signature(String);

impl Signature {
    /// Signature of the source instruction at 0-based `position`.
    pub fn root(position: usize, instr: &Instruction) -> Self {
        Signature(segment(position, instr))
    }

    /// Signature of the `ordinal`-th instruction derived from `parent`.
    pub fn child(parent: &Signature, ordinal: usize, instr: &Instruction) -> Self {
        Signature(format!("{} > {}", parent.0, segment(ordinal, instr)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First 48 bits of the blake3 hash, as 12 lowercase hex digits.
    pub fn digest(&self) -> String {
        let hash = blake3::hash(self.0.as_bytes());
        hash.as_bytes()[..6]
            .iter()
            .map(|b| format!("{b:02x}"))
            .collect()
    }

    /// True if `key` is this signature or its digest.
    pub fn matches(&self, key: &str) -> bool {
        self.0 == key || self.digest() == key
    }
}

fn segment(index: usize, instr: &Instruction) -> String {
    format!("{index}:{}[{}] {instr}", instr.kind().mnemonic(), instr.label)
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Label, Variable};

    #[test]
    fn root_and_child_text() {
        let parent_instr = Instruction::zero_variable(Variable::input(1)).labeled(Label::Named(2));
        let root = Signature::root(0, &parent_instr);
        assert_eq!(root.as_str(), "0:ZERO_VARIABLE[L2] x1 ← 0");

        let child = Signature::child(&root, 3, &Instruction::decrease(Variable::input(1)));
        assert_eq!(
            child.as_str(),
            "0:ZERO_VARIABLE[L2] x1 ← 0 > 3:DECREASE[] x1 ← x1 - 1"
        );
    }

    #[test]
    fn digest_is_stable_and_short() {
        let sig = Signature::root(4, &Instruction::increase(Variable::RESULT));
        let d = sig.digest();
        assert_eq!(d.len(), 12);
        assert!(d.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(d, sig.clone().digest());
        assert!(sig.matches(&d));
        assert!(sig.matches(sig.as_str()));
        assert!(!sig.matches("000000000000"));
    }

    #[test]
    fn position_distinguishes_identical_instructions() {
        let instr = Instruction::increase(Variable::RESULT);
        assert_ne!(Signature::root(0, &instr), Signature::root(1, &instr));
    }
}

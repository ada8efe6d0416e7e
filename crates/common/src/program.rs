//! Source-level definitions as produced by a loader.
//!
//! A [`Module`] holds the main program and the auxiliary functions it may
//! call by name. Nothing here is derived: these are the instructions as
//! written.

use std::collections::BTreeSet;

use crate::instruction::Instruction;
use crate::label::Label;
use crate::variable::Variable;

/// A named instruction sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Definition {
    pub name: String,
    pub instructions: Vec<Instruction>,
}

impl Definition {
    pub fn new(name: impl Into<String>, instructions: Vec<Instruction>) -> Self {
        Self {
            name: name.into(),
            instructions,
        }
    }

    /// Every variable referenced, plus `y`.
    pub fn variables(&self) -> BTreeSet<Variable> {
        let mut vars: BTreeSet<Variable> = self
            .instructions
            .iter()
            .flat_map(|i| i.variables())
            .collect();
        vars.insert(Variable::RESULT);
        vars
    }

    /// Declared inputs: the referenced input variables ordered by index.
    pub fn inputs(&self) -> Vec<Variable> {
        self.variables().into_iter().filter(|v| v.is_input()).collect()
    }

    /// Labels attached to instructions, in order of appearance.
    pub fn labels(&self) -> Vec<Label> {
        self.instructions
            .iter()
            .map(|i| i.label)
            .filter(|l| !l.is_empty())
            .collect()
    }
}

/// A main program together with its auxiliary functions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Module {
    pub program: Definition,
    pub functions: Vec<Definition>,
}

impl Module {
    pub fn new(program: Definition, functions: Vec<Definition>) -> Self {
        Self { program, functions }
    }

    /// Auxiliary function by name.
    pub fn function(&self, name: &str) -> Option<&Definition> {
        self.functions.iter().find(|f| f.name == name)
    }
}

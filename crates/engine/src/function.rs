//! The function aggregate.
//!
//! A [`Function`] owns its derivation arena, the current instruction sequence
//! (ids into the arena), its variable universe and an execution context.
//! Expansion, collapse and execution all mutate it in place; cloning yields a
//! fully independent instance.

use std::collections::{BTreeMap, BTreeSet};

use slang_common::{Definition, Generation, Instruction, Label, Signature, Variable};

use crate::arena::{Arena, Node, OpId};
use crate::context::{ExecutionContext, Snapshot};
use crate::degree;
use crate::error::EngineError;
use crate::program::Registry;

#[derive(Debug, Clone)]
pub struct Function {
    name: String,
    pub(crate) arena: Arena,
    pub(crate) sequence: Vec<OpId>,
    inputs: Vec<Variable>,
    pub(crate) variables: BTreeSet<Variable>,
    original_variables: BTreeSet<Variable>,
    pub(crate) context: ExecutionContext,
}

/// One line of an instruction listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    /// 1-based.
    pub position: usize,
    pub class: char,
    pub label: Label,
    pub text: String,
    pub cycles: u64,
    pub generation: Generation,
    pub depth: u32,
    pub signature: Signature,
}

impl Function {
    /// Builds a function from source instructions.
    pub fn from_definition(definition: &Definition) -> Self {
        let mut arena = Arena::new();
        let sequence = definition
            .instructions
            .iter()
            .enumerate()
            .map(|(pos, instr)| arena.push_root(pos, instr.clone()))
            .collect();
        let variables = definition.variables();
        let mut function = Self {
            name: definition.name.clone(),
            arena,
            sequence,
            inputs: definition.inputs(),
            original_variables: variables.clone(),
            variables,
            context: ExecutionContext::new(),
        };
        function.rebuild();
        function.context.seed(&function.variables, &function.inputs, &[]);
        function
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    /// Current instructions in execution order.
    pub fn instructions(&self) -> impl Iterator<Item = &Instruction> + '_ {
        self.sequence.iter().map(|&id| &self.arena.get(id).instruction)
    }

    /// Instruction at 0-based `position`.
    pub fn instruction(&self, position: usize) -> Option<&Instruction> {
        self.node(position).map(|n| &n.instruction)
    }

    /// Derivation node at 0-based `position`.
    pub fn node(&self, position: usize) -> Option<&Node> {
        self.sequence.get(position).map(|&id| self.arena.get(id))
    }

    /// Declared inputs, in argument order.
    pub fn inputs(&self) -> &[Variable] {
        &self.inputs
    }

    pub fn variables(&self) -> &BTreeSet<Variable> {
        &self.variables
    }

    /// Attached labels and the 0-based positions they mark.
    pub fn labels(&self) -> &BTreeMap<Label, usize> {
        self.context.labels()
    }

    pub fn context(&self) -> &ExecutionContext {
        &self.context
    }

    pub fn history(&self) -> &[Snapshot] {
        self.context.history()
    }

    /// Cycles accumulated by the current run.
    pub fn cycles(&self) -> u64 {
        self.context.cycles()
    }

    /// Current value of `y`.
    pub fn result(&self) -> u64 {
        self.context.value(Variable::RESULT)
    }

    /// Sum of the credit weights of the current instructions.
    pub fn cost(&self) -> u64 {
        self.instructions().map(|i| i.kind().credit()).sum()
    }

    /// Expansion rounds needed to bring every instruction to basic form.
    pub fn degree(&self, registry: &Registry) -> u32 {
        degree::function_degree(self, registry)
    }

    /// Deepest function-composition nesting among the current instructions.
    pub fn nesting(&self) -> u32 {
        self.instructions()
            .filter_map(|i| i.call())
            .map(|c| c.nesting())
            .max()
            .unwrap_or(0)
    }

    /// True when every current instruction is basic.
    pub fn is_basic(&self) -> bool {
        self.instructions().all(|i| i.kind().is_basic())
    }

    /// Listing rows for the current instructions.
    pub fn rows(&self) -> Vec<Row> {
        self.sequence
            .iter()
            .enumerate()
            .map(|(i, &id)| {
                let node = self.arena.get(id);
                let kind = node.instruction.kind();
                Row {
                    position: i + 1,
                    class: kind.class_tag(),
                    label: node.instruction.label,
                    text: node.instruction.to_string(),
                    cycles: kind.cycles(),
                    generation: kind.generation(),
                    depth: node.depth,
                    signature: node.signature.clone(),
                }
            })
            .collect()
    }

    /// The instruction at 0-based `position` followed by its derivation
    /// ancestors, nearest first.
    pub fn lineage(&self, position: usize) -> Option<Vec<&Node>> {
        let &id = self.sequence.get(position)?;
        let mut chain = vec![self.arena.get(id)];
        chain.extend(self.arena.ancestors(id).map(|a| self.arena.get(a)));
        Some(chain)
    }

    /// The current instructions as a source definition.
    pub fn to_definition(&self) -> Definition {
        Definition::new(self.name.clone(), self.instructions().cloned().collect())
    }

    /// Position of the instruction whose signature or digest is `key`.
    pub fn find(&self, key: &str) -> Result<usize, EngineError> {
        self.sequence
            .iter()
            .position(|&id| self.arena.get(id).signature.matches(key))
            .ok_or_else(|| EngineError::MalformedDerivationRequest {
                signature: key.to_string(),
            })
    }

    /// Clears history, cycles and name counters, and reseeds every variable to 0.
    pub fn reset(&mut self) {
        let in_use = self.variables_in_use();
        self.context.reset(&in_use);
    }

    /// Forgets variables introduced by expansion. The instruction list is
    /// left as is, so a later run still seeds the variables it references.
    pub fn restore_original_variables(&mut self) {
        self.variables = self.original_variables.clone();
        self.context.retain(&self.variables);
    }

    /// Labels attached to or targeted by the current instructions.
    pub(crate) fn labels_in_use(&self) -> BTreeSet<Label> {
        let mut labels = BTreeSet::new();
        for instr in self.instructions() {
            if instr.label.is_named() {
                labels.insert(instr.label);
            }
            if let Some(target) = instr.target().filter(Label::is_named) {
                labels.insert(target);
            }
        }
        labels
    }

    /// Declared variables plus every variable the current instructions
    /// reference, whether or not `variables` still lists them.
    pub(crate) fn variables_in_use(&self) -> BTreeSet<Variable> {
        let mut variables = self.original_variables.clone();
        for instr in self.instructions() {
            variables.extend(instr.variables());
        }
        variables
    }

    /// Recomputes the label map and variable universe from the sequence.
    pub(crate) fn rebuild(&mut self) {
        let mut labels = BTreeMap::new();
        let mut variables = self.original_variables.clone();
        for (pos, instr) in self.instructions().enumerate() {
            if !instr.label.is_empty() {
                labels.entry(instr.label).or_insert(pos);
            }
            variables.extend(instr.variables());
        }
        self.context.set_labels(labels);
        self.variables = variables;
    }
}

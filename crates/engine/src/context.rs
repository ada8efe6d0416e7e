//! Execution context: variable values, step history, label map and the
//! fresh-name generators of one function instance.

use std::collections::{BTreeMap, BTreeSet};

use slang_common::{Label, Variable};

/// Immutable copy of every variable's value after one step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    /// 0 for the initial state, then one per executed instruction.
    pub step: usize,
    /// 0-based position of the instruction just executed.
    pub position: Option<usize>,
    /// Cycles accumulated up to and including this step.
    pub cycles: u64,
    pub values: BTreeMap<Variable, u64>,
}

/// Generators for never-before-used labels and work variables.
///
/// Counters only move forward; a candidate already present in the current
/// universe is skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameGen {
    next_label: u32,
    next_work: u32,
}

impl NameGen {
    /// Returns a named label absent from `taken` and records it there.
    pub fn label(&mut self, taken: &mut BTreeSet<Label>) -> Label {
        loop {
            self.next_label += 1;
            let label = Label::Named(self.next_label);
            if taken.insert(label) {
                return label;
            }
        }
    }

    /// Returns a work variable absent from `taken` and records it there.
    pub fn work(&mut self, taken: &mut BTreeSet<Variable>) -> Variable {
        loop {
            self.next_work += 1;
            let var = Variable::work(self.next_work);
            if taken.insert(var) {
                return var;
            }
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ExecutionContext {
    values: BTreeMap<Variable, u64>,
    history: Vec<Snapshot>,
    labels: BTreeMap<Label, usize>,
    names: NameGen,
    pc: usize,
    cycles: u64,
    halted: bool,
}

impl ExecutionContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a fresh run: every variable in `variables` is 0 except the
    /// declared `inputs`, which take `args` positionally. Extra arguments are
    /// ignored and missing ones stay 0.
    pub fn seed(&mut self, variables: &BTreeSet<Variable>, inputs: &[Variable], args: &[u64]) {
        self.values = variables.iter().map(|v| (*v, 0)).collect();
        for (var, value) in inputs.iter().zip(args) {
            self.values.insert(*var, *value);
        }
        self.pc = 0;
        self.cycles = 0;
        self.halted = false;
        self.history.clear();
        self.history.push(Snapshot {
            step: 0,
            position: None,
            cycles: 0,
            values: self.values.clone(),
        });
    }

    /// Clears history and all counters and reseeds with no inputs.
    pub fn reset(&mut self, variables: &BTreeSet<Variable>) {
        self.names = NameGen::default();
        self.seed(variables, &[], &[]);
    }

    /// Current value of `var`. Variables never written read as 0.
    pub fn value(&self, var: Variable) -> u64 {
        self.values.get(&var).copied().unwrap_or(0)
    }

    pub fn set(&mut self, var: Variable, value: u64) {
        self.values.insert(var, value);
    }

    pub fn values(&self) -> &BTreeMap<Variable, u64> {
        &self.values
    }

    /// Drops every variable not in `keep`.
    pub fn retain(&mut self, keep: &BTreeSet<Variable>) {
        self.values.retain(|v, _| keep.contains(v));
    }

    pub fn history(&self) -> &[Snapshot] {
        &self.history
    }

    pub fn pc(&self) -> usize {
        self.pc
    }

    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    pub fn is_halted(&self) -> bool {
        self.halted
    }

    pub fn halt(&mut self) {
        self.halted = true;
    }

    /// Charges `cycles` for the instruction at `position`, moves to `next`
    /// and records the resulting state.
    pub fn advance(&mut self, position: usize, next: usize, cycles: u64) {
        self.cycles += cycles;
        self.pc = next;
        self.history.push(Snapshot {
            step: self.history.len(),
            position: Some(position),
            cycles: self.cycles,
            values: self.values.clone(),
        });
    }

    pub fn labels(&self) -> &BTreeMap<Label, usize> {
        &self.labels
    }

    pub fn set_labels(&mut self, labels: BTreeMap<Label, usize>) {
        self.labels = labels;
    }

    /// Position of the instruction carrying `label`.
    pub fn resolve(&self, label: Label) -> Option<usize> {
        self.labels.get(&label).copied()
    }

    pub fn names(&self) -> &NameGen {
        &self.names
    }

    pub fn names_mut(&mut self) -> &mut NameGen {
        &mut self.names
    }

    pub fn set_names(&mut self, names: NameGen) {
        self.names = names;
    }
}

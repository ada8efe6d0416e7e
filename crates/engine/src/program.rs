//! Function registry and the program aggregate.

use std::collections::{BTreeMap, VecDeque};

use slang_common::Module;
use tracing::debug;

use crate::error::EngineError;
use crate::execute::Step;
use crate::function::Function;

/// Name-keyed lookup of auxiliary functions.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    functions: BTreeMap<String, Function>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every auxiliary function of `module`.
    pub fn from_module(module: &Module) -> Self {
        let mut registry = Self::new();
        for def in &module.functions {
            registry.insert(Function::from_definition(def));
        }
        registry
    }

    /// Adds `function` under its own name, returning any function it replaces.
    pub fn insert(&mut self, function: Function) -> Option<Function> {
        self.functions.insert(function.name().to_string(), function)
    }

    pub fn get(&self, name: &str) -> Option<&Function> {
        self.functions.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Function> + '_ {
        self.functions.values()
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    /// Independent copies of every function `root` calls, directly or
    /// through other functions.
    pub fn resolve(&self, root: &Function) -> Result<Registry, EngineError> {
        let mut resolved = Registry::new();
        let mut pending: VecDeque<String> = called_names(root).collect();
        while let Some(name) = pending.pop_front() {
            if resolved.contains(&name) {
                continue;
            }
            let function = self
                .get(&name)
                .ok_or_else(|| EngineError::UnknownFunctionReference { name: name.clone() })?;
            pending.extend(called_names(function));
            resolved.insert(function.clone());
        }
        Ok(resolved)
    }
}

fn called_names(function: &Function) -> impl Iterator<Item = String> + '_ {
    function
        .instructions()
        .filter_map(|i| i.call())
        .flat_map(|c| c.functions().into_iter().map(str::to_string).collect::<Vec<_>>())
}

/// A main function together with specialized copies of every auxiliary
/// function it reaches.
///
/// Cloning a program clones those copies too, so clones never share state.
#[derive(Debug, Clone)]
pub struct Program {
    main: Function,
    functions: Registry,
}

impl Program {
    /// Loads the main program of `module`, resolving calls against the
    /// module's own functions.
    pub fn load(module: &Module) -> Result<Self, EngineError> {
        let registry = Registry::from_module(module);
        Self::new(Function::from_definition(&module.program), &registry)
    }

    /// Resolves every function `main` reaches in `registry`.
    pub fn new(main: Function, registry: &Registry) -> Result<Self, EngineError> {
        let functions = registry.resolve(&main)?;
        debug!(program = main.name(), functions = functions.len(), "program loaded");
        Ok(Self { main, functions })
    }

    pub fn main(&self) -> &Function {
        &self.main
    }

    pub fn functions(&self) -> &Registry {
        &self.functions
    }

    /// Runs to completion and returns `y`.
    pub fn run(&mut self, inputs: &[u64]) -> Result<u64, EngineError> {
        self.main.run(inputs, &self.functions)
    }

    pub fn start(&mut self, inputs: &[u64]) {
        self.main.start(inputs);
    }

    pub fn step(&mut self) -> Result<Step, EngineError> {
        self.main.step(&self.functions)
    }

    pub fn expand(&mut self, degree: u32) -> Result<(), EngineError> {
        self.main.expand(degree, &self.functions)
    }

    pub fn expand_single(&mut self, key: &str, degree: u32) -> Result<(), EngineError> {
        self.main.expand_single(key, degree, &self.functions)
    }

    pub fn collapse(&mut self) {
        self.main.collapse();
    }

    pub fn collapse_single(&mut self, key: &str) -> Result<(), EngineError> {
        self.main.collapse_single(key)
    }

    pub fn collapse_all(&mut self) {
        self.main.collapse_all();
    }

    pub fn reset(&mut self) {
        self.main.reset();
    }

    /// Drops expansion work variables from the main function's universe.
    pub fn restore_original_variables(&mut self) {
        self.main.restore_original_variables();
    }

    /// Credit of the main function plus every resolved auxiliary function.
    pub fn cost(&self) -> u64 {
        self.main.cost() + self.functions.iter().map(Function::cost).sum::<u64>()
    }

    pub fn degree(&self) -> u32 {
        self.main.degree(&self.functions)
    }
}

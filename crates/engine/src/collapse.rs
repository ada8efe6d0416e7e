//! Collapse: folding expanded instructions back into the instruction they
//! were derived from.

use std::collections::BTreeSet;

use tracing::debug;

use crate::arena::OpId;
use crate::error::EngineError;
use crate::function::Function;

impl Function {
    /// Deepest derivation level currently in the sequence. 0 when nothing
    /// is expanded.
    pub fn max_depth(&self) -> u32 {
        self.sequence
            .iter()
            .map(|&id| self.arena.get(id).depth)
            .max()
            .unwrap_or(0)
    }

    /// Replaces every group of siblings at the deepest level with their
    /// parent. Does nothing when nothing is expanded.
    pub fn collapse(&mut self) {
        let depth = self.max_depth();
        if depth == 0 {
            return;
        }
        let before = self.len();
        let mut seen: BTreeSet<OpId> = BTreeSet::new();
        let mut sequence = Vec::with_capacity(self.sequence.len());
        for &id in &self.sequence {
            let node = self.arena.get(id);
            match node.parent {
                Some(parent) if node.depth == depth => {
                    if seen.insert(parent) {
                        sequence.push(parent);
                    }
                }
                _ => sequence.push(id),
            }
        }
        self.sequence = sequence;
        self.rebuild();
        debug!(function = self.name(), depth, before, after = self.len(), "collapsed");
    }

    /// Collapses until only source instructions remain.
    pub fn collapse_all(&mut self) {
        while self.max_depth() > 0 {
            self.collapse();
        }
    }

    /// Replaces the parent of the instruction whose signature or digest is
    /// `key`, together with everything else derived from that parent, by the
    /// parent itself. A source instruction has no parent and is left alone.
    pub fn collapse_single(&mut self, key: &str) -> Result<(), EngineError> {
        let position = self.find(key)?;
        let Some(parent) = self.arena.get(self.sequence[position]).parent else {
            return Ok(());
        };

        let before = self.len();
        let mut sequence = Vec::with_capacity(self.sequence.len());
        let mut placed = false;
        for &id in &self.sequence {
            if self.arena.descends_from(id, parent) {
                if !placed {
                    sequence.push(parent);
                    placed = true;
                }
            } else {
                sequence.push(id);
            }
        }
        self.sequence = sequence;
        self.rebuild();
        debug!(function = self.name(), key, before, after = self.len(), "collapsed one");
        Ok(())
    }
}

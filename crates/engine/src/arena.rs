//! Derivation nodes.
//!
//! Every instruction instance a function has ever held lives in an append-only
//! [`Arena`] and is addressed by [`OpId`]. A node produced by expansion records
//! its parent's id, so the derivation tree needs no shared references and a
//! function clones as plain data.

use slang_common::{Instruction, Signature};

/// Stable index of a node in an [`Arena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OpId(u32);

impl OpId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// One instruction instance with its derivation record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub instruction: Instruction,
    /// The synthetic instruction this one was rewritten from.
    pub parent: Option<OpId>,
    pub signature: Signature,
    /// Number of ancestors. 0 for source instructions.
    pub depth: u32,
}

#[derive(Debug, Clone, Default)]
pub struct Arena {
    nodes: Vec<Node>,
}

impl Arena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the source instruction at `position`.
    pub fn push_root(&mut self, position: usize, instruction: Instruction) -> OpId {
        let signature = Signature::root(position, &instruction);
        self.push(Node {
            instruction,
            parent: None,
            signature,
            depth: 0,
        })
    }

    /// Adds the `ordinal`-th instruction derived from `parent`.
    pub fn push_child(&mut self, parent: OpId, ordinal: usize, instruction: Instruction) -> OpId {
        let (signature, depth) = {
            let p = self.get(parent);
            (Signature::child(&p.signature, ordinal, &instruction), p.depth + 1)
        };
        self.push(Node {
            instruction,
            parent: Some(parent),
            signature,
            depth,
        })
    }

    fn push(&mut self, node: Node) -> OpId {
        let id = OpId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Panics if `id` was not issued by this arena.
    pub fn get(&self, id: OpId) -> &Node {
        &self.nodes[id.index()]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Drops every node issued after the first `len`.
    pub fn truncate(&mut self, len: usize) {
        self.nodes.truncate(len);
    }

    /// Parent, grandparent, … of `id`, nearest first.
    pub fn ancestors(&self, id: OpId) -> Ancestors<'_> {
        Ancestors {
            arena: self,
            next: self.get(id).parent,
        }
    }

    /// True if `ancestor` appears in the parent chain of `id`.
    pub fn descends_from(&self, id: OpId, ancestor: OpId) -> bool {
        self.ancestors(id).any(|a| a == ancestor)
    }
}

pub struct Ancestors<'a> {
    arena: &'a Arena,
    next: Option<OpId>,
}

impl Iterator for Ancestors<'_> {
    type Item = OpId;

    fn next(&mut self) -> Option<OpId> {
        let id = self.next?;
        self.next = self.arena.get(id).parent;
        Some(id)
    }
}

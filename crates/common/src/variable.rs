//! Variables of the S-language.
//!
//! There are three kinds: inputs `x1, x2, …`, work variables `z1, z2, …`
//! and the single result variable `y`. Identity is the rendered name, so the
//! result variable always carries index 0.

use std::fmt;
use std::str::FromStr;

use crate::error::ParseError;

/// The kind of a variable. Declaration order is the display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum VariableKind {
    /// `y`
    Result,
    /// `x<n>`
    Input,
    /// `z<n>`
    Work,
}

/// A register-machine variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Variable {
    kind: VariableKind,
    index: u32,
}

impl Variable {
    /// The result variable `y`.
    pub const RESULT: Variable = Variable {
        kind: VariableKind::Result,
        index: 0,
    };

    /// Input variable `x<index>`.
    pub fn input(index: u32) -> Self {
        Self {
            kind: VariableKind::Input,
            index,
        }
    }

    /// Work variable `z<index>`.
    pub fn work(index: u32) -> Self {
        Self {
            kind: VariableKind::Work,
            index,
        }
    }

    pub fn kind(&self) -> VariableKind {
        self.kind
    }

    /// Numeric suffix. Always 0 for `y`.
    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn is_input(&self) -> bool {
        self.kind == VariableKind::Input
    }

    pub fn is_work(&self) -> bool {
        self.kind == VariableKind::Work
    }

    pub fn is_result(&self) -> bool {
        self.kind == VariableKind::Result
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            VariableKind::Result => f.write_str("y"),
            VariableKind::Input => write!(f, "x{}", self.index),
            VariableKind::Work => write!(f, "z{}", self.index),
        }
    }
}

impl FromStr for Variable {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseError::InvalidVariable(s.to_string());
        if s == "y" {
            return Ok(Variable::RESULT);
        }
        let mut chars = s.chars();
        let prefix = chars.next().ok_or_else(invalid)?;
        let digits = chars.as_str();
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let index: u32 = digits.parse().map_err(|_| invalid())?;
        if index == 0 {
            return Err(invalid());
        }
        match prefix {
            'x' => Ok(Variable::input(index)),
            'z' => Ok(Variable::work(index)),
            _ => Err(invalid()),
        }
    }
}

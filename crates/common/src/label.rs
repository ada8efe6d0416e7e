//! Labels: the fixed `EXIT`/`EMPTY` labels and named labels `L<n>`.

use std::fmt;
use std::str::FromStr;

use crate::error::ParseError;

/// A jump target or the label attached to an instruction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Label {
    /// No label. Never a valid jump target.
    #[default]
    Empty,
    /// Terminates the running function.
    Exit,
    /// `L<n>`
    Named(u32),
}

impl Label {
    pub fn is_empty(&self) -> bool {
        matches!(self, Label::Empty)
    }

    pub fn is_exit(&self) -> bool {
        matches!(self, Label::Exit)
    }

    pub fn is_named(&self) -> bool {
        matches!(self, Label::Named(_))
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::Empty => Ok(()),
            Label::Exit => f.write_str("EXIT"),
            Label::Named(n) => write!(f, "L{n}"),
        }
    }
}

impl FromStr for Label {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("EXIT") {
            return Ok(Label::Exit);
        }
        let digits = s
            .strip_prefix('L')
            .ok_or_else(|| ParseError::InvalidLabel(s.to_string()))?;
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ParseError::InvalidLabel(s.to_string()));
        }
        digits
            .parse()
            .map(Label::Named)
            .map_err(|_| ParseError::InvalidLabel(s.to_string()))
    }
}

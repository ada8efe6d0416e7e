//! Function-call arguments of the composition instructions.
//!
//! A call is written `(NAME,arg,...)` where every argument is either a
//! variable or another call, e.g. `(Add,x1,(Successor,x2))`. Whitespace is
//! ignored and the canonical rendering has none.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::error::ParseError;
use crate::variable::Variable;

/// One argument of a call.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Argument {
    Variable(Variable),
    Call(Call),
}

/// A named function applied to arguments.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Call {
    pub function: String,
    pub arguments: Vec<Argument>,
}

impl Call {
    pub fn new(function: impl Into<String>, arguments: Vec<Argument>) -> Self {
        Self {
            function: function.into(),
            arguments,
        }
    }

    /// Composition depth: 1 plus the deepest function-valued argument.
    /// Variable arguments contribute 0.
    pub fn nesting(&self) -> u32 {
        1 + self
            .arguments
            .iter()
            .map(|arg| match arg {
                Argument::Variable(_) => 0,
                Argument::Call(inner) => inner.nesting(),
            })
            .max()
            .unwrap_or(0)
    }

    /// Every variable mentioned anywhere in the call tree.
    pub fn variables(&self) -> BTreeSet<Variable> {
        let mut out = BTreeSet::new();
        self.collect_variables(&mut out);
        out
    }

    fn collect_variables(&self, out: &mut BTreeSet<Variable>) {
        for arg in &self.arguments {
            match arg {
                Argument::Variable(v) => {
                    out.insert(*v);
                }
                Argument::Call(inner) => inner.collect_variables(out),
            }
        }
    }

    /// Names of every function referenced by the call tree, outermost first.
    pub fn functions(&self) -> Vec<&str> {
        let mut out = vec![self.function.as_str()];
        for arg in &self.arguments {
            if let Argument::Call(inner) = arg {
                out.extend(inner.functions());
            }
        }
        out
    }

    /// Rewrites every variable in the tree through `f`.
    pub fn map_variables(&mut self, f: &impl Fn(Variable) -> Variable) {
        for arg in &mut self.arguments {
            match arg {
                Argument::Variable(v) => *v = f(*v),
                Argument::Call(inner) => inner.map_variables(f),
            }
        }
    }
}

impl fmt::Display for Argument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Argument::Variable(v) => write!(f, "{v}"),
            Argument::Call(call) => write!(f, "{call}"),
        }
    }
}

impl fmt::Display for Call {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}", self.function)?;
        for arg in &self.arguments {
            write!(f, ",{arg}")?;
        }
        f.write_str(")")
    }
}

/// A function name: ASCII letters, digits and underscores, not starting
/// with a digit.
pub fn is_function_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

impl FromStr for Call {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let compact: String = s.chars().filter(|c| !c.is_whitespace()).collect();
        parse_call(&compact).map_err(|reason| ParseError::InvalidCall {
            text: s.to_string(),
            reason,
        })
    }
}

fn parse_call(text: &str) -> Result<Call, &'static str> {
    let inner = text
        .strip_prefix('(')
        .and_then(|rest| rest.strip_suffix(')'))
        .ok_or("expected '(' ... ')'")?;

    let parts = split_top_level(inner)?;
    let (name, args) = parts.split_first().ok_or("missing function name")?;
    if !is_function_name(name) {
        return Err("invalid function name");
    }

    let arguments = args
        .iter()
        .map(|part| {
            if part.starts_with('(') {
                parse_call(part).map(Argument::Call)
            } else {
                part.parse::<Variable>()
                    .map(Argument::Variable)
                    .map_err(|_| "invalid argument")
            }
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Call::new(*name, arguments))
}

/// Splits at commas that are not nested inside parentheses.
fn split_top_level(text: &str) -> Result<Vec<&str>, &'static str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in text.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.checked_sub(1).ok_or("unbalanced parentheses")?,
            ',' if depth == 0 => {
                parts.push(&text[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    if depth != 0 {
        return Err("unbalanced parentheses");
    }
    parts.push(&text[start..]);
    if parts.iter().any(|p| p.is_empty()) {
        return Err("empty argument");
    }
    Ok(parts)
}

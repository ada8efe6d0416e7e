//! S-language common types.
//!
//! This crate provides the instruction model shared by the loader, the
//! verifier and the engine:
//!
//! - [`Variable`] and [`Label`]: the names instructions refer to
//! - [`OpKind`]: the 13 instruction kinds with their cycle/credit/degree table
//! - [`Instruction`] / [`Op`]: one instruction with its operands and rendering
//! - [`Call`] / [`Argument`]: the argument tree of composition instructions
//! - [`Signature`]: derivation key of an instruction instance
//! - [`Definition`] / [`Module`]: source-level programs and functions
//! - [`ParseError`]: errors from parsing names and call text

pub mod call;
pub mod error;
pub mod instruction;
pub mod kind;
pub mod label;
pub mod program;
pub mod signature;
pub mod variable;

pub use call::{Argument, Call};
pub use error::ParseError;
pub use instruction::{Instruction, Op};
pub use kind::{Generation, OpKind, ALL_KINDS};
pub use label::Label;
pub use program::{Definition, Module};
pub use signature::Signature;
pub use variable::{Variable, VariableKind};

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn arb_variable() -> impl Strategy<Value = Variable> {
        prop_oneof![
            Just(Variable::RESULT),
            (1u32..1000).prop_map(Variable::input),
            (1u32..1000).prop_map(Variable::work),
        ]
    }

    fn arb_argument() -> impl Strategy<Value = Argument> {
        let leaf = arb_variable().prop_map(Argument::Variable);
        leaf.prop_recursive(3, 16, 3, |inner| {
            ("[A-Z][a-z]{0,6}", prop::collection::vec(inner, 0..3))
                .prop_map(|(name, args)| Argument::Call(Call::new(name, args)))
        })
    }

    fn arb_call() -> impl Strategy<Value = Call> {
        ("[A-Z][a-z]{0,6}", prop::collection::vec(arb_argument(), 0..4))
            .prop_map(|(name, args)| Call::new(name, args))
    }

    proptest! {
        /// Rendered variable names parse back to the same variable.
        #[test]
        fn variable_text_roundtrip(v in arb_variable()) {
            prop_assert_eq!(v.to_string().parse::<Variable>().unwrap(), v);
        }

        /// Canonical call text parses back to the same tree, and nesting
        /// counts the deepest chain of calls.
        #[test]
        fn call_text_roundtrip(call in arb_call()) {
            let text = call.to_string();
            let parsed: Call = text.parse().unwrap();
            prop_assert_eq!(&parsed, &call);
            prop_assert!(parsed.nesting() >= 1);
        }

        /// Named labels render and parse symmetrically.
        #[test]
        fn label_text_roundtrip(n in any::<u32>()) {
            let label = Label::Named(n);
            prop_assert_eq!(label.to_string().parse::<Label>().unwrap(), label);
        }
    }
}

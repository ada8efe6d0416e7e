//! S-language engine: expansion, collapse and interpretation.
//!
//! The engine works on [`Function`]s built from source definitions:
//! - [`Function::expand`] lowers synthetic instructions a chosen number of
//!   rounds, recording a derivation tree in an arena
//! - [`Function::collapse`] folds the deepest level of that tree back
//! - [`Function::run`] / [`Function::step`] interpret the current list,
//!   metering cycles and recording a snapshot per step
//!
//! A [`Program`] is a main function plus its own copies of every auxiliary
//! function it reaches, resolved from a [`Registry`].
//!
//! # Usage
//!
//! ```
//! use slang_common::{Definition, Instruction, Module, Variable};
//! use slang_engine::Program;
//!
//! let successor = Definition::new(
//!     "Successor",
//!     vec![
//!         Instruction::assignment(Variable::RESULT, Variable::input(1)),
//!         Instruction::increase(Variable::RESULT),
//!     ],
//! );
//! let main = Definition::new(
//!     "Main",
//!     vec![Instruction::quote(Variable::RESULT, "(Successor,x1)".parse().unwrap())],
//! );
//!
//! let mut program = Program::load(&Module::new(main, vec![successor])).unwrap();
//! assert_eq!(program.run(&[5]).unwrap(), 6);
//!
//! program.expand(program.degree()).unwrap();
//! assert!(program.main().is_basic());
//! assert_eq!(program.run(&[5]).unwrap(), 6);
//! ```

pub mod arena;
mod collapse;
pub mod context;
pub mod degree;
pub mod error;
pub mod execute;
mod expand;
pub mod function;
mod inline;
pub mod program;

pub use arena::{Node, OpId};
pub use context::{ExecutionContext, Snapshot};
pub use degree::instruction_degree;
pub use error::EngineError;
pub use execute::{Flow, Step};
pub use function::{Function, Row};
pub use program::{Program, Registry};

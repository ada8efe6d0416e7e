//! S-language assembler: program text ↔ [`Module`].
//!
//! The format is line oriented. `;` starts a comment, `NAME:` attaches a
//! label to the instruction on the same line, `PROGRAM <name>` names the main
//! program and `FUNCTION <name>` … `END` delimits an auxiliary function.
//!
//! # Usage
//!
//! ```
//! use slang_assembler::{assemble, disassemble};
//!
//! let text = "PROGRAM Main\nL1: DECREASE x1\nINCREASE y\nJUMP_NOT_ZERO x1 L1\n";
//! let module = assemble(text).unwrap();
//! assert_eq!(module.program.instructions.len(), 3);
//! assert_eq!(disassemble(&module), text);
//! ```
//!
//! # Roundtrip Guarantee
//!
//! `assemble(disassemble(module)) == module` holds for every module. The
//! disassembler outputs canonical text; the assembler also accepts
//! non-canonical input (lowercase mnemonics, spaces inside calls).

pub mod error;

mod disassembler;
mod lexer;
mod parser;

pub use disassembler::disassemble_instruction;
pub use error::AsmError;

use lexer::tokenize_line;
use parser::{parse_line, Line};
use slang_common::{Definition, Module};

/// Name given to the main program when the text has no `PROGRAM` line.
pub const DEFAULT_PROGRAM_NAME: &str = "Main";

/// Assemble text into a module.
///
/// Returns the first error encountered. Fix one error at a time.
pub fn assemble(text: &str) -> Result<Module, AsmError> {
    let mut program = Definition::new(DEFAULT_PROGRAM_NAME, Vec::new());
    let mut functions = Vec::new();
    // (line, definition) of the open FUNCTION block
    let mut open: Option<(usize, Definition)> = None;

    for (idx, line) in text.lines().enumerate() {
        let line_num = idx + 1;
        let tokens = tokenize_line(line, line_num)?;
        let Some(parsed) = parse_line(&tokens, line_num)? else {
            continue;
        };
        match parsed {
            Line::Program(name) => {
                if open.is_some() {
                    return Err(AsmError::UnexpectedToken {
                        line: line_num,
                        token: "PROGRAM".to_string(),
                    });
                }
                program.name = name;
            }
            Line::Function(name) => {
                if open.is_some() {
                    return Err(AsmError::NestedFunction { line: line_num });
                }
                open = Some((line_num, Definition::new(name, Vec::new())));
            }
            Line::End => match open.take() {
                Some((_, def)) => functions.push(def),
                None => return Err(AsmError::StrayEnd { line: line_num }),
            },
            Line::Instruction(instr) => match &mut open {
                Some((_, def)) => def.instructions.push(instr),
                None => program.instructions.push(instr),
            },
        }
    }

    if let Some((line, def)) = open {
        return Err(AsmError::UnclosedFunction {
            line,
            name: def.name,
        });
    }
    Ok(Module::new(program, functions))
}

/// Disassemble a module into canonical text.
///
/// The output is flat text: one line per directive or instruction, no
/// indentation, no comments.
pub fn disassemble(module: &Module) -> String {
    disassembler::disassemble(module)
}

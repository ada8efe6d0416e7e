//! Disassembler: module → canonical program text.
//!
//! Output format is flat text, one line per instruction or directive. No
//! indentation, no comments, no blank lines. The main program comes first,
//! then one `FUNCTION … END` block per auxiliary function.

use slang_common::{Definition, Instruction, Module, Op};

/// Disassemble a module into canonical text.
///
/// The output is guaranteed to reassemble to an identical module
/// (`assemble(disassemble(module)) == module`).
pub fn disassemble(module: &Module) -> String {
    let mut out = format!("PROGRAM {}\n", module.program.name);
    write_body(&mut out, &module.program);
    for function in &module.functions {
        out.push_str(&format!("FUNCTION {}\n", function.name));
        write_body(&mut out, function);
        out.push_str("END\n");
    }
    out
}

fn write_body(out: &mut String, definition: &Definition) {
    for instr in &definition.instructions {
        out.push_str(&disassemble_instruction(instr));
        out.push('\n');
    }
}

/// One instruction as a canonical source line, label prefix included.
pub fn disassemble_instruction(instr: &Instruction) -> String {
    let m = instr.kind().mnemonic();
    let v = instr.variable;
    let body = match &instr.op {
        // Pattern V
        Op::Increase | Op::Decrease | Op::Neutral | Op::ZeroVariable => format!("{m} {v}"),
        // Pattern VL
        Op::JumpNotZero { target } | Op::JumpZero { target } => format!("{m} {v} {target}"),
        // Pattern L
        Op::GotoLabel { target } => format!("{m} {target}"),
        // Pattern VK
        Op::ConstantAssignment { constant } => format!("{m} {v} {constant}"),
        // Pattern VV
        Op::Assignment { source } => format!("{m} {v} {source}"),
        // Pattern VKL
        Op::JumpEqualConstant { constant, target } => format!("{m} {v} {constant} {target}"),
        // Pattern VVL
        Op::JumpEqualVariable { other, target } => format!("{m} {v} {other} {target}"),
        // Pattern VC
        Op::Quote { call } => format!("{m} {v} {call}"),
        // Pattern VCL
        Op::JumpEqualFunction { call, target } => format!("{m} {v} {call} {target}"),
    };
    if instr.label.is_empty() {
        body
    } else {
        format!("{}: {body}", instr.label)
    }
}

//! Parser for S-language tokens → directives and instructions.
//!
//! Dispatches on the mnemonic to its argument pattern.

use slang_common::call::is_function_name;
use slang_common::{Call, Instruction, Label, OpKind, ParseError, Variable};

use crate::error::AsmError;
use crate::lexer::Token;

/// Result of parsing a single source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Line {
    /// `PROGRAM <name>`
    Program(String),
    /// `FUNCTION <name>`
    Function(String),
    /// `END`
    End,
    Instruction(Instruction),
}

/// Parse the tokens of one line.
///
/// Returns `Ok(None)` for blank lines (empty token list).
pub(crate) fn parse_line(tokens: &[Token], line_num: usize) -> Result<Option<Line>, AsmError> {
    let (label, tokens) = match tokens.split_first() {
        None => return Ok(None),
        Some((Token::Label(name), rest)) => {
            let label = name.parse::<Label>().map_err(|_| AsmError::InvalidLabel {
                line: line_num,
                token: name.clone(),
            })?;
            if rest.is_empty() {
                return Err(AsmError::DanglingLabel {
                    line: line_num,
                    label: name.clone(),
                });
            }
            (Some(label), rest)
        }
        Some(_) => (None, tokens),
    };

    let mnemonic = match &tokens[0] {
        Token::Word(s) => s.as_str(),
        other => return Err(unexpected(other, line_num)),
    };
    let args = &tokens[1..];

    let directive = match mnemonic.to_ascii_uppercase().as_str() {
        "PROGRAM" => Some(Line::Program(expect_name(args, line_num)?)),
        "FUNCTION" => Some(Line::Function(expect_name(args, line_num)?)),
        "END" => {
            expect_end(args, line_num)?;
            Some(Line::End)
        }
        _ => None,
    };
    if let Some(directive) = directive {
        if label.is_some() {
            return Err(unexpected(&tokens[0], line_num));
        }
        return Ok(Some(directive));
    }

    let kind: OpKind = mnemonic.parse().map_err(|_| AsmError::UnknownMnemonic {
        line: line_num,
        token: mnemonic.to_string(),
    })?;
    let m = kind.mnemonic();

    let instr = match kind {
        // Pattern V: variable
        OpKind::Increase | OpKind::Decrease | OpKind::Neutral | OpKind::ZeroVariable => {
            let v = expect_variable(args, 0, line_num, m, 1)?;
            expect_end(&args[1..], line_num)?;
            match kind {
                OpKind::Increase => Instruction::increase(v),
                OpKind::Decrease => Instruction::decrease(v),
                OpKind::Neutral => Instruction::neutral(v),
                _ => Instruction::zero_variable(v),
            }
        }

        // Pattern VL: variable, target
        OpKind::JumpNotZero | OpKind::JumpZero => {
            let v = expect_variable(args, 0, line_num, m, 2)?;
            let target = expect_label(args, 1, line_num, m, 2)?;
            expect_end(&args[2..], line_num)?;
            if kind == OpKind::JumpNotZero {
                Instruction::jump_not_zero(v, target)
            } else {
                Instruction::jump_zero(v, target)
            }
        }

        // Pattern L: target
        OpKind::GotoLabel => {
            let target = expect_label(args, 0, line_num, m, 1)?;
            expect_end(&args[1..], line_num)?;
            Instruction::goto_label(target)
        }

        // Pattern VK: variable, constant
        OpKind::ConstantAssignment => {
            let v = expect_variable(args, 0, line_num, m, 2)?;
            let k = expect_number(args, 1, line_num, m, 2)?;
            expect_end(&args[2..], line_num)?;
            Instruction::constant_assignment(v, k)
        }

        // Pattern VV: variable, variable
        OpKind::Assignment => {
            let v = expect_variable(args, 0, line_num, m, 2)?;
            let w = expect_variable(args, 1, line_num, m, 2)?;
            expect_end(&args[2..], line_num)?;
            Instruction::assignment(v, w)
        }

        // Pattern VKL: variable, constant, target
        OpKind::JumpEqualConstant => {
            let v = expect_variable(args, 0, line_num, m, 3)?;
            let k = expect_number(args, 1, line_num, m, 3)?;
            let target = expect_label(args, 2, line_num, m, 3)?;
            expect_end(&args[3..], line_num)?;
            Instruction::jump_equal_constant(v, k, target)
        }

        // Pattern VVL: variable, variable, target
        OpKind::JumpEqualVariable => {
            let v = expect_variable(args, 0, line_num, m, 3)?;
            let w = expect_variable(args, 1, line_num, m, 3)?;
            let target = expect_label(args, 2, line_num, m, 3)?;
            expect_end(&args[3..], line_num)?;
            Instruction::jump_equal_variable(v, w, target)
        }

        // Pattern VC: variable, call
        OpKind::Quote => {
            let v = expect_variable(args, 0, line_num, m, 2)?;
            let call = expect_call(args, 1, line_num, m, 2)?;
            expect_end(&args[2..], line_num)?;
            Instruction::quote(v, call)
        }

        // Pattern VCL: variable, call, target
        OpKind::JumpEqualFunction => {
            let v = expect_variable(args, 0, line_num, m, 3)?;
            let call = expect_call(args, 1, line_num, m, 3)?;
            let target = expect_label(args, 2, line_num, m, 3)?;
            expect_end(&args[3..], line_num)?;
            Instruction::jump_equal_function(v, call, target)
        }
    };

    Ok(Some(Line::Instruction(instr.labeled(label.unwrap_or_default()))))
}

fn unexpected(token: &Token, line_num: usize) -> AsmError {
    let text = match token {
        Token::Label(s) => format!("{s}:"),
        Token::Word(s) | Token::Call(s) => s.clone(),
        Token::Number(n) => n.to_string(),
    };
    AsmError::UnexpectedToken {
        line: line_num,
        token: text,
    }
}

fn expect_end(args: &[Token], line_num: usize) -> Result<(), AsmError> {
    match args.first() {
        None => Ok(()),
        Some(token) => Err(unexpected(token, line_num)),
    }
}

fn expect_arg<'a>(
    args: &'a [Token],
    idx: usize,
    line_num: usize,
    mnemonic: &'static str,
    expected: usize,
) -> Result<&'a Token, AsmError> {
    args.get(idx).ok_or(AsmError::MissingArgument {
        line: line_num,
        mnemonic,
        expected,
    })
}

fn expect_variable(
    args: &[Token],
    idx: usize,
    line_num: usize,
    mnemonic: &'static str,
    expected: usize,
) -> Result<Variable, AsmError> {
    match expect_arg(args, idx, line_num, mnemonic, expected)? {
        Token::Word(s) => s.parse().map_err(|_| AsmError::InvalidVariable {
            line: line_num,
            token: s.clone(),
        }),
        other => Err(unexpected(other, line_num)),
    }
}

fn expect_label(
    args: &[Token],
    idx: usize,
    line_num: usize,
    mnemonic: &'static str,
    expected: usize,
) -> Result<Label, AsmError> {
    match expect_arg(args, idx, line_num, mnemonic, expected)? {
        Token::Word(s) => s.parse().map_err(|_| AsmError::InvalidLabel {
            line: line_num,
            token: s.clone(),
        }),
        other => Err(unexpected(other, line_num)),
    }
}

fn expect_number(
    args: &[Token],
    idx: usize,
    line_num: usize,
    mnemonic: &'static str,
    expected: usize,
) -> Result<u64, AsmError> {
    match expect_arg(args, idx, line_num, mnemonic, expected)? {
        Token::Number(n) => Ok(*n),
        Token::Word(s) => Err(AsmError::InvalidNumber {
            line: line_num,
            token: s.clone(),
        }),
        other => Err(unexpected(other, line_num)),
    }
}

fn expect_call(
    args: &[Token],
    idx: usize,
    line_num: usize,
    mnemonic: &'static str,
    expected: usize,
) -> Result<Call, AsmError> {
    match expect_arg(args, idx, line_num, mnemonic, expected)? {
        Token::Call(s) => s.parse().map_err(|e| match e {
            ParseError::InvalidCall { reason, .. } => AsmError::InvalidCall {
                line: line_num,
                token: s.clone(),
                reason,
            },
            _ => AsmError::InvalidCall {
                line: line_num,
                token: s.clone(),
                reason: "malformed",
            },
        }),
        other => Err(unexpected(other, line_num)),
    }
}

fn expect_name(args: &[Token], line_num: usize) -> Result<String, AsmError> {
    match args {
        [Token::Word(name)] if is_function_name(name) => Ok(name.clone()),
        [Token::Word(name)] => Err(AsmError::InvalidName {
            line: line_num,
            token: name.clone(),
        }),
        [] => Err(AsmError::MissingArgument {
            line: line_num,
            mnemonic: "name",
            expected: 1,
        }),
        [Token::Word(_), extra, ..] => Err(unexpected(extra, line_num)),
        [other, ..] => Err(unexpected(other, line_num)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize_line;

    fn parse(text: &str) -> Result<Option<Line>, AsmError> {
        parse_line(&tokenize_line(text, 1)?, 1)
    }

    fn instr(text: &str) -> Instruction {
        match parse(text).unwrap() {
            Some(Line::Instruction(i)) => i,
            other => panic!("expected instruction, got {other:?}"),
        }
    }

    #[test]
    fn blank_line() {
        assert_eq!(parse("   ").unwrap(), None);
    }

    #[test]
    fn directives() {
        assert_eq!(parse("PROGRAM Main").unwrap(), Some(Line::Program("Main".to_string())));
        assert_eq!(parse("function Add").unwrap(), Some(Line::Function("Add".to_string())));
        assert_eq!(parse("END").unwrap(), Some(Line::End));
    }

    #[test]
    fn every_pattern() {
        let l1 = Label::Named(1);
        let x1 = Variable::input(1);
        let x2 = Variable::input(2);
        let call: Call = "(F,x2)".parse().unwrap();
        assert_eq!(instr("INCREASE x1"), Instruction::increase(x1));
        assert_eq!(instr("decrease x1"), Instruction::decrease(x1));
        assert_eq!(instr("NEUTRAL x1"), Instruction::neutral(x1));
        assert_eq!(instr("ZERO_VARIABLE x1"), Instruction::zero_variable(x1));
        assert_eq!(instr("JUMP_NOT_ZERO x1 L1"), Instruction::jump_not_zero(x1, l1));
        assert_eq!(instr("JUMP_ZERO x1 EXIT"), Instruction::jump_zero(x1, Label::Exit));
        assert_eq!(instr("GOTO_LABEL L1"), Instruction::goto_label(l1));
        assert_eq!(instr("CONSTANT_ASSIGNMENT x1 5"), Instruction::constant_assignment(x1, 5));
        assert_eq!(instr("ASSIGNMENT x1 x2"), Instruction::assignment(x1, x2));
        assert_eq!(
            instr("JUMP_EQUAL_CONSTANT x1 5 L1"),
            Instruction::jump_equal_constant(x1, 5, l1)
        );
        assert_eq!(
            instr("JUMP_EQUAL_VARIABLE x1 x2 L1"),
            Instruction::jump_equal_variable(x1, x2, l1)
        );
        assert_eq!(instr("QUOTE x1 (F, x2)"), Instruction::quote(x1, call.clone()));
        assert_eq!(
            instr("JUMP_EQUAL_FUNCTION x1 (F,x2) L1"),
            Instruction::jump_equal_function(x1, call, l1)
        );
    }

    #[test]
    fn label_is_attached() {
        let i = instr("L4: INCREASE y");
        assert_eq!(i.label, Label::Named(4));
    }

    #[test]
    fn dangling_label() {
        assert!(matches!(parse("L4:"), Err(AsmError::DanglingLabel { line: 1, .. })));
    }

    #[test]
    fn label_on_directive_rejected() {
        assert!(matches!(parse("L1: END"), Err(AsmError::UnexpectedToken { .. })));
    }

    #[test]
    fn missing_argument() {
        assert_eq!(
            parse("ASSIGNMENT x1").unwrap_err(),
            AsmError::MissingArgument {
                line: 1,
                mnemonic: "ASSIGNMENT",
                expected: 2
            }
        );
    }

    #[test]
    fn extra_argument() {
        assert!(matches!(
            parse("INCREASE x1 x2"),
            Err(AsmError::UnexpectedToken { .. })
        ));
    }

    #[test]
    fn bad_operands() {
        assert!(matches!(parse("INCREASE q1"), Err(AsmError::InvalidVariable { .. })));
        assert!(matches!(parse("GOTO_LABEL X9"), Err(AsmError::InvalidLabel { .. })));
        assert!(matches!(
            parse("CONSTANT_ASSIGNMENT x1 x2"),
            Err(AsmError::InvalidNumber { .. })
        ));
        assert!(matches!(parse("QUOTE y (,x1)"), Err(AsmError::InvalidCall { .. })));
        assert!(matches!(parse("QUOTE y x1"), Err(AsmError::UnexpectedToken { .. })));
        assert!(matches!(parse("FUNCTION 9lives"), Err(AsmError::InvalidNumber { .. })));
        assert!(matches!(parse("FUNCTION a-b"), Err(AsmError::InvalidName { .. })));
    }

    #[test]
    fn unknown_mnemonic() {
        assert_eq!(
            parse("HALT").unwrap_err(),
            AsmError::UnknownMnemonic {
                line: 1,
                token: "HALT".to_string()
            }
        );
    }
}

//! Tokenizer for S-language program text.

use crate::error::AsmError;

/// A single token from a source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Token {
    /// `NAME:` prefix, without the colon.
    Label(String),
    /// Mnemonic, directive, variable, label or function name, as written.
    Word(String),
    /// A decimal literal.
    Number(u64),
    /// A parenthesized call, from `(` to the matching `)` inclusive.
    Call(String),
}

/// Tokenize a single line.
///
/// Returns an empty Vec for blank lines and comment-only lines.
/// Comments start with `;` and extend to end of line.
pub(crate) fn tokenize_line(line: &str, line_num: usize) -> Result<Vec<Token>, AsmError> {
    let line = match line.find(';') {
        Some(pos) => &line[..pos],
        None => line,
    };

    let mut tokens = Vec::new();
    let mut rest = line.trim_start();
    while !rest.is_empty() {
        let end = if rest.starts_with('(') {
            let end = call_end(rest).ok_or(AsmError::UnterminatedCall { line: line_num })?;
            tokens.push(Token::Call(rest[..end].to_string()));
            end
        } else {
            let end = rest
                .find(|c: char| c.is_whitespace() || c == '(')
                .unwrap_or(rest.len());
            tokens.push(word_token(&rest[..end], line_num)?);
            end
        };
        rest = rest[end..].trim_start();
    }

    Ok(tokens)
}

/// Byte offset just past the `)` matching the leading `(`.
fn call_end(text: &str) -> Option<usize> {
    let mut depth = 0usize;
    for (i, c) in text.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i + 1);
                }
            }
            _ => {}
        }
    }
    None
}

fn word_token(word: &str, line_num: usize) -> Result<Token, AsmError> {
    if let Some(label) = word.strip_suffix(':') {
        return Ok(Token::Label(label.to_string()));
    }
    if word.as_bytes().first().is_some_and(|b| b.is_ascii_digit()) {
        let value: u64 = word.parse().map_err(|_| AsmError::InvalidNumber {
            line: line_num,
            token: word.to_string(),
        })?;
        return Ok(Token::Number(value));
    }
    Ok(Token::Word(word.to_string()))
}

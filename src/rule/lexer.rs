//! Rule string tokenizer.
//!
//! A rule string is a sequence of clauses separated by `:`. Each clause is a
//! whitespace-separated list of tokens. Quoted (`'...'`) and regex (`/.../`)
//! literals may contain whitespace and colons, and a backslash escapes the
//! character after it. Escapes are kept verbatim, so every token is a plain
//! slice of the input. Bare words end only at whitespace, so a `:` glued to a
//! word belongs to that word.

use std::iter::Peekable;
use std::str::CharIndices;

use crate::error::RuleError;

/// Tokens of one clause, in source order.
pub type TokenGroup<'a> = Vec<&'a str>;

/// Split a rule string into token groups.
///
/// A `:` always closes the current group, even an empty one, but an empty
/// trailing group is dropped.
pub fn tokenize(text: &str) -> Result<Vec<TokenGroup<'_>>, RuleError> {
    let mut groups = Vec::new();
    let mut group = TokenGroup::new();
    let mut chars = text.char_indices().peekable();

    while let Some(&(start, c)) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }

        let end = match c {
            ':' => {
                chars.next();
                groups.push(std::mem::take(&mut group));
                continue;
            }
            '\'' | '/' => {
                chars.next();
                scan_delimited(&mut chars, c)?
            }
            _ => scan_word(&mut chars, text.len()),
        };

        group.push(&text[start..end]);
    }

    if !group.is_empty() {
        groups.push(group);
    }

    Ok(groups)
}

/// Consume a literal body through its closing delimiter.
///
/// Returns the byte offset just past the delimiter.
fn scan_delimited(chars: &mut Peekable<CharIndices<'_>>, delimiter: char) -> Result<usize, RuleError> {
    let mut escape = false;

    for (idx, c) in chars.by_ref() {
        if escape {
            escape = false;
        } else if c == '\\' {
            escape = true;
        } else if c == delimiter {
            return Ok(idx + c.len_utf8());
        }
    }

    Err(RuleError::UnterminatedLiteral { delimiter })
}

/// Consume a bare word up to whitespace or end of input.
///
/// Returns the byte offset just past the word.
fn scan_word(chars: &mut Peekable<CharIndices<'_>>, len: usize) -> usize {
    while let Some(&(idx, c)) = chars.peek() {
        if c.is_whitespace() {
            return idx;
        }
        chars.next();
    }
    len
}

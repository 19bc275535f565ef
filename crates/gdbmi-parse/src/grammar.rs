//! Recursive-descent parser for the MI value grammar.
//!
//! ```text
//! value    := scalar | sequence | mapping
//! scalar   := '"' (escape | char)* '"'
//! sequence := '[' [ element (',' element)* ] ']'
//! mapping  := '{' [ pair (',' pair)* ] '}'
//! pair     := key '=' value
//! ```
//!
//! Every function takes a byte position into the line and returns the parsed
//! value together with the position immediately after the consumed text, so
//! callers can continue with sibling elements. Nesting depth is bounded only
//! by memory.

use tracing::warn;

use crate::error::{Result, StructuralError};
use crate::escape;
use crate::record::Value;

/// Parse exactly one value at `pos`.
pub fn parse_value(text: &str, pos: usize) -> Result<(Value, usize)> {
    let bytes = text.as_bytes();
    let pos = skip_ws(bytes, pos);
    match bytes.get(pos).copied() {
        Some(b'"') => parse_scalar(text, pos),
        Some(b'[') => parse_sequence(text, pos),
        Some(b'{') => parse_mapping(text, pos),
        Some(_) => Err(StructuralError::UnexpectedCharacter {
            found: char_at(text, pos),
            pos,
        }),
        None => Err(StructuralError::UnexpectedEnd { pos }),
    }
}

/// Parse a braceless `key=value` list running to the end of the input.
///
/// This is the payload position directly after a record's class: the list is
/// treated exactly as a mapping body without the surrounding braces.
pub fn parse_mapping_body(text: &str, pos: usize) -> Result<(Value, usize)> {
    let (pairs, next) = parse_pairs(text, pos, None)?;
    Ok((Value::Mapping(pairs), next))
}

fn parse_scalar(text: &str, open: usize) -> Result<(Value, usize)> {
    let bytes = text.as_bytes();
    let mut i = open + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'"' => {
                let content = &text[open + 1..i];
                return Ok((Value::Scalar(escape::decode(content)), i + 1));
            }
            _ => i += 1,
        }
    }
    Err(StructuralError::UnterminatedString { pos: open })
}

fn parse_sequence(text: &str, open: usize) -> Result<(Value, usize)> {
    let bytes = text.as_bytes();
    let mut items = Vec::new();
    let mut i = open + 1;
    loop {
        i = skip_ws(bytes, i);
        match bytes.get(i).copied() {
            None => {
                return Err(StructuralError::UnclosedDelimiter {
                    delim: '[',
                    pos: open,
                })
            }
            Some(b']') => return Ok((Value::Sequence(items), i + 1)),
            Some(b',') => i += 1,
            Some(b'"' | b'[' | b'{') => {
                let (value, next) = parse_value(text, i)?;
                items.push(value);
                i = next;
            }
            Some(b) if is_key_char(b) => {
                // Named element inside a sequence, e.g.
                // stack=[frame={...},frame={...}]. The key carries no
                // information here and is dropped; only the value is kept.
                let (_key, after_key) = parse_key(text, i)?;
                let (value, next) = parse_value(text, after_key)?;
                items.push(value);
                i = next;
            }
            Some(_) => {
                return Err(StructuralError::UnexpectedCharacter {
                    found: char_at(text, i),
                    pos: i,
                })
            }
        }
    }
}

fn parse_mapping(text: &str, open: usize) -> Result<(Value, usize)> {
    let (pairs, next) = parse_pairs(text, open + 1, Some(open))?;
    Ok((Value::Mapping(pairs), next))
}

/// Parse `key=value` pairs until the closing brace (`open` is its position)
/// or, for a braceless body, the end of the input.
///
/// Duplicate keys are kept in source order; folding them is the caller's
/// decision, never the parser's.
fn parse_pairs(
    text: &str,
    mut i: usize,
    open: Option<usize>,
) -> Result<(Vec<(String, Value)>, usize)> {
    let bytes = text.as_bytes();
    let mut pairs = Vec::new();
    loop {
        i = skip_ws(bytes, i);
        match bytes.get(i).copied() {
            None => {
                return match open {
                    Some(pos) => Err(StructuralError::UnclosedDelimiter { delim: '{', pos }),
                    None => Ok((pairs, i)),
                };
            }
            Some(b'}') if open.is_some() => return Ok((pairs, i + 1)),
            Some(b',') => i += 1,
            _ => {
                let (key, after_key) = parse_key(text, i)?;
                let (value, next) = parse_value(text, after_key)?;
                pairs.push((key.to_string(), value));
                i = skip_garbage(text, next);
            }
        }
    }
}

/// Parse an unquoted identifier key followed by `=`; returns the key and the
/// position after the `=`.
fn parse_key(text: &str, pos: usize) -> Result<(&str, usize)> {
    let bytes = text.as_bytes();
    let start = skip_ws(bytes, pos);
    let mut i = start;
    while i < bytes.len() && is_key_char(bytes[i]) {
        i += 1;
    }
    if i == start {
        return Err(StructuralError::MissingKey { pos: start });
    }
    let end = i;
    let i = skip_ws(bytes, i);
    match bytes.get(i).copied() {
        Some(b'=') => Ok((&text[start..end], i + 1)),
        _ => Err(StructuralError::ExpectedEquals {
            key: text[start..end].to_string(),
            pos: i,
        }),
    }
}

/// Skip stray text between a pair's value and the next separator.
///
/// GDB occasionally appends junk after a closed value (`name="gdb"discardme`);
/// everything up to the next `,`, `}` or end of input is dropped.
fn skip_garbage(text: &str, mut i: usize) -> usize {
    let bytes = text.as_bytes();
    let start = i;
    while let Some(&b) = bytes.get(i) {
        if b == b',' || b == b'}' {
            break;
        }
        i += 1;
    }
    if i > start {
        warn!(skipped = &text[start..i], "skipping unexpected text after value");
    }
    i
}

fn skip_ws(bytes: &[u8], mut i: usize) -> usize {
    while matches!(bytes.get(i).copied(), Some(b' ' | b'\t' | b'\r' | b'\n')) {
        i += 1;
    }
    i
}

/// Characters permitted in an unquoted key.
fn is_key_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'-' || b == b'_'
}

fn char_at(text: &str, pos: usize) -> char {
    text[pos..].chars().next().unwrap_or('\u{fffd}')
}

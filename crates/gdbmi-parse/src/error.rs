/// Errors raised when a line does not match the MI record grammar.
///
/// These are the only failures the parser reports. Escape-decoding problems
/// are not errors: malformed escapes pass through undecoded (see
/// [`crate::escape`]), since they are cosmetic producer bugs rather than
/// structural corruption.
#[derive(Debug, thiserror::Error)]
pub enum StructuralError {
    /// The line starts with no recognized sigil (or is empty after a token).
    #[error("unrecognized record line: {line:?}")]
    UnrecognizedLine { line: String },

    /// A quoted string ran to the end of the line without a closing quote.
    #[error("unterminated string starting at byte {pos}")]
    UnterminatedString { pos: usize },

    /// A `[` or `{` was never closed.
    #[error("unclosed '{delim}' opened at byte {pos}")]
    UnclosedDelimiter { delim: char, pos: usize },

    /// A pair started without an identifier key before the `=`.
    #[error("missing key at byte {pos}")]
    MissingKey { pos: usize },

    /// A key was not followed by `=`.
    #[error("expected '=' after key {key:?} at byte {pos}")]
    ExpectedEquals { key: String, pos: usize },

    /// A value position held something other than `"`, `[` or `{`.
    #[error("unexpected character {found:?} at byte {pos}")]
    UnexpectedCharacter { found: char, pos: usize },

    /// Input ended where a value was required.
    #[error("unexpected end of input at byte {pos}")]
    UnexpectedEnd { pos: usize },
}

impl StructuralError {
    pub(crate) fn unrecognized(line: &str) -> Self {
        StructuralError::UnrecognizedLine {
            line: line.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, StructuralError>;

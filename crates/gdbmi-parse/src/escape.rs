//! Decoding of backslash escapes in MI strings.
//!
//! GDB escapes string content C-style: common single-character escapes plus
//! octal byte escapes (`\NNN`). A multi-byte character arrives as several
//! octal escapes in a row, so consecutive octal escapes are accumulated into
//! one byte run before UTF-8 decoding.
//!
//! Decoding never fails. GDB is known to emit malformed sequences on some
//! platforms (invalid octal runs, bytes that do not form UTF-8); those pass
//! through undecoded rather than poisoning the whole line.

/// Decode every recognized escape in `input`, passing unrecognized or
/// malformed sequences through verbatim.
pub fn decode(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(idx) = rest.find('\\') {
        out.push_str(&rest[..idx]);
        rest = &rest[idx..];

        match rest[1..].chars().next() {
            None => {
                // Lone trailing backslash.
                out.push('\\');
                rest = "";
            }
            Some(c) if c.is_digit(8) => {
                let consumed = decode_octal_run(rest, &mut out);
                rest = &rest[consumed..];
            }
            Some(c) => {
                match single_char_escape(c) {
                    Some(decoded) => out.push(decoded),
                    None => {
                        // Unrecognized escape: keep the backslash.
                        out.push('\\');
                        out.push(c);
                    }
                }
                rest = &rest[1 + c.len_utf8()..];
            }
        }
    }

    out.push_str(rest);
    out
}

/// The single-character escapes GDB emits, per printchar in gdb/utils.c.
fn single_char_escape(c: char) -> Option<char> {
    match c {
        '\'' => Some('\''),
        '"' => Some('"'),
        '\\' => Some('\\'),
        'a' => Some('\u{07}'),
        'b' => Some('\u{08}'),
        'e' => Some('\u{1b}'),
        'f' => Some('\u{0c}'),
        'n' => Some('\n'),
        'r' => Some('\r'),
        't' => Some('\t'),
        _ => None,
    }
}

/// Decode a run of consecutive octal escapes starting at `s[0] == '\\'`.
///
/// Returns the number of bytes consumed. The whole run is decoded as one
/// UTF-8 byte sequence; if the bytes are not valid UTF-8, or an escape's
/// value does not fit a byte, the raw text is emitted unchanged.
fn decode_octal_run(s: &str, out: &mut String) -> usize {
    let bytes = s.as_bytes();
    let mut decoded = Vec::new();
    let mut i = 0;

    while bytes.get(i) == Some(&b'\\') {
        let mut j = i + 1;
        let mut digits = 0;
        let mut value: u32 = 0;
        while digits < 3 {
            match bytes.get(j) {
                Some(&b) if (b'0'..=b'7').contains(&b) => {
                    value = value * 8 + u32::from(b - b'0');
                    j += 1;
                    digits += 1;
                }
                _ => break,
            }
        }
        if digits == 0 {
            // A backslash that starts a non-octal escape ends the run.
            break;
        }
        if value > 0xFF {
            if i == 0 {
                // Out-of-range escape with nothing decoded yet: verbatim.
                out.push_str(&s[..j]);
                return j;
            }
            break;
        }
        decoded.push(value as u8);
        i = j;
    }

    match String::from_utf8(decoded) {
        Ok(text) => out.push_str(&text),
        Err(_) => out.push_str(&s[..i]),
    }
    i
}

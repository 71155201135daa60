//! Character classes and escape-sequence decoding.
//!
//! Escape decoding only ever runs inside the double-quoted dialect; the
//! other dialects treat backslashes as literal characters.

use crate::cursor::{Cursor, SyntaxError};
use crate::error::ParseErrorKind;

/// Maximum number of consecutive byte escapes decoded as one UTF-8 run.
const MAX_BYTE_RUN: usize = 8;

pub(crate) fn is_identifier_start(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == '_'
}

pub(crate) fn is_identifier_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || matches!(ch, '_' | '.' | '-')
}

/// Space or tab. Newlines always terminate a value and are never
/// inline whitespace.
pub(crate) fn is_inline_whitespace(ch: char) -> bool {
    ch == ' ' || ch == '\t'
}

/// Non-control, non-whitespace character outside `excluded`. Used to
/// carve quote characters and `$` out of bare literal runs.
pub(crate) fn is_bare_literal(ch: char, excluded: &str) -> bool {
    !ch.is_control() && !ch.is_whitespace() && !excluded.contains(ch)
}

/// Decode the escape sequence starting at the cursor (positioned on the
/// backslash) into `out`.
///
/// Octal and hex byte escapes are regrouped: a run of up to eight
/// consecutive byte escapes is collected into one buffer and decoded as
/// UTF-8, so multi-byte codepoints written as several `\xHH` escapes
/// reassemble correctly. A `\u` escape holding a high surrogate pairs
/// with the next `\u` escape so surrogate pairs decode; any other unit
/// stands alone. Unknown escapes pass their trailing character through
/// unchanged.
pub(crate) fn decode_escape(cursor: &mut Cursor<'_>, out: &mut String) -> Result<(), SyntaxError> {
    let start = cursor.pos();
    if !cursor.eat('\\') {
        return Err(SyntaxError::new(start, ParseErrorKind::MalformedEscape));
    }

    let Some(marker) = cursor.peek() else {
        // Trailing backslash at end of input; the enclosing quote scan
        // reports the unterminated quote.
        out.push('\\');
        return Ok(());
    };

    let simple = match marker {
        'a' => Some('\u{07}'),
        'b' => Some('\u{08}'),
        'f' => Some('\u{0C}'),
        'n' => Some('\n'),
        'r' => Some('\r'),
        't' => Some('\t'),
        'v' => Some('\u{0B}'),
        '\\' | '\'' | '"' | '?' | '$' | '`' => Some(marker),
        _ => None,
    };
    if let Some(ch) = simple {
        cursor.bump();
        out.push(ch);
        return Ok(());
    }

    match marker {
        '0'..='7' | 'x' => {
            cursor.restore(start);
            decode_byte_run(cursor, out)
        }
        'u' => {
            cursor.restore(start);
            decode_utf16_run(cursor, out)
        }
        'U' => {
            cursor.bump();
            let value = hex_digits(cursor, 2, 8, start)?;
            out.push(char::from_u32(value).unwrap_or(char::REPLACEMENT_CHARACTER));
            Ok(())
        }
        other => {
            // Unknown escape: the trailing character passes through.
            cursor.bump();
            out.push(other);
            Ok(())
        }
    }
}

fn decode_byte_run(cursor: &mut Cursor<'_>, out: &mut String) -> Result<(), SyntaxError> {
    let mut bytes = Vec::with_capacity(MAX_BYTE_RUN);

    while bytes.len() < MAX_BYTE_RUN {
        let mark = cursor.pos();
        if !cursor.eat('\\') {
            break;
        }
        match cursor.peek() {
            Some('x') => {
                cursor.bump();
                let value = hex_digits(cursor, 1, 2, mark)?;
                bytes.push(value as u8);
            }
            Some('0'..='7') => {
                bytes.push(octal_byte(cursor, mark)?);
            }
            _ => {
                cursor.restore(mark);
                break;
            }
        }
    }

    debug_assert!(!bytes.is_empty());
    // A malformed multi-byte sequence (e.g. a lone continuation byte)
    // decodes to U+FFFD; this is implementation-defined behavior.
    out.push_str(&String::from_utf8_lossy(&bytes));
    Ok(())
}

fn decode_utf16_run(cursor: &mut Cursor<'_>, out: &mut String) -> Result<(), SyntaxError> {
    let mark = cursor.pos();
    if !cursor.eat_str("\\u") {
        return Err(SyntaxError::new(mark, ParseErrorKind::MalformedEscape));
    }
    let first = hex_digits(cursor, 2, 4, mark)? as u16;

    let mut units = [first, 0u16];
    let mut len = 1usize;
    // Only a high surrogate can pair with the following escape; any
    // other unit stands alone and the next escape decodes separately.
    if (0xD800..=0xDBFF).contains(&first) {
        let pair_mark = cursor.pos();
        if cursor.eat_str("\\u") {
            units[1] = hex_digits(cursor, 2, 4, pair_mark)? as u16;
            len = 2;
        }
    }

    for decoded in char::decode_utf16(units[..len].iter().copied()) {
        out.push(decoded.unwrap_or(char::REPLACEMENT_CHARACTER));
    }
    Ok(())
}

fn octal_byte(cursor: &mut Cursor<'_>, err_pos: usize) -> Result<u8, SyntaxError> {
    let mut value = 0u32;
    let mut count = 0usize;
    while count < 3 {
        let Some(digit) = cursor.peek().filter(|ch| ('0'..='7').contains(ch)) else {
            break;
        };
        cursor.bump();
        value = value * 8 + u32::from(digit as u8 - b'0');
        count += 1;
    }
    debug_assert!(count > 0);
    u8::try_from(value).map_err(|_| SyntaxError::new(err_pos, ParseErrorKind::MalformedEscape))
}

fn hex_digits(
    cursor: &mut Cursor<'_>,
    min: usize,
    max: usize,
    err_pos: usize,
) -> Result<u32, SyntaxError> {
    let mut value = 0u32;
    let mut count = 0usize;
    while count < max {
        let Some(digit) = cursor.peek().and_then(|ch| ch.to_digit(16)) else {
            break;
        };
        cursor.bump();
        value = value * 16 + digit;
        count += 1;
    }

    if count < min {
        return Err(SyntaxError::new(err_pos, ParseErrorKind::MalformedEscape));
    }
    Ok(value)
}

//! The three value dialects.
//!
//! Each dialect turns the value portion of an assignment into a fragment
//! sequence. They share the interpolation-reference grammar and differ in
//! what counts as literal text and what terminates the value:
//!
//! - unquoted: bare literal runs, no escape decoding, ends at whitespace
//!   or any character it cannot consume;
//! - double-quoted: escapes and references, any other character
//!   (including newlines) is literal, ends at an unescaped `"`;
//! - single-quoted: everything up to the next `'` verbatim.

use crate::cursor::{Cursor, SyntaxError};
use crate::error::ParseErrorKind;
use crate::escape::{
    decode_escape, is_bare_literal, is_identifier_char, is_identifier_start,
};
use crate::model::Fragment;

/// Characters that end a bare literal run in the unquoted dialect.
const UNQUOTED_EXCLUDED: &str = "$\"'";

/// Parse the value at the cursor; the dialect is chosen by the opening
/// delimiter, falling back to unquoted.
pub(crate) fn parse_value(cursor: &mut Cursor<'_>) -> Result<Vec<Fragment>, SyntaxError> {
    match cursor.peek() {
        Some('\'') => parse_single_quoted(cursor),
        Some('"') => parse_double_quoted(cursor),
        _ => Ok(parse_unquoted(cursor)),
    }
}

/// Bash-compatible single quotes: no escape decoding, no interpolation,
/// and no way to embed a literal `'`.
fn parse_single_quoted(cursor: &mut Cursor<'_>) -> Result<Vec<Fragment>, SyntaxError> {
    let open = cursor.pos();
    cursor.bump();

    let contents = cursor.eat_while(|ch| ch != '\'');
    if !cursor.eat('\'') {
        return Err(SyntaxError::new(open, ParseErrorKind::UnterminatedQuote));
    }

    let mut fragments = Vec::new();
    if !contents.is_empty() {
        fragments.push(Fragment::literal(contents));
    }
    Ok(fragments)
}

fn parse_double_quoted(cursor: &mut Cursor<'_>) -> Result<Vec<Fragment>, SyntaxError> {
    let open = cursor.pos();
    cursor.bump();

    let mut fragments = Vec::new();
    let mut literal = String::new();

    loop {
        match cursor.peek() {
            None => return Err(SyntaxError::new(open, ParseErrorKind::UnterminatedQuote)),
            Some('"') => {
                cursor.bump();
                break;
            }
            Some('\\') => decode_escape(cursor, &mut literal)?,
            Some('$') => match parse_reference(cursor) {
                Some(reference) => {
                    flush_literal(&mut fragments, &mut literal);
                    fragments.push(reference);
                }
                None => {
                    cursor.bump();
                    literal.push('$');
                }
            },
            Some(ch) => {
                cursor.bump();
                literal.push(ch);
            }
        }
    }

    flush_literal(&mut fragments, &mut literal);
    Ok(fragments)
}

/// Unquoted values never decode escapes; backslashes are literal. The
/// value ends at whitespace or at any character outside the bare literal
/// set, which the line grammar then accounts for.
fn parse_unquoted(cursor: &mut Cursor<'_>) -> Vec<Fragment> {
    let mut fragments = Vec::new();
    let mut literal = String::new();

    loop {
        match cursor.peek() {
            Some('$') => match parse_reference(cursor) {
                Some(reference) => {
                    flush_literal(&mut fragments, &mut literal);
                    fragments.push(reference);
                }
                None => {
                    cursor.bump();
                    literal.push('$');
                }
            },
            Some(ch) if is_bare_literal(ch, UNQUOTED_EXCLUDED) => {
                literal.push_str(cursor.eat_while(|ch| is_bare_literal(ch, UNQUOTED_EXCLUDED)));
            }
            _ => break,
        }
    }

    flush_literal(&mut fragments, &mut literal);
    fragments
}

/// `$IDENT` or `${IDENT}`; a `$` not followed by either form is not a
/// reference and is left for the caller to take literally.
fn parse_reference(cursor: &mut Cursor<'_>) -> Option<Fragment> {
    let start = cursor.pos();
    if !cursor.eat('$') {
        return None;
    }

    let braced = cursor.eat('{');
    let name = parse_identifier(cursor);

    let Some(name) = name else {
        cursor.restore(start);
        return None;
    };
    if braced && !cursor.eat('}') {
        cursor.restore(start);
        return None;
    }

    Some(Fragment::Reference {
        name,
        text: cursor.slice_from(start).to_owned(),
    })
}

/// Key/reference identifier: a letter or underscore, then letters,
/// digits, `_`, `.`, `-`. Case-sensitive.
pub(crate) fn parse_identifier(cursor: &mut Cursor<'_>) -> Option<String> {
    if !cursor.peek().is_some_and(is_identifier_start) {
        return None;
    }
    Some(cursor.eat_while(is_identifier_char).to_owned())
}

fn flush_literal(fragments: &mut Vec<Fragment>, literal: &mut String) {
    if !literal.is_empty() {
        fragments.push(Fragment::literal(std::mem::take(literal)));
    }
}

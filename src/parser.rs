use std::borrow::Cow;
use std::collections::HashMap;
use std::io::BufRead;
use std::path::Path;

use crate::cursor::{Cursor, SyntaxError, position_at};
use crate::env::EnvStore;
use crate::error::{Error, ParseError, ParseErrorKind};
use crate::escape::is_inline_whitespace;
use crate::interpolate::{self, Substitution};
use crate::model::{Entry, Fragment};
use crate::provider::{MapProvider, ProviderChain, StoreProvider};
use crate::value::{parse_identifier, parse_value};

/// Parse entries from UTF-8 text.
///
/// Interpolation references resolve against variables defined earlier in
/// the same input; anything else substitutes as empty. Use
/// [`crate::EnvLoader`] to resolve against an environment instead.
pub fn parse_str(input: &str) -> Result<Vec<Entry>, Error> {
    let mut store = EnvStore::memory();
    let mut context = ParseContext {
        store: &mut store,
        clobber: true,
        interpolation: true,
        apply: false,
        handler: Substitution::Direct,
    };
    let (entries, _) = parse_document(input, None, &mut HashMap::new(), &mut context)?;
    Ok(entries)
}

/// Parse entries from UTF-8 bytes.
pub fn parse_bytes(input: &[u8]) -> Result<Vec<Entry>, Error> {
    let text = std::str::from_utf8(input)?;
    parse_str(text)
}

/// Parse entries from a buffered reader.
pub fn parse_reader<R: BufRead>(mut reader: R) -> Result<Vec<Entry>, Error> {
    let mut buf = Vec::new();
    reader.read_to_end(&mut buf)?;
    parse_bytes(&buf)
}

/// Parse entries from an in-memory sequence of lines.
pub fn parse_lines<I, S>(lines: I) -> Result<Vec<Entry>, Error>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut text = String::new();
    for line in lines {
        text.push_str(line.as_ref());
        text.push('\n');
    }
    parse_str(&text)
}

/// Shared state for one full-grammar parse pass.
pub(crate) struct ParseContext<'a> {
    pub(crate) store: &'a mut EnvStore,
    /// Whether new values may overwrite ones already present in the
    /// store (and earlier definitions in the pending map). Also selects
    /// the provider-chain query direction.
    pub(crate) clobber: bool,
    pub(crate) interpolation: bool,
    /// Apply each assignment to the store as soon as its line parses,
    /// so later lines see earlier values as already set.
    pub(crate) apply: bool,
    pub(crate) handler: Substitution,
}

#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct ApplyStats {
    pub(crate) loaded: usize,
    pub(crate) skipped_existing: usize,
}

/// Whole-file grammar: assignment and empty/comment lines, consumed
/// greedily to end of input. Any other line fails the whole parse; there
/// is no partial result, and effects already applied by earlier lines
/// stay applied.
pub(crate) fn parse_document(
    input: &str,
    source: Option<&Path>,
    pending: &mut HashMap<String, String>,
    context: &mut ParseContext<'_>,
) -> Result<(Vec<Entry>, ApplyStats), Error> {
    let normalized = normalize_newlines(input);
    let input = normalized.as_ref();

    let mut cursor = Cursor::new(input);
    let mut entries = Vec::new();
    let mut stats = ApplyStats::default();
    // Line numbers advance incrementally; rescanning the input from the
    // start per entry would be quadratic on large files.
    let mut line = 1u32;
    let mut counted_to = 0usize;

    while !cursor.is_at_end() {
        let line_start = cursor.pos();
        let parsed = parse_line(&mut cursor).map_err(|err| to_parse_error(input, err))?;
        let Some((key, fragments)) = parsed else {
            continue;
        };

        // Two independent folds: raw first, then resolved, both against
        // the chain state at this line.
        let raw = interpolate::raw_text(&fragments);
        let value = if context.interpolation {
            resolve_fragments(&fragments, pending, context)?
        } else {
            raw.clone()
        };

        record(&key, &value, pending, context, &mut stats);

        line += newline_count(&input.as_bytes()[counted_to..line_start]);
        counted_to = line_start;
        entries.push(Entry {
            key,
            value,
            raw,
            source: source.map(Path::to_path_buf),
            line,
        });
    }

    Ok((entries, stats))
}

fn resolve_fragments(
    fragments: &[Fragment],
    pending: &HashMap<String, String>,
    context: &ParseContext<'_>,
) -> Result<String, Error> {
    let store = StoreProvider(&*context.store);
    let earlier = MapProvider(pending);
    let chain = ProviderChain::new(context.clobber)
        .push(&store)
        .push(&earlier);
    interpolate::resolve(fragments, &chain, &context.handler)
}

fn record(
    key: &str,
    value: &str,
    pending: &mut HashMap<String, String>,
    context: &mut ParseContext<'_>,
    stats: &mut ApplyStats,
) {
    if context.apply {
        if context.clobber || !context.store.contains_key(key) {
            context.store.set(key, value);
            stats.loaded += 1;
        } else {
            stats.skipped_existing += 1;
        }
    }

    // First definition wins in the pending map unless clobbering, which
    // keeps resolution consistent with the apply policy above.
    if context.clobber || !pending.contains_key(key) {
        pending.insert(key.to_owned(), value.to_owned());
    }
}

type ParsedAssignment = (String, Vec<Fragment>);

/// One line: optional prefix token, identifier, `=`, value, optional
/// trailing comment. Returns `None` for empty and comment-only lines.
fn parse_line(cursor: &mut Cursor<'_>) -> Result<Option<ParsedAssignment>, SyntaxError> {
    cursor.eat_while(is_inline_whitespace);
    match cursor.peek() {
        None => return Ok(None),
        Some('\n') => {
            cursor.bump();
            return Ok(None);
        }
        Some('#') => {
            eat_comment(cursor);
            cursor.eat('\n');
            return Ok(None);
        }
        _ => {}
    }

    eat_export_prefix(cursor);

    let Some(key) = parse_identifier(cursor) else {
        return Err(SyntaxError::new(cursor.pos(), ParseErrorKind::ParseFailure));
    };

    cursor.eat_while(is_inline_whitespace);
    if !cursor.eat('=') {
        return Err(SyntaxError::new(
            cursor.pos(),
            ParseErrorKind::MalformedAssignment,
        ));
    }

    let gap = cursor.eat_while(is_inline_whitespace);
    let fragments = match cursor.peek() {
        None | Some('\n') => Vec::new(),
        // A `#` after whitespace is a comment, not a value.
        Some('#') if !gap.is_empty() => Vec::new(),
        _ => parse_value(cursor)?,
    };

    cursor.eat_while(is_inline_whitespace);
    if cursor.peek() == Some('#') {
        eat_comment(cursor);
    }

    match cursor.peek() {
        None => {}
        Some('\n') => {
            cursor.bump();
        }
        Some(_) => {
            return Err(SyntaxError::new(
                cursor.pos(),
                ParseErrorKind::MalformedAssignment,
            ));
        }
    }

    Ok(Some((key, fragments)))
}

/// `export`, `set -x`, `set`, or `SET` followed by required inline
/// whitespace; the token and whitespace are consumed and discarded. A
/// matching word not followed by whitespace is left alone so it can be
/// the key itself.
fn eat_export_prefix(cursor: &mut Cursor<'_>) {
    for prefix in ["set -x", "export", "set", "SET"] {
        let mark = cursor.pos();
        if cursor.eat_str(prefix) {
            if !cursor.eat_while(is_inline_whitespace).is_empty() {
                return;
            }
            cursor.restore(mark);
        }
    }
}

fn eat_comment(cursor: &mut Cursor<'_>) {
    cursor.eat_while(|ch| ch != '\n');
}

fn newline_count(bytes: &[u8]) -> u32 {
    bytes.iter().filter(|byte| **byte == b'\n').count() as u32
}

fn to_parse_error(input: &str, err: SyntaxError) -> ParseError {
    let (line, column) = position_at(input, err.pos);
    ParseError::new(line, column, err.kind)
}

fn normalize_newlines(input: &str) -> Cow<'_, str> {
    if !input.contains('\r') {
        return Cow::Borrowed(input);
    }
    Cow::Owned(input.replace("\r\n", "\n").replace('\r', "\n"))
}

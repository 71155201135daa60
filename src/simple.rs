//! Minimal line splitter for legacy compatibility.
//!
//! This pathway has no quoting or interpolation awareness at all: an
//! embedded `#` truncates the line before the key/value split when the
//! option is on, even inside what the full grammar would treat as a
//! quoted value. It is kept as a separate code path on purpose; merging
//! it into the full grammar would silently change one mode's documented
//! edge-case behavior on quoted `#`.

use std::path::Path;

use crate::model::Entry;

#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct SimpleOptions {
    /// Treat `#` anywhere in the line as starting a comment, with no
    /// quote awareness.
    pub(crate) embedded_hash_comment: bool,
    /// Trim surrounding whitespace from key and value.
    pub(crate) trim_values: bool,
    /// Strip matching surrounding quotes and unescape `\"` / `\\` in
    /// double-quoted values.
    pub(crate) unescape_quoted: bool,
}

/// Split `KEY=VALUE` lines. Lines without `=` are skipped, as legacy
/// consumers expect; nothing here is a parse error.
pub(crate) fn split_lines(
    input: &str,
    source: Option<&Path>,
    options: &SimpleOptions,
) -> Vec<Entry> {
    let mut entries = Vec::new();

    for (index, full_line) in input.lines().enumerate() {
        let mut line = full_line;
        if options.embedded_hash_comment
            && let Some((head, _)) = line.split_once('#')
        {
            line = head;
        }

        let inspect = line.trim();
        if inspect.is_empty() || inspect.starts_with('#') {
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };

        let key = key.trim();
        let mut value = if options.trim_values {
            value.trim().to_owned()
        } else {
            value.to_owned()
        };
        if options.unescape_quoted {
            value = unquote(&value);
        }

        entries.push(Entry {
            key: key.to_owned(),
            raw: value.clone(),
            value,
            source: source.map(Path::to_path_buf),
            line: index as u32 + 1,
        });
    }

    entries
}

fn unquote(value: &str) -> String {
    let trimmed = value.trim();
    let bytes = trimmed.as_bytes();
    if bytes.len() < 2 {
        return value.to_owned();
    }

    match (bytes[0], bytes[bytes.len() - 1]) {
        (b'\'', b'\'') => trimmed[1..trimmed.len() - 1].to_owned(),
        (b'"', b'"') => {
            let inner = &trimmed[1..trimmed.len() - 1];
            inner.replace("\\\"", "\"").replace("\\\\", "\\")
        }
        _ => value.to_owned(),
    }
}

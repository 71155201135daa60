use std::path::PathBuf;

/// One piece of a parsed value, prior to final string concatenation.
///
/// A fragment sequence rendered with references as their source text
/// reproduces the *raw* value; rendered with references substituted, the
/// *resolved* value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fragment {
    /// An already-decoded literal segment (escape decoding applied).
    Literal(String),
    /// A `$NAME` / `${NAME}` interpolation reference.
    Reference {
        /// The variable name to resolve.
        name: String,
        /// The reference as written in the source, e.g. `${NAME}`.
        text: String,
    },
}

impl Fragment {
    pub(crate) fn literal(text: impl Into<String>) -> Self {
        Self::Literal(text.into())
    }
}

/// A parsed `KEY=VALUE` assignment from a `.env` file or input buffer.
///
/// Assignments are produced in file order and never merged: duplicate
/// keys stay visible so callers can apply their own precedence policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub key: String,
    /// Value with interpolation references substituted.
    pub value: String,
    /// Value as written, quotes removed and escapes decoded, references
    /// left in their source form.
    pub raw: String,
    pub source: Option<PathBuf>,
    pub line: u32,
}

/// Summary of the load operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoadReport {
    pub loaded: usize,
    pub skipped_existing: usize,
    pub files_read: usize,
}

/// Encoding choice for input data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Encoding {
    /// UTF-8 text input.
    #[default]
    Utf8,
}

/// Which parsing pathway the loader uses.
///
/// The two modes are deliberately distinct code paths: the simple mode's
/// naive `#`-stripping has different edge-case behavior on quoted `#`
/// than the full grammar, and unifying them would silently change one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParseMode {
    /// Full grammar: quoting dialects, escapes, interpolation.
    #[default]
    Full,
    /// Legacy splitter: `KEY=VALUE` on the first `=`, no quoting or
    /// interpolation awareness.
    Simple,
}

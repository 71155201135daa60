use std::collections::HashMap;
use std::io::BufRead;
use std::path::{Path, PathBuf};

use crate::env::EnvStore;
use crate::error::Error;
use crate::interpolate::Substitution;
use crate::model::{Encoding, Entry, LoadReport, ParseMode};
use crate::parser::{ApplyStats, ParseContext, parse_document};
use crate::simple::{SimpleOptions, split_lines};

const DEFAULT_FILE: &str = ".env";

/// Load `.env` from the current working directory into the process
/// environment.
///
/// Like the other convenience loaders this mutates process-wide state;
/// the caller must serialize it against any concurrent environment
/// access. Prefer [`EnvLoader`] with an in-memory target otherwise.
pub fn dotenv() -> Result<LoadReport, Error> {
    from_filename(DEFAULT_FILE)
}

/// Load a `.env` file from a specific path into the process environment.
pub fn from_path(path: impl AsRef<Path>) -> Result<LoadReport, Error> {
    let mut loader = EnvLoader::new()
        .path(path)
        .target(unsafe { EnvStore::process() });
    loader.load()
}

/// Load multiple `.env` files in sequence into the process environment;
/// later files override earlier ones while clobbering is enabled.
pub fn from_paths<I, P>(paths: I) -> Result<LoadReport, Error>
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    let mut loader = EnvLoader::new()
        .paths(paths)
        .target(unsafe { EnvStore::process() });
    loader.load()
}

/// Load a dotenv file by filename from the current working directory.
pub fn from_filename(name: &str) -> Result<LoadReport, Error> {
    from_path(PathBuf::from(name))
}

/// Builder-style dotenv loader.
///
/// The default target is an isolated in-memory store; nothing touches
/// the process environment unless a process store is installed with
/// [`EnvLoader::target`].
#[derive(Debug, Clone)]
pub struct EnvLoader {
    paths: Vec<PathBuf>,
    encoding: Encoding,
    parse_mode: ParseMode,
    set_env_vars: bool,
    clobber_existing_vars: bool,
    only_exact_path: bool,
    interpolation_enabled: bool,
    substitution: Substitution,
    trim_values: bool,
    embedded_hash_comment: bool,
    unescape_quoted: bool,
    debug: bool,
    target: EnvStore,
}

impl EnvLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn path(mut self, path: impl AsRef<Path>) -> Self {
        self.paths.push(path.as_ref().to_path_buf());
        self
    }

    pub fn paths<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        self.paths
            .extend(paths.into_iter().map(|path| path.as_ref().to_path_buf()));
        self
    }

    pub fn encoding(mut self, encoding: Encoding) -> Self {
        self.encoding = encoding;
        self
    }

    pub fn parse_mode(mut self, parse_mode: ParseMode) -> Self {
        self.parse_mode = parse_mode;
        self
    }

    /// Whether loaded entries are written to the target store at all.
    pub fn set_env_vars(mut self, set_env_vars: bool) -> Self {
        self.set_env_vars = set_env_vars;
        self
    }

    /// Whether loaded values overwrite pre-existing variables of the
    /// same name. Also controls interpolation precedence: with
    /// clobbering off, an already-set variable wins over a same-file
    /// redefinition.
    pub fn clobber_existing_vars(mut self, clobber: bool) -> Self {
        self.clobber_existing_vars = clobber;
        self
    }

    /// When disabled, a relative path that does not exist is searched
    /// for upward through parent directories.
    pub fn only_exact_path(mut self, only_exact_path: bool) -> Self {
        self.only_exact_path = only_exact_path;
        self
    }

    pub fn interpolation_enabled(mut self, interpolation_enabled: bool) -> Self {
        self.interpolation_enabled = interpolation_enabled;
        self
    }

    /// Substitution handler applied to every interpolation reference,
    /// e.g. [`Substitution::Required`] to fail the load on unset
    /// variables.
    pub fn substitution(mut self, substitution: Substitution) -> Self {
        self.substitution = substitution;
        self
    }

    /// Trim surrounding whitespace from keys and values (simple mode).
    pub fn trim_values(mut self, trim_values: bool) -> Self {
        self.trim_values = trim_values;
        self
    }

    /// Treat an embedded `#` as a comment without a preceding quote
    /// boundary (simple mode).
    pub fn embedded_hash_comment(mut self, embedded_hash_comment: bool) -> Self {
        self.embedded_hash_comment = embedded_hash_comment;
        self
    }

    /// Strip surrounding quotes from values (simple mode).
    pub fn unescape_quoted(mut self, unescape_quoted: bool) -> Self {
        self.unescape_quoted = unescape_quoted;
        self
    }

    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn target(mut self, target: EnvStore) -> Self {
        self.target = target;
        self
    }

    pub fn target_env(&self) -> &EnvStore {
        &self.target
    }

    pub fn target_env_mut(&mut self) -> &mut EnvStore {
        &mut self.target
    }

    pub fn into_target(self) -> EnvStore {
        self.target
    }

    /// Parse the configured sources without applying anything to the
    /// target store.
    pub fn parse_only(&self) -> Result<Vec<Entry>, Error> {
        let mut scratch = self.target.clone();
        let (entries, _) = self.run(&mut scratch, false)?;
        Ok(entries)
    }

    /// Load the configured sources, applying entries to the target store
    /// per the configured policy.
    pub fn load(&mut self) -> Result<LoadReport, Error> {
        let mut target = std::mem::take(&mut self.target);
        let apply = self.set_env_vars;
        let result = self.run(&mut target, apply);
        self.target = target;
        let (_, report) = result?;
        Ok(report)
    }

    /// Load and also return the parsed entries in file order.
    pub fn load_entries(&mut self) -> Result<(Vec<Entry>, LoadReport), Error> {
        let mut target = std::mem::take(&mut self.target);
        let apply = self.set_env_vars;
        let result = self.run(&mut target, apply);
        self.target = target;
        result
    }

    fn run(
        &self,
        target: &mut EnvStore,
        apply: bool,
    ) -> Result<(Vec<Entry>, LoadReport), Error> {
        let mut entries = Vec::new();
        let mut report = LoadReport::default();
        // Pending assignments persist across the whole load, so a later
        // file's references see an earlier file's values even when
        // nothing is applied to the store.
        let mut pending = HashMap::new();

        for path in self.effective_paths() {
            let Some(found) = self.locate(&path) else {
                // A missing file is not an error; it contributes nothing.
                if self.debug {
                    eprintln!("envfile: skipping missing file {}", path.display());
                }
                continue;
            };

            let bytes = std::fs::read(&found)?;
            report.files_read += 1;
            let content = decode(&bytes, self.encoding)?;

            let (parsed, stats) = match self.parse_mode {
                ParseMode::Full => {
                    let mut context = ParseContext {
                        store: &mut *target,
                        clobber: self.clobber_existing_vars,
                        interpolation: self.interpolation_enabled,
                        apply,
                        handler: self.substitution.clone(),
                    };
                    parse_document(content, Some(&found), &mut pending, &mut context)?
                }
                ParseMode::Simple => {
                    let options = SimpleOptions {
                        embedded_hash_comment: self.embedded_hash_comment,
                        trim_values: self.trim_values,
                        unescape_quoted: self.unescape_quoted,
                    };
                    let parsed = split_lines(content, Some(&found), &options);
                    let stats = apply_simple(&parsed, target, apply, self.clobber_existing_vars);
                    (parsed, stats)
                }
            };

            if self.debug {
                eprintln!(
                    "envfile: {} -> {} entries, {} applied, {} skipped",
                    found.display(),
                    parsed.len(),
                    stats.loaded,
                    stats.skipped_existing
                );
            }

            report.loaded += stats.loaded;
            report.skipped_existing += stats.skipped_existing;
            entries.extend(parsed);
        }

        Ok((entries, report))
    }

    fn effective_paths(&self) -> Vec<PathBuf> {
        if self.paths.is_empty() {
            vec![PathBuf::from(DEFAULT_FILE)]
        } else {
            self.paths.clone()
        }
    }

    /// Resolve a configured path to a readable file, walking parent
    /// directories when exact-path mode is off.
    fn locate(&self, path: &Path) -> Option<PathBuf> {
        if path.exists() {
            return Some(path.to_path_buf());
        }
        if self.only_exact_path || path.is_absolute() {
            return None;
        }

        let mut dir = std::env::current_dir().ok()?;
        loop {
            let candidate = dir.join(path);
            if candidate.exists() {
                return Some(candidate);
            }
            if !dir.pop() {
                return None;
            }
        }
    }
}

impl Default for EnvLoader {
    fn default() -> Self {
        Self {
            paths: Vec::new(),
            encoding: Encoding::Utf8,
            parse_mode: ParseMode::Full,
            set_env_vars: true,
            clobber_existing_vars: true,
            only_exact_path: true,
            interpolation_enabled: true,
            substitution: Substitution::Direct,
            trim_values: false,
            embedded_hash_comment: false,
            unescape_quoted: false,
            debug: false,
            target: EnvStore::memory(),
        }
    }
}

fn apply_simple(entries: &[Entry], target: &mut EnvStore, apply: bool, clobber: bool) -> ApplyStats {
    let mut stats = ApplyStats::default();
    if !apply {
        return stats;
    }

    for entry in entries {
        if clobber || !target.contains_key(&entry.key) {
            target.set(&entry.key, &entry.value);
            stats.loaded += 1;
        } else {
            stats.skipped_existing += 1;
        }
    }
    stats
}

fn decode(bytes: &[u8], encoding: Encoding) -> Result<&str, Error> {
    match encoding {
        Encoding::Utf8 => Ok(std::str::from_utf8(bytes)?),
    }
}

/// Load entries from an already-open reader into the given store.
pub fn from_reader<R: BufRead>(reader: R, target: &mut EnvStore) -> Result<Vec<Entry>, Error> {
    let mut buf = Vec::new();
    let mut reader = reader;
    reader.read_to_end(&mut buf)?;
    let content = std::str::from_utf8(&buf)?;

    let mut context = ParseContext {
        store: target,
        clobber: true,
        interpolation: true,
        apply: true,
        handler: Substitution::Direct,
    };
    let (entries, _) = parse_document(content, None, &mut HashMap::new(), &mut context)?;
    Ok(entries)
}

/// Load entries from an in-memory sequence of lines into the given
/// store.
pub fn from_lines<I, S>(lines: I, target: &mut EnvStore) -> Result<Vec<Entry>, Error>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut text = String::new();
    for line in lines {
        text.push_str(line.as_ref());
        text.push('\n');
    }

    let mut context = ParseContext {
        store: target,
        clobber: true,
        interpolation: true,
        apply: true,
        handler: Substitution::Direct,
    };
    let (entries, _) = parse_document(&text, None, &mut HashMap::new(), &mut context)?;
    Ok(entries)
}

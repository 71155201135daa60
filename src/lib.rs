//! Parse and load `.env` files.
//!
//! The core is the grammar: `KEY=VALUE` assignment lines with three
//! quoting dialects (unquoted, single-quoted, double-quoted), C-style
//! escape decoding, and `$VAR` / `${VAR}` interpolation resolved
//! eagerly against a layered provider chain.
//!
//! [`EnvLoader`] is the configurable entry point and defaults to a
//! process-isolated in-memory [`EnvStore`]. The convenience loaders
//! (`dotenv`, `from_path`, `from_paths`, `from_filename`) mutate the
//! process environment; callers must guarantee no concurrent
//! process-environment access while they run.

mod config;
mod cursor;
mod env;
mod error;
mod escape;
mod interpolate;
mod loader;
mod model;
mod parser;
mod provider;
mod simple;
mod value;

pub use config::{config_pairs, get_bool, get_double, get_int, get_string, require};
pub use env::EnvStore;
pub use error::{Error, ParseError, ParseErrorKind};
pub use interpolate::{Substitution, raw_text, resolve};
pub use loader::{
    EnvLoader, dotenv, from_filename, from_lines, from_path, from_paths, from_reader,
};
pub use model::{Encoding, Entry, Fragment, LoadReport, ParseMode};
pub use parser::{parse_bytes, parse_lines, parse_reader, parse_str};
pub use provider::{MapProvider, Provider, ProviderChain, StoreProvider};

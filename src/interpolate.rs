//! Fragment rendering and reference substitution.
//!
//! A fragment sequence is rendered twice, by two independent folds: the
//! raw fold keeps references as their source text, the resolved fold
//! substitutes them through the provider chain. Both run eagerly at the
//! moment the containing value is parsed, so each value snapshots the
//! chain's state at that instant.

use crate::error::Error;
use crate::model::Fragment;
use crate::provider::ProviderChain;

/// How a reference lookup result is turned into output text.
///
/// These mirror the common shell parameter-expansion forms (`${VAR}`,
/// `${VAR:-default}`, `${VAR:?required}`, `${VAR:+replacement}`), chosen
/// per call site; the grammar itself only recognizes plain `$VAR` and
/// `${VAR}`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Substitution {
    /// Substitute the looked-up value, or empty string when absent.
    #[default]
    Direct,
    /// Substitute the looked-up value, or the fallback when absent.
    DefaultValue(String),
    /// Fail the whole load when the key is absent from every provider.
    Required,
    /// Substitute a fixed replacement when the key exists, else empty.
    ReplaceIfPresent(String),
}

impl Substitution {
    /// Resolve one reference against the chain.
    pub fn resolve_key(&self, key: &str, chain: &ProviderChain<'_>) -> Result<String, Error> {
        match self {
            Self::Direct => Ok(chain.get(key).unwrap_or_default()),
            Self::DefaultValue(fallback) => Ok(chain.get(key).unwrap_or_else(|| fallback.clone())),
            Self::Required => chain
                .get(key)
                .ok_or_else(|| Error::MissingVariable(key.to_owned())),
            Self::ReplaceIfPresent(replacement) => Ok(if chain.contains(key) {
                replacement.clone()
            } else {
                String::new()
            }),
        }
    }
}

/// Render the fragments with every reference as its source text.
pub fn raw_text(fragments: &[Fragment]) -> String {
    let mut out = String::new();
    for fragment in fragments {
        match fragment {
            Fragment::Literal(text) => out.push_str(text),
            Fragment::Reference { text, .. } => out.push_str(text),
        }
    }
    out
}

/// Render the fragments with every reference substituted via `handler`.
pub fn resolve(
    fragments: &[Fragment],
    chain: &ProviderChain<'_>,
    handler: &Substitution,
) -> Result<String, Error> {
    let mut out = String::new();
    for fragment in fragments {
        match fragment {
            Fragment::Literal(text) => out.push_str(text),
            Fragment::Reference { name, .. } => out.push_str(&handler.resolve_key(name, chain)?),
        }
    }
    Ok(out)
}

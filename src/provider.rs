//! Lookup sources consulted during interpolation.

use std::collections::HashMap;

use crate::env::EnvStore;

/// A single place an interpolation lookup can get its value from.
pub trait Provider {
    fn get(&self, key: &str) -> Option<String>;

    fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }
}

/// Read-through to already-materialized environment variables.
pub struct StoreProvider<'a>(pub &'a EnvStore);

impl Provider for StoreProvider<'_> {
    fn get(&self, key: &str) -> Option<String> {
        self.0.get(key)
    }

    fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }
}

/// Dictionary of assignments accumulated earlier in the current parse.
pub struct MapProvider<'a>(pub &'a HashMap<String, String>);

impl Provider for MapProvider<'_> {
    fn get(&self, key: &str) -> Option<String> {
        self.0.get(key).cloned()
    }

    fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }
}

/// Ordered list of providers combined with a clobber policy.
///
/// With clobber disabled the chain is queried front-to-back, so earlier
/// sources win on keys defined in more than one place; with clobber
/// enabled it is queried back-to-front and later sources win. The chain
/// is constructed fresh per parse step and is read-only to the grammar.
pub struct ProviderChain<'a> {
    providers: Vec<&'a dyn Provider>,
    clobber: bool,
}

impl<'a> ProviderChain<'a> {
    pub fn new(clobber: bool) -> Self {
        Self {
            providers: Vec::new(),
            clobber,
        }
    }

    pub fn push(mut self, provider: &'a dyn Provider) -> Self {
        self.providers.push(provider);
        self
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.iter().find_map(|provider| provider.get(key))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.iter().any(|provider| provider.contains(key))
    }

    fn iter(&self) -> Box<dyn Iterator<Item = &&'a dyn Provider> + '_> {
        if self.clobber {
            Box::new(self.providers.iter().rev())
        } else {
            Box::new(self.providers.iter())
        }
    }
}

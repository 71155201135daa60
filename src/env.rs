use std::collections::BTreeMap;

/// Key-value store the loader applies entries to and the provider chain
/// reads interpolation lookups from.
///
/// Parsing never touches ambient global state directly; everything goes
/// through this interface, so tests can inject an isolated in-memory
/// store instead of mutating the real process environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvStore {
    kind: EnvStoreKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum EnvStoreKind {
    /// Read and write the current process environment.
    ///
    /// Writes go through [`std::env::set_var`], which mutates global
    /// process state and is not thread-safe for concurrent environment
    /// access. Reads are snapshot-less: a concurrent external mutation
    /// can be observed inconsistently across lookups.
    Process,
    /// An in-memory map.
    Memory(BTreeMap<String, String>),
}

impl Default for EnvStore {
    fn default() -> Self {
        Self::memory()
    }
}

impl EnvStore {
    /// Create a process-environment store.
    ///
    /// # Safety
    ///
    /// The caller must ensure no other threads concurrently read or
    /// write the process environment for the duration of operations
    /// that may mutate this store.
    pub unsafe fn process() -> Self {
        Self {
            kind: EnvStoreKind::Process,
        }
    }

    /// Create an empty in-memory store.
    pub fn memory() -> Self {
        Self::from_memory(BTreeMap::new())
    }

    /// Create an in-memory store from an existing map.
    pub fn from_memory(map: BTreeMap<String, String>) -> Self {
        Self {
            kind: EnvStoreKind::Memory(map),
        }
    }

    pub fn as_memory(&self) -> Option<&BTreeMap<String, String>> {
        match &self.kind {
            EnvStoreKind::Memory(map) => Some(map),
            EnvStoreKind::Process => None,
        }
    }

    pub fn as_memory_mut(&mut self) -> Option<&mut BTreeMap<String, String>> {
        match &mut self.kind {
            EnvStoreKind::Memory(map) => Some(map),
            EnvStoreKind::Process => None,
        }
    }

    pub fn contains_key(&self, key: &str) -> bool {
        match &self.kind {
            EnvStoreKind::Process => std::env::var_os(key).is_some(),
            EnvStoreKind::Memory(map) => map.contains_key(key),
        }
    }

    pub fn get(&self, key: &str) -> Option<String> {
        match &self.kind {
            EnvStoreKind::Process => {
                std::env::var_os(key).map(|value| value.to_string_lossy().into_owned())
            }
            EnvStoreKind::Memory(map) => map.get(key).cloned(),
        }
    }

    pub fn set(&mut self, key: &str, value: &str) {
        match &mut self.kind {
            EnvStoreKind::Process => unsafe { std::env::set_var(key, value) },
            EnvStoreKind::Memory(map) => {
                map.insert(key.to_owned(), value.to_owned());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_round_trips_values() {
        let mut store = EnvStore::memory();
        assert!(!store.contains_key("KEY"));
        store.set("KEY", "value");
        assert!(store.contains_key("KEY"));
        assert_eq!(store.get("KEY").expect("KEY should exist"), "value");
    }

    #[test]
    fn default_store_is_memory() {
        let store = EnvStore::default();
        assert!(store.as_memory().is_some());
    }
}

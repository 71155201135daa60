//! Boundary helpers for configuration layers and direct value access.

use crate::env::EnvStore;
use crate::error::Error;
use crate::model::Entry;

/// Translate entries for a hierarchical configuration system: each `__`
/// in a key becomes the system's path delimiter (`SECTION__KEY` with
/// delimiter `:` becomes `SECTION:KEY`). This is the only transformation
/// applied at that boundary.
pub fn config_pairs(entries: &[Entry], delimiter: &str) -> Vec<(String, String)> {
    entries
        .iter()
        .map(|entry| (entry.key.replace("__", delimiter), entry.value.clone()))
        .collect()
}

/// The variable's value, or `fallback` when absent.
pub fn get_string(store: &EnvStore, key: &str, fallback: &str) -> String {
    store.get(key).unwrap_or_else(|| fallback.to_owned())
}

/// The variable parsed as a boolean (`true`/`false`, case-insensitive),
/// or `fallback` when absent or unparseable.
pub fn get_bool(store: &EnvStore, key: &str, fallback: bool) -> bool {
    store
        .get(key)
        .and_then(|value| match value.to_ascii_lowercase().as_str() {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        })
        .unwrap_or(fallback)
}

/// The variable parsed as an integer, or `fallback` when absent or
/// unparseable.
pub fn get_int(store: &EnvStore, key: &str, fallback: i64) -> i64 {
    store
        .get(key)
        .and_then(|value| value.parse().ok())
        .unwrap_or(fallback)
}

/// The variable parsed as a float, or `fallback` when absent or
/// unparseable. Parsing is locale-invariant: the decimal separator is
/// always `.`.
pub fn get_double(store: &EnvStore, key: &str, fallback: f64) -> f64 {
    store
        .get(key)
        .and_then(|value| value.parse().ok())
        .unwrap_or(fallback)
}

/// The variable's value, or [`Error::VariableNotFound`] when absent.
pub fn require(store: &EnvStore, key: &str) -> Result<String, Error> {
    store
        .get(key)
        .ok_or_else(|| Error::VariableNotFound(key.to_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> EnvStore {
        let mut store = EnvStore::memory();
        store.set("STR", "text");
        store.set("TRUTHY", "True");
        store.set("NUM", "42");
        store.set("FLOAT", "2.5");
        store.set("JUNK", "not a number");
        store
    }

    #[test]
    fn config_pairs_translate_double_underscores() {
        let entries = crate::parse_str("SECTION__KEY=1\nNESTED__A__B=2\nPLAIN=3\n")
            .expect("parse should succeed");
        let pairs = config_pairs(&entries, ":");

        assert_eq!(pairs[0], ("SECTION:KEY".to_owned(), "1".to_owned()));
        assert_eq!(pairs[1], ("NESTED:A:B".to_owned(), "2".to_owned()));
        assert_eq!(pairs[2], ("PLAIN".to_owned(), "3".to_owned()));
    }

    #[test]
    fn getters_return_parsed_values() {
        let store = store();
        assert_eq!(get_string(&store, "STR", "fb"), "text");
        assert!(get_bool(&store, "TRUTHY", false));
        assert_eq!(get_int(&store, "NUM", 0), 42);
        assert_eq!(get_double(&store, "FLOAT", 0.0), 2.5);
    }

    #[test]
    fn getters_fall_back_on_absent_or_unparseable() {
        let store = store();
        assert_eq!(get_string(&store, "ABSENT", "fb"), "fb");
        assert!(get_bool(&store, "ABSENT", true));
        assert!(!get_bool(&store, "JUNK", false));
        assert_eq!(get_int(&store, "JUNK", 7), 7);
        assert_eq!(get_double(&store, "ABSENT", 1.5), 1.5);
    }

    #[test]
    fn require_reports_missing_variable() {
        let store = store();
        assert_eq!(require(&store, "STR").expect("present"), "text");

        let err = require(&store, "ABSENT").expect_err("absent key should fail");
        match err {
            Error::VariableNotFound(name) => assert_eq!(name, "ABSENT"),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}

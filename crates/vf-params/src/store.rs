//! Raw key/value storage and the `key=value` loader.
//!
//! Type conversion lives in [`crate::typed`].

use crate::error::{LoadError, ParamResult};
use crate::source::{ParamSource, select_source_from_args};
use indexmap::IndexMap;
use std::cell::{Cell, OnceCell};
use std::fs;
use std::io;
use std::path::Path;
use tracing::{debug, warn};

/// Maximum number of distinct keys kept by default.
pub const DEFAULT_CAPACITY: usize = 256;

/// One stored parameter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParameterEntry<'a> {
    pub key: &'a str,
    pub value: &'a str,
}

type Entries = IndexMap<String, String>;

/// Insertion-ordered parameter table for one run.
///
/// Parsing is deferred until the first lookup unless [`ParameterStore::load`]
/// is called explicitly. Loading always starts from an empty table.
#[derive(Debug)]
pub struct ParameterStore {
    source: ParamSource,
    capacity: usize,
    entries: OnceCell<Entries>,
    warned_missing: Cell<bool>,
}

impl Default for ParameterStore {
    fn default() -> Self {
        Self::new(ParamSource::default())
    }
}

impl ParameterStore {
    /// Create an unloaded store reading from `source`.
    pub fn new(source: ParamSource) -> Self {
        Self {
            source,
            capacity: DEFAULT_CAPACITY,
            entries: OnceCell::new(),
            warned_missing: Cell::new(false),
        }
    }

    /// Create an unloaded store from positional command-line arguments.
    pub fn from_args<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::new(select_source_from_args(args))
    }

    /// Limit the number of distinct keys. New keys beyond the limit are dropped.
    pub fn with_capacity_limit(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn source(&self) -> &ParamSource {
        &self.source
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_loaded(&self) -> bool {
        self.entries.get().is_some()
    }

    /// Select a new source without reading it. The next lookup reloads.
    pub fn select_source(&mut self, source: ParamSource) {
        self.source = source;
        self.entries = OnceCell::new();
    }

    /// Clear the table and load `path`.
    pub fn load(&mut self, path: impl AsRef<Path>) -> ParamResult<()> {
        self.load_source(ParamSource::File(path.as_ref().to_path_buf()))
    }

    /// Clear the table and load `source`, which becomes the selected source.
    ///
    /// On error the table is left empty (and counts as loaded), so every
    /// lookup returns its default.
    pub fn load_source(&mut self, source: ParamSource) -> ParamResult<()> {
        self.source = source;
        let (entries, result) = self.read_source();
        self.entries = OnceCell::from(entries);
        result
    }

    /// Reload the currently selected source.
    pub fn reload(&mut self) -> ParamResult<()> {
        self.load_source(self.source.clone())
    }

    /// Raw value for `key`, loading lazily.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries().get(key).map(String::as_str)
    }

    /// Raw value for `key`, or `default` when absent.
    pub fn get_string(&self, key: &str, default: &str) -> String {
        self.get(key).unwrap_or(default).to_string()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries().contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }

    /// Entries in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = ParameterEntry<'_>> {
        self.entries().iter().map(|(key, value)| ParameterEntry {
            key: key.as_str(),
            value: value.as_str(),
        })
    }

    fn entries(&self) -> &Entries {
        self.entries.get_or_init(|| self.read_source().0)
    }

    fn read_source(&self) -> (Entries, ParamResult<()>) {
        let mut entries = Entries::new();
        let text = match &self.source {
            ParamSource::Inline(text) => text.clone(),
            ParamSource::File(path) => match fs::read_to_string(path) {
                Ok(text) => text,
                Err(err) if err.kind() == io::ErrorKind::NotFound => {
                    if !self.warned_missing.replace(true) {
                        warn!(
                            "Parameter file '{}' not found. Using defaults.",
                            path.display()
                        );
                    }
                    return (entries, Err(LoadError::NotFound { path: path.clone() }));
                }
                Err(source) => {
                    warn!(
                        "Failed to read parameter file '{}': {}. Using defaults.",
                        path.display(),
                        source
                    );
                    return (
                        entries,
                        Err(LoadError::Read {
                            path: path.clone(),
                            source,
                        }),
                    );
                }
            },
        };

        for (key, value) in text.lines().filter_map(parse_line) {
            insert_bounded(&mut entries, self.capacity, key, value);
        }
        debug!(source = %self.source, count = entries.len(), "parameters loaded");
        (entries, Ok(()))
    }
}

/// Split one line into a trimmed `(key, value)` pair.
///
/// Text after the first `#` is discarded. Lines without `=` or with an empty
/// key or value yield `None`.
pub(crate) fn parse_line(line: &str) -> Option<(&str, &str)> {
    let line = match line.find('#') {
        Some(idx) => &line[..idx],
        None => line,
    };
    let (key, value) = line.split_once('=')?;
    let (key, value) = (key.trim(), value.trim());
    if key.is_empty() || value.is_empty() {
        return None;
    }
    Some((key, value))
}

fn insert_bounded(entries: &mut Entries, capacity: usize, key: &str, value: &str) {
    if let Some(existing) = entries.get_mut(key) {
        *existing = value.to_string();
        return;
    }
    if entries.len() >= capacity {
        warn!(
            "Parameter entry limit reached ({}), skipping '{}'",
            capacity, key
        );
        return;
    }
    entries.insert(key.to_string(), value.to_string());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inline(text: &str) -> ParameterStore {
        ParameterStore::new(ParamSource::Inline(text.to_string()))
    }

    #[test]
    fn parse_line_rules() {
        assert_eq!(parse_line("Oh = 0.01"), Some(("Oh", "0.01")));
        assert_eq!(parse_line("  tmax=2.0   # horizon"), Some(("tmax", "2.0")));
        assert_eq!(parse_line("# MAXlevel=10"), None);
        assert_eq!(parse_line("no separator here"), None);
        assert_eq!(parse_line("=value"), None);
        assert_eq!(parse_line("key=   "), None);
        assert_eq!(parse_line("key=#comment only"), None);
        assert_eq!(parse_line(""), None);
        // only the first '=' splits
        assert_eq!(parse_line("expr=a=b"), Some(("expr", "a=b")));
    }

    #[test]
    fn last_write_wins_and_keeps_position() {
        let store = inline("a=1\nb=2\na=3\n");
        assert_eq!(store.get("a"), Some("3"));
        let keys: Vec<_> = store.iter().map(|e| e.key).collect();
        assert_eq!(keys, vec!["a", "b"]);
    }

    #[test]
    fn keys_are_case_sensitive() {
        let store = inline("Oh=0.1\n");
        assert_eq!(store.get("Oh"), Some("0.1"));
        assert_eq!(store.get("oh"), None);
        assert_eq!(store.get_string("oh", "dflt"), "dflt");
    }

    #[test]
    fn lookup_loads_lazily() {
        let store = inline("x=1\n");
        assert!(!store.is_loaded());
        assert!(store.contains("x"));
        assert!(store.is_loaded());
    }

    #[test]
    fn capacity_limit_drops_new_keys_only() {
        let store = inline("a=1\nb=2\nc=3\na=9\n").with_capacity_limit(2);
        assert_eq!(store.len(), 2);
        assert_eq!(store.get("a"), Some("9"));
        assert_eq!(store.get("c"), None);
    }

    #[test]
    fn load_replaces_previous_entries() {
        let mut store = inline("a=1\n");
        assert_eq!(store.len(), 1);
        store
            .load_source(ParamSource::Inline("b=2\n".to_string()))
            .unwrap();
        assert_eq!(store.get("a"), None);
        assert_eq!(store.get("b"), Some("2"));
    }

    #[test]
    fn missing_file_leaves_store_empty() {
        let mut store = ParameterStore::default();
        let path = std::env::temp_dir().join("vf_params_definitely_missing.params");
        let _ = std::fs::remove_file(&path);
        let err = store.load(&path).unwrap_err();
        assert!(matches!(err, LoadError::NotFound { .. }));
        assert!(store.is_loaded());
        assert!(store.is_empty());
        assert_eq!(store.get_string("CaseNo", "1000"), "1000");
        // second miss is silent but still reported to the caller
        assert!(store.reload().is_err());
    }

    #[test]
    fn select_source_resets_loaded_state() {
        let mut store = inline("a=1\n");
        assert!(store.contains("a"));
        store.select_source(ParamSource::Inline("b=1\n".to_string()));
        assert!(!store.is_loaded());
        assert!(!store.contains("a"));
        assert!(store.contains("b"));
    }
}

//! Shared runtime context for a command tree
//!
//! A [`RuntimeContext`] is created once per tree and handed to every node by
//! reference counting, so a value stored by one handler is visible to every
//! handler that runs after it in the same process. Values are kept as JSON
//! values, which lets integrators store any `Serialize` type and read it back
//! into any `DeserializeOwned` type.

use serde::Serialize;
use serde::de::DeserializeOwned;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use thiserror::Error;

/// Errors raised while filling a context from configuration
#[derive(Debug, Error)]
pub enum ContextError {
    #[error("Failed to read config file '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse TOML config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Failed to convert config value: {0}")]
    Value(#[from] serde_json::Error),
}

#[derive(Debug)]
struct ContextState {
    values: BTreeMap<String, serde_json::Value>,
    cwd: PathBuf,
}

/// Mutable key/value store plus the working directory at start-up
///
/// Cloning a `RuntimeContext` yields another handle to the same store.
#[derive(Debug, Clone)]
pub struct RuntimeContext {
    state: Rc<RefCell<ContextState>>,
}

impl RuntimeContext {
    /// Creates an empty context, capturing the current working directory
    pub fn new() -> Self {
        let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self::with_cwd(cwd)
    }

    /// Creates an empty context with an explicit working directory
    pub fn with_cwd(cwd: impl Into<PathBuf>) -> Self {
        RuntimeContext {
            state: Rc::new(RefCell::new(ContextState {
                values: BTreeMap::new(),
                cwd: cwd.into(),
            })),
        }
    }

    /// Working directory captured when the context was created
    pub fn cwd(&self) -> PathBuf {
        self.state.borrow().cwd.clone()
    }

    /// Stores a serializable value under `key`, replacing any previous value
    pub fn set<V: Serialize>(&self, key: impl Into<String>, value: V) -> Result<(), ContextError> {
        let value = serde_json::to_value(value)?;
        self.set_value(key, value);
        Ok(())
    }

    pub fn set_value(&self, key: impl Into<String>, value: serde_json::Value) {
        self.state.borrow_mut().values.insert(key.into(), value);
    }

    /// Reads `key` back as `T`
    ///
    /// Returns `None` when the key is absent or holds a value of another shape.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let value = self.get_value(key)?;
        serde_json::from_value(value).ok()
    }

    /// Reads `key`, falling back to `default` when absent or mistyped
    pub fn get_or<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        self.get(key).unwrap_or(default)
    }

    pub fn get_value(&self, key: &str) -> Option<serde_json::Value> {
        self.state.borrow().values.get(key).cloned()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.state.borrow().values.contains_key(key)
    }

    pub fn remove(&self, key: &str) -> Option<serde_json::Value> {
        self.state.borrow_mut().values.remove(key)
    }

    /// Keys currently stored, in sorted order
    pub fn keys(&self) -> Vec<String> {
        self.state.borrow().values.keys().cloned().collect()
    }

    /// True when both handles point at the same store
    pub fn same_as(&self, other: &RuntimeContext) -> bool {
        Rc::ptr_eq(&self.state, &other.state)
    }

    /// Merges the top-level table of a TOML document into the store
    ///
    /// Returns the number of keys written. Nested tables are stored as JSON
    /// objects under their top-level key.
    pub fn merge_toml_str(&self, content: &str) -> Result<usize, ContextError> {
        let table: toml::Table = toml::from_str(content)?;
        let mut written = 0;
        for (key, value) in table {
            let value = serde_json::to_value(value)?;
            self.set_value(key, value);
            written += 1;
        }
        Ok(written)
    }

    /// Reads a TOML file and merges it into the store
    pub fn load_toml(&self, path: &Path) -> Result<usize, ContextError> {
        let content = std::fs::read_to_string(path).map_err(|source| ContextError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.merge_toml_str(&content)
    }
}

impl Default for RuntimeContext {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for RuntimeContext {
    fn eq(&self, other: &Self) -> bool {
        self.same_as(other)
    }
}

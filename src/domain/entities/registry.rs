//! Name-keyed registry shared by commands and plugins

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tracing::warn;
use crate::application::errors::RegistryError;

/// Registry mapping names to shared entries.
///
/// Entries are handed out as `Arc`s, so no lock is held while a caller uses
/// one. `register` refuses to replace an existing name; `insert` replaces on
/// purpose.
pub struct Registry<T: ?Sized> {
    entries: RwLock<HashMap<String, Arc<T>>>,
}

impl<T: ?Sized> Registry<T> {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub fn from_map(entries: HashMap<String, Arc<T>>) -> Self {
        Self {
            entries: RwLock::new(entries),
        }
    }

    /// Add a new entry, failing if the name is taken
    pub fn register(&self, name: impl Into<String>, entry: Arc<T>) -> Result<(), RegistryError> {
        let name = name.into();
        let mut entries = self.entries.write()
            .map_err(|_| RegistryError::Poisoned)?;

        if entries.contains_key(&name) {
            return Err(RegistryError::Duplicate(name));
        }

        entries.insert(name, entry);
        Ok(())
    }

    /// Add or replace an entry, returning the replaced one
    pub fn insert(&self, name: impl Into<String>, entry: Arc<T>) -> Result<Option<Arc<T>>, RegistryError> {
        let mut entries = self.entries.write()
            .map_err(|_| RegistryError::Poisoned)?;
        Ok(entries.insert(name.into(), entry))
    }

    pub fn remove(&self, name: &str) -> Result<Option<Arc<T>>, RegistryError> {
        let mut entries = self.entries.write()
            .map_err(|_| RegistryError::Poisoned)?;
        Ok(entries.remove(name))
    }

    /// Look up an entry, reporting a poisoned lock as an error
    pub fn lookup(&self, name: &str) -> Result<Option<Arc<T>>, RegistryError> {
        let entries = self.entries.read()
            .map_err(|_| RegistryError::Poisoned)?;
        Ok(entries.get(name).cloned())
    }

    pub fn get(&self, name: &str) -> Option<Arc<T>> {
        match self.lookup(name) {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Lookup of '{}' failed: {}", name, e);
                None
            }
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.read()
            .ok()
            .map(|e| e.contains_key(name))
            .unwrap_or(false)
    }

    /// All names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.entries.read()
            .ok()
            .map(|e| e.keys().cloned().collect())
            .unwrap_or_default();
        names.sort();
        names
    }

    /// All entries sorted by name
    pub fn entries(&self) -> Vec<(String, Arc<T>)> {
        let mut entries: Vec<(String, Arc<T>)> = self.entries.read()
            .ok()
            .map(|e| e.iter().map(|(k, v)| (k.clone(), Arc::clone(v))).collect())
            .unwrap_or_default();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        entries
    }

    pub fn len(&self) -> usize {
        self.entries.read()
            .ok()
            .map(|e| e.len())
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
impl<T: ?Sized> Registry<T> {
    /// Poison the lock by panicking while it is held.
    pub(crate) fn poison(&self) {
        let _ = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _guard = self.entries.write();
            panic!("poisoning registry");
        }));
    }
}

impl<T: ?Sized> Default for Registry<T> {
    fn default() -> Self {
        Self::new()
    }
}

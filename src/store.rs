use std::collections::HashMap;
use std::sync::RwLock;

use crate::error::StoreError;
use crate::icon::IconInput;

/// The in-memory mapping from icon identifier to the raw record supplied at
/// creation time. Entries live for the process lifetime; there is no
/// eviction and no persistence.
///
/// A separate insertion-order index keeps listing deterministic. The lock
/// is never held across an await point, so a plain [`RwLock`] is enough to
/// keep parallel worker threads from corrupting each other's writes.
#[derive(Debug, Default)]
pub struct IconStore {
    inner: RwLock<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    records: HashMap<String, IconInput>,
    order: Vec<String>,
}

impl IconStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up the raw record stored under `id`. No side effects.
    pub fn get(&self, id: &str) -> Result<Option<IconInput>, StoreError> {
        let inner = self
            .inner
            .read()
            .map_err(|_| StoreError::Poisoned { operation: "get" })?;
        Ok(inner.records.get(id).cloned())
    }

    /// Store `record` under `id`. A fresh id gets a new insertion slot; an
    /// existing id keeps its slot and has its record overwritten. The
    /// current operations always generate fresh ids, so the overwrite path
    /// only matters if an id were ever reused.
    pub fn put(&self, id: String, record: IconInput) -> Result<(), StoreError> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| StoreError::Poisoned { operation: "put" })?;
        if inner.records.insert(id.clone(), record).is_none() {
            inner.order.push(id);
        }
        Ok(())
    }

    /// Every (id, raw record) pair, in insertion order.
    pub fn entries(&self) -> Result<Vec<(String, IconInput)>, StoreError> {
        let inner = self
            .inner
            .read()
            .map_err(|_| StoreError::Poisoned { operation: "entries" })?;
        Ok(inner
            .order
            .iter()
            .filter_map(|id| inner.records.get(id).map(|r| (id.clone(), r.clone())))
            .collect())
    }

    pub fn len(&self) -> Result<usize, StoreError> {
        let inner = self
            .inner
            .read()
            .map_err(|_| StoreError::Poisoned { operation: "len" })?;
        Ok(inner.order.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str) -> IconInput {
        IconInput {
            name: name.to_string(),
            ..IconInput::default()
        }
    }

    #[test]
    fn test_get_absent_returns_none() {
        let store = IconStore::new();
        assert_eq!(store.get("missing").unwrap(), None);
    }

    #[test]
    fn test_put_then_get() {
        let store = IconStore::new();
        store.put("a".to_string(), record("home")).unwrap();
        assert_eq!(store.get("a").unwrap(), Some(record("home")));
    }

    #[test]
    fn test_entries_preserve_insertion_order() {
        let store = IconStore::new();
        for name in ["home", "star", "gear"] {
            store.put(name.to_string(), record(name)).unwrap();
        }
        let ids: Vec<String> = store.entries().unwrap().into_iter().map(|(id, _)| id).collect();
        assert_eq!(ids, ["home", "star", "gear"]);
    }

    #[test]
    fn test_overwrite_keeps_insertion_slot() {
        let store = IconStore::new();
        store.put("a".to_string(), record("home")).unwrap();
        store.put("b".to_string(), record("star")).unwrap();
        store.put("a".to_string(), record("house")).unwrap();

        assert_eq!(store.len().unwrap(), 2);
        let entries = store.entries().unwrap();
        assert_eq!(entries[0].0, "a");
        assert_eq!(entries[0].1, record("house"));
        assert_eq!(entries[1].0, "b");
    }
}

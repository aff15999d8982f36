//! Per-instance key-value storage
//!
//! Every deployed instance owns a disjoint slice of one shared store; keys
//! are scoped by instance address so no instance can observe another's state.

use dashmap::DashMap;
use serde::{Deserialize, Serialize};

use crate::types::Address;

/// Storage key (scoped to one deployed instance)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StorageKey {
    /// Owning instance
    pub instance: Address,
    /// Key within the instance
    pub key: Vec<u8>,
}

impl StorageKey {
    /// Create new storage key
    pub fn new(instance: Address, key: impl AsRef<[u8]>) -> Self {
        Self {
            instance,
            key: key.as_ref().to_vec(),
        }
    }

    /// Key for a named state field
    pub fn field(instance: Address, name: &str) -> Self {
        Self::new(instance, name.as_bytes())
    }

    /// Key for one entry of a mapping-like field (`map:key`)
    pub fn entry(instance: Address, map: &str, key: &str) -> Self {
        Self::new(instance, format!("{map}:{key}").as_bytes())
    }

    /// Full key bytes (instance prefix + key)
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = self.instance.0.to_vec();
        bytes.extend_from_slice(&self.key);
        bytes
    }
}

/// Point-in-time copy of the whole store, used to roll back reverted calls
#[derive(Debug, Clone)]
pub struct StoreSnapshot(Vec<(Vec<u8>, serde_json::Value)>);

/// In-memory storage backing all deployed instances
#[derive(Debug, Default)]
pub struct MemoryStore {
    data: DashMap<Vec<u8>, serde_json::Value>,
}

impl MemoryStore {
    /// Create new empty store
    pub fn new() -> Self {
        Self {
            data: DashMap::new(),
        }
    }

    /// Get value
    pub fn get(&self, key: &StorageKey) -> Option<serde_json::Value> {
        self.data.get(&key.to_bytes()).map(|v| v.clone())
    }

    /// Set value
    pub fn set(&self, key: &StorageKey, value: serde_json::Value) {
        self.data.insert(key.to_bytes(), value);
    }

    /// Delete value, returning the previous one if any
    pub fn remove(&self, key: &StorageKey) -> Option<serde_json::Value> {
        self.data.remove(&key.to_bytes()).map(|(_, v)| v)
    }

    /// Check if key exists
    pub fn contains(&self, key: &StorageKey) -> bool {
        self.data.contains_key(&key.to_bytes())
    }

    /// Number of entries across all instances
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Clear all data
    pub fn clear(&self) {
        self.data.clear();
    }

    /// Capture the current contents.
    ///
    /// Stores here hold a handful of toy-contract fields, so a full copy per
    /// call is the whole transaction mechanism: commit by dropping the
    /// snapshot, roll back with [`MemoryStore::restore`].
    pub fn snapshot(&self) -> StoreSnapshot {
        StoreSnapshot(
            self.data
                .iter()
                .map(|entry| (entry.key().clone(), entry.value().clone()))
                .collect(),
        )
    }

    /// Restore contents captured by [`MemoryStore::snapshot`]
    pub fn restore(&self, snapshot: StoreSnapshot) {
        self.data.clear();
        for (key, value) in snapshot.0 {
            self.data.insert(key, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_storage_key_scoping() {
        let a = Address::derive("a");
        let b = Address::derive("b");

        let key_a = StorageKey::field(a, "count");
        let key_b = StorageKey::field(b, "count");
        assert_ne!(key_a.to_bytes(), key_b.to_bytes());
    }

    #[test]
    fn test_entry_key() {
        let addr = Address::derive("contract");
        let key = StorageKey::entry(addr, "balances", "alice");
        assert_eq!(key.key, b"balances:alice");
    }

    #[test]
    fn test_set_get_remove() {
        let store = MemoryStore::new();
        let key = StorageKey::field(Address::derive("c"), "greeting");

        store.set(&key, json!("hello"));
        assert_eq!(store.get(&key), Some(json!("hello")));
        assert!(store.contains(&key));

        assert_eq!(store.remove(&key), Some(json!("hello")));
        assert!(!store.contains(&key));
        assert_eq!(store.get(&key), None);
    }

    #[test]
    fn test_snapshot_restore() {
        let store = MemoryStore::new();
        let addr = Address::derive("c");
        let key = StorageKey::field(addr, "count");

        store.set(&key, json!(1));
        let snap = store.snapshot();

        store.set(&key, json!(99));
        store.set(&StorageKey::field(addr, "extra"), json!(true));
        assert_eq!(store.len(), 2);

        store.restore(snap);
        assert_eq!(store.get(&key), Some(json!(1)));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_instance_isolation() {
        let store = MemoryStore::new();
        let a = Address::derive("a");
        let b = Address::derive("b");

        store.set(&StorageKey::field(a, "count"), json!(7));
        assert_eq!(store.get(&StorageKey::field(b, "count")), None);
    }
}

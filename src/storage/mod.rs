pub mod json_backend;
pub mod registry;

use std::collections::HashMap;
use std::sync::RwLock;

use crate::errors::{BookingError, Result};

/// String-valued key-value store, the persistence seam behind the vehicle
/// registry.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

/// Volatile store used by tests and by sessions without a data directory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self
            .entries
            .read()
            .map_err(|_| BookingError::StorageError("memory store lock poisoned".into()))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| BookingError::StorageError("memory store lock poisoned".into()))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| BookingError::StorageError("memory store lock poisoned".into()))?;
        entries.remove(key);
        Ok(())
    }
}

pub use json_backend::JsonFileStore;
pub use registry::{LocalVehicleRegistry, VehicleRegistry, VEHICLES_KEY};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_overwrites_and_removes() {
        let store = MemoryStore::new();
        assert_eq!(store.get("vehicles").unwrap(), None);
        store.set("vehicles", "[]").unwrap();
        store.set("vehicles", "[1]").unwrap();
        assert_eq!(store.get("vehicles").unwrap().as_deref(), Some("[1]"));
        store.remove("vehicles").unwrap();
        assert_eq!(store.get("vehicles").unwrap(), None);
    }
}

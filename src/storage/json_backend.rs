use std::{fs, path::PathBuf};

use crate::{
    core::utils::{ensure_dir, PathResolver},
    utils::persistence::write_atomic,
};

use super::{KeyValueStore, Result};

const DOCUMENT_EXTENSION: &str = "json";

/// One JSON document per key under `<home>/store`.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    store_dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(root: Option<PathBuf>) -> Result<Self> {
        let app_root = PathResolver::resolve_base(root);
        ensure_dir(&app_root)?;
        let store_dir = PathResolver::store_dir_in(&app_root);
        ensure_dir(&store_dir)?;
        Ok(Self { store_dir })
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.store_dir
            .join(format!("{}.{}", canonical_key(key), DOCUMENT_EXTENSION))
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(path)?))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        write_atomic(&self.path_for(key), value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.path_for(key);
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }
}

fn canonical_key(key: &str) -> String {
    let sanitized: String = key
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'a'..='z' | '0'..='9' | '-' => c,
            _ => '_',
        })
        .collect();
    if sanitized.trim_matches('_').is_empty() {
        "default".into()
    } else {
        sanitized
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_with_temp_dir() -> (JsonFileStore, TempDir) {
        let temp = TempDir::new().expect("temp dir");
        let store = JsonFileStore::new(Some(temp.path().to_path_buf())).expect("json store");
        (store, temp)
    }

    #[test]
    fn values_survive_reopening_the_store() {
        let (store, guard) = store_with_temp_dir();
        store.set("vehicles", r#"[{"plate":"AB123CD"}]"#).expect("set");
        let reopened = JsonFileStore::new(Some(guard.path().to_path_buf())).expect("reopen");
        assert_eq!(
            reopened.get("vehicles").expect("get").as_deref(),
            Some(r#"[{"plate":"AB123CD"}]"#)
        );
    }

    #[test]
    fn keys_map_to_sanitized_file_names() {
        let (store, guard) = store_with_temp_dir();
        assert_eq!(
            store.path_for("My Vehicles!"),
            guard.path().join("store").join("my_vehicles_.json")
        );
        assert!(store.path_for("  ").ends_with("default.json"));
    }

    #[test]
    fn remove_is_silent_for_missing_keys() {
        let (store, _guard) = store_with_temp_dir();
        store.remove("absent").expect("remove missing");
        store.set("k", "v").expect("set");
        store.remove("k").expect("remove");
        assert_eq!(store.get("k").expect("get"), None);
    }
}

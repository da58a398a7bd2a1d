use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
    sync::Mutex,
};

use anyhow::{Context, Result};
use directories::ProjectDirs;

use crate::models::{non_empty, PersistedUrlState, LAST_LOADED_URL_KEY, LAST_REMOTE_URL_KEY};

/// String key-value persistence used for the URL slots.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

pub fn local_state_path() -> Result<PathBuf> {
    let proj = ProjectDirs::from("com", "Storefront", "StorefrontShell")
        .ok_or_else(|| anyhow::anyhow!("Could not determine local data directory"))?;
    let dir = proj.data_local_dir();
    fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir.join("url-state.json"))
}

/// Reads both slots from any store. Read errors are reported as empty slots.
pub fn load_url_state(store: &dyn KeyValueStore) -> PersistedUrlState {
    let read = |key: &str| match store.get(key) {
        Ok(v) => non_empty(v),
        Err(e) => {
            tracing::warn!(key, error = ?e, "url state read failed");
            None
        }
    };
    PersistedUrlState {
        last_loaded_url: read(LAST_LOADED_URL_KEY),
        last_remote_url: read(LAST_REMOTE_URL_KEY),
    }
}

/// JSON file backed store. The file is read once on open; every mutation
/// rewrites it.
pub struct JsonFileStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl JsonFileStore {
    pub fn open_default() -> Result<Self> {
        Self::open(local_state_path()?)
    }

    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let entries = if path.exists() {
            let raw =
                fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))?;
            serde_json::from_str::<BTreeMap<String, String>>(&raw)
                .with_context(|| format!("parse {}", path.display()))?
        } else {
            BTreeMap::new()
        };
        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
        }
        let raw = serde_json::to_string_pretty(entries)?;
        fs::write(&self.path, raw).with_context(|| format!("write {}", self.path.display()))?;
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| anyhow::anyhow!("url state lock poisoned"))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| anyhow::anyhow!("url state lock poisoned"))?;
        if entries.get(key).map(String::as_str) == Some(value) {
            return Ok(());
        }
        // Memory only moves once the file write has succeeded.
        let mut next = entries.clone();
        next.insert(key.to_string(), value.to_string());
        self.save(&next)?;
        *entries = next;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| anyhow::anyhow!("url state lock poisoned"))?;
        if entries.contains_key(key) {
            let mut next = entries.clone();
            next.remove(key);
            self.save(&next)?;
            *entries = next;
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries<'a>(entries: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        Self {
            entries: Mutex::new(
                entries
                    .into_iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
            ),
        }
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| anyhow::anyhow!("memory store lock poisoned"))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| anyhow::anyhow!("memory store lock poisoned"))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| anyhow::anyhow!("memory store lock poisoned"))?;
        entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_opens_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path().join("url-state.json")).unwrap();
        assert_eq!(store.get(LAST_LOADED_URL_KEY).unwrap(), None);
        assert!(!store.path().exists());
    }

    #[test]
    fn values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("url-state.json");

        let store = JsonFileStore::open(&path).unwrap();
        store.set(LAST_REMOTE_URL_KEY, "https://shop.example/app").unwrap();
        store.set(LAST_LOADED_URL_KEY, "https://shop.example/home").unwrap();
        store.remove(LAST_LOADED_URL_KEY).unwrap();
        drop(store);

        let reopened = JsonFileStore::open(&path).unwrap();
        assert_eq!(
            load_url_state(&reopened),
            PersistedUrlState {
                last_loaded_url: None,
                last_remote_url: Some("https://shop.example/app".to_string()),
            }
        );
    }

    #[test]
    fn corrupt_file_is_an_open_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("url-state.json");
        fs::write(&path, "not json").unwrap();
        let err = JsonFileStore::open(&path).err().unwrap();
        assert!(format!("{err:#}").contains("parse"));
    }

    #[test]
    fn failed_write_leaves_memory_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "not a directory").unwrap();

        let store = JsonFileStore::open(blocker.join("url-state.json")).unwrap();
        assert!(store.set(LAST_LOADED_URL_KEY, "https://x").is_err());
        assert_eq!(store.get(LAST_LOADED_URL_KEY).unwrap(), None);
    }

    #[test]
    fn failed_remove_keeps_the_value() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("url-state.json");
        let store = JsonFileStore::open(&path).unwrap();
        store.set(LAST_LOADED_URL_KEY, "https://x").unwrap();

        // Swap the file for a directory so the rewrite fails.
        fs::remove_file(&path).unwrap();
        fs::create_dir(&path).unwrap();

        assert!(store.remove(LAST_LOADED_URL_KEY).is_err());
        assert_eq!(store.get(LAST_LOADED_URL_KEY).unwrap().as_deref(), Some("https://x"));
    }

    #[test]
    fn blank_slots_load_as_absent() {
        let store = MemoryStore::with_entries([
            (LAST_LOADED_URL_KEY, "   "),
            (LAST_REMOTE_URL_KEY, "https://old.example"),
        ]);
        let state = load_url_state(&store);
        assert_eq!(state.last_loaded_url, None);
        assert_eq!(state.last_remote_url.as_deref(), Some("https://old.example"));
    }
}

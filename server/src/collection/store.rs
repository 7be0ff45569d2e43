use std::path::PathBuf;

use uuid::Uuid;

use crate::{err, Res};

use super::Collection;

/// Storage key holding the JSON encoded collection.
pub const COLLECTION_KEY: &str = "cardCollection";

/// Durable string key-value storage. A `set` replaces the whole value or
/// leaves the old one in place.
pub trait KeyValueStore: Send {
    fn get(&self, key: &str) -> Res<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Res<()>;
}

/// Stores each key as a JSON file in a directory.
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new<P: Into<PathBuf>>(dir: P) -> Res<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir).map_err(|e| e.to_string())?;
        Ok(Self { dir })
    }

    fn path_for(&self, key: &str) -> Res<PathBuf> {
        if key.is_empty() || key.contains(['/', '\\', '.']) {
            return err(format!("Invalid storage key: {key}"));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Res<Option<String>> {
        match std::fs::read_to_string(self.path_for(key)?) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.to_string()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Res<()> {
        let path = self.path_for(key)?;

        // Write aside and rename over the old value so readers never see a
        // partial write.
        let tmp = self.dir.join(format!(".{key}.{}.tmp", Uuid::new_v4()));
        if let Err(e) = std::fs::write(&tmp, value).and_then(|_| std::fs::rename(&tmp, &path)) {
            std::fs::remove_file(&tmp).ok();
            return Err(format!("Failed to write {}: {e}", path.display()));
        }
        Ok(())
    }
}

#[cfg(test)]
#[derive(Default)]
pub struct MemoryStore {
    values: std::collections::HashMap<String, String>,
    pub fail_writes: bool,
}

#[cfg(test)]
impl MemoryStore {
    pub fn with(key: &str, value: &str) -> Self {
        let mut store = Self::default();
        store.values.insert(key.to_string(), value.to_string());
        store
    }

    pub fn failing() -> Self {
        Self {
            fail_writes: true,
            ..Default::default()
        }
    }
}

#[cfg(test)]
impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Res<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Res<()> {
        if self.fail_writes {
            return err("Storage quota exceeded.");
        }
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Read the saved collection. Missing, unreadable or malformed data all
/// produce an empty collection.
pub fn load_collection(store: &dyn KeyValueStore) -> Collection {
    let raw = match store.get(COLLECTION_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            tracing::debug!("No saved collection, starting empty.");
            return Collection::new();
        }
        Err(e) => {
            tracing::warn!("Failed to read saved collection, starting empty: {e}");
            return Collection::new();
        }
    };

    match serde_json::from_str::<Collection>(&raw) {
        Ok(collection) => {
            tracing::debug!("Loaded collection of {} cards.", collection.counts().len());
            collection
        }
        Err(e) => {
            tracing::warn!("Saved collection is corrupt, starting empty: {e}");
            Collection::new()
        }
    }
}

/// Overwrite the saved collection with this one.
pub fn save_collection(store: &mut dyn KeyValueStore, collection: &Collection) -> Res<()> {
    let raw = serde_json::to_string(collection).map_err(|e| e.to_string())?;
    store.set(COLLECTION_KEY, &raw)
}

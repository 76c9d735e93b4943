use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde_json::Value;

/// The pipeline's collaborators depend on this interface, never on a
/// particular storage backend. A `Value::Null` entry is a cached negative
/// result; absence means the key was never looked up.
pub trait KvCache: Send + Sync {
    fn get(&self, key: &str) -> Option<Value>;
    fn put(&mut self, key: &str, value: Value);
    fn flush(&mut self) -> crate::Result<()>;
}

/// Disk-backed cache that persists incrementally (every `flush_every`
/// writes) and on explicit flush. Entries are kept sorted so warm-cache
/// runs produce byte-identical files.
pub struct JsonFileCache {
    path: PathBuf,
    entries: BTreeMap<String, Value>,
    unflushed: usize,
    flush_every: usize,
}

impl JsonFileCache {
    pub fn open(path: impl Into<PathBuf>) -> crate::Result<Self> {
        let path = path.into();
        let entries = if path.exists() {
            let raw = std::fs::read_to_string(&path)?;
            serde_json::from_str(&raw)?
        } else {
            BTreeMap::new()
        };
        Ok(Self {
            path,
            entries,
            unflushed: 0,
            flush_every: 25,
        })
    }

    /// Conventional per-collaborator cache file under the user cache dir.
    #[must_use]
    pub fn default_path(name: &str) -> PathBuf {
        dirs::cache_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("kinship")
            .join(format!("{name}.json"))
    }

    #[must_use]
    pub fn with_flush_every(mut self, flush_every: usize) -> Self {
        self.flush_every = flush_every.max(1);
        self
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn write_out(&self) -> crate::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let raw = serde_json::to_string_pretty(&self.entries)?;
        std::fs::write(&self.path, raw)?;
        Ok(())
    }
}

impl KvCache for JsonFileCache {
    fn get(&self, key: &str) -> Option<Value> {
        self.entries.get(key).cloned()
    }

    fn put(&mut self, key: &str, value: Value) {
        self.entries.insert(key.to_string(), value);
        self.unflushed += 1;
        if self.unflushed >= self.flush_every {
            if let Err(error) = self.flush() {
                tracing::warn!(%error, path = %self.path.display(), "incremental cache save failed");
            }
        }
    }

    fn flush(&mut self) -> crate::Result<()> {
        self.write_out()?;
        self.unflushed = 0;
        Ok(())
    }
}

/// In-memory cache for tests and one-shot runs.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: BTreeMap<String, Value>,
}

impl MemoryCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KvCache for MemoryCache {
    fn get(&self, key: &str) -> Option<Value> {
        self.entries.get(key).cloned()
    }

    fn put(&mut self, key: &str, value: Value) {
        self.entries.insert(key.to_string(), value);
    }

    fn flush(&mut self) -> crate::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_cache_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("geo.json");

        let mut cache = JsonFileCache::open(&path).unwrap();
        cache.put("boston", serde_json::json!({"lat": 42.36}));
        cache.flush().unwrap();

        let reopened = JsonFileCache::open(&path).unwrap();
        assert_eq!(reopened.len(), 1);
        assert_eq!(
            reopened.get("boston").unwrap()["lat"],
            serde_json::json!(42.36)
        );
    }

    #[test]
    fn incremental_save_kicks_in() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("geo.json");

        let mut cache = JsonFileCache::open(&path).unwrap().with_flush_every(2);
        cache.put("a", Value::Null);
        assert!(!path.exists());
        cache.put("b", Value::Null);
        assert!(path.exists());
    }

    #[test]
    fn negative_entries_are_distinguishable_from_absent() {
        let mut cache = MemoryCache::new();
        assert!(cache.get("nowhere").is_none());
        cache.put("nowhere", Value::Null);
        assert_eq!(cache.get("nowhere"), Some(Value::Null));
    }
}

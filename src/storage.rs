// Durable key-value storage
// Backs credentials and cached user state; survives process restarts

use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use dashmap::DashMap;
use rusqlite::Connection;

/// Key-value storage consumed by the auth layer.
///
/// The surface is deliberately infallible: reads degrade to absent and write
/// failures are logged, so a broken storage backend behaves like an empty one
/// and the normal 401 path takes over.
pub trait Storage: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
    fn clear(&self);

    /// Write several keys together. Backends that can, do it atomically.
    fn set_many(&self, entries: &[(&str, &str)]) {
        for (key, value) in entries {
            self.set(key, value);
        }
    }
}

/// SQLite-backed storage over a single `app_kv` table
pub struct SqliteStorage {
    conn: Mutex<Connection>,
}

impl SqliteStorage {
    /// Open (or create) the storage database at the given path
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create storage dir: {}", parent.display())
                })?;
            }
        }

        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open storage database: {}", path.display()))?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS app_kv (key TEXT PRIMARY KEY, value TEXT NOT NULL)",
            [],
        )
        .context("Failed to create app_kv table")?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

impl Storage for SqliteStorage {
    fn get(&self, key: &str) -> Option<String> {
        let conn = self.conn.lock().expect("storage lock poisoned");
        conn.query_row("SELECT value FROM app_kv WHERE key = ?", [key], |row| {
            row.get(0)
        })
        .ok()
    }

    fn set(&self, key: &str, value: &str) {
        let conn = self.conn.lock().expect("storage lock poisoned");
        if let Err(e) = conn.execute(
            "INSERT OR REPLACE INTO app_kv (key, value) VALUES (?, ?)",
            [key, value],
        ) {
            tracing::error!("Storage write failed for key {}: {}", key, e);
        }
    }

    fn remove(&self, key: &str) {
        let conn = self.conn.lock().expect("storage lock poisoned");
        if let Err(e) = conn.execute("DELETE FROM app_kv WHERE key = ?", [key]) {
            tracing::error!("Storage delete failed for key {}: {}", key, e);
        }
    }

    fn clear(&self) {
        let conn = self.conn.lock().expect("storage lock poisoned");
        if let Err(e) = conn.execute("DELETE FROM app_kv", []) {
            tracing::error!("Storage clear failed: {}", e);
        }
    }

    fn set_many(&self, entries: &[(&str, &str)]) {
        let mut conn = self.conn.lock().expect("storage lock poisoned");
        let result = (|| -> rusqlite::Result<()> {
            let tx = conn.transaction()?;
            for (key, value) in entries {
                tx.execute(
                    "INSERT OR REPLACE INTO app_kv (key, value) VALUES (?, ?)",
                    [key, value],
                )?;
            }
            tx.commit()
        })();

        if let Err(e) = result {
            tracing::error!("Storage batch write failed: {}", e);
        }
    }
}

/// In-memory storage for tests and ephemeral sessions
#[derive(Default)]
pub struct MemoryStorage {
    map: DashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.map.get(key).map(|entry| entry.value().clone())
    }

    fn set(&self, key: &str, value: &str) {
        self.map.insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.map.remove(key);
    }

    fn clear(&self) {
        self.map.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_storage_roundtrip() {
        let storage = MemoryStorage::new();

        assert_eq!(storage.get("missing"), None);

        storage.set("key", "value");
        assert_eq!(storage.get("key"), Some("value".to_string()));

        storage.set("key", "other");
        assert_eq!(storage.get("key"), Some("other".to_string()));

        storage.remove("key");
        assert_eq!(storage.get("key"), None);
    }

    #[test]
    fn test_memory_storage_clear() {
        let storage = MemoryStorage::new();
        storage.set("a", "1");
        storage.set("b", "2");

        storage.clear();

        assert_eq!(storage.get("a"), None);
        assert_eq!(storage.get("b"), None);
    }

    #[test]
    fn test_set_many_writes_all_entries() {
        let storage = MemoryStorage::new();
        storage.set_many(&[("a", "1"), ("b", "2")]);

        assert_eq!(storage.get("a"), Some("1".to_string()));
        assert_eq!(storage.get("b"), Some("2".to_string()));
    }

    #[test]
    fn test_sqlite_storage_roundtrip() {
        let dir = std::env::temp_dir().join(format!("pantry-storage-{}", std::process::id()));
        let path = dir.join("test.db");
        let _ = std::fs::remove_file(&path);

        let storage = SqliteStorage::open(&path).unwrap();

        storage.set("key", "value");
        assert_eq!(storage.get("key"), Some("value".to_string()));

        storage.set_many(&[("access_token", "tok"), ("refresh_token", "ref")]);
        assert_eq!(storage.get("access_token"), Some("tok".to_string()));
        assert_eq!(storage.get("refresh_token"), Some("ref".to_string()));

        storage.remove("key");
        assert_eq!(storage.get("key"), None);

        storage.clear();
        assert_eq!(storage.get("access_token"), None);

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_sqlite_storage_persists_across_reopen() {
        let dir = std::env::temp_dir().join(format!("pantry-storage-re-{}", std::process::id()));
        let path = dir.join("test.db");
        let _ = std::fs::remove_file(&path);

        {
            let storage = SqliteStorage::open(&path).unwrap();
            storage.set("refresh_token", "durable");
        }

        let storage = SqliteStorage::open(&path).unwrap();
        assert_eq!(storage.get("refresh_token"), Some("durable".to_string()));

        let _ = std::fs::remove_file(&path);
    }
}

use std::{collections::BTreeMap, fmt, io::Error, path::PathBuf, sync::Mutex};

use async_trait::async_trait;

use crate::config;

#[derive(Debug)]
pub enum StorageError {
    IoError(Error),
    SerdeError(serde_json::Error),
    Unavailable(String),
}

impl From<Error> for StorageError {
    fn from(err: Error) -> Self {
        StorageError::IoError(err)
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::SerdeError(err)
    }
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::IoError(e) => write!(f, "storage io error: {}", e),
            StorageError::SerdeError(e) => write!(f, "storage content is not valid JSON: {}", e),
            StorageError::Unavailable(msg) => write!(f, "storage unavailable: {}", msg),
        }
    }
}

impl std::error::Error for StorageError {}

/// Small string key-value persistence that survives a restart.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    async fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Keeps all entries in one JSON object on disk.
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    async fn read_all(&self) -> Result<BTreeMap<String, String>, StorageError> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }

        let content = async_fs::read_to_string(&self.path).await?;
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        Ok(serde_json::from_str(&content)?)
    }

    /// Content that is not valid JSON is dropped so writes can recover from
    /// it. I/O failures are passed on untouched.
    async fn read_recoverable(&self) -> Result<BTreeMap<String, String>, StorageError> {
        match self.read_all().await {
            Err(StorageError::SerdeError(_)) => Ok(BTreeMap::new()),
            other => other,
        }
    }

    async fn write_all(&self, entries: &BTreeMap<String, String>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            async_fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_string_pretty(entries)?;
        async_fs::write(&self.path, json).await?;
        Ok(())
    }
}

impl Default for FileStore {
    fn default() -> Self {
        Self::new(config::session_path())
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.read_all().await?.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.read_recoverable().await?;
        entries.insert(key.to_string(), value.to_string());
        self.write_all(&entries).await
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        if !self.path.exists() {
            return Ok(());
        }

        let mut entries = self.read_recoverable().await?;
        entries.remove(key);
        self.write_all(&entries).await
    }
}

/// In-process store, for tests and sessions that should not touch disk.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: Mutex::new(
                entries
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }

    pub fn snapshot(&self) -> BTreeMap<String, String> {
        self.entries
            .lock()
            .map(|entries| entries.clone())
            .unwrap_or_default()
    }

    fn lock(
        &self,
    ) -> Result<std::sync::MutexGuard<'_, BTreeMap<String, String>>, StorageError> {
        self.entries
            .lock()
            .map_err(|e| StorageError::Unavailable(e.to_string()))
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.lock()?.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.lock()?.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn file_store_missing_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("nested/session.json"));

        assert_eq!(store.get("spotify_token").await.unwrap(), None);
        store.remove("spotify_token").await.unwrap();
        assert!(!store.path().exists());
    }

    #[tokio::test]
    async fn file_store_set_get_remove() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("nested/session.json"));

        store.set("spotify_token", "abc").await.unwrap();
        store.set("spotify_token_expiry", "1700000000000").await.unwrap();
        assert_eq!(
            store.get("spotify_token").await.unwrap().as_deref(),
            Some("abc")
        );

        store.remove("spotify_token").await.unwrap();
        assert_eq!(store.get("spotify_token").await.unwrap(), None);
        assert_eq!(
            store.get("spotify_token_expiry").await.unwrap().as_deref(),
            Some("1700000000000")
        );

        let reopened = FileStore::new(store.path().clone());
        assert_eq!(
            reopened
                .get("spotify_token_expiry")
                .await
                .unwrap()
                .as_deref(),
            Some("1700000000000")
        );
    }

    #[tokio::test]
    async fn file_store_reports_corrupt_content_on_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "not json").unwrap();
        let store = FileStore::new(&path);

        assert!(matches!(
            store.get("spotify_token").await,
            Err(StorageError::SerdeError(_))
        ));

        // removing and writing recover from a corrupt file
        store.remove("spotify_token").await.unwrap();
        store.set("spotify_token", "fresh").await.unwrap();
        assert_eq!(
            store.get("spotify_token").await.unwrap().as_deref(),
            Some("fresh")
        );
    }

    #[tokio::test]
    async fn file_store_keeps_file_when_read_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        // not UTF-8, so reading fails with an io error rather than a parse error
        let original = vec![0xff, 0xfe, 0x00, 0x7b];
        std::fs::write(&path, &original).unwrap();
        let store = FileStore::new(&path);

        assert!(matches!(
            store.set("spotify_token", "fresh").await,
            Err(StorageError::IoError(_))
        ));
        assert!(matches!(
            store.remove("spotify_token").await,
            Err(StorageError::IoError(_))
        ));
        assert_eq!(std::fs::read(&path).unwrap(), original);
    }

    #[tokio::test]
    async fn memory_store_roundtrip() {
        let store = MemoryStore::with_entries([("a", "1")]);
        assert_eq!(store.get("a").await.unwrap().as_deref(), Some("1"));
        store.set("b", "2").await.unwrap();
        store.remove("a").await.unwrap();
        assert_eq!(store.snapshot().len(), 1);
        assert_eq!(store.get("a").await.unwrap(), None);
    }
}

//! Whole-file JSON collection store.
//!
//! Each collection is a single JSON array file under the data directory.
//! Reads degrade to an empty collection when the file is absent, empty, or
//! corrupt (logged at warn, never surfaced). Writes go to a temp file and
//! rename over the target, so concurrent readers never observe a partial
//! write. One `tokio::sync::Mutex` per collection serializes
//! read-modify-write cycles to prevent lost updates.

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::Mutex;

use crate::StoreError;

/// The logical collections, each backed by one flat JSON array file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Products,
    Promotions,
    NewItems,
    Leaderboard,
    Bonuses,
}

impl Collection {
    /// Backing file name under the data directory. Promotion and new-item
    /// files keep their legacy names so existing data files keep working.
    pub fn file_name(self) -> &'static str {
        match self {
            Collection::Products => "products.json",
            Collection::Promotions => "akcii.json",
            Collection::NewItems => "novinki.json",
            Collection::Leaderboard => "leaderboard.json",
            Collection::Bonuses => "bonuses.json",
        }
    }

    fn index(self) -> usize {
        match self {
            Collection::Products => 0,
            Collection::Promotions => 1,
            Collection::NewItems => 2,
            Collection::Leaderboard => 3,
            Collection::Bonuses => 4,
        }
    }
}

const COLLECTION_COUNT: usize = 5;

/// File-backed JSON collection store.
pub struct JsonStore {
    data_dir: PathBuf,
    locks: [Mutex<()>; COLLECTION_COUNT],
}

impl JsonStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            locks: std::array::from_fn(|_| Mutex::new(())),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn path(&self, collection: Collection) -> PathBuf {
        self.data_dir.join(collection.file_name())
    }

    /// Load a collection, taking its lock so an in-flight write is observed
    /// either fully or not at all.
    pub async fn load<T: DeserializeOwned>(&self, collection: Collection) -> Vec<T> {
        let _guard = self.locks[collection.index()].lock().await;
        self.read_unlocked(collection).await
    }

    /// Overwrite a collection wholesale.
    pub async fn save<T: Serialize>(
        &self,
        collection: Collection,
        records: &[T],
    ) -> Result<(), StoreError> {
        let _guard = self.locks[collection.index()].lock().await;
        self.write_unlocked(collection, records).await
    }

    /// Append one record: load + push + save under the collection lock.
    pub async fn append<T>(&self, collection: Collection, record: T) -> Result<(), StoreError>
    where
        T: Serialize + DeserializeOwned,
    {
        let _guard = self.locks[collection.index()].lock().await;
        let mut records: Vec<T> = self.read_unlocked(collection).await;
        records.push(record);
        self.write_unlocked(collection, &records).await
    }

    /// Run a read-modify-write cycle under the collection lock.
    ///
    /// The closure sees the current records and may mutate them; on `Ok` the
    /// collection is written back, on `Err` nothing is persisted. The
    /// closure's result is returned nested so callers can distinguish
    /// storage failures from domain rejections.
    pub async fn update<T, R, E, F>(
        &self,
        collection: Collection,
        f: F,
    ) -> Result<Result<R, E>, StoreError>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce(&mut Vec<T>) -> Result<R, E>,
    {
        let _guard = self.locks[collection.index()].lock().await;
        let mut records: Vec<T> = self.read_unlocked(collection).await;
        match f(&mut records) {
            Ok(value) => {
                self.write_unlocked(collection, &records).await?;
                Ok(Ok(value))
            }
            Err(rejection) => Ok(Err(rejection)),
        }
    }

    async fn read_unlocked<T: DeserializeOwned>(&self, collection: Collection) -> Vec<T> {
        let path = self.path(collection);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(_) => return Vec::new(),
        };
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Vec::new();
        }
        match serde_json::from_slice(&bytes) {
            Ok(records) => records,
            Err(error) => {
                tracing::warn!(path = %path.display(), %error, "Corrupt collection file, treating as empty");
                Vec::new()
            }
        }
    }

    async fn write_unlocked<T: Serialize>(
        &self,
        collection: Collection,
        records: &[T],
    ) -> Result<(), StoreError> {
        let path = self.path(collection);
        tokio::fs::create_dir_all(&self.data_dir)
            .await
            .map_err(|source| StoreError::Write {
                path: self.data_dir.clone(),
                source,
            })?;

        let json = serde_json::to_vec_pretty(records)?;

        // Temp file + rename keeps concurrent readers off half-written data.
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, &json)
            .await
            .map_err(|source| StoreError::Write {
                path: tmp.clone(),
                source,
            })?;
        tokio::fs::rename(&tmp, &path)
            .await
            .map_err(|source| StoreError::Write { path, source })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

//! Uploaded-photo storage.
//!
//! Submission photos land in one flat directory under a freshly generated
//! filename (`{uuid}.{ext}`), which becomes the record's `image_url` path
//! segment. The HTTP layer serves the directory statically.

use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::StoreError;

pub struct ImageStore {
    dir: PathBuf,
}

impl ImageStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory the images live in (served as `/images`).
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Persist image bytes under a fresh 128-bit random filename and return
    /// that filename. Collisions are not checked; the id space makes them
    /// negligible.
    pub async fn save(&self, bytes: &[u8], extension: &str) -> Result<String, StoreError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|source| StoreError::Write {
                path: self.dir.clone(),
                source,
            })?;

        let filename = format!("{}.{}", Uuid::new_v4().simple(), extension);
        let path = self.dir.join(&filename);
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|source| StoreError::Write { path, source })?;
        Ok(filename)
    }
}

//! Flat-file persistence for the vitrina backend.
//!
//! Two stores: [`JsonStore`] keeps one JSON array file per logical
//! collection with a mutex serializing read-modify-write cycles per
//! collection, and [`ImageStore`] keeps uploaded submission photos under
//! generated filenames.

pub mod collections;
pub mod images;

pub use collections::{Collection, JsonStore};
pub use images::ImageStore;

/// Persistence error. Reads never produce one (absent or corrupt files
/// degrade to an empty collection); writes surface it to the caller.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to write {path}: {source}")]
    Write {
        path: std::path::PathBuf,
        source: std::io::Error,
    },

    #[error("failed to encode collection: {0}")]
    Encode(#[from] serde_json::Error),
}

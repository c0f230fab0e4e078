//! Content-addressed storage for uploaded source documents.

mod hash;

pub mod filesystem;

use async_trait::async_trait;

pub use filesystem::FilesystemDocumentStore;
pub use hash::ContentHash;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("document not found: {0}")]
    NotFound(String),
    #[error("storage IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid content hash: {0}")]
    InvalidHash(String),
    #[error("document exceeds size limit ({actual} > {limit} bytes)")]
    TooLarge { actual: usize, limit: usize },
}

/// Immutable document bytes keyed by their SHA-256 hash.
///
/// Storing the same bytes twice yields the same hash and one stored copy.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn put(&self, data: &[u8]) -> Result<ContentHash, StorageError>;

    async fn get(&self, hash: &ContentHash) -> Result<Vec<u8>, StorageError>;

    async fn exists(&self, hash: &ContentHash) -> Result<bool, StorageError>;

    /// Returns `false` if nothing was stored under `hash`.
    async fn delete(&self, hash: &ContentHash) -> Result<bool, StorageError>;
}

//! Object storage for raw image bytes
//!
//! Defines the storage gateway abstraction and the MinIO/S3-compatible
//! implementation used in production.

use async_trait::async_trait;

use crate::core::error::Result;

mod minio_client;

pub use minio_client::MinioStorage;

/// One stored object: its bytes and the content type recorded at upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub data: Vec<u8>,
    pub content_type: String,
}

/// Gateway to the object storage bucket.
///
/// Read and write are separate operations; a handle obtained for reading
/// is never reinterpreted as writable.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Write an object under `key`, recording its content type. The write
    /// has fully completed (or failed) when this returns.
    async fn put(&self, key: &str, data: &[u8], content_type: &str) -> Result<()>;

    /// Whether an object exists under `key`.
    async fn exists(&self, key: &str) -> Result<bool>;

    /// Read the object under `key`.
    async fn get(&self, key: &str) -> Result<StoredObject>;
}

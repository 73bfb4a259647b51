//! Object storage abstraction
//!
//! The submission flow only needs one thing from a storage provider: put a
//! blob into a bucket under a key. Keeping that behind a trait lets tests
//! swap in a mock and keeps the provider's wider API out of the core.

pub mod supabase;

pub use supabase::SupabaseStorage;

use async_trait::async_trait;
use thiserror::Error;

#[cfg(any(test, feature = "testing"))]
use mockall::automock;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// The service answered and refused the upload
    #[error("{message}")]
    Rejected { status: u16, message: String },
    #[error("Storage request failed: {message}")]
    Transport { message: String },
    #[error("Storage is not configured: {message}")]
    NotConfigured { message: String },
}

/// Narrow storage contract used by the submission orchestrator.
#[cfg_attr(any(test, feature = "testing"), automock)]
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Store `content` in `bucket` under `key`
    async fn upload(&self, bucket: &str, key: &str, content: &[u8]) -> Result<(), StorageError>;
}

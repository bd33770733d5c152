use crate::errors::StorageError;
use async_trait::async_trait;
use std::sync::Arc;

pub type DynStorageService = Arc<dyn StorageServiceTrait + Send + Sync>;

/// Object-store operations the waiver flow needs. Paths are relative to
/// the configured bucket.
#[async_trait]
pub trait StorageServiceTrait {
    async fn upload(
        &self,
        path: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<(), StorageError>;

    async fn create_bucket(&self) -> Result<(), StorageError>;

    async fn create_signed_url(
        &self,
        path: &str,
        expires_in_secs: i64,
    ) -> Result<String, StorageError>;
}

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Bucket not found")]
    BucketNotFound,

    #[error("Storage request failed: {0}")]
    Request(String),
}

impl From<reqwest::Error> for StorageError {
    fn from(error: reqwest::Error) -> Self {
        StorageError::Request(error.to_string())
    }
}

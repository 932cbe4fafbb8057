use thiserror::Error;

#[derive(Error, Debug)]
pub enum FksError {
    #[error("Key not found: {key}")]
    KeyNotFound { key: String },

    #[error("Key not found")]
    KeyNotFoundFast, // Performance-optimized variant without string allocation

    #[error("Bucket {bucket} still collided after {attempts} rehash attempts; the random source may be degenerate")]
    RehashLimitExceeded { bucket: usize, attempts: usize },
}

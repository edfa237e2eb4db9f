use thiserror::Error;
use redis::RedisError;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Username already exists: {0}")]
    DuplicateUsername(String),

    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Redis error: {0}")]
    Redis(#[from] RedisError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Corrupt record: {0}")]
    Corrupt(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

// Error types for the service, built on thiserror.
use axum::extract::rejection::{JsonRejection, PathRejection};
use thiserror::Error;

pub mod response;
pub mod store;
pub mod token;

pub use store::{StoreError, StoreResult};
pub use token::TokenError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid token format")]
    AuthFormat,

    #[error("Invalid token: {0}")]
    AuthInvalid(#[from] TokenError),

    #[error("Username already taken: {0}")]
    DuplicateUser(String),

    #[error("Unknown user: {0}")]
    UnknownUser(String),

    #[error("Password mismatch for user: {0}")]
    BadPassword(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Store error: {0}")]
    Store(StoreError),

    #[error("Hashing error: {0}")]
    Hashing(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

// Duplicate usernames surface as their own variant so the boundary can answer 409.
impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateUsername(name) => AppError::DuplicateUser(name),
            StoreError::UserNotFound(id) => AppError::NotFound(format!("user {}", id)),
            other => AppError::Store(other),
        }
    }
}

// Extractor rejections carry serde detail; keep it in the log and answer with a fixed message.
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!("Rejected request body: {}", rejection.body_text());
        AppError::Validation("Invalid request body".into())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        tracing::debug!("Rejected path parameters: {}", rejection.body_text());
        AppError::Validation("Invalid path parameter".into())
    }
}

// Custom result type
pub type AppResult<T> = Result<T, AppError>;

//! Domain service for user accounts.

use thiserror::Error;

use crate::db::StoreError;
use crate::models::status::LockState;
use crate::models::user::{RegisterUser, UserRecord};

#[derive(Debug, Error)]
pub enum UserError {
    #[error("User not found: {0}")]
    NotFound(String),

    #[error("Username already taken: {0}")]
    UsernameTaken(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<StoreError> for UserError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(msg) => Self::NotFound(msg),
            StoreError::UniqueConstraintViolation(msg) => Self::UsernameTaken(msg),
            StoreError::InvalidArgument(msg) => Self::Validation(msg),
            StoreError::TransactionFailure(msg) | StoreError::Database(msg) => {
                Self::Database(msg)
            }
            StoreError::Internal(msg) => Self::Internal(msg),
        }
    }
}

#[async_trait::async_trait]
pub trait UserService: Send + Sync {
    /// Hashes the password and registers a locked account with the default
    /// scope. Returns the new user id.
    ///
    /// # Errors
    ///
    /// Returns [`UserError::UsernameTaken`] if the username exists.
    async fn register(&self, params: RegisterUser) -> Result<String, UserError>;

    async fn find_by_name(&self, username: &str) -> Result<Option<UserRecord>, UserError>;

    async fn set_lock(&self, user_id: &str, state: LockState) -> Result<(), UserError>;
}

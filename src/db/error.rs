use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

/// Errors surfaced by the device and user stores.
///
/// Lookups never produce [`StoreError::NotFound`]; absence is reported as
/// `None`. A write that references a missing row does. Constraint
/// violations are kept distinct so callers can answer with a conflict
/// instead of a generic failure.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unique constraint violated: {0}")]
    UniqueConstraintViolation(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Transaction failed: {0}")]
    TransactionFailure(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

impl From<DbErr> for StoreError {
    fn from(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(msg)) => Self::UniqueConstraintViolation(msg),
            Some(SqlErr::ForeignKeyConstraintViolation(msg)) => {
                Self::NotFound(format!("Referenced row does not exist: {msg}"))
            }
            _ => Self::Database(err.to_string()),
        }
    }
}

impl StoreError {
    /// Maps an error raised inside a multi-statement transaction.
    ///
    /// Unique violations keep their kind; everything else becomes a
    /// [`StoreError::TransactionFailure`].
    pub(crate) fn in_transaction(err: DbErr) -> Self {
        match Self::from(err) {
            Self::Database(msg) => Self::TransactionFailure(msg),
            other => other,
        }
    }

    #[must_use]
    pub const fn is_unique_violation(&self) -> bool {
        matches!(self, Self::UniqueConstraintViolation(_))
    }

    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generic_db_error_maps_to_database() {
        let err = StoreError::from(DbErr::Custom("boom".to_string()));
        assert!(matches!(err, StoreError::Database(ref m) if m.contains("boom")));
    }

    #[test]
    fn test_transaction_error_mapping() {
        let err = StoreError::in_transaction(DbErr::Custom("commit failed".to_string()));
        assert!(matches!(err, StoreError::TransactionFailure(_)));
        assert!(!err.is_unique_violation());
    }
}

// Error types for storage and service operations

use thiserror::Error;

/// Result type alias for platform operations
pub type Result<T> = std::result::Result<T, GatherError>;

/// Errors that can cross the storage and service boundaries
///
/// Expected business results (full event, duplicate registration) are not
/// errors; they live in [`crate::outcome`]. This taxonomy covers the failures
/// underneath: transient storage contention that is safe to retry from the
/// start, and everything that is not.
#[derive(Debug, Error)]
pub enum GatherError {
    /// Lock timeout, deadlock, or serialization failure. The whole operation
    /// may be retried from the beginning.
    #[error("transient storage failure: {0}")]
    Transient(String),

    /// Database error
    #[error("database error: {0}")]
    Database(String),

    /// Input failed a request-boundary check
    #[error("validation error: {0}")]
    Validation(String),

    /// Internal error
    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// Postgres SQLSTATEs that signal retryable contention, not real failure:
/// serialization_failure, deadlock_detected, lock_not_available.
#[cfg(feature = "sqlx")]
const TRANSIENT_SQLSTATES: [&str; 3] = ["40001", "40P01", "55P03"];

#[cfg(feature = "sqlx")]
impl From<sqlx::Error> for GatherError {
    fn from(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &e {
            if let Some(code) = db_err.code() {
                if TRANSIENT_SQLSTATES.contains(&code.as_ref()) {
                    return GatherError::Transient(e.to_string());
                }
            }
        }
        GatherError::Database(e.to_string())
    }
}

impl GatherError {
    /// Create a transient storage error
    pub fn transient(msg: impl Into<String>) -> Self {
        GatherError::Transient(msg.into())
    }

    /// Create a database error
    pub fn database(msg: impl Into<String>) -> Self {
        GatherError::Database(msg.into())
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        GatherError::Validation(msg.into())
    }

    /// Whether retrying the whole operation may succeed
    pub fn is_transient(&self) -> bool {
        matches!(self, GatherError::Transient(_))
    }
}

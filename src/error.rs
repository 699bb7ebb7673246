//! Service-layer error taxonomy.
//!
//! Every failure a caller can hit is distinguishable by kind so the
//! presentation layer can render an appropriate message. Validation and
//! state-machine violations are detected before any write; only `Store`
//! and `Auth` represent transport failures and are worth retrying.

use serde::Serialize;
use thiserror::Error;

use crate::auth::AuthError;
use crate::db::DbError;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("no authenticated identity")]
    Unauthenticated,

    #[error("operation not permitted for this role")]
    Forbidden,

    #[error("already checked in on {day}")]
    AlreadyCheckedIn { day: String },

    #[error("record is already checked out")]
    AlreadyCheckedOut,

    #[error("member is already assigned to this project")]
    AlreadyAssigned,

    #[error("progress must be between 0 and 100, got {given}")]
    InvalidProgress { given: i64 },

    #[error("comment must not be empty")]
    InvalidComment,

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("storage error: {0}")]
    Store(#[from] DbError),

    #[error(transparent)]
    Auth(#[from] AuthError),
}

/// Machine-readable failure kind, serialized for the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ErrorKind {
    Unauthenticated,
    Forbidden,
    AlreadyCheckedIn,
    AlreadyCheckedOut,
    AlreadyAssigned,
    InvalidProgress,
    InvalidComment,
    NotFound,
    StoreUnavailable,
    AuthUnavailable,
}

impl CoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CoreError::Unauthenticated => ErrorKind::Unauthenticated,
            CoreError::Forbidden => ErrorKind::Forbidden,
            CoreError::AlreadyCheckedIn { .. } => ErrorKind::AlreadyCheckedIn,
            CoreError::AlreadyCheckedOut => ErrorKind::AlreadyCheckedOut,
            CoreError::AlreadyAssigned => ErrorKind::AlreadyAssigned,
            CoreError::InvalidProgress { .. } => ErrorKind::InvalidProgress,
            CoreError::InvalidComment => ErrorKind::InvalidComment,
            CoreError::NotFound { .. } => ErrorKind::NotFound,
            CoreError::Store(_) => ErrorKind::StoreUnavailable,
            CoreError::Auth(_) => ErrorKind::AuthUnavailable,
        }
    }

    /// True for transport failures the caller may retry as-is.
    pub fn is_retryable(&self) -> bool {
        matches!(self, CoreError::Store(_) | CoreError::Auth(_))
    }

    /// Helper for missing-row failures.
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        CoreError::NotFound {
            entity,
            id: id.into(),
        }
    }
}

/// Serializable failure representation for the presentation layer.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CoreFailure {
    pub message: String,
    pub kind: ErrorKind,
    pub can_retry: bool,
}

impl From<&CoreError> for CoreFailure {
    fn from(err: &CoreError) -> Self {
        CoreFailure {
            message: err.to_string(),
            kind: err.kind(),
            can_retry: err.is_retryable(),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_mapping() {
        assert_eq!(
            CoreError::Unauthenticated.kind(),
            ErrorKind::Unauthenticated
        );
        assert_eq!(
            CoreError::AlreadyCheckedIn {
                day: "2026-03-02".to_string()
            }
            .kind(),
            ErrorKind::AlreadyCheckedIn
        );
        assert_eq!(
            CoreError::not_found("project", "p1").kind(),
            ErrorKind::NotFound
        );
    }

    #[test]
    fn test_retryability() {
        assert!(!CoreError::Forbidden.is_retryable());
        assert!(!CoreError::InvalidProgress { given: 101 }.is_retryable());
        assert!(CoreError::Store(DbError::HomeDirNotFound).is_retryable());
    }

    #[test]
    fn test_failure_serialization() {
        let err = CoreError::InvalidProgress { given: -5 };
        let failure = CoreFailure::from(&err);
        let json = serde_json::to_value(&failure).expect("serialize");
        assert_eq!(json["kind"], "invalidProgress");
        assert_eq!(json["canRetry"], false);
        assert!(json["message"].as_str().unwrap().contains("-5"));
    }
}

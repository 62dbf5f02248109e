//! Storage fault classification.
//!
//! Driver errors are folded into a small set of tagged variants at this
//! boundary so upper layers can map them to HTTP responses without ever
//! inspecting driver message strings.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Unique constraint violation, a value that must be unique already
    /// exists.
    #[error("duplicate value for a unique field")]
    Duplicate,

    /// Foreign key, not-null or check constraint violation.
    #[error("invalid reference or constraint violation")]
    InvalidReference,

    /// The requested row does not exist.
    #[error("record not found")]
    NotFound,

    #[error("query failed: {0}")]
    QueryFailed(String),
}

pub type DatabaseResult<T> = Result<T, DatabaseError>;

impl From<sqlx::Error> for DatabaseError {
    fn from(error: sqlx::Error) -> Self {
        match error {
            sqlx::Error::RowNotFound => DatabaseError::NotFound,
            sqlx::Error::Database(db) => match db.kind() {
                sqlx::error::ErrorKind::UniqueViolation => DatabaseError::Duplicate,
                sqlx::error::ErrorKind::ForeignKeyViolation
                | sqlx::error::ErrorKind::NotNullViolation
                | sqlx::error::ErrorKind::CheckViolation => DatabaseError::InvalidReference,
                _ => DatabaseError::QueryFailed(db.to_string()),
            },
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => {
                DatabaseError::ConnectionFailed(error.to_string())
            }
            other => DatabaseError::QueryFailed(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::error::ErrorKind;

    /// Minimal driver error carrying just an [`ErrorKind`].
    #[derive(Debug)]
    struct StubDriverError(&'static str);

    impl std::fmt::Display for StubDriverError {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "stub driver error: {}", self.0)
        }
    }

    impl std::error::Error for StubDriverError {}

    impl sqlx::error::DatabaseError for StubDriverError {
        fn message(&self) -> &str {
            "stub driver error"
        }

        fn kind(&self) -> ErrorKind {
            match self.0 {
                "unique" => ErrorKind::UniqueViolation,
                "foreign_key" => ErrorKind::ForeignKeyViolation,
                "not_null" => ErrorKind::NotNullViolation,
                "check" => ErrorKind::CheckViolation,
                _ => ErrorKind::Other,
            }
        }

        fn as_error(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn std::error::Error + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn std::error::Error + Send + Sync + 'static> {
            self
        }
    }

    fn driver_error(kind: &'static str) -> sqlx::Error {
        sqlx::Error::Database(Box::new(StubDriverError(kind)))
    }

    #[test]
    fn unique_violations_classify_as_duplicate() {
        let classified = DatabaseError::from(driver_error("unique"));
        assert!(matches!(classified, DatabaseError::Duplicate));
    }

    #[test]
    fn constraint_violations_classify_as_invalid_reference() {
        for kind in ["foreign_key", "not_null", "check"] {
            let classified = DatabaseError::from(driver_error(kind));
            assert!(
                matches!(classified, DatabaseError::InvalidReference),
                "{kind} misclassified as {classified:?}"
            );
        }
    }

    #[test]
    fn row_not_found_classifies_as_not_found() {
        let classified = DatabaseError::from(sqlx::Error::RowNotFound);
        assert!(matches!(classified, DatabaseError::NotFound));
    }

    #[test]
    fn unrecognized_driver_errors_fall_back_to_query_failed() {
        let classified = DatabaseError::from(driver_error("syntax"));
        assert!(matches!(classified, DatabaseError::QueryFailed(_)));
    }
}

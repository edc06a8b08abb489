//! Unified error types for the souq catalog service.
//!
//! Every core operation either returns a success value or fails with one
//! of these kinds. A missing image blob is deliberately not represented
//! here: it resolves to the default placeholder instead (see
//! [`crate::images::ImageStore::resolve`]).

use tokio_rusqlite::rusqlite;

/// Unified error types for the souq catalog service.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Malformed input reaching the core (empty item or category name,
    /// image filename without the required extension).
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Lookup by id with no matching row.
    #[error("not found: {0}")]
    NotFound(String),

    /// Database operation failed.
    #[error("storage error: {0}")]
    Database(tokio_rusqlite::Error),

    /// Migration failed to apply.
    #[error("storage error: migration failed: {0}")]
    MigrationFailed(String),

    /// Filesystem operation on the image directory failed.
    #[error("storage error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// True for the storage-fault kinds, as opposed to caller errors.
    pub fn is_storage_fault(&self) -> bool {
        matches!(self, Error::Database(_) | Error::MigrationFailed(_) | Error::Io(_))
    }
}

impl From<tokio_rusqlite::Error<Error>> for Error {
    fn from(err: tokio_rusqlite::Error<Error>) -> Self {
        match err {
            tokio_rusqlite::Error::Error(e) => e,
            tokio_rusqlite::Error::ConnectionClosed => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
            tokio_rusqlite::Error::Close(c) => Error::Database(tokio_rusqlite::Error::Close(c)),
            _ => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
        }
    }
}

impl From<tokio_rusqlite::Error<rusqlite::Error>> for Error {
    fn from(err: tokio_rusqlite::Error<rusqlite::Error>) -> Self {
        Error::Database(err)
    }
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Error::Database(tokio_rusqlite::Error::Error(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::NotFound("item 42".to_string());
        assert!(err.to_string().contains("not found"));
        assert!(err.to_string().contains("item 42"));
    }

    #[test]
    fn test_invalid_request_is_not_storage_fault() {
        assert!(!Error::InvalidRequest("empty name".into()).is_storage_fault());
        assert!(!Error::NotFound("item 1".into()).is_storage_fault());
        assert!(Error::MigrationFailed("boom".into()).is_storage_fault());
    }
}

use std::{io, sync::Arc};
use thiserror::Error;

use crate::common::file_operations::FileOperationError;

/// Errors surfaced by the range-scannable store collaborator.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// Not enough replicas were reachable to serve the request.
    #[error("Store unavailable: '{0}'")]
    Unavailable(String),
    /// The request did not complete in time.
    #[error("Store request timed out: '{0}'")]
    Timeout(String),
    /// Hard I/O failure while talking to the store.
    #[error("Store IO error: '{0}'")]
    Io(Arc<io::Error>),
}

impl StoreError {
    /// Unavailability and timeouts may succeed on a later attempt, IO errors never do.
    pub fn is_transient(&self) -> bool {
        matches!(self, StoreError::Unavailable(_) | StoreError::Timeout(_))
    }
}

impl From<io::Error> for StoreError {
    fn from(io_err: io::Error) -> StoreError {
        StoreError::Io(Arc::new(io_err))
    }
}

/// The library's error enum
#[derive(Debug, Error)]
pub enum TermIndexError {
    /// A scan or point read failed and will not be retried.
    #[error("Store request failed: '{0}'")]
    Store(#[from] StoreError),

    /// Every point-read attempt failed with a transient error.
    #[error("Read command failed after {attempts} attempts, last error: '{last_error}'")]
    ReadRetriesExhausted { attempts: usize, last_error: StoreError },

    /// The cursor policy knobs are inconsistent.
    #[error("Invalid TermIndexConfig: '{0}'")]
    InvalidConfig(String),

    /// Invalid argument was passed by the user.
    #[error("An invalid argument was passed: '{0}'")]
    InvalidArgument(String),

    /// `term()` or postings were requested while no term is current.
    #[error("Cursor is not positioned on a term")]
    Unpositioned,

    /// A row key could not be produced or parsed.
    #[error("Key codec error: '{0}'")]
    KeyCodec(String),

    #[error("'{0:?}'")]
    FileOperationError(#[from] FileOperationError),
}

#[cfg(test)]
mod tests {
    use std::io;

    use super::{StoreError, TermIndexError};
    use crate::common::file_operations::FileOperationError;

    #[test]
    fn test_transient_classification() {
        assert!(StoreError::Unavailable("replica down".to_string()).is_transient());
        assert!(StoreError::Timeout("rpc".to_string()).is_transient());
        let io_error: StoreError = io::Error::new(io::ErrorKind::BrokenPipe, "closed").into();
        assert!(!io_error.is_transient());
    }

    #[test]
    fn test_retry_exhausted_message() {
        let error = TermIndexError::ReadRetriesExhausted {
            attempts: 10,
            last_error: StoreError::Timeout("slow node".to_string()),
        };
        assert!(error.to_string().starts_with("Read command failed after 10 attempts"));
    }

    #[test]
    fn test_file_errors_convert() {
        let missing = FileOperationError::IoError(io::Error::new(io::ErrorKind::NotFound, "term_index_config.json"));
        let error: TermIndexError = missing.into();
        assert!(matches!(error, TermIndexError::FileOperationError(FileOperationError::IoError(_))));
    }
}

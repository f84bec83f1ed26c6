//! Status codes for store failures.

use super::RepositoryError;

/// HTTP status code reported to clients when a store call fails.
///
/// A missing row is the caller's problem (404) and a duplicate key a
/// conflict (409). An unreachable store is 503, while a store that answered
/// with an error is 502. Rows the server cannot decode are 500, and rows the
/// store refused as malformed are 400.
///
/// ```
/// use eventboard_core::storage::{repository_error_to_status_code, RepositoryError};
///
/// let error = RepositoryError::event_not_found("abc-123");
/// assert_eq!(repository_error_to_status_code(&error), 404);
/// ```
pub fn repository_error_to_status_code(error: &RepositoryError) -> u16 {
    use RepositoryError::*;

    match error {
        NotFound { .. } => 404,
        AlreadyExists { .. } => 409,
        InvalidData(_) => 400,
        Serialization(_) => 500,
        QueryFailed(_) => 502,
        ConnectionFailed(_) => 503,
    }
}

use thiserror::Error;

/// Errors that can occur during repository operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("{entity_type} not found: {id}")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },
    #[error("{entity_type} already exists: {id}")]
    AlreadyExists {
        entity_type: &'static str,
        id: String,
    },
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),
    #[error("Query failed: {0}")]
    QueryFailed(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

impl RepositoryError {
    /// Builds a `NotFound` error for an event id.
    pub fn event_not_found(id: impl ToString) -> Self {
        RepositoryError::NotFound {
            entity_type: "Event",
            id: id.to_string(),
        }
    }

    /// The detail message carried by this error, without its category prefix.
    ///
    /// Empty when the backend reported a failure without any description.
    pub fn detail(&self) -> String {
        match self {
            RepositoryError::NotFound { .. } | RepositoryError::AlreadyExists { .. } => {
                self.to_string()
            }
            RepositoryError::ConnectionFailed(msg)
            | RepositoryError::QueryFailed(msg)
            | RepositoryError::Serialization(msg)
            | RepositoryError::InvalidData(msg) => msg.trim().to_string(),
        }
    }
}

/// Result type for repository operations.
pub type Result<T> = std::result::Result<T, RepositoryError>;

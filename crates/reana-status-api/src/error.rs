use thiserror::Error;

/// Status error types
#[derive(Error, Debug)]
pub enum StatusError {
    #[error("Unknown status category: {0}")]
    UnknownCategory(String),

    #[error("Command not found: {0}")]
    CommandNotFound(String),

    #[error("Command `{command}` failed ({status}): {stderr}")]
    CommandFailed {
        command: String,
        status: String,
        stderr: String,
    },

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Kubernetes API error: {0}")]
    KubernetesError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type StatusResult<T> = Result<T, StatusError>;

impl From<serde_json::Error> for StatusError {
    fn from(err: serde_json::Error) -> Self {
        StatusError::SerializationError(err.to_string())
    }
}

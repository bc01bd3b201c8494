use std::fmt;

#[derive(Debug)]
pub enum ApplicationError {
    NotFound,
    BadRequest(String),
    MalformedInput(String),
    StorageError(String),
    InternalError(String),
}

impl fmt::Display for ApplicationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApplicationError::NotFound => f.write_str("Resource not found"),
            ApplicationError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            ApplicationError::MalformedInput(msg) => write!(f, "Malformed input: {}", msg),
            ApplicationError::StorageError(msg) => write!(f, "Storage error: {}", msg),
            ApplicationError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApplicationError {}

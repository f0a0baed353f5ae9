/// Errors that can occur while talking to the storage backend
#[derive(Debug, Clone, PartialEq)]
pub enum StorageError {
    /// The backend rejected the request (missing bucket, access denied, ...)
    BackendError {
        status: u16,
        code: String,
        message: String,
        request_id: Option<String>,
    },

    /// The request never produced a backend response
    TransportError { message: String },

    /// The backend answered with something that could not be decoded
    InvalidResponse { message: String },

    /// The backend client is not usable with the given configuration
    ConfigurationError { message: String },

    /// Writing the report to the output sink failed
    OutputError { message: String },
}

impl StorageError {
    /// Error code reported by the backend, if the failure came from it
    pub fn backend_code(&self) -> Option<&str> {
        match self {
            StorageError::BackendError { code, .. } => Some(code),
            _ => None,
        }
    }
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageError::BackendError {
                status,
                code,
                message,
                request_id,
            } => {
                write!(f, "Storage backend error ({} {}): {}", status, code, message)?;
                if let Some(request_id) = request_id {
                    write!(f, " (request id: {})", request_id)?;
                }
                Ok(())
            }
            StorageError::TransportError { message } => {
                write!(f, "Transport error: {}", message)
            }
            StorageError::InvalidResponse { message } => {
                write!(f, "Invalid backend response: {}", message)
            }
            StorageError::ConfigurationError { message } => {
                write!(f, "Backend configuration error: {}", message)
            }
            StorageError::OutputError { message } => {
                write!(f, "Failed to write output: {}", message)
            }
        }
    }
}

impl std::error::Error for StorageError {}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_error_display() {
        let err = StorageError::BackendError {
            status: 404,
            code: "NoSuchBucket".to_string(),
            message: "The specified bucket does not exist".to_string(),
            request_id: Some("4442587FB7D0A2F9".to_string()),
        };

        assert_eq!(
            err.to_string(),
            "Storage backend error (404 NoSuchBucket): The specified bucket does not exist (request id: 4442587FB7D0A2F9)"
        );
        assert_eq!(err.backend_code(), Some("NoSuchBucket"));
    }

    #[test]
    fn test_non_backend_errors_have_no_code() {
        let err = StorageError::TransportError {
            message: "connection refused".to_string(),
        };
        assert_eq!(err.backend_code(), None);
        assert_eq!(err.to_string(), "Transport error: connection refused");
    }
}

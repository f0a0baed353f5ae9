use crate::domain::errors::StorageError;
use thiserror::Error as ThisError;

/// Infrastructure errors raised while talking to an S3-compatible endpoint
#[derive(ThisError, Debug)]
pub enum StoreError {
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),

    #[error("Missing credentials: {0}")]
    MissingCredentials(String),

    #[error("S3 error: {status} {code} - {message}")]
    Api {
        status: u16,
        code: String,
        message: String,
        request_id: Option<String>,
    },

    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),
}

/// Convert infrastructure StoreError to domain StorageError
impl From<StoreError> for StorageError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Api {
                status,
                code,
                message,
                request_id,
            } => StorageError::BackendError {
                status,
                code,
                message,
                request_id,
            },
            StoreError::Http(http_err) => {
                if http_err.is_decode() {
                    StorageError::InvalidResponse {
                        message: http_err.to_string(),
                    }
                } else {
                    StorageError::TransportError {
                        message: http_err.to_string(),
                    }
                }
            }
            StoreError::Xml(xml_err) => StorageError::InvalidResponse {
                message: format!("XML processing failed: {}", xml_err),
            },
            StoreError::UnexpectedResponse(message) => StorageError::InvalidResponse { message },
            StoreError::InvalidEndpoint(message) | StoreError::MissingCredentials(message) => {
                StorageError::ConfigurationError { message }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_keeps_backend_fields() {
        let err: StorageError = StoreError::Api {
            status: 403,
            code: "AccessDenied".to_string(),
            message: "Access Denied".to_string(),
            request_id: Some("ABC123".to_string()),
        }
        .into();

        assert_eq!(
            err,
            StorageError::BackendError {
                status: 403,
                code: "AccessDenied".to_string(),
                message: "Access Denied".to_string(),
                request_id: Some("ABC123".to_string()),
            }
        );
    }

    #[test]
    fn test_configuration_errors() {
        let err: StorageError =
            StoreError::MissingCredentials("AWS_ACCESS_KEY_ID is not set".to_string()).into();
        assert!(matches!(err, StorageError::ConfigurationError { .. }));

        let err: StorageError = StoreError::InvalidEndpoint("not a url".to_string()).into();
        assert!(matches!(err, StorageError::ConfigurationError { .. }));
    }
}

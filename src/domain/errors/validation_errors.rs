/// Validation errors for domain value objects
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    EmptyBucketName,
    EmptyObjectKey,
    EmptyVersionId,
    InvalidField {
        field: String,
        value: String,
        expected: String,
    },
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::EmptyBucketName => write!(f, "Bucket name cannot be empty"),
            ValidationError::EmptyObjectKey => write!(f, "Object key cannot be empty"),
            ValidationError::EmptyVersionId => write!(f, "Version ID cannot be empty"),
            ValidationError::InvalidField {
                field,
                value,
                expected,
            } => {
                write!(
                    f,
                    "Invalid value for field '{}': '{}' (expected: {})",
                    field, value, expected
                )
            }
        }
    }
}

impl std::error::Error for ValidationError {}

use crate::domain::errors::ValidationError;

/// Opaque identifier the backend assigns to one revision of an object
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VersionId(String);

impl VersionId {
    /// Id S3 reports for objects written while versioning was off
    pub const NULL: &'static str = "null";

    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.is_empty() {
            return Err(ValidationError::EmptyVersionId);
        }

        Ok(Self(value))
    }

    pub fn null() -> Self {
        Self(Self::NULL.to_string())
    }

    /// Get the version ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_null(&self) -> bool {
        self.0 == Self::NULL
    }
}

impl std::fmt::Display for VersionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_version_id() {
        assert!(VersionId::new("3/L4kqtJlcpXroDTDmJ+rmSpXd3dIbrHY+MTRCxf3vjVBH40Nr8X8gdRQBpUMLUo").is_ok());
        assert!(VersionId::new("v1").is_ok());
        assert!(VersionId::null().is_null());
    }

    #[test]
    fn test_invalid_version_id() {
        assert_eq!(VersionId::new(""), Err(ValidationError::EmptyVersionId));
    }
}

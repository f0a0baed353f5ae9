use chrono::{DateTime, Utc};

use crate::domain::{
    errors::ValidationError,
    value_objects::{BucketName, ObjectKey, VersionId},
};

/// Bucket-level versioning state as it appears on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersioningStatus {
    Enabled,
    Suspended,
}

impl VersioningStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VersioningStatus::Enabled => "Enabled",
            VersioningStatus::Suspended => "Suspended",
        }
    }
}

impl std::fmt::Display for VersioningStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for VersioningStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Enabled" => Ok(VersioningStatus::Enabled),
            "Suspended" => Ok(VersioningStatus::Suspended),
            other => Err(ValidationError::InvalidField {
                field: "Status".to_string(),
                value: other.to_string(),
                expected: "Enabled or Suspended".to_string(),
            }),
        }
    }
}

/// Request to change the versioning state of a bucket
#[derive(Debug, Clone, PartialEq)]
pub struct PutBucketVersioningRequest {
    pub bucket: BucketName,
    pub status: VersioningStatus,
}

impl PutBucketVersioningRequest {
    pub fn enable(bucket: BucketName) -> Self {
        Self {
            bucket,
            status: VersioningStatus::Enabled,
        }
    }
}

/// Acknowledgement returned by the backend for a configuration change.
/// Nothing in it is interpreted; it is handed back to the caller as-is.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VersioningAck {
    pub status_code: u16,
    pub request_id: Option<String>,
}

/// Request to list the versions stored under a key prefix
#[derive(Debug, Clone, PartialEq)]
pub struct ListObjectVersionsRequest {
    pub bucket: BucketName,
    pub prefix: ObjectKey,
}

impl ListObjectVersionsRequest {
    pub fn new(bucket: BucketName, prefix: ObjectKey) -> Self {
        Self { bucket, prefix }
    }
}

/// One revision of an object as reported by a listing
#[derive(Debug, Clone, PartialEq)]
pub struct VersionRecord {
    pub key: ObjectKey,
    pub version_id: VersionId,
    pub last_modified: Option<DateTime<Utc>>,
    pub is_latest: bool,
}

/// Versions returned by one listing call, in backend order.
///
/// The order is never changed locally: S3 lists keys in ascending order and,
/// within a key, the newest version first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VersionSequence {
    pub records: Vec<VersionRecord>,
    /// Set when the backend had more results than it returned in this page
    pub is_truncated: bool,
}

impl VersionSequence {
    pub fn new(records: Vec<VersionRecord>) -> Self {
        Self {
            records,
            is_truncated: false,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Keep only the records whose key is exactly `key`, preserving order
    pub fn retain_exact(mut self, key: &ObjectKey) -> Self {
        self.records.retain(|record| &record.key == key);
        self
    }

    /// The first two records, treated as latest and previous
    pub fn latest_pair(&self) -> Option<(&VersionRecord, &VersionRecord)> {
        match self.records.as_slice() {
            [latest, previous, ..] => Some((latest, previous)),
            _ => None,
        }
    }
}

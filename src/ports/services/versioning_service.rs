use crate::domain::{
    errors::StorageResult,
    models::{VersionComparison, VersioningAck},
    value_objects::{BucketName, ObjectKey},
};
use async_trait::async_trait;
use std::io::Write;

/// Service port for the two versioning operations.
///
/// Each operation issues exactly one backend call and writes its report
/// lines to `out`. Backend failures are returned untouched.
#[async_trait]
pub trait VersioningService: Send + Sync + 'static {
    /// Turn versioning on for a bucket and confirm on `out`
    async fn enable_versioning(
        &self,
        bucket: &BucketName,
        out: &mut (dyn Write + Send),
    ) -> StorageResult<VersioningAck>;

    /// Report the ids of the two most recent versions listed for `key`
    async fn compare_versions(
        &self,
        bucket: &BucketName,
        key: &ObjectKey,
        out: &mut (dyn Write + Send),
    ) -> StorageResult<VersionComparison>;
}

use crate::domain::{
    errors::StorageResult,
    models::{ListObjectVersionsRequest, PutBucketVersioningRequest, VersionSequence, VersioningAck},
};
use async_trait::async_trait;

/// Port for the storage backend's versioning API.
///
/// Implementations own credential and region resolution, so callers only
/// ever pass an already configured backend around.
#[async_trait]
pub trait VersioningBackend: Send + Sync + 'static {
    /// Change the versioning state of a bucket
    async fn put_bucket_versioning(
        &self,
        request: &PutBucketVersioningRequest,
    ) -> StorageResult<VersioningAck>;

    /// List object versions under a key prefix (first page only)
    async fn list_object_versions(
        &self,
        request: &ListObjectVersionsRequest,
    ) -> StorageResult<VersionSequence>;
}

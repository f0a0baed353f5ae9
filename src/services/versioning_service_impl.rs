use crate::{
    domain::{
        errors::{StorageError, StorageResult},
        models::{
            KeyMatch, ListObjectVersionsRequest, PutBucketVersioningRequest, VersionComparison,
            VersioningAck,
        },
        value_objects::{BucketName, ObjectKey},
    },
    ports::{services::VersioningService, storage::VersioningBackend},
};
use async_trait::async_trait;
use std::io::Write;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Implementation of versioning service
#[derive(Clone)]
pub struct VersioningServiceImpl {
    backend: Arc<dyn VersioningBackend>,
    key_match: KeyMatch,
}

impl VersioningServiceImpl {
    pub fn new(backend: Arc<dyn VersioningBackend>) -> Self {
        Self {
            backend,
            key_match: KeyMatch::default(),
        }
    }

    pub fn with_key_match(mut self, key_match: KeyMatch) -> Self {
        self.key_match = key_match;
        self
    }

    pub fn key_match(&self) -> KeyMatch {
        self.key_match
    }
}

#[async_trait]
impl VersioningService for VersioningServiceImpl {
    async fn enable_versioning(
        &self,
        bucket: &BucketName,
        out: &mut (dyn Write + Send),
    ) -> StorageResult<VersioningAck> {
        let request = PutBucketVersioningRequest::enable(bucket.clone());
        info!(bucket = %bucket, status = %request.status, "Updating bucket versioning");

        let ack = self.backend.put_bucket_versioning(&request).await?;
        debug!(status_code = ack.status_code, request_id = ?ack.request_id, "Versioning updated");

        writeln!(out, "Versioning enabled for bucket: {}", bucket).map_err(output_error)?;
        Ok(ack)
    }

    async fn compare_versions(
        &self,
        bucket: &BucketName,
        key: &ObjectKey,
        out: &mut (dyn Write + Send),
    ) -> StorageResult<VersionComparison> {
        let request = ListObjectVersionsRequest::new(bucket.clone(), key.clone());
        info!(bucket = %bucket, prefix = %key, "Listing object versions");

        let mut sequence = self.backend.list_object_versions(&request).await?;
        if sequence.is_truncated {
            warn!(
                listed = sequence.len(),
                "Version listing was truncated, only the first page is inspected"
            );
        }

        if self.key_match == KeyMatch::Exact {
            let listed = sequence.len();
            sequence = sequence.retain_exact(key);
            debug!(listed, kept = sequence.len(), "Dropped versions of other keys");
        }

        for record in &sequence.records {
            debug!(
                key = %record.key,
                version_id = %record.version_id,
                last_modified = ?record.last_modified,
                is_latest = record.is_latest,
                "Listed version"
            );
        }

        let comparison = VersionComparison::from_sequence(&sequence);
        write!(out, "{}", comparison).map_err(output_error)?;
        Ok(comparison)
    }
}

fn output_error(err: std::io::Error) -> StorageError {
    StorageError::OutputError {
        message: err.to_string(),
    }
}

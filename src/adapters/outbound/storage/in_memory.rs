use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::{
    domain::{
        errors::{StorageError, StorageResult},
        models::{
            ListObjectVersionsRequest, PutBucketVersioningRequest, VersionRecord,
            VersionSequence, VersioningAck, VersioningStatus,
        },
        value_objects::{BucketName, ObjectKey, VersionId},
    },
    ports::storage::VersioningBackend,
};

/// In-memory implementation of VersioningBackend for testing and dry runs.
///
/// Mirrors S3 semantics: writes to a bucket that never had versioning
/// enabled replace a single `null` version, and listings return keys in
/// ascending order with the newest version of each key first.
#[derive(Clone, Default)]
pub struct InMemoryVersioningBackend {
    data: Arc<RwLock<BackendData>>,
    next_version: Arc<AtomicU64>,
    create_missing: bool,
}

#[derive(Default)]
struct BackendData {
    buckets: HashMap<BucketName, StoredBucket>,
}

#[derive(Default)]
struct StoredBucket {
    versioning: Option<VersioningStatus>,
    // Versions per key, oldest first
    objects: BTreeMap<ObjectKey, Vec<StoredVersion>>,
}

#[derive(Clone)]
struct StoredVersion {
    version_id: VersionId,
    last_modified: DateTime<Utc>,
}

fn no_such_bucket(bucket: &BucketName) -> StorageError {
    StorageError::BackendError {
        status: 404,
        code: "NoSuchBucket".to_string(),
        message: format!("The specified bucket does not exist: {}", bucket),
        request_id: None,
    }
}

impl InMemoryVersioningBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend that treats every bucket as existing, for dry runs
    pub fn with_auto_create() -> Self {
        Self {
            create_missing: true,
            ..Self::default()
        }
    }

    /// Create an empty, unversioned bucket. Existing buckets are left alone.
    pub async fn create_bucket(&self, bucket: &BucketName) {
        let mut data = self.data.write().await;
        data.buckets.entry(bucket.clone()).or_default();
    }

    /// Current versioning state, `None` if versioning was never configured
    pub async fn versioning_status(
        &self,
        bucket: &BucketName,
    ) -> StorageResult<Option<VersioningStatus>> {
        let data = self.data.read().await;
        data.buckets
            .get(bucket)
            .map(|stored| stored.versioning)
            .ok_or_else(|| no_such_bucket(bucket))
    }

    /// Write a new revision of an object and return its version id
    pub async fn put_object(
        &self,
        bucket: &BucketName,
        key: &ObjectKey,
    ) -> StorageResult<VersionId> {
        let mut data = self.data.write().await;
        let stored = data
            .buckets
            .get_mut(bucket)
            .ok_or_else(|| no_such_bucket(bucket))?;

        let versioned = stored.versioning == Some(VersioningStatus::Enabled);
        let versions = stored.objects.entry(key.clone()).or_default();

        let version_id = if versioned {
            let sequence = self.next_version.fetch_add(1, Ordering::SeqCst) + 1;
            VersionId::new(format!("v{:08}", sequence))
                .map_err(|e| StorageError::InvalidResponse {
                    message: e.to_string(),
                })?
        } else {
            // Unversioned and suspended buckets overwrite the null version
            versions.retain(|v| !v.version_id.is_null());
            VersionId::null()
        };

        versions.push(StoredVersion {
            version_id: version_id.clone(),
            last_modified: Utc::now(),
        });

        Ok(version_id)
    }
}

#[async_trait]
impl VersioningBackend for InMemoryVersioningBackend {
    async fn put_bucket_versioning(
        &self,
        request: &PutBucketVersioningRequest,
    ) -> StorageResult<VersioningAck> {
        let mut data = self.data.write().await;
        let stored = if self.create_missing {
            data.buckets.entry(request.bucket.clone()).or_default()
        } else {
            data.buckets
                .get_mut(&request.bucket)
                .ok_or_else(|| no_such_bucket(&request.bucket))?
        };

        stored.versioning = Some(request.status);

        Ok(VersioningAck {
            status_code: 200,
            request_id: None,
        })
    }

    async fn list_object_versions(
        &self,
        request: &ListObjectVersionsRequest,
    ) -> StorageResult<VersionSequence> {
        let data = self.data.read().await;
        let stored = match data.buckets.get(&request.bucket) {
            Some(stored) => stored,
            None if self.create_missing => return Ok(VersionSequence::default()),
            None => return Err(no_such_bucket(&request.bucket)),
        };

        let records = stored
            .objects
            .iter()
            .filter(|(key, _)| key.has_prefix(request.prefix.as_str()))
            .flat_map(|(key, versions)| {
                versions
                    .iter()
                    .rev()
                    .enumerate()
                    .map(move |(index, version)| VersionRecord {
                        key: key.clone(),
                        version_id: version.version_id.clone(),
                        last_modified: Some(version.last_modified),
                        is_latest: index == 0,
                    })
            })
            .collect();

        Ok(VersionSequence::new(records))
    }
}

//! Object-storage provisioning for the catalog's backing bucket.
//!
//! This module guarantees two things before the catalog is ever opened:
//!
//! - The named bucket exists (created when the metadata probe reports it
//!   absent).
//! - A `data/` prefix marker object exists inside it, so the catalog's data
//!   path resolves to a visible folder.
//!
//! Both checks are idempotent: an existing bucket or marker is left alone
//! and no create call is issued for it. There is no retry policy; any
//! failure beyond a "not found" probe result is a hard error for that
//! operation.
//!
//! The backend is abstracted behind [`ObjectStorage`] so the provisioning
//! sequence can be exercised without a live service; [`S3Store`] is the
//! production implementation.

use std::{error::Error, fmt};

use async_trait::async_trait;
use aws_sdk_s3::{
    config::{BehaviorVersion, Credentials, Region},
    primitives::ByteStream,
    types::{BucketLocationConstraint, CreateBucketConfiguration},
};
use snafu::{Backtrace, prelude::*};

use crate::config::AwsCredentials;

/// General result type used by storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors produced by an object-storage backend implementation.
///
/// Backend-specific failures are wrapped here so higher layers can map them
/// into [`StorageError`] variants with operation context attached.
#[derive(Debug)]
pub enum BackendError {
    /// An S3 API call failed.
    S3(Box<dyn Error + Send + Sync>),
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendError::S3(e) => write!(f, "S3 error: {e}"),
        }
    }
}

impl Error for BackendError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            BackendError::S3(e) => Some(e.as_ref()),
        }
    }
}

/// Errors that can occur while provisioning the bucket.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum StorageError {
    /// The bucket-existence probe failed for a reason other than "not found".
    #[snafu(display("Failed to probe bucket '{bucket}': {source}"))]
    HeadBucket {
        /// The bucket that was probed.
        bucket: String,
        /// Underlying backend error that caused the failure.
        source: BackendError,
        /// The backtrace at the time the error occurred.
        backtrace: Backtrace,
    },

    /// Creating the bucket failed.
    #[snafu(display("Failed to create bucket '{bucket}': {source}"))]
    CreateBucket {
        /// The bucket that could not be created.
        bucket: String,
        /// Underlying backend error that caused the failure.
        source: BackendError,
        /// The backtrace at the time the error occurred.
        backtrace: Backtrace,
    },

    /// Listing the bucket for the prefix marker failed.
    #[snafu(display("Failed to probe prefix '{prefix}' in bucket '{bucket}': {source}"))]
    ProbeMarker {
        /// The bucket that was listed.
        bucket: String,
        /// The prefix that was probed.
        prefix: String,
        /// Underlying backend error that caused the failure.
        source: BackendError,
        /// The backtrace at the time the error occurred.
        backtrace: Backtrace,
    },

    /// Writing the prefix marker object failed.
    #[snafu(display("Failed to create prefix marker '{prefix}' in bucket '{bucket}': {source}"))]
    PutMarker {
        /// The bucket the marker was written to.
        bucket: String,
        /// The marker key that could not be written.
        prefix: String,
        /// Underlying backend error that caused the failure.
        source: BackendError,
        /// The backtrace at the time the error occurred.
        backtrace: Backtrace,
    },
}

/// Object-storage surface consumed by the provisioning sequence.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Probe bucket metadata.
    ///
    /// Returns `Ok(false)` when the backend reports the bucket absent; any
    /// other failure is surfaced as an error.
    async fn bucket_exists(&self, bucket: &str) -> Result<bool, BackendError>;

    /// Create the bucket.
    async fn create_bucket(&self, bucket: &str) -> Result<(), BackendError>;

    /// Check whether an object with exactly the marker key exists.
    async fn prefix_marker_exists(
        &self,
        bucket: &str,
        prefix: &str,
    ) -> Result<bool, BackendError>;

    /// Write an empty object at the marker key.
    async fn put_prefix_marker(&self, bucket: &str, prefix: &str) -> Result<(), BackendError>;
}

/// What a provisioning pass actually did, for status reporting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProvisionReport {
    /// The bucket was absent and has been created.
    pub bucket_created: bool,
    /// The prefix marker was absent and has been created.
    pub marker_created: bool,
}

/// Ensure `bucket` exists and contains a marker object at `prefix`.
///
/// The sequence is probe-then-create for the bucket, then probe-then-put for
/// the marker. Existing resources are never touched, so re-running against a
/// fully provisioned bucket issues no create calls.
///
/// # Errors
///
/// Returns the [`StorageError`] variant naming the operation that failed;
/// there is no retry and later steps are not attempted.
pub async fn provision(
    store: &dyn ObjectStorage,
    bucket: &str,
    prefix: &str,
) -> StorageResult<ProvisionReport> {
    let mut report = ProvisionReport::default();

    let exists = store
        .bucket_exists(bucket)
        .await
        .context(HeadBucketSnafu { bucket })?;

    if !exists {
        store
            .create_bucket(bucket)
            .await
            .context(CreateBucketSnafu { bucket })?;
        report.bucket_created = true;
    }

    let marker = store
        .prefix_marker_exists(bucket, prefix)
        .await
        .context(ProbeMarkerSnafu { bucket, prefix })?;

    if !marker {
        store
            .put_prefix_marker(bucket, prefix)
            .await
            .context(PutMarkerSnafu { bucket, prefix })?;
        report.marker_created = true;
    }

    Ok(report)
}

/// S3-backed [`ObjectStorage`] implementation with explicit credentials.
pub struct S3Store {
    client: aws_sdk_s3::Client,
    region: String,
}

impl S3Store {
    /// Build an S3 client from explicit static credentials and region.
    ///
    /// No ambient credential chain is consulted; the run either got its
    /// credentials from [`AwsCredentials::from_env`] or it never reached
    /// this point.
    pub async fn connect(credentials: &AwsCredentials) -> Self {
        let shared = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(credentials.region.clone()))
            .credentials_provider(Credentials::new(
                credentials.access_key.clone(),
                credentials.secret_key.clone(),
                None,
                None,
                "ducklake-provision",
            ))
            .load()
            .await;

        Self {
            client: aws_sdk_s3::Client::new(&shared),
            region: credentials.region.clone(),
        }
    }
}

#[async_trait]
impl ObjectStorage for S3Store {
    async fn bucket_exists(&self, bucket: &str) -> Result<bool, BackendError> {
        match self.client.head_bucket().bucket(bucket).send().await {
            Ok(_) => Ok(true),
            Err(err) => {
                let not_found = err
                    .as_service_error()
                    .map(|e| e.is_not_found())
                    .unwrap_or(false);
                if not_found {
                    Ok(false)
                } else {
                    Err(BackendError::S3(err.into()))
                }
            }
        }
    }

    async fn create_bucket(&self, bucket: &str) -> Result<(), BackendError> {
        let mut request = self.client.create_bucket().bucket(bucket);

        // us-east-1 rejects an explicit location constraint.
        if self.region != "us-east-1" {
            let constraint = BucketLocationConstraint::from(self.region.as_str());
            let bucket_config = CreateBucketConfiguration::builder()
                .location_constraint(constraint)
                .build();
            request = request.create_bucket_configuration(bucket_config);
        }

        request
            .send()
            .await
            .map(|_| ())
            .map_err(|e| BackendError::S3(e.into()))
    }

    async fn prefix_marker_exists(
        &self,
        bucket: &str,
        prefix: &str,
    ) -> Result<bool, BackendError> {
        let response = self
            .client
            .list_objects_v2()
            .bucket(bucket)
            .prefix(prefix)
            .max_keys(1)
            .send()
            .await
            .map_err(|e| BackendError::S3(e.into()))?;

        Ok(response
            .contents()
            .iter()
            .any(|object| object.key() == Some(prefix)))
    }

    async fn put_prefix_marker(&self, bucket: &str, prefix: &str) -> Result<(), BackendError> {
        self.client
            .put_object()
            .bucket(bucket)
            .key(prefix)
            .body(ByteStream::from_static(b""))
            .send()
            .await
            .map(|_| ())
            .map_err(|e| BackendError::S3(e.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MemoryStore {
        buckets: Mutex<Vec<String>>,
        markers: Mutex<Vec<(String, String)>>,
        create_bucket_calls: Mutex<usize>,
        put_marker_calls: Mutex<usize>,
        fail_create_bucket: bool,
    }

    impl MemoryStore {
        fn with_bucket(bucket: &str) -> Self {
            let store = Self::default();
            store.buckets.lock().unwrap().push(bucket.to_string());
            store
        }

        fn with_bucket_and_marker(bucket: &str, prefix: &str) -> Self {
            let store = Self::with_bucket(bucket);
            store
                .markers
                .lock()
                .unwrap()
                .push((bucket.to_string(), prefix.to_string()));
            store
        }

        fn failing_create() -> Self {
            Self {
                fail_create_bucket: true,
                ..Self::default()
            }
        }

        fn create_bucket_calls(&self) -> usize {
            *self.create_bucket_calls.lock().unwrap()
        }

        fn put_marker_calls(&self) -> usize {
            *self.put_marker_calls.lock().unwrap()
        }
    }

    #[async_trait]
    impl ObjectStorage for MemoryStore {
        async fn bucket_exists(&self, bucket: &str) -> Result<bool, BackendError> {
            Ok(self.buckets.lock().unwrap().iter().any(|b| b == bucket))
        }

        async fn create_bucket(&self, bucket: &str) -> Result<(), BackendError> {
            *self.create_bucket_calls.lock().unwrap() += 1;
            if self.fail_create_bucket {
                return Err(BackendError::S3(Box::new(std::io::Error::other(
                    "simulated create failure",
                ))));
            }
            self.buckets.lock().unwrap().push(bucket.to_string());
            Ok(())
        }

        async fn prefix_marker_exists(
            &self,
            bucket: &str,
            prefix: &str,
        ) -> Result<bool, BackendError> {
            Ok(self
                .markers
                .lock()
                .unwrap()
                .iter()
                .any(|(b, p)| b == bucket && p == prefix))
        }

        async fn put_prefix_marker(
            &self,
            bucket: &str,
            prefix: &str,
        ) -> Result<(), BackendError> {
            *self.put_marker_calls.lock().unwrap() += 1;
            self.markers
                .lock()
                .unwrap()
                .push((bucket.to_string(), prefix.to_string()));
            Ok(())
        }
    }

    #[tokio::test]
    async fn creates_missing_bucket_and_marker() {
        let store = MemoryStore::default();

        let report = provision(&store, "demo-bucket", "data/").await.unwrap();

        assert!(report.bucket_created);
        assert!(report.marker_created);
        assert_eq!(store.create_bucket_calls(), 1);
        assert_eq!(store.put_marker_calls(), 1);
    }

    #[tokio::test]
    async fn existing_bucket_is_left_alone() {
        let store = MemoryStore::with_bucket("demo-bucket");

        let report = provision(&store, "demo-bucket", "data/").await.unwrap();

        assert!(!report.bucket_created);
        assert!(report.marker_created);
        assert_eq!(store.create_bucket_calls(), 0);
        assert_eq!(store.put_marker_calls(), 1);
    }

    #[tokio::test]
    async fn existing_marker_is_left_alone() {
        let store = MemoryStore::with_bucket_and_marker("demo-bucket", "data/");

        let report = provision(&store, "demo-bucket", "data/").await.unwrap();

        assert!(!report.bucket_created);
        assert!(!report.marker_created);
        assert_eq!(store.put_marker_calls(), 0);
    }

    #[tokio::test]
    async fn rerun_after_full_provision_issues_no_create_calls() {
        let store = MemoryStore::default();

        provision(&store, "demo-bucket", "data/").await.unwrap();
        let report = provision(&store, "demo-bucket", "data/").await.unwrap();

        assert_eq!(report, ProvisionReport::default());
        assert_eq!(store.create_bucket_calls(), 1);
        assert_eq!(store.put_marker_calls(), 1);
    }

    #[tokio::test]
    async fn create_failure_is_a_hard_error() {
        let store = MemoryStore::failing_create();

        let err = provision(&store, "demo-bucket", "data/").await.unwrap_err();

        assert!(matches!(
            err,
            StorageError::CreateBucket { ref bucket, .. } if bucket == "demo-bucket"
        ));
        // The marker step is never reached.
        assert_eq!(store.put_marker_calls(), 0);
    }
}

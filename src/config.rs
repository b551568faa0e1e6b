//! Run configuration.
//!
//! The original deployment script resolved credentials ambiently at each
//! call site; here everything is read once at startup into explicit structs
//! and handed to the components that need it. Recognized keys:
//!
//! - `AWS_ACCESS_KEY` (env, required)
//! - `AWS_SECRET_KEY` (env, required)
//! - `AWS_REGION` (env, defaults to `us-east-1`)
//! - bucket name, catalog name, and catalog metadata path (CLI flags)

use std::env;

use crate::error::{MissingCredentialSnafu, SetupResult};

/// Region used when `AWS_REGION` is unset.
pub const DEFAULT_REGION: &str = "us-east-1";

/// Object key marking the bucket's logical data folder.
pub const DATA_PREFIX: &str = "data/";

/// Static object-storage credentials plus region.
#[derive(Debug, Clone)]
pub struct AwsCredentials {
    pub access_key: String,
    pub secret_key: String,
    pub region: String,
}

impl AwsCredentials {
    /// Read credentials from the process environment.
    ///
    /// Returns `SetupError::MissingCredential` naming the offending variable
    /// when the access key or secret key is unset or empty. The region falls
    /// back to [`DEFAULT_REGION`].
    pub fn from_env() -> SetupResult<Self> {
        let access_key = require_var("AWS_ACCESS_KEY")?;
        let secret_key = require_var("AWS_SECRET_KEY")?;
        let region = env::var("AWS_REGION")
            .ok()
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_REGION.to_string());

        Ok(Self {
            access_key,
            secret_key,
            region,
        })
    }
}

fn require_var(name: &str) -> SetupResult<String> {
    env::var(name)
        .ok()
        .filter(|v| !v.is_empty())
        .ok_or_else(|| MissingCredentialSnafu { variable: name }.build())
}

/// Everything a full provisioning run needs, resolved up front.
#[derive(Debug, Clone)]
pub struct SetupConfig {
    pub credentials: AwsCredentials,
    /// Bucket backing the catalog's data path.
    pub bucket: String,
    /// Name the catalog is attached under.
    pub catalog_name: String,
    /// DuckLake metadata path passed to ATTACH.
    pub metadata_path: String,
}

impl SetupConfig {
    /// The `s3://` data path the catalog is attached with: the bucket's
    /// `data` prefix, without the trailing separator.
    pub fn data_path(&self) -> String {
        format!("s3://{}/{}", self.bucket, DATA_PREFIX.trim_end_matches('/'))
    }
}

use snafu::Snafu;

use crate::{catalog::CatalogError, storage::StorageError};

/// General result type used by the provisioning run.
pub type SetupResult<T> = std::result::Result<T, SetupError>;

/// Top-level failure kinds for a provisioning run.
///
/// This is deliberately a small closed set: credentials missing, storage
/// unavailable, catalog error. Finer-grained detail lives in the wrapped
/// module errors and is carried through the `source` chain.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum SetupError {
    /// A required credential variable was absent from the environment.
    ///
    /// Raised before any storage or catalog call is attempted.
    #[snafu(display(
        "Environment variable {variable} is not set. \
         Set AWS_ACCESS_KEY and AWS_SECRET_KEY before running."
    ))]
    MissingCredential { variable: String },

    /// Bucket provisioning failed; the catalog was not touched.
    #[snafu(display("Failed to provision bucket '{bucket}': {source}"))]
    Provision {
        bucket: String,
        source: StorageError,
    },

    /// Catalog bootstrap failed after the bucket was provisioned.
    #[snafu(display("Failed to bootstrap catalog '{catalog}': {source}"))]
    Catalog {
        catalog: String,
        source: CatalogError,
    },
}

// Error types shared across the catalog core and backends

use thiserror::Error;

/// Errors produced by the catalog core and storage backends.
///
/// Every variant is fatal to the operation that produced it; nothing here is
/// retried internally. The one non-error condition in this space, a catalog
/// that does not exist yet, is normalized to empty-catalog bytes inside each
/// backend and never surfaces as an `Error`.
#[derive(Debug, Error)]
pub enum Error {
    #[error("malformed version string '{input}': {reason}")]
    MalformedVersion { input: String, reason: String },

    #[error("catalog name '{catalog}' does not match artifact name '{artifact}'")]
    NameMismatch { catalog: String, artifact: String },

    #[error("expected scheme '{expected}' but was given a URI with scheme '{actual}'")]
    SchemeMismatch { expected: String, actual: String },

    #[error("no known backend for scheme '{scheme}'")]
    UnknownBackend { scheme: String },

    #[error("could not decode catalog: {source}; offending bytes: {bytes}")]
    CatalogCorrupt {
        source: serde_json::Error,
        bytes: String,
    },

    #[error("could not encode catalog: {0}")]
    CatalogEncode(serde_json::Error),

    #[error("invalid URI '{uri}': {reason}")]
    InvalidUri { uri: String, reason: String },

    #[error("bucket '{bucket}' does not exist")]
    NoSuchBucket { bucket: String },

    #[error("invalid provider query: {0}")]
    ProviderQuery(#[from] regex::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("object storage error: {0}")]
    Storage(#[from] s3::error::S3Error),

    #[error("object storage credentials: {0}")]
    Credentials(#[from] s3::creds::error::CredentialsError),

    #[error("timed out waiting for '{uri}' to be confirmed deleted")]
    DeleteUnconfirmed { uri: String },
}

pub type Result<T> = std::result::Result<T, Error>;

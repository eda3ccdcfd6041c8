// Storage backends for catalogs and box files

use std::path::Path;

use crate::error::{Error, Result};
use crate::uri;

pub mod localfile;
pub mod s3;

pub use localfile::LocalFileBackend;
pub use s3::S3Backend;

/// The contract every storage backend satisfies.
///
/// The catalog's JSON bytes and the box file transfer are the only things a
/// backend touches; everything else (the data model, the query engine, JSON
/// encoding) lives above this trait. Adding a new storage technology means
/// implementing these five operations and nothing more, and every backend
/// must work against a dumb file/object store with no server-side logic.
#[async_trait::async_trait]
pub trait Backend: Send + Sync + std::fmt::Debug {
    /// Fetch the raw persisted catalog bytes.
    ///
    /// A catalog that does not exist yet is not an error: backends return the
    /// bytes for an empty JSON object (`{}`) so that first use creates the
    /// catalog on demand.
    async fn get_catalog_bytes(&self) -> Result<Vec<u8>>;

    /// Persist the raw catalog bytes, creating any needed parent structure.
    async fn set_catalog_bytes(&self, bytes: &[u8]) -> Result<()>;

    /// Copy a local box file to its canonical location for
    /// (name, version, provider), derived the same way as the catalog's
    /// provider URL.
    async fn copy_box_file(
        &self,
        local_path: &Path,
        name: &str,
        version: &str,
        provider: &str,
    ) -> Result<()>;

    /// Delete a single stored box file by its full URI. Fails with
    /// `SchemeMismatch` if the URI does not belong to this backend.
    async fn delete_file(&self, uri: &str) -> Result<()>;

    /// The URI scheme this backend owns, e.g. "file" or "s3".
    fn scheme(&self) -> &'static str;
}

/// Resolve a backend from a catalog URI's scheme.
pub fn backend_for_uri(catalog_uri: &str) -> Result<Box<dyn Backend>> {
    match uri::scheme_of(catalog_uri)?.as_str() {
        "file" => Ok(Box::new(LocalFileBackend::new(catalog_uri)?)),
        "s3" => Ok(Box::new(S3Backend::new(catalog_uri)?)),
        scheme => Err(Error::UnknownBackend {
            scheme: scheme.to_string(),
        }),
    }
}

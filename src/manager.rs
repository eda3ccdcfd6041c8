// BackendManager: the read-modify-write orchestration over a backend
//
// Every public operation is a sequential fetch, in-memory mutation,
// re-serialize, persist. There is no lock or conditional write guarding
// concurrent mutation of the same catalog URI; two concurrent writers race
// and the last save wins. That is an accepted consequence of keeping the
// storage targets dumb — multi-writer safety would belong in the Backend
// contract (a conditional write keyed on a version token), not here.

use std::path::Path;

use log::{debug, info};

use crate::backends::{Backend, backend_for_uri};
use crate::catalog::Catalog;
use crate::error::{Error, Result};
use crate::query::{BoxReference, CatalogQueryParams};
use crate::uri;
use crate::version::ComparableVersion;

pub struct BackendManager {
    catalog_uri: String,
    backend: Box<dyn Backend>,
}

impl BackendManager {
    pub fn new(catalog_uri: &str, backend: Box<dyn Backend>) -> Self {
        Self {
            catalog_uri: catalog_uri.to_string(),
            backend,
        }
    }

    /// Resolve the backend from the catalog URI's scheme.
    pub fn from_uri(catalog_uri: &str) -> Result<Self> {
        let backend = backend_for_uri(catalog_uri)?;
        Ok(Self::new(catalog_uri, backend))
    }

    pub async fn get_catalog(&self) -> Result<Catalog> {
        let bytes = self.backend.get_catalog_bytes().await?;
        serde_json::from_slice(&bytes).map_err(|source| Error::CatalogCorrupt {
            source,
            bytes: String::from_utf8_lossy(&bytes).into_owned(),
        })
    }

    pub async fn save_catalog(&self, catalog: &Catalog) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(catalog).map_err(Error::CatalogEncode)?;
        self.backend.set_catalog_bytes(&bytes).await
    }

    /// Record an artifact in the catalog and copy its file into place.
    ///
    /// The version string is validated before any storage is touched. The
    /// catalog is persisted before the file copy is attempted, so a failed
    /// copy leaves a catalog entry whose URL does not resolve yet; re-running
    /// the add repairs it, and with no server-side logic available there is
    /// no cheaper ordering.
    #[allow(clippy::too_many_arguments)]
    pub async fn add_box(
        &self,
        local_path: &Path,
        name: &str,
        description: &str,
        version: &str,
        provider: &str,
        checksum_type: &str,
        checksum: &str,
    ) -> Result<()> {
        ComparableVersion::parse(version)?;

        let mut catalog = self.get_catalog().await?;
        let box_uri = uri::box_uri_from_catalog_uri(&self.catalog_uri, name, version, provider)?;
        catalog.add_box(
            name,
            description,
            version,
            provider,
            checksum_type,
            checksum,
            &box_uri,
        )?;

        self.save_catalog(&catalog).await?;
        self.backend
            .copy_box_file(local_path, name, version, provider)
            .await?;

        info!("added {name} {version} ({provider}) to {}", self.catalog_uri);
        Ok(())
    }

    /// Query the catalog without mutating anything.
    pub async fn query(&self, params: &CatalogQueryParams) -> Result<Catalog> {
        self.get_catalog().await?.query(params)
    }

    /// Delete every box matching the query, returning the removed references.
    ///
    /// The pruned catalog is persisted before the files are deleted, the
    /// mirror image of the add ordering: a failure partway leaves orphaned
    /// files rather than catalog entries pointing at nothing.
    pub async fn delete_box(&self, params: &CatalogQueryParams) -> Result<Vec<BoxReference>> {
        let catalog = self.get_catalog().await?;
        let matched = catalog.query(params)?;
        let refs = matched.box_references();
        debug!("delete query matched {} box(es)", refs.len());

        let remaining = catalog.delete_references(&refs);
        self.save_catalog(&remaining).await?;

        for reference in &refs {
            self.backend.delete_file(&reference.uri).await?;
        }

        info!(
            "deleted {} box(es) from {}",
            refs.len(),
            self.catalog_uri
        );
        Ok(refs)
    }
}

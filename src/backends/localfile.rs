// Local filesystem backend: catalogs and box files under a file:// URI

use std::fs;
use std::path::{Path, PathBuf};

use log::debug;

use crate::error::{Error, Result};
use crate::uri;

/// Stores the catalog and box files on the local filesystem.
///
/// Writes go through `std::fs` with default modes, so created files and
/// directories honor the ambient umask rather than any hardcoded permission.
#[derive(Debug)]
pub struct LocalFileBackend {
    catalog_uri: String,
    catalog_path: PathBuf,
}

impl LocalFileBackend {
    pub fn new(catalog_uri: &str) -> Result<Self> {
        let catalog_path = uri::local_path_from_uri(catalog_uri)?;
        Ok(Self {
            catalog_uri: catalog_uri.to_string(),
            catalog_path,
        })
    }
}

#[async_trait::async_trait]
impl super::Backend for LocalFileBackend {
    async fn get_catalog_bytes(&self) -> Result<Vec<u8>> {
        match fs::read(&self.catalog_path) {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(
                    "no file at '{}', starting with empty catalog",
                    self.catalog_path.display()
                );
                Ok(b"{}".to_vec())
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn set_catalog_bytes(&self, bytes: &[u8]) -> Result<()> {
        if let Some(parent) = self.catalog_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.catalog_path, bytes)?;
        debug!("catalog updated at '{}'", self.catalog_path.display());
        Ok(())
    }

    async fn copy_box_file(
        &self,
        local_path: &Path,
        name: &str,
        version: &str,
        provider: &str,
    ) -> Result<()> {
        let box_uri = uri::box_uri_from_catalog_uri(&self.catalog_uri, name, version, provider)?;
        let box_path = uri::local_path_from_uri(&box_uri)?;

        if let Some(parent) = box_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let written = fs::copy(local_path, &box_path)?;
        debug!(
            "copied {written} bytes from '{}' to '{}'",
            local_path.display(),
            box_path.display()
        );
        Ok(())
    }

    async fn delete_file(&self, uri: &str) -> Result<()> {
        let scheme = uri::scheme_of(uri)?;
        if scheme != self.scheme() {
            return Err(Error::SchemeMismatch {
                expected: self.scheme().to_string(),
                actual: scheme,
            });
        }
        let path = uri::local_path_from_uri(uri)?;
        fs::remove_file(&path)?;
        debug!("deleted '{}'", path.display());
        Ok(())
    }

    fn scheme(&self) -> &'static str {
        "file"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::Backend;
    use tempfile::TempDir;

    fn backend_in(dir: &TempDir) -> LocalFileBackend {
        let uri = format!("file://{}/testbox.json", dir.path().display());
        LocalFileBackend::new(&uri).unwrap()
    }

    #[tokio::test]
    async fn test_missing_catalog_reads_as_empty_object() {
        let dir = TempDir::new().unwrap();
        let backend = backend_in(&dir);
        assert_eq!(backend.get_catalog_bytes().await.unwrap(), b"{}");
    }

    #[tokio::test]
    async fn test_catalog_bytes_round_trip() {
        let dir = TempDir::new().unwrap();
        let backend = backend_in(&dir);
        backend.set_catalog_bytes(b"{\"name\":\"testbox\"}").await.unwrap();
        assert_eq!(
            backend.get_catalog_bytes().await.unwrap(),
            b"{\"name\":\"testbox\"}"
        );
    }

    #[tokio::test]
    async fn test_set_catalog_creates_parent_dirs() {
        let dir = TempDir::new().unwrap();
        let uri = format!("file://{}/nested/deeper/testbox.json", dir.path().display());
        let backend = LocalFileBackend::new(&uri).unwrap();
        backend.set_catalog_bytes(b"{}").await.unwrap();
        assert!(dir.path().join("nested/deeper/testbox.json").exists());
    }

    #[tokio::test]
    async fn test_copy_box_file_lands_at_canonical_path() {
        let dir = TempDir::new().unwrap();
        let backend = backend_in(&dir);

        let source = dir.path().join("source.box");
        std::fs::write(&source, b"box contents").unwrap();

        backend
            .copy_box_file(&source, "testbox", "1.0.0", "virtualbox")
            .await
            .unwrap();

        let copied = dir.path().join("testbox/testbox_1.0.0_virtualbox.box");
        assert_eq!(std::fs::read(&copied).unwrap(), b"box contents");
    }

    #[tokio::test]
    async fn test_delete_file_rejects_foreign_scheme() {
        let dir = TempDir::new().unwrap();
        let backend = backend_in(&dir);
        let err = backend
            .delete_file("s3://bucket/testbox/testbox_1.0.0_virtualbox.box")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::SchemeMismatch { .. }));
    }

    #[tokio::test]
    async fn test_delete_file_removes_the_file() {
        let dir = TempDir::new().unwrap();
        let backend = backend_in(&dir);

        let target = dir.path().join("testbox_1.0.0_virtualbox.box");
        std::fs::write(&target, b"box contents").unwrap();
        let target_uri = format!("file://{}", target.display());

        backend.delete_file(&target_uri).await.unwrap();
        assert!(!target.exists());
    }
}

// URI helpers shared by the backends and the CLI

use std::path::{Path, PathBuf};

use url::Url;

use crate::error::{Error, Result};

/// Extract the scheme from a URI like `file:///path/catalog.json`.
pub fn scheme_of(uri: &str) -> Result<String> {
    let parsed = Url::parse(uri).map_err(|e| Error::InvalidUri {
        uri: uri.to_string(),
        reason: e.to_string(),
    })?;
    Ok(parsed.scheme().to_string())
}

/// Convert a `file://` URI to a local filesystem path.
///
/// On Windows a URI looks like `file:///C:/path/to/something`, and naive URI
/// parsing leaves the path as `/C:/path/to/something`; the spurious leading
/// separator in front of the drive letter is stripped.
pub fn local_path_from_uri(uri: &str) -> Result<PathBuf> {
    let parsed = Url::parse(uri).map_err(|e| Error::InvalidUri {
        uri: uri.to_string(),
        reason: e.to_string(),
    })?;

    let path = parsed.path();
    if path.is_empty() {
        return Err(Error::InvalidUri {
            uri: uri.to_string(),
            reason: "no path information".to_string(),
        });
    }

    let bytes = path.as_bytes();
    let path = if bytes.len() >= 3 && bytes[0] == b'/' && bytes[1].is_ascii_alphabetic() && bytes[2] == b':'
    {
        &path[1..]
    } else {
        path
    };

    Ok(PathBuf::from(path))
}

/// Derive the canonical artifact URI from the catalog URI.
///
/// For a catalog at `<catalogdir>/<name>.json`, the artifact for
/// (name, version, provider) lives at
/// `<catalogdir>/<name>/<name>_<version>_<provider>.box`. The provider URL
/// stored in the catalog and the location a backend copies the file to are
/// both derived through here, so they cannot drift apart.
pub fn box_uri_from_catalog_uri(
    catalog_uri: &str,
    name: &str,
    version: &str,
    provider: &str,
) -> Result<String> {
    let last_slash = catalog_uri.rfind('/').ok_or_else(|| Error::InvalidUri {
        uri: catalog_uri.to_string(),
        reason: "no path separator".to_string(),
    })?;
    Ok(format!(
        "{}/{}/{}_{}_{}.box",
        &catalog_uri[..last_slash],
        name,
        name,
        version,
        provider
    ))
}

/// Accept either a URI or a bare local path for the catalog argument,
/// coercing a bare path to an absolute `file://` URI.
pub fn coerce_to_uri(catalog: &str) -> Result<String> {
    if Url::parse(catalog).is_ok() {
        return Ok(catalog.to_string());
    }
    let absolute = std::path::absolute(Path::new(catalog))?;
    Ok(format!("file://{}", absolute.display()))
}

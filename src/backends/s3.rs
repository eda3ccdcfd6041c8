// S3 backend: catalogs and box files in an object-store bucket
//
// Works against any S3-compatible store reachable through the default
// credential chain; region comes from the environment. The store stays dumb:
// only get/put/head/delete object calls, no server-side logic.

use std::path::Path;
use std::time::Duration;

use log::debug;
use s3::bucket::Bucket;
use s3::creds::Credentials;
use s3::error::S3Error;
use s3::region::Region;

use crate::error::{Error, Result};
use crate::uri;

const DELETE_POLL_ATTEMPTS: u32 = 20;
const DELETE_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// An `s3://bucket/key...` URI split into its bucket and key.
#[derive(Debug, Clone, PartialEq, Eq)]
struct S3Location {
    bucket: String,
    resource: String,
}

fn parse_location(uri: &str) -> Result<S3Location> {
    let invalid = |reason: &str| Error::InvalidUri {
        uri: uri.to_string(),
        reason: reason.to_string(),
    };

    let rest = uri
        .strip_prefix("s3://")
        .ok_or_else(|| invalid("not an s3:// URI"))?;
    let (bucket, resource) = rest
        .split_once('/')
        .ok_or_else(|| invalid("no key after bucket"))?;
    if bucket.is_empty() || resource.is_empty() {
        return Err(invalid("empty bucket or key"));
    }

    Ok(S3Location {
        bucket: bucket.to_string(),
        resource: resource.to_string(),
    })
}

#[derive(Debug)]
pub struct S3Backend {
    catalog_uri: String,
    location: S3Location,
    region: Region,
    credentials: Credentials,
}

impl S3Backend {
    pub fn new(catalog_uri: &str) -> Result<Self> {
        let location = parse_location(catalog_uri)?;
        let region = std::env::var("AWS_REGION")
            .or_else(|_| std::env::var("AWS_DEFAULT_REGION"))
            .ok()
            .and_then(|r| r.parse::<Region>().ok())
            .unwrap_or(Region::UsEast1);
        let credentials = Credentials::default()?;

        Ok(Self {
            catalog_uri: catalog_uri.to_string(),
            location,
            region,
            credentials,
        })
    }

    fn bucket_for(&self, bucket: &str) -> Result<Box<Bucket>> {
        Ok(Bucket::new(
            bucket,
            self.region.clone(),
            self.credentials.clone(),
        )?)
    }
}

#[async_trait::async_trait]
impl super::Backend for S3Backend {
    /// A missing key is the expected steady state before first use and reads
    /// as an empty catalog; a missing bucket is a misconfiguration and must
    /// not be silently swallowed.
    async fn get_catalog_bytes(&self) -> Result<Vec<u8>> {
        let bucket = self.bucket_for(&self.location.bucket)?;
        match bucket.get_object(&self.location.resource).await {
            Ok(response) => Ok(response.bytes().to_vec()),
            Err(S3Error::HttpFailWithBody(404, body)) => {
                if body.contains("NoSuchBucket") {
                    Err(Error::NoSuchBucket {
                        bucket: self.location.bucket.clone(),
                    })
                } else {
                    debug!(
                        "no object at '{}', starting with empty catalog",
                        self.catalog_uri
                    );
                    Ok(b"{}".to_vec())
                }
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn set_catalog_bytes(&self, bytes: &[u8]) -> Result<()> {
        let bucket = self.bucket_for(&self.location.bucket)?;
        bucket.put_object(&self.location.resource, bytes).await?;
        debug!("catalog updated at '{}'", self.catalog_uri);
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
        let location = parse_location(&box_uri)?;

        let mut file = tokio::fs::File::open(local_path).await?;
        let bucket = self.bucket_for(&location.bucket)?;
        bucket
            .put_object_stream(&mut file, &location.resource)
            .await?;
        debug!(
            "uploaded '{}' to '{}'",
            local_path.display(),
            box_uri
        );
        Ok(())
    }

    /// Issues the delete and then polls until the object is confirmed absent,
    /// since object stores may acknowledge a delete before it is visible.
    async fn delete_file(&self, file_uri: &str) -> Result<()> {
        let scheme = uri::scheme_of(file_uri)?;
        if scheme != self.scheme() {
            return Err(Error::SchemeMismatch {
                expected: self.scheme().to_string(),
                actual: scheme,
            });
        }

        let location = parse_location(file_uri)?;
        let bucket = self.bucket_for(&location.bucket)?;
        bucket.delete_object(&location.resource).await?;

        for _ in 0..DELETE_POLL_ATTEMPTS {
            match bucket.head_object(&location.resource).await {
                Ok((_, 404)) | Err(S3Error::HttpFailWithBody(404, _)) => {
                    debug!("deleted '{file_uri}'");
                    return Ok(());
                }
                Ok(_) => {}
                Err(e) => return Err(e.into()),
            }
            tokio::time::sleep(DELETE_POLL_INTERVAL).await;
        }

        Err(Error::DeleteUnconfirmed {
            uri: file_uri.to_string(),
        })
    }

    fn scheme(&self) -> &'static str {
        "s3"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_location() {
        let location = parse_location("s3://mybucket/boxes/testbox.json").unwrap();
        assert_eq!(location.bucket, "mybucket");
        assert_eq!(location.resource, "boxes/testbox.json");
    }

    #[test]
    fn test_parse_location_rejects_bad_uris() {
        for bad in [
            "file:///tmp/testbox.json",
            "s3://bucket-only",
            "s3:///no-bucket",
            "s3://bucket/",
        ] {
            assert!(parse_location(bad).is_err(), "expected '{bad}' to fail");
        }
    }

    #[test]
    fn test_box_key_derivation_matches_catalog_url() {
        // The object key must come out of the same derivation as the
        // provider URL written into the catalog.
        let box_uri = uri::box_uri_from_catalog_uri(
            "s3://mybucket/boxes/testbox.json",
            "testbox",
            "1.0.0",
            "virtualbox",
        )
        .unwrap();
        let location = parse_location(&box_uri).unwrap();
        assert_eq!(location.bucket, "mybucket");
        assert_eq!(
            location.resource,
            "boxes/testbox/testbox_1.0.0_virtualbox.box"
        );
    }

    #[test]
    fn test_box_key_derivation_at_bucket_root() {
        let box_uri = uri::box_uri_from_catalog_uri(
            "s3://mybucket/testbox.json",
            "testbox",
            "1.0.0",
            "virtualbox",
        )
        .unwrap();
        let location = parse_location(&box_uri).unwrap();
        assert_eq!(
            location.resource,
            "testbox/testbox_1.0.0_virtualbox.box"
        );
    }
}

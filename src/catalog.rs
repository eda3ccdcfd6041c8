// Catalog data model: the JSON record of every known version and provider of a box
//
// A catalog is the single source of truth for one box family. It is decoded
// from persisted bytes on every read, mutated in memory, and rewritten whole;
// an empty or not-yet-existing catalog is the literal bytes `{}`.
//
// Example catalog JSON:
//
//   {
//     "name": "testbox",
//     "description": "a box for testing",
//     "versions": [
//       {
//         "version": "1.0.0",
//         "providers": [
//           {
//             "name": "virtualbox",
//             "url": "file:///srv/vagrant/testbox/testbox_1.0.0_virtualbox.box",
//             "checksum_type": "sha1",
//             "checksum": "d3597dccfdc6953d0a6eff4a9e1903f44f72ab94"
//           }
//         ]
//       }
//     ]
//   }

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// One build of a box for one platform/hypervisor.
///
/// Replaced wholesale on update; fields are never mutated individually
/// outside of `Catalog::add_box`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provider {
    pub name: String,
    pub url: String,
    pub checksum_type: String,
    pub checksum: String,
}

/// One version of a box, holding the literal version string and its providers.
///
/// The version is kept textual; parsing into a `ComparableVersion` happens on
/// demand at query time. Provider names are unique within a version, enforced
/// by `Catalog::add_box`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Version {
    pub version: String,
    pub providers: Vec<Provider>,
}

/// The full catalog for one box family.
///
/// Version strings are unique within a catalog. `name` is authoritative: once
/// non-empty, every artifact added must carry the same name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Catalog {
    pub name: String,
    pub description: String,
    pub versions: Vec<Version>,
}

impl Catalog {
    /// Record an artifact in the catalog.
    ///
    /// Fails with `NameMismatch` if the catalog already has a different
    /// non-empty name. The description always takes the newest value, even
    /// when it differs from what is stored; failing an entire build over
    /// stale wording is worse than letting the user reword it.
    ///
    /// The version is matched by exact string, the provider by exact name.
    /// An existing provider has its url/checksum fields overwritten in
    /// place, which makes the whole operation idempotent: re-adding the same
    /// artifact changes nothing, re-adding with new data updates rather than
    /// duplicates.
    #[allow(clippy::too_many_arguments)]
    pub fn add_box(
        &mut self,
        name: &str,
        description: &str,
        version: &str,
        provider: &str,
        checksum_type: &str,
        checksum: &str,
        artifact_uri: &str,
    ) -> Result<()> {
        if self.name.is_empty() {
            self.name = name.to_string();
        } else if self.name != name {
            return Err(Error::NameMismatch {
                catalog: self.name.clone(),
                artifact: name.to_string(),
            });
        }

        self.description = description.to_string();

        let new_provider = Provider {
            name: provider.to_string(),
            url: artifact_uri.to_string(),
            checksum_type: checksum_type.to_string(),
            checksum: checksum.to_string(),
        };

        if let Some(existing_version) = self.versions.iter_mut().find(|v| v.version == version) {
            if let Some(existing_provider) = existing_version
                .providers
                .iter_mut()
                .find(|p| p.name == provider)
            {
                existing_provider.url = new_provider.url;
                existing_provider.checksum_type = new_provider.checksum_type;
                existing_provider.checksum = new_provider.checksum;
            } else {
                existing_version.providers.push(new_provider);
            }
        } else {
            self.versions.push(Version {
                version: version.to_string(),
                providers: vec![new_provider],
            });
        }

        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }
}

impl fmt::Display for Catalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.name.is_empty() && self.versions.is_empty() {
            return write!(f, "(empty catalog)");
        }
        writeln!(f, "{} \"{}\"", self.name, self.description)?;
        for version in &self.versions {
            writeln!(f, "  {}", version.version)?;
            for provider in &version.providers {
                writeln!(
                    f,
                    "    {} {}:{} {}",
                    provider.name, provider.checksum_type, provider.checksum, provider.url
                )?;
            }
        }
        Ok(())
    }
}

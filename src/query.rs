// Query and delete engine: pure filtering over a Catalog
//
// Deletion is computed as query-then-subtract so that delete-by-query and
// query can never disagree about what matches.

use regex::Regex;

use crate::catalog::{Catalog, Version};
use crate::error::Result;
use crate::version::{ComparableVersion, parse_query_qualifier};

/// The user-facing filter pair: a version range expression and a provider
/// name regex. Empty strings match everything.
#[derive(Debug, Clone, Default)]
pub struct CatalogQueryParams {
    pub version: String,
    pub provider: String,
}

/// A minimal key identifying one provider-within-version, used to compute
/// delete sets without carrying full provider data.
#[derive(Debug, Clone, Eq)]
pub struct BoxReference {
    pub version: String,
    pub provider: String,
    pub uri: String,
}

/// Two references point at the same box iff version and provider name match;
/// the uri is carried along for file deletion but takes no part in identity.
impl PartialEq for BoxReference {
    fn eq(&self, other: &Self) -> bool {
        self.version == other.version && self.provider == other.provider
    }
}

impl Catalog {
    /// Retain versions matching a version query expression like `>=1.2.5`.
    ///
    /// An empty query returns the catalog unchanged. Retained versions keep
    /// their insertion order.
    pub fn query_versions(&self, version_query: &str) -> Result<Catalog> {
        if version_query.is_empty() {
            return Ok(self.clone());
        }

        let (query_version, accepted) = parse_query_qualifier(version_query)?;
        let mut versions = Vec::new();
        for version in &self.versions {
            let candidate = ComparableVersion::parse(&version.version)?;
            if accepted.contains(&candidate.compare(&query_version)) {
                versions.push(version.clone());
            }
        }

        Ok(Catalog {
            name: self.name.clone(),
            description: self.description.clone(),
            versions,
        })
    }

    /// Retain providers whose name matches a regex, dropping any version left
    /// with no providers.
    ///
    /// An empty pattern is an explicit match-all, not an empty-string anchor.
    /// Matching is unanchored substring matching, per the regex engine.
    pub fn query_providers(&self, provider_query: &str) -> Result<Catalog> {
        if provider_query.is_empty() {
            return Ok(self.clone());
        }

        let pattern = Regex::new(provider_query)?;
        let mut versions = Vec::new();
        for version in &self.versions {
            let providers: Vec<_> = version
                .providers
                .iter()
                .filter(|p| pattern.is_match(&p.name))
                .cloned()
                .collect();
            if !providers.is_empty() {
                versions.push(Version {
                    version: version.version.clone(),
                    providers,
                });
            }
        }

        Ok(Catalog {
            name: self.name.clone(),
            description: self.description.clone(),
            versions,
        })
    }

    /// Apply both filters: versions first, then providers over the result.
    /// Provider filtering never reintroduces a version the version filter
    /// removed.
    pub fn query(&self, params: &CatalogQueryParams) -> Result<Catalog> {
        self.query_versions(&params.version)?
            .query_providers(&params.provider)
    }

    /// Flatten the catalog into (version, provider, uri) references.
    pub fn box_references(&self) -> Vec<BoxReference> {
        let mut refs = Vec::new();
        for version in &self.versions {
            for provider in &version.providers {
                refs.push(BoxReference {
                    version: version.version.clone(),
                    provider: provider.name.clone(),
                    uri: provider.url.clone(),
                });
            }
        }
        refs
    }

    /// Return a catalog containing every provider not named by `refs`,
    /// dropping any version left with no providers.
    pub fn delete_references(&self, refs: &[BoxReference]) -> Catalog {
        let mut versions = Vec::new();
        for version in &self.versions {
            let providers: Vec<_> = version
                .providers
                .iter()
                .filter(|p| {
                    let candidate = BoxReference {
                        version: version.version.clone(),
                        provider: p.name.clone(),
                        uri: String::new(),
                    };
                    !refs.contains(&candidate)
                })
                .cloned()
                .collect();
            if !providers.is_empty() {
                versions.push(Version {
                    version: version.version.clone(),
                    providers,
                });
            }
        }

        Catalog {
            name: self.name.clone(),
            description: self.description.clone(),
            versions,
        }
    }
}

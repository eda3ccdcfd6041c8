// Version parsing and comparison for catalog queries

use std::fmt;

use crate::error::{Error, Result};

/// The relationship between two `ComparableVersion`s.
///
/// `EqualsPrereleaseMismatch` means the numeric components are equal but the
/// prerelease tags differ, e.g. `1.0.0` vs `1.0.0-BETA`. Query qualifiers
/// decide whether that counts as a match (see `parse_query_qualifier`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionComparator {
    Equals,
    EqualsPrereleaseMismatch,
    LessThan,
    GreaterThan,
}

/// A version string parsed for comparison, never persisted.
///
/// `1.5.3-BETA` parses to `ComparableVersion { version: [1, 5, 3], prerelease: "BETA" }`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ComparableVersion {
    pub version: Vec<u64>,
    pub prerelease: String,
}

impl ComparableVersion {
    /// Parse a dotted numeric version with an optional trailing prerelease tag.
    ///
    /// At most one `-` is permitted, and only in the final dot-separated
    /// component, after its numeric part: `1.0.0-BETA` is valid, `1.0-BETA.0`
    /// and `-BETA` are not.
    pub fn parse(text: &str) -> Result<Self> {
        let malformed = |reason: &str| Error::MalformedVersion {
            input: text.to_string(),
            reason: reason.to_string(),
        };

        if text.matches('-').count() > 1 {
            return Err(malformed("more than one dash"));
        }

        let components: Vec<&str> = text.split('.').collect();
        let last = components.len() - 1;
        let mut version = Vec::with_capacity(components.len());
        let mut prerelease = String::new();

        for (idx, component) in components.iter().enumerate() {
            match component.parse::<u64>() {
                Ok(n) => version.push(n),
                Err(_) => {
                    if idx != last {
                        return Err(malformed(&format!(
                            "component '{component}' is not a non-negative integer"
                        )));
                    }
                    let Some((numeric, tag)) = component.split_once('-') else {
                        return Err(malformed(&format!(
                            "final component '{component}' is not a non-negative integer"
                        )));
                    };
                    let n = numeric.parse::<u64>().map_err(|_| {
                        malformed(&format!(
                            "no numeric part before prerelease tag in '{component}'"
                        ))
                    })?;
                    version.push(n);
                    prerelease = tag.to_string();
                }
            }
        }

        Ok(Self {
            version,
            prerelease,
        })
    }

    /// Compare against `other`, component by component.
    ///
    /// A shorter numeric vector is padded with zeroes, so `1.0` and `1.0.0`
    /// are numerically equal. Prerelease tags are compared exactly and
    /// case-sensitively, and only break a numeric tie.
    pub fn compare(&self, other: &ComparableVersion) -> VersionComparator {
        let len = self.version.len().max(other.version.len());
        for idx in 0..len {
            let a = self.version.get(idx).copied().unwrap_or(0);
            let b = other.version.get(idx).copied().unwrap_or(0);
            if a < b {
                return VersionComparator::LessThan;
            }
            if a > b {
                return VersionComparator::GreaterThan;
            }
        }
        if self.prerelease != other.prerelease {
            VersionComparator::EqualsPrereleaseMismatch
        } else {
            VersionComparator::Equals
        }
    }
}

impl fmt::Display for ComparableVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dotted = self
            .version
            .iter()
            .map(|n| n.to_string())
            .collect::<Vec<_>>()
            .join(".");
        if self.prerelease.is_empty() {
            write!(f, "{dotted}")
        } else {
            write!(f, "{}-{}", dotted, self.prerelease)
        }
    }
}

const EQUALS_ONLY: &[VersionComparator] = &[VersionComparator::Equals];
const EQUALS_ANY: &[VersionComparator] = &[
    VersionComparator::Equals,
    VersionComparator::EqualsPrereleaseMismatch,
];
const LESS_THAN: &[VersionComparator] = &[VersionComparator::LessThan];
const GREATER_THAN: &[VersionComparator] = &[VersionComparator::GreaterThan];
const LESS_EQUAL: &[VersionComparator] = &[
    VersionComparator::LessThan,
    VersionComparator::Equals,
    VersionComparator::EqualsPrereleaseMismatch,
];
const GREATER_EQUAL: &[VersionComparator] = &[
    VersionComparator::GreaterThan,
    VersionComparator::Equals,
    VersionComparator::EqualsPrereleaseMismatch,
];

/// Parse a version query like `>=1.2.5` into the version to compare against
/// and the set of comparator outcomes that count as a match.
///
/// Recognized prefixes, longest first: `>=`, `<=`, `>`, `<`, `=`. With no
/// prefix the whole text is parsed as a plain version.
///
/// Prerelease handling is deliberately asymmetric: an exact `=` query never
/// matches a differently-tagged prerelease build, but range queries (`<`
/// excluded, `<=`, `>=`, and the bare form) do accept a prerelease of the
/// same numeric version. A user asking for everything at or below `1.0.0`
/// expects `1.0.0-BETA` in the result; a user asking for exactly `1.0.0`
/// does not.
pub fn parse_query_qualifier(
    text: &str,
) -> Result<(ComparableVersion, &'static [VersionComparator])> {
    for (prefix, accepted) in [
        (">=", GREATER_EQUAL),
        ("<=", LESS_EQUAL),
        (">", GREATER_THAN),
        ("<", LESS_THAN),
        ("=", EQUALS_ONLY),
    ] {
        if let Some(rest) = text.strip_prefix(prefix) {
            return Ok((ComparableVersion::parse(rest)?, accepted));
        }
    }
    Ok((ComparableVersion::parse(text)?, EQUALS_ANY))
}

//! Common types shared across the lookup layers

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::LookupError;

/// Type of package registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegistryType {
    /// npm registry (registry.npmjs.org)
    Npm,
    /// PyPI (pypi.org)
    Pypi,
    /// Maven Central via the search.maven.org Solr API
    Maven,
    /// NuGet flat-container API (api.nuget.org)
    Nuget,
    /// RubyGems (rubygems.org)
    Rubygems,
    /// crates.io
    CratesIo,
    /// Go module proxy (proxy.golang.org)
    Go,
}

impl RegistryType {
    /// Returns the wire tag for the registry type
    pub fn as_str(&self) -> &'static str {
        match self {
            RegistryType::Npm => "npm",
            RegistryType::Pypi => "pypi",
            RegistryType::Maven => "maven",
            RegistryType::Nuget => "nuget",
            RegistryType::Rubygems => "rubygems",
            RegistryType::CratesIo => "crates",
            RegistryType::Go => "go",
        }
    }
}

impl std::fmt::Display for RegistryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RegistryType {
    type Err = LookupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "npm" => Ok(RegistryType::Npm),
            "pypi" => Ok(RegistryType::Pypi),
            "maven" => Ok(RegistryType::Maven),
            "nuget" => Ok(RegistryType::Nuget),
            "rubygems" => Ok(RegistryType::Rubygems),
            "crates" => Ok(RegistryType::CratesIo),
            "go" => Ok(RegistryType::Go),
            _ => Err(LookupError::UnsupportedRegistry(s.to_string())),
        }
    }
}

/// One item of a version-check batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionQuery {
    pub package_name: String,
    pub version: String,
}

/// Normalized lookup result shared by all registries.
///
/// Every result carries `package`, `registry` and `timestamp` regardless of
/// outcome. A set `error` implies `found: false`; `exists` is only populated
/// by the version-check operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageResult {
    pub package: String,
    pub registry: String,
    pub found: bool,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exists: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub versions: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub homepage: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repository: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PackageResult {
    /// Builds a successful result; extras are merged in via struct update syntax
    pub fn success(package: &str, registry: RegistryType) -> Self {
        Self {
            package: package.to_string(),
            registry: registry.as_str().to_string(),
            found: true,
            timestamp: Utc::now(),
            latest_version: None,
            description: None,
            version: None,
            exists: None,
            versions: None,
            homepage: None,
            repository: None,
            author: None,
            error: None,
        }
    }

    /// Builds a failed result carrying an error message
    pub fn failure(package: &str, registry: RegistryType, message: impl Into<String>) -> Self {
        Self {
            found: false,
            error: Some(message.into()),
            ..Self::success(package, registry)
        }
    }

    /// Builds the canonical not-found result
    pub fn not_found(package: &str, registry: RegistryType) -> Self {
        Self::failure(package, registry, "Package not found")
    }
}

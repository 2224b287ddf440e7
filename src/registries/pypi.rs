//! PyPI registry client for fetching Python package versions

use indexmap::IndexMap;
use serde::Deserialize;
use tracing::debug;

use crate::error::LookupError;
use crate::registry::Registry;
use crate::request::RequestPolicy;
use crate::types::{PackageResult, RegistryType};

const DEFAULT_BASE_URL: &str = "https://pypi.org";

/// PyPI JSON API response structure
#[derive(Debug, Deserialize)]
struct PypiResponse {
    info: PypiInfo,
    // Release keys are kept in document order; PyPI version strings are
    // PEP 440, not semver, so no reordering is attempted.
    #[serde(default)]
    releases: IndexMap<String, serde_json::Value>,
}

/// Package information from PyPI
#[derive(Debug, Deserialize)]
struct PypiInfo {
    /// Latest version (according to PyPI)
    version: String,
    summary: Option<String>,
    home_page: Option<String>,
    author: Option<String>,
}

/// PyPI registry client
pub struct PypiRegistry {
    policy: RequestPolicy,
    base_url: String,
}

impl Default for PypiRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl PypiRegistry {
    pub fn new(base_url: &str) -> Self {
        Self {
            policy: RequestPolicy::default(),
            base_url: base_url.to_string(),
        }
    }

    async fn fetch_document(
        &self,
        package_name: &str,
    ) -> Result<Option<PypiResponse>, LookupError> {
        let url = format!("{}/pypi/{}/json", self.base_url, package_name);
        debug!("Fetching PyPI package: {}", url);
        Ok(self.policy.get_json(&url).await?)
    }
}

#[async_trait::async_trait]
impl Registry for PypiRegistry {
    fn registry_type(&self) -> RegistryType {
        RegistryType::Pypi
    }

    async fn get_latest_version(&self, package_name: &str) -> Result<PackageResult, LookupError> {
        let Some(doc) = self.fetch_document(package_name).await? else {
            return Ok(PackageResult::not_found(package_name, RegistryType::Pypi));
        };

        Ok(PackageResult {
            latest_version: Some(doc.info.version),
            description: doc.info.summary,
            ..PackageResult::success(package_name, RegistryType::Pypi)
        })
    }

    async fn check_version_exists(
        &self,
        package_name: &str,
        version: &str,
    ) -> Result<PackageResult, LookupError> {
        let Some(doc) = self.fetch_document(package_name).await? else {
            return Ok(PackageResult {
                version: Some(version.to_string()),
                ..PackageResult::not_found(package_name, RegistryType::Pypi)
            });
        };

        Ok(PackageResult {
            version: Some(version.to_string()),
            exists: Some(doc.releases.contains_key(version)),
            ..PackageResult::success(package_name, RegistryType::Pypi)
        })
    }

    async fn get_package_info(&self, package_name: &str) -> Result<PackageResult, LookupError> {
        let Some(doc) = self.fetch_document(package_name).await? else {
            return Ok(PackageResult::not_found(package_name, RegistryType::Pypi));
        };

        let versions: Vec<String> = doc.releases.into_keys().collect();
        debug!(
            "Found {} versions for package {}",
            versions.len(),
            package_name
        );

        Ok(PackageResult {
            latest_version: Some(doc.info.version),
            description: doc.info.summary,
            versions: Some(versions),
            homepage: doc.info.home_page,
            author: doc.info.author,
            ..PackageResult::success(package_name, RegistryType::Pypi)
        })
    }
}

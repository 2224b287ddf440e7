//! NuGet flat-container API implementation

use serde::Deserialize;

use crate::error::LookupError;
use crate::registry::Registry;
use crate::request::RequestPolicy;
use crate::types::{PackageResult, RegistryType};

/// Default base URL for the NuGet v3 API
const DEFAULT_BASE_URL: &str = "https://api.nuget.org";

/// Response from the flat-container version index.
/// The array is registry-ordered ascending, so the last entry is the latest.
#[derive(Debug, Deserialize)]
struct NugetIndexResponse {
    #[serde(default)]
    versions: Vec<String>,
}

/// Registry implementation for NuGet
pub struct NugetRegistry {
    policy: RequestPolicy,
    base_url: String,
}

impl NugetRegistry {
    /// Creates a new NugetRegistry with a custom base URL
    pub fn new(base_url: &str) -> Self {
        Self {
            policy: RequestPolicy::default(),
            base_url: base_url.to_string(),
        }
    }

    async fn fetch_index(
        &self,
        package_name: &str,
    ) -> Result<Option<NugetIndexResponse>, LookupError> {
        // The flat-container is only addressable by lowercase package id
        let url = format!(
            "{}/v3-flatcontainer/{}/index.json",
            self.base_url,
            package_name.to_lowercase()
        );
        Ok(self.policy.get_json(&url).await?)
    }
}

impl Default for NugetRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

#[async_trait::async_trait]
impl Registry for NugetRegistry {
    fn registry_type(&self) -> RegistryType {
        RegistryType::Nuget
    }

    async fn get_latest_version(&self, package_name: &str) -> Result<PackageResult, LookupError> {
        let Some(index) = self.fetch_index(package_name).await? else {
            return Ok(PackageResult::not_found(package_name, RegistryType::Nuget));
        };

        Ok(PackageResult {
            latest_version: index.versions.last().cloned(),
            ..PackageResult::success(package_name, RegistryType::Nuget)
        })
    }

    async fn check_version_exists(
        &self,
        package_name: &str,
        version: &str,
    ) -> Result<PackageResult, LookupError> {
        let Some(index) = self.fetch_index(package_name).await? else {
            return Ok(PackageResult {
                version: Some(version.to_string()),
                ..PackageResult::not_found(package_name, RegistryType::Nuget)
            });
        };

        Ok(PackageResult {
            version: Some(version.to_string()),
            exists: Some(index.versions.iter().any(|v| v == version)),
            ..PackageResult::success(package_name, RegistryType::Nuget)
        })
    }

    async fn get_package_info(&self, package_name: &str) -> Result<PackageResult, LookupError> {
        let Some(index) = self.fetch_index(package_name).await? else {
            return Ok(PackageResult::not_found(package_name, RegistryType::Nuget));
        };

        Ok(PackageResult {
            latest_version: index.versions.last().cloned(),
            versions: Some(index.versions),
            ..PackageResult::success(package_name, RegistryType::Nuget)
        })
    }
}

//! RubyGems API implementation

use serde::Deserialize;

use crate::error::LookupError;
use crate::registry::Registry;
use crate::request::RequestPolicy;
use crate::types::{PackageResult, RegistryType};

/// Default base URL for RubyGems
const DEFAULT_BASE_URL: &str = "https://rubygems.org";

/// Response from the gem document endpoint
#[derive(Debug, Deserialize)]
struct GemResponse {
    version: String,
    info: Option<String>,
    homepage_uri: Option<String>,
    authors: Option<String>,
}

/// One entry of the gem versions listing
#[derive(Debug, Deserialize)]
struct GemVersion {
    number: String,
}

/// Registry implementation for RubyGems
pub struct RubygemsRegistry {
    policy: RequestPolicy,
    base_url: String,
}

impl RubygemsRegistry {
    /// Creates a new RubygemsRegistry with a custom base URL
    pub fn new(base_url: &str) -> Self {
        Self {
            policy: RequestPolicy::default(),
            base_url: base_url.to_string(),
        }
    }

    async fn fetch_gem(&self, package_name: &str) -> Result<Option<GemResponse>, LookupError> {
        let url = format!("{}/api/v1/gems/{}.json", self.base_url, package_name);
        Ok(self.policy.get_json(&url).await?)
    }

    async fn fetch_versions(
        &self,
        package_name: &str,
    ) -> Result<Option<Vec<GemVersion>>, LookupError> {
        let url = format!("{}/api/v1/versions/{}.json", self.base_url, package_name);
        Ok(self.policy.get_json(&url).await?)
    }
}

impl Default for RubygemsRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

#[async_trait::async_trait]
impl Registry for RubygemsRegistry {
    fn registry_type(&self) -> RegistryType {
        RegistryType::Rubygems
    }

    async fn get_latest_version(&self, package_name: &str) -> Result<PackageResult, LookupError> {
        let Some(gem) = self.fetch_gem(package_name).await? else {
            return Ok(PackageResult::not_found(
                package_name,
                RegistryType::Rubygems,
            ));
        };

        Ok(PackageResult {
            latest_version: Some(gem.version),
            description: gem.info,
            ..PackageResult::success(package_name, RegistryType::Rubygems)
        })
    }

    async fn check_version_exists(
        &self,
        package_name: &str,
        version: &str,
    ) -> Result<PackageResult, LookupError> {
        let Some(versions) = self.fetch_versions(package_name).await? else {
            return Ok(PackageResult {
                version: Some(version.to_string()),
                ..PackageResult::not_found(package_name, RegistryType::Rubygems)
            });
        };

        Ok(PackageResult {
            version: Some(version.to_string()),
            exists: Some(versions.iter().any(|v| v.number == version)),
            ..PackageResult::success(package_name, RegistryType::Rubygems)
        })
    }

    async fn get_package_info(&self, package_name: &str) -> Result<PackageResult, LookupError> {
        let Some(gem) = self.fetch_gem(package_name).await? else {
            return Ok(PackageResult::not_found(
                package_name,
                RegistryType::Rubygems,
            ));
        };

        // Version listing kept in registry order (newest first)
        let versions = self
            .fetch_versions(package_name)
            .await?
            .unwrap_or_default()
            .into_iter()
            .map(|v| v.number)
            .collect();

        Ok(PackageResult {
            latest_version: Some(gem.version),
            description: gem.info,
            versions: Some(versions),
            homepage: gem.homepage_uri,
            author: gem.authors,
            ..PackageResult::success(package_name, RegistryType::Rubygems)
        })
    }
}

//! Go module proxy API implementation

use serde::Deserialize;
use tracing::warn;

use crate::error::LookupError;
use crate::registry::Registry;
use crate::request::RequestPolicy;
use crate::types::{PackageResult, RegistryType};

/// Default base URL for the Go module proxy
const DEFAULT_BASE_URL: &str = "https://proxy.golang.org";

/// Response from the `@latest` and `@v/{version}.info` endpoints
#[derive(Debug, Deserialize)]
struct GoVersionInfo {
    #[serde(rename = "Version")]
    version: String,
}

/// Registry implementation for the Go module proxy
pub struct GoProxyRegistry {
    policy: RequestPolicy,
    base_url: String,
}

impl GoProxyRegistry {
    /// Creates a new GoProxyRegistry with a custom base URL
    pub fn new(base_url: &str) -> Self {
        Self {
            policy: RequestPolicy::default(),
            base_url: base_url.to_string(),
        }
    }

    async fn fetch_latest(&self, module: &str) -> Result<Option<GoVersionInfo>, LookupError> {
        let url = format!("{}/{}/@latest", self.base_url, encode_module_path(module));
        Ok(self.policy.get_json(&url).await?)
    }

    /// Fetches the version list, swallowing failures: an unreachable list
    /// endpoint degrades to an empty list rather than failing the lookup.
    async fn fetch_version_list(&self, module: &str) -> Vec<String> {
        let url = format!("{}/{}/@v/list", self.base_url, encode_module_path(module));
        match self.policy.get_text(&url).await {
            Ok(Some(body)) => body
                .lines()
                .filter(|line| !line.is_empty())
                .map(|line| line.to_string())
                .collect(),
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!("Failed to fetch version list for {}: {}", module, e);
                Vec::new()
            }
        }
    }
}

impl Default for GoProxyRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

#[async_trait::async_trait]
impl Registry for GoProxyRegistry {
    fn registry_type(&self) -> RegistryType {
        RegistryType::Go
    }

    async fn get_latest_version(&self, package_name: &str) -> Result<PackageResult, LookupError> {
        let Some(info) = self.fetch_latest(package_name).await? else {
            return Ok(PackageResult::not_found(package_name, RegistryType::Go));
        };

        Ok(PackageResult {
            latest_version: Some(info.version),
            ..PackageResult::success(package_name, RegistryType::Go)
        })
    }

    async fn check_version_exists(
        &self,
        package_name: &str,
        version: &str,
    ) -> Result<PackageResult, LookupError> {
        let url = format!(
            "{}/{}/@v/{}.info",
            self.base_url,
            encode_module_path(package_name),
            version
        );
        let info: Option<GoVersionInfo> = self.policy.get_json(&url).await?;

        Ok(PackageResult {
            version: Some(version.to_string()),
            exists: Some(info.is_some()),
            ..PackageResult::success(package_name, RegistryType::Go)
        })
    }

    async fn get_package_info(&self, package_name: &str) -> Result<PackageResult, LookupError> {
        let Some(info) = self.fetch_latest(package_name).await? else {
            return Ok(PackageResult::not_found(package_name, RegistryType::Go));
        };

        let versions = self.fetch_version_list(package_name).await;

        Ok(PackageResult {
            latest_version: Some(info.version),
            versions: Some(versions),
            ..PackageResult::success(package_name, RegistryType::Go)
        })
    }
}

/// Encodes a Go module path for use in proxy URLs.
/// Uppercase letters are escaped as !{lowercase}.
fn encode_module_path(path: &str) -> String {
    let mut result = String::with_capacity(path.len());
    for c in path.chars() {
        if c.is_ascii_uppercase() {
            result.push('!');
            result.push(c.to_ascii_lowercase());
        } else {
            result.push(c);
        }
    }
    result
}

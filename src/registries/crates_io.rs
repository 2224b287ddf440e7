//! crates.io API implementation

use serde::Deserialize;

use crate::error::LookupError;
use crate::registries::sort_by_semver;
use crate::registry::Registry;
use crate::request::RequestPolicy;
use crate::types::{PackageResult, RegistryType};

/// Default base URL for crates.io
const DEFAULT_BASE_URL: &str = "https://crates.io";

/// Response from the crate document endpoint
#[derive(Debug, Deserialize)]
struct CratesResponse {
    #[serde(rename = "crate")]
    krate: CrateData,
}

#[derive(Debug, Deserialize)]
struct CrateData {
    newest_version: String,
    description: Option<String>,
    homepage: Option<String>,
    repository: Option<String>,
}

/// Response from the crate versions endpoint
#[derive(Debug, Deserialize)]
struct CratesVersionsResponse {
    #[serde(default)]
    versions: Vec<CrateVersion>,
}

#[derive(Debug, Deserialize)]
struct CrateVersion {
    num: String,
}

/// Registry implementation for crates.io
pub struct CratesIoRegistry {
    policy: RequestPolicy,
    base_url: String,
}

impl CratesIoRegistry {
    /// Creates a new CratesIoRegistry with a custom base URL
    pub fn new(base_url: &str) -> Self {
        Self {
            policy: RequestPolicy::default(),
            base_url: base_url.to_string(),
        }
    }

    async fn fetch_crate(&self, package_name: &str) -> Result<Option<CratesResponse>, LookupError> {
        let url = format!("{}/api/v1/crates/{}", self.base_url, package_name);
        Ok(self.policy.get_json(&url).await?)
    }

    async fn fetch_versions(
        &self,
        package_name: &str,
    ) -> Result<Option<CratesVersionsResponse>, LookupError> {
        let url = format!("{}/api/v1/crates/{}/versions", self.base_url, package_name);
        Ok(self.policy.get_json(&url).await?)
    }
}

impl Default for CratesIoRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

#[async_trait::async_trait]
impl Registry for CratesIoRegistry {
    fn registry_type(&self) -> RegistryType {
        RegistryType::CratesIo
    }

    async fn get_latest_version(&self, package_name: &str) -> Result<PackageResult, LookupError> {
        let Some(doc) = self.fetch_crate(package_name).await? else {
            return Ok(PackageResult::not_found(
                package_name,
                RegistryType::CratesIo,
            ));
        };

        Ok(PackageResult {
            latest_version: Some(doc.krate.newest_version),
            description: doc.krate.description,
            ..PackageResult::success(package_name, RegistryType::CratesIo)
        })
    }

    async fn check_version_exists(
        &self,
        package_name: &str,
        version: &str,
    ) -> Result<PackageResult, LookupError> {
        let Some(listing) = self.fetch_versions(package_name).await? else {
            return Ok(PackageResult {
                version: Some(version.to_string()),
                ..PackageResult::not_found(package_name, RegistryType::CratesIo)
            });
        };

        Ok(PackageResult {
            version: Some(version.to_string()),
            exists: Some(listing.versions.iter().any(|v| v.num == version)),
            ..PackageResult::success(package_name, RegistryType::CratesIo)
        })
    }

    async fn get_package_info(&self, package_name: &str) -> Result<PackageResult, LookupError> {
        let Some(doc) = self.fetch_crate(package_name).await? else {
            return Ok(PackageResult::not_found(
                package_name,
                RegistryType::CratesIo,
            ));
        };

        let versions = self
            .fetch_versions(package_name)
            .await?
            .map(|listing| {
                sort_by_semver(listing.versions.into_iter().map(|v| v.num).collect())
            })
            .unwrap_or_default();

        Ok(PackageResult {
            latest_version: Some(doc.krate.newest_version),
            description: doc.krate.description,
            versions: Some(versions),
            homepage: doc.krate.homepage,
            repository: doc.krate.repository,
            ..PackageResult::success(package_name, RegistryType::CratesIo)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;

    #[tokio::test]
    async fn get_latest_version_reads_newest_version() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/api/v1/crates/serde")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{
                    "crate": {
                        "newest_version": "1.0.219",
                        "description": "A generic serialization/deserialization framework",
                        "homepage": "https://serde.rs",
                        "repository": "https://github.com/serde-rs/serde"
                    }
                }"#,
            )
            .create_async()
            .await;

        let registry = CratesIoRegistry::new(&server.url());
        let result = registry.get_latest_version("serde").await.unwrap();

        mock.assert_async().await;
        assert!(result.found);
        assert_eq!(result.latest_version.as_deref(), Some("1.0.219"));
    }

    #[tokio::test]
    async fn get_latest_version_returns_not_found_for_missing_crate() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/api/v1/crates/ghost-crate")
            .with_status(404)
            .create_async()
            .await;

        let registry = CratesIoRegistry::new(&server.url());
        let result = registry.get_latest_version("ghost-crate").await.unwrap();

        mock.assert_async().await;
        assert!(!result.found);
        assert_eq!(result.error.as_deref(), Some("Package not found"));
    }

    #[tokio::test]
    async fn check_version_exists_matches_version_nums() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/api/v1/crates/tokio/versions")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"versions": [{"num": "1.49.0"}, {"num": "1.48.1"}]}"#)
            .expect(2)
            .create_async()
            .await;

        let registry = CratesIoRegistry::new(&server.url());

        let present = registry
            .check_version_exists("tokio", "1.48.1")
            .await
            .unwrap();
        assert_eq!(present.exists, Some(true));

        let absent = registry
            .check_version_exists("tokio", "0.0.1")
            .await
            .unwrap();
        assert_eq!(absent.exists, Some(false));

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn get_package_info_combines_document_and_sorted_versions() {
        let mut server = Server::new_async().await;
        let crate_mock = server
            .mock("GET", "/api/v1/crates/serde")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{
                    "crate": {
                        "newest_version": "1.0.219",
                        "description": "A generic serialization/deserialization framework",
                        "homepage": "https://serde.rs",
                        "repository": "https://github.com/serde-rs/serde"
                    }
                }"#,
            )
            .create_async()
            .await;
        let versions_mock = server
            .mock("GET", "/api/v1/crates/serde/versions")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"versions": [{"num": "1.0.219"}, {"num": "1.0.100"}, {"num": "1.0.218"}]}"#)
            .create_async()
            .await;

        let registry = CratesIoRegistry::new(&server.url());
        let result = registry.get_package_info("serde").await.unwrap();

        crate_mock.assert_async().await;
        versions_mock.assert_async().await;
        // Versions sorted by semver (lowest first, highest last)
        assert_eq!(
            result.versions,
            Some(vec![
                "1.0.100".to_string(),
                "1.0.218".to_string(),
                "1.0.219".to_string()
            ])
        );
        assert_eq!(result.homepage.as_deref(), Some("https://serde.rs"));
        assert_eq!(
            result.repository.as_deref(),
            Some("https://github.com/serde-rs/serde")
        );
    }
}

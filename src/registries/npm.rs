//! npm registry API implementation

use std::collections::HashMap;

use indexmap::IndexMap;
use serde::Deserialize;

use crate::error::LookupError;
use crate::registries::sort_by_semver;
use crate::registry::Registry;
use crate::request::RequestPolicy;
use crate::types::{PackageResult, RegistryType};

/// Default base URL for npm registry
const DEFAULT_BASE_URL: &str = "https://registry.npmjs.org";

/// Response from npm registry API (full package document)
#[derive(Debug, Deserialize)]
struct NpmPackageResponse {
    #[serde(rename = "dist-tags", default)]
    dist_tags: HashMap<String, String>,
    #[serde(default)]
    versions: IndexMap<String, serde_json::Value>,
    description: Option<String>,
    homepage: Option<String>,
    repository: Option<NpmRepository>,
    author: Option<NpmAuthor>,
}

/// npm publishes `repository` either as a bare URL or as `{type, url}`
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum NpmRepository {
    Object { url: Option<String> },
    Url(String),
}

impl NpmRepository {
    fn into_url(self) -> Option<String> {
        match self {
            NpmRepository::Object { url } => url,
            NpmRepository::Url(url) => Some(url),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum NpmAuthor {
    Object { name: Option<String> },
    Name(String),
}

impl NpmAuthor {
    fn into_name(self) -> Option<String> {
        match self {
            NpmAuthor::Object { name } => name,
            NpmAuthor::Name(name) => Some(name),
        }
    }
}

/// Registry implementation for npm registry API
pub struct NpmRegistry {
    policy: RequestPolicy,
    base_url: String,
}

impl NpmRegistry {
    /// Creates a new NpmRegistry with a custom base URL
    pub fn new(base_url: &str) -> Self {
        Self {
            policy: RequestPolicy::default(),
            base_url: base_url.to_string(),
        }
    }

    /// Encode package name for URL (handles scoped packages)
    fn encode_package_name(package_name: &str) -> String {
        if package_name.starts_with('@') {
            // Scoped package: @scope/name -> @scope%2Fname
            package_name.replace('/', "%2F")
        } else {
            package_name.to_string()
        }
    }

    async fn fetch_document(
        &self,
        package_name: &str,
    ) -> Result<Option<NpmPackageResponse>, LookupError> {
        let url = format!(
            "{}/{}",
            self.base_url,
            Self::encode_package_name(package_name)
        );
        Ok(self.policy.get_json(&url).await?)
    }
}

impl Default for NpmRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

#[async_trait::async_trait]
impl Registry for NpmRegistry {
    fn registry_type(&self) -> RegistryType {
        RegistryType::Npm
    }

    async fn get_latest_version(&self, package_name: &str) -> Result<PackageResult, LookupError> {
        let Some(doc) = self.fetch_document(package_name).await? else {
            return Ok(PackageResult::not_found(package_name, RegistryType::Npm));
        };

        Ok(PackageResult {
            latest_version: doc.dist_tags.get("latest").cloned(),
            description: doc.description,
            ..PackageResult::success(package_name, RegistryType::Npm)
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
                ..PackageResult::not_found(package_name, RegistryType::Npm)
            });
        };

        Ok(PackageResult {
            version: Some(version.to_string()),
            exists: Some(doc.versions.contains_key(version)),
            ..PackageResult::success(package_name, RegistryType::Npm)
        })
    }

    async fn get_package_info(&self, package_name: &str) -> Result<PackageResult, LookupError> {
        let Some(doc) = self.fetch_document(package_name).await? else {
            return Ok(PackageResult::not_found(package_name, RegistryType::Npm));
        };

        let versions = sort_by_semver(doc.versions.into_keys().collect());

        Ok(PackageResult {
            latest_version: doc.dist_tags.get("latest").cloned(),
            description: doc.description,
            versions: Some(versions),
            homepage: doc.homepage,
            repository: doc.repository.and_then(NpmRepository::into_url),
            author: doc.author.and_then(NpmAuthor::into_name),
            ..PackageResult::success(package_name, RegistryType::Npm)
        })
    }
}

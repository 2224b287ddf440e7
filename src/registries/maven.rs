//! Maven Central adapter built on the search.maven.org Solr API

use std::time::Duration;

use serde::Deserialize;

use crate::config::{
    DEFAULT_MIN_REQUEST_INTERVAL_MS, MAVEN_INFO_ROWS, MAVEN_MAX_RETRIES, MAVEN_REQUEST_TIMEOUT_MS,
};
use crate::error::LookupError;
use crate::registry::Registry;
use crate::request::RequestPolicy;
use crate::retry::RetryPolicy;
use crate::types::{PackageResult, RegistryType};

/// Default base URL for the Maven Central search API
const DEFAULT_BASE_URL: &str = "https://search.maven.org";

/// Message returned for package names that are not `groupId:artifactId`
const INVALID_COORDINATE: &str = "Invalid format. Use groupId:artifactId";

/// Solr search response envelope
#[derive(Debug, Deserialize)]
struct MavenSearchResponse {
    response: MavenResponseBody,
}

#[derive(Debug, Deserialize)]
struct MavenResponseBody {
    #[serde(rename = "numFound", default)]
    num_found: u64,
    #[serde(default)]
    docs: Vec<MavenDoc>,
}

#[derive(Debug, Deserialize)]
struct MavenDoc {
    #[serde(rename = "latestVersion")]
    latest_version: Option<String>,
    v: Option<String>,
}

/// Registry implementation for Maven Central.
///
/// The search endpoint is slow and flaky, so this adapter runs with a
/// longer timeout and wraps every request in a retry policy.
pub struct MavenRegistry {
    policy: RequestPolicy,
    retry: RetryPolicy,
    base_url: String,
}

impl MavenRegistry {
    /// Creates a new MavenRegistry with a custom base URL
    pub fn new(base_url: &str) -> Self {
        Self {
            policy: RequestPolicy::new(
                Duration::from_millis(MAVEN_REQUEST_TIMEOUT_MS),
                Duration::from_millis(DEFAULT_MIN_REQUEST_INTERVAL_MS),
            ),
            retry: RetryPolicy::new(MAVEN_MAX_RETRIES),
            base_url: base_url.to_string(),
        }
    }

    /// Splits `groupId:artifactId`, rejecting empty halves
    fn split_coordinate(package_name: &str) -> Option<(&str, &str)> {
        let (group, artifact) = package_name.split_once(':')?;
        if group.is_empty() || artifact.is_empty() {
            return None;
        }
        Some((group, artifact))
    }

    async fn search(
        &self,
        query_expr: &str,
        rows: u32,
        core_gav: bool,
    ) -> Result<Option<MavenSearchResponse>, LookupError> {
        let url = format!("{}/solrsearch/select", self.base_url);
        let rows = rows.to_string();
        let mut query = vec![("q", query_expr), ("rows", rows.as_str()), ("wt", "json")];
        if core_gav {
            query.push(("core", "gav"));
        }

        let response = self
            .retry
            .run(|| self.policy.get_json_with_query::<MavenSearchResponse>(&url, &query))
            .await?;
        Ok(response)
    }
}

impl Default for MavenRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

#[async_trait::async_trait]
impl Registry for MavenRegistry {
    fn registry_type(&self) -> RegistryType {
        RegistryType::Maven
    }

    async fn get_latest_version(&self, package_name: &str) -> Result<PackageResult, LookupError> {
        let Some((group, artifact)) = Self::split_coordinate(package_name) else {
            return Ok(PackageResult::failure(
                package_name,
                RegistryType::Maven,
                INVALID_COORDINATE,
            ));
        };

        let query_expr = format!(r#"g:"{}" AND a:"{}""#, group, artifact);
        let Some(body) = self.search(&query_expr, 1, false).await? else {
            return Ok(PackageResult::not_found(package_name, RegistryType::Maven));
        };

        let Some(doc) = body.response.docs.into_iter().next() else {
            return Ok(PackageResult::not_found(package_name, RegistryType::Maven));
        };

        Ok(PackageResult {
            latest_version: doc.latest_version.or(doc.v),
            ..PackageResult::success(package_name, RegistryType::Maven)
        })
    }

    async fn check_version_exists(
        &self,
        package_name: &str,
        version: &str,
    ) -> Result<PackageResult, LookupError> {
        let Some((group, artifact)) = Self::split_coordinate(package_name) else {
            return Ok(PackageResult {
                version: Some(version.to_string()),
                ..PackageResult::failure(package_name, RegistryType::Maven, INVALID_COORDINATE)
            });
        };

        let query_expr = format!(r#"g:"{}" AND a:"{}" AND v:"{}""#, group, artifact, version);
        let Some(body) = self.search(&query_expr, 1, true).await? else {
            return Ok(PackageResult {
                version: Some(version.to_string()),
                ..PackageResult::not_found(package_name, RegistryType::Maven)
            });
        };

        Ok(PackageResult {
            version: Some(version.to_string()),
            exists: Some(body.response.num_found > 0),
            ..PackageResult::success(package_name, RegistryType::Maven)
        })
    }

    async fn get_package_info(&self, package_name: &str) -> Result<PackageResult, LookupError> {
        let Some((group, artifact)) = Self::split_coordinate(package_name) else {
            return Ok(PackageResult::failure(
                package_name,
                RegistryType::Maven,
                INVALID_COORDINATE,
            ));
        };

        let query_expr = format!(r#"g:"{}" AND a:"{}""#, group, artifact);
        let Some(body) = self.search(&query_expr, MAVEN_INFO_ROWS, true).await? else {
            return Ok(PackageResult::not_found(package_name, RegistryType::Maven));
        };

        let docs = body.response.docs;
        if docs.is_empty() {
            return Ok(PackageResult::not_found(package_name, RegistryType::Maven));
        }

        let latest = docs[0].latest_version.clone().or_else(|| docs[0].v.clone());
        let mut versions: Vec<String> = Vec::new();
        for doc in docs {
            if let Some(v) = doc.v.or(doc.latest_version) {
                if !versions.contains(&v) {
                    versions.push(v);
                }
            }
        }

        Ok(PackageResult {
            latest_version: latest,
            versions: Some(versions),
            ..PackageResult::success(package_name, RegistryType::Maven)
        })
    }
}

//! Routes lookup requests to the matching registry adapter
//!
//! The dispatcher owns one long-lived adapter per registry, so each
//! registry's request pacing state survives across calls. Inputs are
//! validated and trimmed here, before any adapter or network is touched.

use std::collections::HashMap;
use std::sync::Arc;

use crate::batch::process_batch;
use crate::config::{MAX_PACKAGE_NAME_LEN, MAX_VERSION_LEN, RegistryEndpoints};
use crate::error::LookupError;
use crate::registries::{
    CratesIoRegistry, GoProxyRegistry, MavenRegistry, NpmRegistry, NugetRegistry, PypiRegistry,
    RubygemsRegistry,
};
use crate::registry::Registry;
use crate::types::{PackageResult, RegistryType, VersionQuery};

/// Entry point for all lookup operations.
///
/// An unknown registry tag or an invalid input fails the call with a
/// [`LookupError`]; remote not-found conditions surface as normal results.
pub struct Dispatcher {
    registries: HashMap<RegistryType, Arc<dyn Registry>>,
}

impl Dispatcher {
    /// Builds a dispatcher talking to the public registry endpoints
    pub fn new() -> Self {
        Self::with_endpoints(RegistryEndpoints::default())
    }

    /// Builds a dispatcher with custom base URLs
    pub fn with_endpoints(endpoints: RegistryEndpoints) -> Self {
        Self::with_registries(vec![
            Arc::new(NpmRegistry::new(&endpoints.npm)),
            Arc::new(PypiRegistry::new(&endpoints.pypi)),
            Arc::new(MavenRegistry::new(&endpoints.maven)),
            Arc::new(NugetRegistry::new(&endpoints.nuget)),
            Arc::new(RubygemsRegistry::new(&endpoints.rubygems)),
            Arc::new(CratesIoRegistry::new(&endpoints.crates)),
            Arc::new(GoProxyRegistry::new(&endpoints.go)),
        ])
    }

    /// Builds a dispatcher from explicit adapter instances
    pub fn with_registries(registries: Vec<Arc<dyn Registry>>) -> Self {
        Self {
            registries: registries
                .into_iter()
                .map(|r| (r.registry_type(), r))
                .collect(),
        }
    }

    fn registry(&self, tag: &str) -> Result<&Arc<dyn Registry>, LookupError> {
        let registry_type: RegistryType = tag.parse()?;
        self.registries
            .get(&registry_type)
            .ok_or_else(|| LookupError::UnsupportedRegistry(tag.to_string()))
    }

    /// Fetches the latest published version of a package
    pub async fn get_latest_version(
        &self,
        package_name: &str,
        registry: &str,
    ) -> Result<PackageResult, LookupError> {
        let handler = self.registry(registry)?;
        let package_name = validate_package_name(package_name)?;
        handler.get_latest_version(&package_name).await
    }

    /// Checks whether a specific version of a package has been published
    pub async fn check_version_exists(
        &self,
        package_name: &str,
        version: &str,
        registry: &str,
    ) -> Result<PackageResult, LookupError> {
        let handler = self.registry(registry)?;
        let package_name = validate_package_name(package_name)?;
        let version = validate_version(version)?;
        handler.check_version_exists(&package_name, &version).await
    }

    /// Fetches full package metadata including the known version list
    pub async fn get_package_info(
        &self,
        package_name: &str,
        registry: &str,
    ) -> Result<PackageResult, LookupError> {
        let handler = self.registry(registry)?;
        let package_name = validate_package_name(package_name)?;
        handler.get_package_info(&package_name).await
    }

    /// Fetches latest versions for up to 100 packages concurrently.
    /// Per-item failures become per-item error results; results come back
    /// in input order.
    pub async fn get_latest_versions(
        &self,
        packages: Vec<String>,
        registry: &str,
    ) -> Result<Vec<PackageResult>, LookupError> {
        let handler = self.registry(registry)?;
        process_batch(handler.registry_type(), packages, |package| async move {
            let package = validate_package_name(&package)?;
            handler.get_latest_version(&package).await
        })
        .await
    }

    /// Checks version existence for up to 100 packages concurrently
    pub async fn check_versions_exist(
        &self,
        packages: Vec<VersionQuery>,
        registry: &str,
    ) -> Result<Vec<PackageResult>, LookupError> {
        let handler = self.registry(registry)?;
        process_batch(handler.registry_type(), packages, |query| async move {
            let package = validate_package_name(&query.package_name)?;
            let version = validate_version(&query.version)?;
            handler.check_version_exists(&package, &version).await
        })
        .await
    }

    /// Fetches full metadata for up to 100 packages concurrently
    pub async fn get_packages_info(
        &self,
        packages: Vec<String>,
        registry: &str,
    ) -> Result<Vec<PackageResult>, LookupError> {
        let handler = self.registry(registry)?;
        process_batch(handler.registry_type(), packages, |package| async move {
            let package = validate_package_name(&package)?;
            handler.get_package_info(&package).await
        })
        .await
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

fn validate_package_name(package_name: &str) -> Result<String, LookupError> {
    let trimmed = package_name.trim();
    if trimmed.is_empty() {
        return Err(LookupError::Validation(
            "package name must not be empty".to_string(),
        ));
    }
    if trimmed.len() > MAX_PACKAGE_NAME_LEN {
        return Err(LookupError::Validation(format!(
            "package name exceeds {} characters",
            MAX_PACKAGE_NAME_LEN
        )));
    }
    Ok(trimmed.to_string())
}

fn validate_version(version: &str) -> Result<String, LookupError> {
    let trimmed = version.trim();
    if trimmed.is_empty() {
        return Err(LookupError::Validation(
            "version must not be empty".to_string(),
        ));
    }
    if trimmed.len() > MAX_VERSION_LEN {
        return Err(LookupError::Validation(format!(
            "version exceeds {} characters",
            MAX_VERSION_LEN
        )));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RequestError;
    use crate::registry::MockRegistry;
    use rstest::rstest;

    fn dispatcher_with_mock(mock: MockRegistry) -> Dispatcher {
        Dispatcher::with_registries(vec![Arc::new(mock)])
    }

    fn npm_mock() -> MockRegistry {
        let mut mock = MockRegistry::new();
        mock.expect_registry_type().return_const(RegistryType::Npm);
        mock
    }

    #[rstest]
    #[case("homebrew")]
    #[case("Maven")]
    #[case("")]
    #[tokio::test]
    async fn operations_reject_unknown_registry_tags(#[case] tag: &str) {
        let mut mock = npm_mock();
        mock.expect_get_latest_version().times(0);
        let dispatcher = dispatcher_with_mock(mock);

        let result = dispatcher.get_latest_version("express", tag).await;

        assert!(matches!(
            result,
            Err(LookupError::UnsupportedRegistry(t)) if t == tag
        ));
    }

    #[tokio::test]
    async fn get_latest_version_rejects_empty_package_name() {
        let mut mock = npm_mock();
        mock.expect_get_latest_version().times(0);
        let dispatcher = dispatcher_with_mock(mock);

        let result = dispatcher.get_latest_version("   ", "npm").await;

        assert!(matches!(result, Err(LookupError::Validation(_))));
    }

    #[tokio::test]
    async fn get_latest_version_rejects_overlong_package_name() {
        let mut mock = npm_mock();
        mock.expect_get_latest_version().times(0);
        let dispatcher = dispatcher_with_mock(mock);

        let result = dispatcher
            .get_latest_version(&"x".repeat(501), "npm")
            .await;

        assert!(matches!(result, Err(LookupError::Validation(_))));
    }

    #[tokio::test]
    async fn get_latest_version_trims_package_name_before_dispatch() {
        let mut mock = npm_mock();
        mock.expect_get_latest_version()
            .withf(|name| name == "express")
            .times(1)
            .returning(|name| Ok(PackageResult::success(name, RegistryType::Npm)));
        let dispatcher = dispatcher_with_mock(mock);

        let result = dispatcher
            .get_latest_version("  express  ", "npm")
            .await
            .unwrap();

        assert_eq!(result.package, "express");
    }

    #[tokio::test]
    async fn check_version_exists_rejects_overlong_version() {
        let mut mock = npm_mock();
        mock.expect_check_version_exists().times(0);
        let dispatcher = dispatcher_with_mock(mock);

        let result = dispatcher
            .check_version_exists("express", &"9".repeat(101), "npm")
            .await;

        assert!(matches!(result, Err(LookupError::Validation(_))));
    }

    #[tokio::test]
    async fn get_latest_versions_isolates_per_item_failures() {
        let mut mock = npm_mock();
        mock.expect_get_latest_version()
            .returning(|name| match name {
                "flaky" => Err(LookupError::Request(RequestError::Server {
                    status: 500,
                    status_text: "Internal Server Error".to_string(),
                })),
                _ => Ok(PackageResult::success(name, RegistryType::Npm)),
            });
        let dispatcher = dispatcher_with_mock(mock);

        let results = dispatcher
            .get_latest_versions(
                vec![
                    "express".to_string(),
                    "flaky".to_string(),
                    "lodash".to_string(),
                ],
                "npm",
            )
            .await
            .unwrap();

        assert_eq!(results.len(), 3);
        assert!(results[0].found);
        assert!(!results[1].found);
        assert!(results[2].found);
        assert_eq!(results[1].package, "flaky");
    }

    #[tokio::test]
    async fn get_latest_versions_turns_invalid_item_into_error_result() {
        let mut mock = npm_mock();
        mock.expect_get_latest_version()
            .withf(|name| name == "express")
            .times(1)
            .returning(|name| Ok(PackageResult::success(name, RegistryType::Npm)));
        let dispatcher = dispatcher_with_mock(mock);

        let results = dispatcher
            .get_latest_versions(vec!["express".to_string(), "  ".to_string()], "npm")
            .await
            .unwrap();

        assert!(results[0].found);
        assert!(!results[1].found);
        assert!(results[1].error.as_deref().unwrap().contains("empty"));
    }

    #[tokio::test]
    async fn batch_operations_fail_fast_on_structural_violations() {
        let dispatcher = dispatcher_with_mock(npm_mock());

        let empty = dispatcher.get_latest_versions(vec![], "npm").await;
        assert!(matches!(empty, Err(LookupError::Validation(_))));

        let oversized = dispatcher
            .get_packages_info((0..101).map(|i| format!("pkg-{i}")).collect(), "npm")
            .await;
        assert!(matches!(oversized, Err(LookupError::Validation(_))));
    }

    #[tokio::test]
    async fn check_versions_exist_dispatches_each_query() {
        let mut mock = npm_mock();
        mock.expect_check_version_exists()
            .withf(|name, version| name == "express" && version == "5.1.0")
            .times(1)
            .returning(|name, version| {
                Ok(PackageResult {
                    version: Some(version.to_string()),
                    exists: Some(true),
                    ..PackageResult::success(name, RegistryType::Npm)
                })
            });
        let dispatcher = dispatcher_with_mock(mock);

        let results = dispatcher
            .check_versions_exist(
                vec![VersionQuery {
                    package_name: "express".to_string(),
                    version: " 5.1.0 ".to_string(),
                }],
                "npm",
            )
            .await
            .unwrap();

        assert_eq!(results[0].exists, Some(true));
    }
}

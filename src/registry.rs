//! Registry trait for looking up package versions in remote registries

#[cfg(test)]
use mockall::automock;

use crate::error::LookupError;
use crate::types::{PackageResult, RegistryType};

/// Trait implemented once per supported registry.
///
/// Every operation returns a normalized [`PackageResult`]; callers never see
/// registry-specific response shapes. An absent package is a `found: false`
/// result, not an error — only transport failures surface as `Err`.
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait Registry: Send + Sync {
    /// Returns the type of registry this implementation handles
    fn registry_type(&self) -> RegistryType;

    /// Fetches the latest published version of a package
    async fn get_latest_version(&self, package_name: &str) -> Result<PackageResult, LookupError>;

    /// Checks whether a specific version of a package has been published
    async fn check_version_exists(
        &self,
        package_name: &str,
        version: &str,
    ) -> Result<PackageResult, LookupError>;

    /// Fetches full package metadata including the known version list
    async fn get_package_info(&self, package_name: &str) -> Result<PackageResult, LookupError>;
}

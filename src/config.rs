use serde::Deserialize;

// =============================================================================
// Request policy constants
// =============================================================================

/// User agent sent on every outbound registry request
pub const USER_AGENT: &str = concat!("dependency-mcp/", env!("CARGO_PKG_VERSION"));

/// Minimum delay between two requests issued by the same registry instance (100ms)
pub const DEFAULT_MIN_REQUEST_INTERVAL_MS: u64 = 100;

/// Timeout for a single registry request in milliseconds (10 seconds)
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 10_000;

/// Timeout for Maven Central search requests (20 seconds, the search endpoint is slow)
pub const MAVEN_REQUEST_TIMEOUT_MS: u64 = 20_000;

/// Default number of attempts for retried requests
pub const DEFAULT_MAX_RETRIES: u32 = 2;

/// Number of attempts for Maven Central search requests
pub const MAVEN_MAX_RETRIES: u32 = 3;

/// Base delay between retry attempts (1 second, grows linearly per attempt)
pub const RETRY_BASE_DELAY_MS: u64 = 1_000;

/// Number of search documents requested when listing Maven versions
pub const MAVEN_INFO_ROWS: u32 = 50;

// =============================================================================
// Input limits
// =============================================================================

/// Maximum number of packages accepted by a single batch call
pub const MAX_BATCH_SIZE: usize = 100;

/// Maximum accepted package name length after trimming
pub const MAX_PACKAGE_NAME_LEN: usize = 500;

/// Maximum accepted version string length after trimming
pub const MAX_VERSION_LEN: usize = 100;

/// Base URLs for the supported registries.
///
/// Defaults point at the public endpoints; tests override individual
/// entries to route requests at a local mock server.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct RegistryEndpoints {
    pub npm: String,
    pub pypi: String,
    pub maven: String,
    pub nuget: String,
    pub rubygems: String,
    pub crates: String,
    pub go: String,
}

impl Default for RegistryEndpoints {
    fn default() -> Self {
        Self {
            npm: "https://registry.npmjs.org".to_string(),
            pypi: "https://pypi.org".to_string(),
            maven: "https://search.maven.org".to_string(),
            nuget: "https://api.nuget.org".to_string(),
            rubygems: "https://rubygems.org".to_string(),
            crates: "https://crates.io".to_string(),
            go: "https://proxy.golang.org".to_string(),
        }
    }
}

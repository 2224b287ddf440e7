//! Registry adapters translating native API responses into [`PackageResult`]s
//!
//! [`PackageResult`]: crate::types::PackageResult

pub mod crates_io;
pub mod go_proxy;
pub mod maven;
pub mod npm;
pub mod nuget;
pub mod pypi;
pub mod rubygems;

pub use crates_io::CratesIoRegistry;
pub use go_proxy::GoProxyRegistry;
pub use maven::MavenRegistry;
pub use npm::NpmRegistry;
pub use nuget::NugetRegistry;
pub use pypi::PypiRegistry;
pub use rubygems::RubygemsRegistry;

use semver::Version;

/// Sorts a version list ascending by semver (lowest first, highest last).
/// Strings that do not parse as semver sort after the ones that do,
/// ordered lexicographically among themselves.
pub(crate) fn sort_by_semver(versions: Vec<String>) -> Vec<String> {
    let mut keyed: Vec<(String, Option<Version>)> = versions
        .into_iter()
        .map(|v| {
            let parsed = Version::parse(&v).ok();
            (v, parsed)
        })
        .collect();

    keyed.sort_by(|(a_raw, a), (b_raw, b)| match (a, b) {
        (Some(a), Some(b)) => a.cmp(b),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => a_raw.cmp(b_raw),
    });

    keyed.into_iter().map(|(v, _)| v).collect()
}

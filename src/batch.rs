//! Concurrent batch fan-out with per-item error isolation

use std::future::Future;

use futures::future::join_all;

use crate::config::MAX_BATCH_SIZE;
use crate::error::LookupError;
use crate::types::{PackageResult, RegistryType, VersionQuery};

/// A batch input that can name the package it targets, so a failed item
/// can still be attributed in the synthesized error result.
pub trait BatchItem {
    fn package_name(&self) -> &str;
}

impl BatchItem for String {
    fn package_name(&self) -> &str {
        self
    }
}

impl BatchItem for VersionQuery {
    fn package_name(&self) -> &str {
        &self.package_name
    }
}

/// Runs `op` for every item concurrently and collects one result per item,
/// in input order (`join_all` keeps index correspondence).
///
/// A failing item is converted into a `found: false` result carrying the
/// error message; the batch itself only fails on structural violations
/// (empty input or more than [`MAX_BATCH_SIZE`] items).
pub async fn process_batch<T, F, Fut>(
    registry_type: RegistryType,
    items: Vec<T>,
    op: F,
) -> Result<Vec<PackageResult>, LookupError>
where
    T: BatchItem,
    F: Fn(T) -> Fut,
    Fut: Future<Output = Result<PackageResult, LookupError>>,
{
    if items.is_empty() {
        return Err(LookupError::Validation(
            "batch requires at least one package".to_string(),
        ));
    }
    if items.len() > MAX_BATCH_SIZE {
        return Err(LookupError::Validation(format!(
            "batch size {} exceeds the maximum of {}",
            items.len(),
            MAX_BATCH_SIZE
        )));
    }

    let futures = items.into_iter().map(|item| {
        let package = item.package_name().to_string();
        let fut = op(item);
        async move {
            match fut.await {
                Ok(result) => result,
                Err(e) => PackageResult::failure(&package, registry_type, e.to_string()),
            }
        }
    });

    Ok(join_all(futures).await)
}

//! Uniform package version lookups across seven public registries
//!
//! This crate answers three questions ("what is the latest version?",
//! "does this version exist?" and "what do we know about this package?")
//! against npm, PyPI, Maven Central, NuGet, RubyGems, crates.io and the
//! Go module proxy, normalizing every registry's native response shape
//! into a single [`PackageResult`].
//!
//! # Architecture
//!
//! ```text
//! ┌────────────┐     ┌────────────┐     ┌──────────────┐
//! │ Dispatcher │────▶│  Registry  │────▶│RequestPolicy │
//! │ (validate, │     │ (adapters, │     │ (pacing,     │
//! │  route)    │     │  normalize)│     │  timeouts)   │
//! └────────────┘     └────────────┘     └──────────────┘
//!       │                   │                  ▲
//!       ▼                   ▼                  │
//! ┌────────────┐     ┌────────────┐     ┌──────────────┐
//! │   Batch    │     │ Registries │     │ RetryPolicy  │
//! │ (fan-out)  │     │ (npm, ...) │     │ (Maven only) │
//! └────────────┘     └────────────┘     └──────────────┘
//! ```
//!
//! # Modules
//!
//! - [`dispatcher`]: input validation and tag-to-adapter routing
//! - [`batch`]: concurrent fan-out with per-item error isolation
//! - [`registry`]: the [`Registry`](registry::Registry) trait
//! - [`registries`]: concrete adapters, one per supported registry
//! - [`request`]: paced, timeout-bounded HTTP with status mapping
//! - [`retry`]: bounded retry with linear backoff
//! - [`error`]: error types for the transport and lookup layers
//! - [`types`]: common types like [`PackageResult`]
//! - [`config`]: tunable constants and endpoint configuration

pub mod batch;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod registries;
pub mod registry;
pub mod request;
pub mod retry;
pub mod types;

pub use config::RegistryEndpoints;
pub use dispatcher::Dispatcher;
pub use error::{LookupError, RequestError};
pub use types::{PackageResult, RegistryType, VersionQuery};

//! Outbound request policy: pacing, timeout and status mapping
//!
//! Every registry adapter owns one [`RequestPolicy`]. The policy spaces
//! consecutive requests by a minimum interval, applies a per-request timeout
//! and translates HTTP statuses into [`RequestError`] variants. A 404 (or a
//! 410, which the Go proxy uses for removed modules) is not an error: it
//! surfaces as `Ok(None)` and the caller decides what not-found means.

use std::time::{Duration, Instant};

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tokio::sync::Mutex;
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::config::{DEFAULT_MIN_REQUEST_INTERVAL_MS, DEFAULT_REQUEST_TIMEOUT_MS, USER_AGENT};
use crate::error::RequestError;

/// Rate-limited HTTP GET wrapper shared by all adapters.
///
/// The pacing state is per-instance: two adapters never contend on the same
/// interval, and one adapter's callers are serialized through the mutex so
/// concurrent batch items honor the spacing as well.
pub struct RequestPolicy {
    client: reqwest::Client,
    timeout: Duration,
    min_interval: Duration,
    last_request: Mutex<Option<Instant>>,
}

impl RequestPolicy {
    pub fn new(timeout: Duration, min_interval: Duration) -> Self {
        Self {
            client: reqwest::Client::builder()
                .user_agent(USER_AGENT)
                .build()
                .expect("Failed to create HTTP client"),
            timeout,
            min_interval,
            last_request: Mutex::new(None),
        }
    }

    /// Fetches a JSON document, returning `Ok(None)` when the resource is absent
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
    ) -> Result<Option<T>, RequestError> {
        self.get_json_with_query(url, &[]).await
    }

    /// Fetches a JSON document with URL query parameters appended
    pub async fn get_json_with_query<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<Option<T>, RequestError> {
        let Some(response) = self.execute(url, query, "application/json").await? else {
            return Ok(None);
        };

        let value = response.json::<T>().await.map_err(|e| {
            warn!("Failed to parse response from {}: {}", url, e);
            RequestError::InvalidResponse(e.to_string())
        })?;
        Ok(Some(value))
    }

    /// Fetches a plain-text document (the Go proxy version list)
    pub async fn get_text(&self, url: &str) -> Result<Option<String>, RequestError> {
        let Some(response) = self.execute(url, &[], "text/plain").await? else {
            return Ok(None);
        };

        let body = response.text().await.map_err(|e| {
            warn!("Failed to read response from {}: {}", url, e);
            RequestError::InvalidResponse(e.to_string())
        })?;
        Ok(Some(body))
    }

    async fn execute(
        &self,
        url: &str,
        query: &[(&str, &str)],
        accept: &str,
    ) -> Result<Option<reqwest::Response>, RequestError> {
        self.pace().await;

        debug!("GET {}", url);
        let mut request = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, accept)
            .timeout(self.timeout);
        if !query.is_empty() {
            request = request.query(query);
        }

        let response = request.send().await.map_err(|e| self.classify(e))?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND || status == StatusCode::GONE {
            return Ok(None);
        }
        if status == StatusCode::TOO_MANY_REQUESTS {
            warn!("Rate limited: {}", url);
            return Err(RequestError::RateLimited);
        }

        let status_text = status.canonical_reason().unwrap_or("unknown").to_string();
        if status.is_server_error() {
            warn!("Registry returned status {}: {}", status, url);
            return Err(RequestError::Server {
                status: status.as_u16(),
                status_text,
            });
        }
        if !status.is_success() {
            warn!("Registry returned status {}: {}", status, url);
            return Err(RequestError::Http {
                status: status.as_u16(),
                status_text,
            });
        }

        Ok(Some(response))
    }

    /// Sleeps out the remainder of the minimum interval since the last request.
    /// The guard is held across the sleep, so concurrent callers queue up.
    async fn pace(&self) {
        let mut last = self.last_request.lock().await;
        if let Some(previous) = *last {
            let elapsed = previous.elapsed();
            if elapsed < self.min_interval {
                sleep(self.min_interval - elapsed).await;
            }
        }
        *last = Some(Instant::now());
    }

    fn classify(&self, e: reqwest::Error) -> RequestError {
        if e.is_timeout() {
            RequestError::Timeout(self.timeout)
        } else {
            RequestError::Network(e)
        }
    }
}

impl Default for RequestPolicy {
    fn default() -> Self {
        Self::new(
            Duration::from_millis(DEFAULT_REQUEST_TIMEOUT_MS),
            Duration::from_millis(DEFAULT_MIN_REQUEST_INTERVAL_MS),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;
    use serde_json::Value;

    fn fast_policy() -> RequestPolicy {
        RequestPolicy::new(Duration::from_secs(5), Duration::ZERO)
    }

    #[tokio::test]
    async fn get_json_returns_parsed_document() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/doc")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"name": "express"}"#)
            .create_async()
            .await;

        let policy = fast_policy();
        let result = policy
            .get_json::<Value>(&format!("{}/doc", server.url()))
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(result.unwrap()["name"], "express");
    }

    #[tokio::test]
    async fn get_json_returns_none_for_404() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/missing")
            .with_status(404)
            .create_async()
            .await;

        let policy = fast_policy();
        let result = policy
            .get_json::<Value>(&format!("{}/missing", server.url()))
            .await
            .unwrap();

        mock.assert_async().await;
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn get_json_returns_none_for_410() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/gone")
            .with_status(410)
            .create_async()
            .await;

        let policy = fast_policy();
        let result = policy
            .get_json::<Value>(&format!("{}/gone", server.url()))
            .await
            .unwrap();

        mock.assert_async().await;
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn get_json_maps_429_to_rate_limited() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/limited")
            .with_status(429)
            .create_async()
            .await;

        let policy = fast_policy();
        let result = policy
            .get_json::<Value>(&format!("{}/limited", server.url()))
            .await;

        mock.assert_async().await;
        assert!(matches!(result, Err(RequestError::RateLimited)));
    }

    #[tokio::test]
    async fn get_json_maps_5xx_to_server_error() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/broken")
            .with_status(503)
            .create_async()
            .await;

        let policy = fast_policy();
        let result = policy
            .get_json::<Value>(&format!("{}/broken", server.url()))
            .await;

        mock.assert_async().await;
        assert!(matches!(
            result,
            Err(RequestError::Server { status: 503, .. })
        ));
    }

    #[tokio::test]
    async fn get_json_maps_other_non_success_to_http_error() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/forbidden")
            .with_status(403)
            .create_async()
            .await;

        let policy = fast_policy();
        let result = policy
            .get_json::<Value>(&format!("{}/forbidden", server.url()))
            .await;

        mock.assert_async().await;
        assert!(matches!(result, Err(RequestError::Http { status: 403, .. })));
    }

    #[tokio::test]
    async fn get_json_maps_unparseable_body_to_invalid_response() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/garbage")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body("not json at all")
            .create_async()
            .await;

        let policy = fast_policy();
        let result = policy
            .get_json::<Value>(&format!("{}/garbage", server.url()))
            .await;

        mock.assert_async().await;
        assert!(matches!(result, Err(RequestError::InvalidResponse(_))));
    }

    #[tokio::test]
    async fn get_json_maps_connection_failure_to_network_error() {
        let policy = fast_policy();
        let result = policy
            .get_json::<Value>("http://127.0.0.1:1/unreachable")
            .await;

        assert!(matches!(result, Err(RequestError::Network(_))));
    }

    #[tokio::test]
    async fn get_text_returns_raw_body() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/list")
            .with_status(200)
            .with_header("content-type", "text/plain")
            .with_body("v1.0.0\nv1.1.0\n")
            .create_async()
            .await;

        let policy = fast_policy();
        let result = policy
            .get_text(&format!("{}/list", server.url()))
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(result.unwrap(), "v1.0.0\nv1.1.0\n");
    }

    #[tokio::test]
    async fn consecutive_requests_are_spaced_by_min_interval() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/paced")
            .with_status(200)
            .with_body("{}")
            .expect(2)
            .create_async()
            .await;

        let policy = RequestPolicy::new(Duration::from_secs(5), Duration::from_millis(50));
        let url = format!("{}/paced", server.url());

        let start = Instant::now();
        policy.get_json::<Value>(&url).await.unwrap();
        policy.get_json::<Value>(&url).await.unwrap();
        let elapsed = start.elapsed();

        mock.assert_async().await;
        assert!(
            elapsed >= Duration::from_millis(50),
            "second request was issued after {:?}",
            elapsed
        );
    }
}

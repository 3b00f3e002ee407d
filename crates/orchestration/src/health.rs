//! Liveness probes against feature API endpoints.

use std::time::Duration;

use futures::future::join_all;
use tracing::debug;
use url::Url;

use galaxy_common::{HealthStatus, Registry, HEALTH_PROBE_TIMEOUT_MS};

/// Derives the health-check URL from an API endpoint by replacing the
/// final path segment with `health`. Query string and fragment are
/// dropped.
///
/// Examples:
/// - `http://host/api/generate` → `http://host/api/health`
/// - `http://host/api/` → `http://host/api/health`
/// - `http://host` → `http://host/health`
/// - `http://host/api/generate?x=1` → `http://host/api/health`
pub fn derive_health_url(endpoint: &Url) -> Url {
    let mut url = endpoint.clone();
    url.set_query(None);
    url.set_fragment(None);

    if let Ok(mut segments) = url.path_segments_mut() {
        segments.pop().push("health");
    }

    url
}

/// Probes feature endpoints, collapsing every failure mode to `false`.
pub struct HealthMonitor {
    client: reqwest::Client,
    timeout: Duration,
}

impl HealthMonitor {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
            timeout: Duration::from_millis(HEALTH_PROBE_TIMEOUT_MS),
        }
    }

    /// Monitor with a non-default probe timeout.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            timeout,
        }
    }

    /// GETs the derived health URL; `true` iff the response status is
    /// 2xx. Network errors, timeouts, and non-2xx statuses all collapse
    /// to `false`; the probe never propagates an error.
    pub async fn probe(&self, api_endpoint: &Url) -> bool {
        let health_url = derive_health_url(api_endpoint);

        match self
            .client
            .get(health_url.clone())
            .timeout(self.timeout)
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                debug!(url = %health_url, "Health probe failed: {e}");
                false
            }
        }
    }

    /// Probes every registry entry with an API endpoint, concurrently.
    /// Entries without an endpoint are omitted from the result.
    pub async fn probe_all(&self, registry: &Registry) -> HealthStatus {
        let probes = registry
            .with_endpoints()
            .filter_map(|descriptor| {
                descriptor
                    .api_endpoint
                    .clone()
                    .map(|endpoint| (descriptor.id.clone(), endpoint))
            })
            .map(|(id, endpoint)| async move { (id, self.probe(&endpoint).await) });

        join_all(probes).await.into_iter().collect()
    }
}

impl Default for HealthMonitor {
    fn default() -> Self {
        Self::new()
    }
}

//! Probe client - bounded-latency health checks
//!
//! One probe per target per tick. A probe never blocks past
//! [`PROBE_TIMEOUT`]; every failure mode (connect error, timeout,
//! non-2xx, unparseable body) is converted into a `Down` outcome with
//! a human-readable reason. The reason feeds snapshot rows and logs,
//! never persisted state.

use std::time::{Duration, Instant};

use tracing::{instrument, trace, warn};

use crate::store::{ServerRecord, WebsiteRecord};
use crate::HealthReport;

/// Hard upper bound on a single probe.
pub const PROBE_TIMEOUT: Duration = Duration::from_millis(6000);

/// Normalized result of one probe.
#[derive(Debug, Clone, PartialEq)]
pub enum ProbeOutcome<M> {
    /// Target responded; kind-specific metrics attached.
    Up(M),

    /// Target failed the check; human-readable reason.
    Down(String),
}

impl<M> ProbeOutcome<M> {
    pub fn is_up(&self) -> bool {
        matches!(self, ProbeOutcome::Up(_))
    }
}

/// Success metrics for a website probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WebsiteProbe {
    /// Wall-clock milliseconds from just before the request until
    /// response headers were read.
    pub latency_ms: u64,
}

/// HTTP prober shared by a scheduler's per-target tasks.
///
/// The client is built once and reused across requests.
pub struct ProbeClient {
    client: reqwest::Client,
}

impl ProbeClient {
    pub fn new() -> Self {
        Self::with_timeout(PROBE_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(timeout)
                .build()
                .expect("failed to build HTTP client"),
        }
    }

    /// Probe a server's agent endpoint.
    ///
    /// GET `http://{host}:{port}/health` with the server's api key;
    /// expects the raw-byte health report JSON.
    #[instrument(skip_all, fields(server = %record.name))]
    pub async fn probe_server(&self, record: &ServerRecord) -> ProbeOutcome<HealthReport> {
        let url = record.health_url();
        trace!("probing agent at {url}");

        let response = match self
            .client
            .get(&url)
            .header("x-api-key", &record.api_key)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                warn!("probe failed: {e}");
                return ProbeOutcome::Down(e.to_string());
            }
        };

        let status = response.status();
        if !status.is_success() {
            warn!("agent answered with HTTP {status}");
            return ProbeOutcome::Down(format!("agent returned HTTP {}", status));
        }

        match response.json::<HealthReport>().await {
            Ok(report) => {
                trace!("agent healthy, cpu {:.1}%", report.cpu);
                ProbeOutcome::Up(report)
            }
            Err(e) => {
                warn!("invalid health report: {e}");
                ProbeOutcome::Down(format!("invalid health report: {}", e))
            }
        }
    }

    /// Probe a website's public URL.
    ///
    /// Any 2xx response is up; latency is measured from just before
    /// the request until headers are read.
    #[instrument(skip_all, fields(website = %record.url))]
    pub async fn probe_website(&self, record: &WebsiteRecord) -> ProbeOutcome<WebsiteProbe> {
        trace!("probing website");

        let start = Instant::now();
        let response = match self.client.get(&record.url).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!("probe failed: {e}");
                return ProbeOutcome::Down(e.to_string());
            }
        };
        let latency_ms = start.elapsed().as_millis() as u64;

        let status = response.status();
        if !status.is_success() {
            warn!("website answered with HTTP {status}");
            return ProbeOutcome::Down(format!("website returned HTTP {}", status));
        }

        trace!("website up after {latency_ms}ms");
        ProbeOutcome::Up(WebsiteProbe { latency_ms })
    }
}

impl Default for ProbeClient {
    fn default() -> Self {
        Self::new()
    }
}

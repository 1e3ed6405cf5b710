use std::net::SocketAddr;

use tracing::trace;

use crate::outage::DOWN_CONFIRMATION_MS;
use crate::store::{ServerRecord, WebsiteRecord};
use crate::TargetKind;

#[derive(Debug, Clone, serde::Deserialize)]
pub struct Config {
    /// Servers registered at startup (more can be added via the API).
    pub servers: Option<Vec<ServerSeed>>,

    /// Websites registered at startup.
    pub websites: Option<Vec<WebsiteSeed>>,

    pub monitoring: Option<MonitoringConfig>,

    pub api: Option<ApiSettings>,

    pub alert: Option<AlertConfig>,
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct ServerSeed {
    pub name: String,
    pub host: String,
    #[serde(default = "crate::util::get_default_port")]
    pub port: u16,
    pub api_key: String,
}

impl ServerSeed {
    pub fn into_record(self) -> ServerRecord {
        ServerRecord::new(self.name, self.host, self.port, self.api_key)
    }
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct WebsiteSeed {
    pub url: String,
    pub display: Option<String>,
}

impl WebsiteSeed {
    pub fn into_record(self) -> WebsiteRecord {
        WebsiteRecord::new(self.url, self.display)
    }
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct MonitoringConfig {
    /// Sweep interval in seconds; both kinds tick at this cadence,
    /// each on its own timer.
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,

    /// Continuous-down duration required before a server alert fires.
    #[serde(default = "default_confirmation_ms")]
    pub server_confirmation_ms: i64,

    /// Same, for websites. Kept separate so the two kinds can be
    /// tuned independently.
    #[serde(default = "default_confirmation_ms")]
    pub website_confirmation_ms: i64,

    /// Bound on in-flight probes within one sweep.
    #[serde(default = "default_max_concurrent_probes")]
    pub max_concurrent_probes: usize,
}

impl MonitoringConfig {
    pub fn confirmation_window(&self, kind: TargetKind) -> chrono::Duration {
        let ms = match kind {
            TargetKind::Server => self.server_confirmation_ms,
            TargetKind::Website => self.website_confirmation_ms,
        };
        chrono::Duration::milliseconds(ms)
    }
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
            server_confirmation_ms: default_confirmation_ms(),
            website_confirmation_ms: default_confirmation_ms(),
            max_concurrent_probes: default_max_concurrent_probes(),
        }
    }
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct ApiSettings {
    #[serde(default = "default_bind_addr")]
    pub bind: SocketAddr,

    /// Optional bearer token guarding all routes.
    pub token: Option<String>,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            bind: default_bind_addr(),
            token: None,
        }
    }
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct AlertConfig {
    /// Webhook receiving down-alert payloads.
    pub webhook: Option<String>,
}

fn default_interval_secs() -> u64 {
    10
}

fn default_confirmation_ms() -> i64 {
    DOWN_CONFIRMATION_MS
}

fn default_max_concurrent_probes() -> usize {
    8
}

fn default_bind_addr() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 8080))
}

pub fn read_config_file(path: &str) -> anyhow::Result<Config> {
    let file_content = std::fs::read_to_string(path)?;
    serde_json::from_str(&file_content)
        .map_err(|_| anyhow::anyhow!("Invalid configuration file provided!"))
        .inspect(|config| trace!("loaded config: {config:?}"))
}

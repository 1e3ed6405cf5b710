//! Target record and patch types
//!
//! Records mirror the document-store layout: identity and address
//! fields set at creation time, plus monitoring state that is mutated
//! exclusively through reconciliation patches.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::outage::{MonitorState, TargetStatus};
use crate::HealthReport;

/// A monitored server, polled through its private agent endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerRecord {
    pub id: Uuid,
    pub name: String,
    pub host: String,
    pub port: u16,
    pub api_key: String,

    pub status: TargetStatus,
    pub last_checked_at: Option<DateTime<Utc>>,
    pub down_since: Option<DateTime<Utc>>,
    pub alert_sent: bool,

    /// Last successful health sample. Retained (stale) while the
    /// server is down; `status` tells consumers whether it is current.
    pub metrics: Option<HealthReport>,
}

impl ServerRecord {
    pub fn new(
        name: impl Into<String>,
        host: impl Into<String>,
        port: u16,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            host: host.into(),
            port,
            api_key: api_key.into(),
            status: TargetStatus::Unknown,
            last_checked_at: None,
            down_since: None,
            alert_sent: false,
            metrics: None,
        }
    }

    /// The agent endpoint probed for this server.
    pub fn health_url(&self) -> String {
        format!("http://{}:{}/health", self.host, self.port)
    }

    /// "host:port", used in alerts and snapshot rows.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn monitor_state(&self) -> MonitorState {
        MonitorState {
            status: self.status,
            down_since: self.down_since,
            alert_sent: self.alert_sent,
        }
    }
}

/// A monitored website, polled via its public URL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebsiteRecord {
    pub id: Uuid,
    pub url: String,
    pub display: Option<String>,

    pub status: TargetStatus,
    pub last_checked_at: Option<DateTime<Utc>>,
    pub down_since: Option<DateTime<Utc>>,
    pub alert_sent: bool,

    /// Last successful response latency. Stale while down.
    pub latency_ms: Option<u64>,
}

impl WebsiteRecord {
    pub fn new(url: impl Into<String>, display: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            url: url.into(),
            display,
            status: TargetStatus::Unknown,
            last_checked_at: None,
            down_since: None,
            alert_sent: false,
            latency_ms: None,
        }
    }

    pub fn display_name(&self) -> String {
        self.display.clone().unwrap_or_else(|| self.url.clone())
    }

    pub fn monitor_state(&self) -> MonitorState {
        MonitorState {
            status: self.status,
            down_since: self.down_since,
            alert_sent: self.alert_sent,
        }
    }
}

/// Partial update for a server record.
///
/// `None` fields are left untouched. `down_since` is double-optional
/// so a patch can distinguish "leave as is" from "clear the streak".
#[derive(Debug, Clone, Default)]
pub struct ServerPatch {
    pub status: Option<TargetStatus>,
    pub last_checked_at: Option<DateTime<Utc>>,
    pub down_since: Option<Option<DateTime<Utc>>>,
    pub alert_sent: Option<bool>,
    pub metrics: Option<HealthReport>,
}

impl ServerPatch {
    /// Patch carrying a full reconciliation outcome.
    pub fn from_state(state: &MonitorState, now: DateTime<Utc>) -> Self {
        Self {
            status: Some(state.status),
            last_checked_at: Some(now),
            down_since: Some(state.down_since),
            alert_sent: Some(state.alert_sent),
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, metrics: HealthReport) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Patch flipping only the alert bookkeeping bit.
    pub fn alert_sent(sent: bool) -> Self {
        Self {
            alert_sent: Some(sent),
            ..Self::default()
        }
    }
}

/// Partial update for a website record.
#[derive(Debug, Clone, Default)]
pub struct WebsitePatch {
    pub status: Option<TargetStatus>,
    pub last_checked_at: Option<DateTime<Utc>>,
    pub down_since: Option<Option<DateTime<Utc>>>,
    pub alert_sent: Option<bool>,
    pub latency_ms: Option<u64>,
}

impl WebsitePatch {
    pub fn from_state(state: &MonitorState, now: DateTime<Utc>) -> Self {
        Self {
            status: Some(state.status),
            last_checked_at: Some(now),
            down_since: Some(state.down_since),
            alert_sent: Some(state.alert_sent),
            latency_ms: None,
        }
    }

    pub fn with_latency(mut self, latency_ms: u64) -> Self {
        self.latency_ms = Some(latency_ms);
        self
    }

    pub fn alert_sent(sent: bool) -> Self {
        Self {
            alert_sent: Some(sent),
            ..Self::default()
        }
    }
}

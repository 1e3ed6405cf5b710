//! Message types for the monitoring actors
//!
//! Commands travel over per-actor mpsc channels; snapshots fan out on
//! a broadcast channel. Everything broadcast is cloneable so multiple
//! subscribers (WebSocket clients, tests) can consume independently.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::oneshot;
use uuid::Uuid;

use crate::outage::TargetStatus;
use crate::TargetKind;

/// One row of a per-tick snapshot.
///
/// Metrics carried by a row are display-ready (GB, percentages); raw
/// bytes stay in the store and on the agent wire.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum SnapshotRow {
    Server(ServerRow),
    Website(WebsiteRow),
}

impl SnapshotRow {
    pub fn status(&self) -> TargetStatus {
        match self {
            SnapshotRow::Server(row) => row.status,
            SnapshotRow::Website(row) => row.status,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            SnapshotRow::Server(row) => row.error.as_deref(),
            SnapshotRow::Website(row) => row.error.as_deref(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ServerRow {
    pub id: Uuid,
    pub name: String,
    pub address: String,
    pub status: TargetStatus,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpu: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mem_used_gb: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mem_total_gb: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mem_usage_percent: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disk_used_gb: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disk_total_gb: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disk_usage_percent: Option<f64>,

    /// Probe failure reason, present only when the probe failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    pub last_checked_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct WebsiteRow {
    pub id: Uuid,
    pub url: String,
    pub name: String,
    pub status: TargetStatus,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    pub last_checked_at: DateTime<Utc>,
}

/// Aggregate result of one sweep, published once per tick.
#[derive(Debug, Clone, Serialize)]
pub struct SnapshotEvent {
    pub kind: TargetKind,
    pub rows: Vec<SnapshotRow>,
    pub timestamp: DateTime<Utc>,
}

impl SnapshotEvent {
    /// Event name used on the live-update channel.
    pub fn event_name(&self) -> &'static str {
        self.kind.event_name()
    }
}

/// Result of an on-demand sweep.
#[derive(Debug, Clone)]
pub enum SweepReport {
    /// No targets of this kind are registered. Not an error: the API
    /// layer turns this into an explicit "no targets" response.
    NoTargets,

    Rows(Vec<SnapshotRow>),
}

/// Commands accepted by a [`MonitorActor`](super::monitor::MonitorActor).
#[derive(Debug)]
pub enum MonitorCommand {
    /// Run a sweep now, outside the tick cadence. The sweep reconciles
    /// and persists exactly like a scheduled tick but suppresses
    /// notifications and returns the rows instead of publishing them.
    CheckNow {
        respond_to: oneshot::Sender<anyhow::Result<SweepReport>>,
    },

    /// Change the tick interval; takes effect immediately.
    UpdateInterval { interval_secs: u64 },

    /// Finish the in-flight sweep (if any) and exit.
    Shutdown,
}

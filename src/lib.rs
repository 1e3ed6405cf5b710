pub mod actors;
pub mod api;
pub mod config;
pub mod notify;
pub mod outage;
pub mod probe;
pub mod store;
pub mod util;

use serde::{Deserialize, Serialize};

/// Health sample reported by the agent's `/health` endpoint.
///
/// Memory and disk values are raw bytes, exactly as reported by the
/// agent. Unit conversion (GB, percentages) happens at the snapshot
/// layer so the wire contract stays round-trippable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthReport {
    pub cpu: f64,
    pub mem_used: u64,
    pub mem_total: u64,
    pub disk_used: u64,
    pub disk_total: u64,
}

impl HealthReport {
    /// Memory usage as a percentage of total, `None` if total is zero.
    pub fn memory_usage_percent(&self) -> Option<f64> {
        crate::util::usage_percent(self.mem_used, self.mem_total)
    }

    /// Disk usage as a percentage of total, `None` if total is zero.
    pub fn disk_usage_percent(&self) -> Option<f64> {
        crate::util::usage_percent(self.disk_used, self.disk_total)
    }
}

/// The two kinds of monitored targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetKind {
    Server,
    Website,
}

impl TargetKind {
    /// Event name used when publishing snapshots for this kind.
    pub fn event_name(&self) -> &'static str {
        match self {
            TargetKind::Server => "servers_update",
            TargetKind::Website => "websites_update",
        }
    }
}

impl std::fmt::Display for TargetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TargetKind::Server => write!(f, "server"),
            TargetKind::Website => write!(f, "website"),
        }
    }
}

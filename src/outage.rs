//! Outage tracking state machine
//!
//! `reconcile` is the single place where a probe result is turned into
//! the next persisted monitoring state and a notification decision. It
//! is a pure function of (previous state, probe result, now): all I/O
//! (persistence, notification dispatch) belongs to the caller.
//!
//! ## Two-phase alerting
//!
//! ```text
//! probe ok                      → Up, streak cleared, never notify
//! probe failed, was Up/Unknown  → Down, streak starts now, no notify
//! probe failed, was Down        → Down; notify once when the streak
//!                                 has lasted the confirmation window
//!                                 and no alert went out yet
//! ```
//!
//! A single dropped probe therefore never pages anyone, a sustained
//! outage pages exactly once, and a failed dispatch is retried on the
//! next confirmed tick because `alert_sent` only flips after the
//! notifier reports success.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Current status of a monitored target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TargetStatus {
    /// No probe has completed yet.
    Unknown,
    Up,
    Down,
}

impl TargetStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetStatus::Unknown => "UNKNOWN",
            TargetStatus::Up => "UP",
            TargetStatus::Down => "DOWN",
        }
    }
}

impl std::fmt::Display for TargetStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Default confirmation window: a target must be continuously down for
/// this long before an alert may fire.
pub const DOWN_CONFIRMATION_MS: i64 = 2 * 60 * 1000;

/// The tracker-owned slice of a target record.
///
/// Invariants:
/// - `down_since` is `Some` iff `status == Down`, and marks the first
///   failed probe of the current unbroken streak.
/// - `alert_sent` may only be true while `down_since` is `Some`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonitorState {
    pub status: TargetStatus,
    pub down_since: Option<DateTime<Utc>>,
    pub alert_sent: bool,
}

impl MonitorState {
    /// State of a target that has never been probed.
    pub fn unknown() -> Self {
        Self {
            status: TargetStatus::Unknown,
            down_since: None,
            alert_sent: false,
        }
    }
}

impl Default for MonitorState {
    fn default() -> Self {
        Self::unknown()
    }
}

/// Outcome of one reconciliation step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reconciliation {
    /// The state to persist for this target.
    pub next: MonitorState,

    /// Whether the caller should dispatch a down-alert now.
    ///
    /// If dispatch succeeds the caller persists `alert_sent = true`;
    /// if it fails, `alert_sent` stays false and the next tick retries.
    pub should_notify: bool,
}

/// Reconcile a probe result against the last persisted state.
///
/// Pure and idempotent: identical inputs always yield an identical
/// decision. `window` is the confirmation window for the target's kind.
pub fn reconcile(
    prev: &MonitorState,
    probe_ok: bool,
    now: DateTime<Utc>,
    window: Duration,
) -> Reconciliation {
    if probe_ok {
        // Any success ends the streak, whatever came before.
        return Reconciliation {
            next: MonitorState {
                status: TargetStatus::Up,
                down_since: None,
                alert_sent: false,
            },
            should_notify: false,
        };
    }

    match (prev.status, prev.down_since) {
        // Continuing outage: notify once the streak is old enough.
        (TargetStatus::Down, Some(down_since)) => {
            let down_for = now - down_since;
            let should_notify = !prev.alert_sent && down_for >= window;

            Reconciliation {
                next: MonitorState {
                    status: TargetStatus::Down,
                    down_since: Some(down_since),
                    alert_sent: prev.alert_sent,
                },
                should_notify,
            }
        }

        // First failure (or a Down record missing its streak start,
        // which older data may contain): start the streak, stay quiet.
        _ => Reconciliation {
            next: MonitorState {
                status: TargetStatus::Down,
                down_since: Some(now),
                alert_sent: false,
            },
            should_notify: false,
        },
    }
}

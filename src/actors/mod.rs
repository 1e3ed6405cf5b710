//! Actor-based monitoring pipeline
//!
//! Each target kind gets one monitor actor running as an independent
//! async task, communicating via Tokio channels.
//!
//! ```text
//!        ┌───────────────────┐      ┌────────────────────┐
//!        │ MonitorActor      │      │ MonitorActor       │
//!        │ (servers, 10s)    │      │ (websites, 10s)    │
//!        └─────────┬─────────┘      └──────────┬─────────┘
//!                  │  SnapshotEvent            │
//!                  └──────────┬────────────────┘
//!                             ▼
//!                  ┌────────────────────┐
//!                  │ broadcast channel  │──► WebSocket clients
//!                  └────────────────────┘
//! ```
//!
//! Commands (CheckNow, UpdateInterval, Shutdown) arrive on a per-actor
//! mpsc channel; the API layer drives on-demand sweeps through
//! [`monitor::MonitorHandle::check_now`].

pub mod messages;
pub mod monitor;

pub use messages::{SnapshotEvent, SnapshotRow, SweepReport};
pub use monitor::{MonitorActor, MonitorHandle, SweepMode};

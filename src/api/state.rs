//! API shared state
//!
//! Everything the handlers need is injected here at construction:
//! the target store, the two monitor handles, and the snapshot
//! broadcast sender for WebSocket streaming. No module globals.

use std::sync::Arc;

use tokio::sync::broadcast;

use crate::actors::{MonitorHandle, SnapshotEvent};
use crate::store::TargetStore;

/// Shared state passed to all API handlers
#[derive(Clone)]
pub struct ApiState {
    /// Target store for CRUD routes
    pub store: Arc<dyn TargetStore>,

    /// Handle to the server-kind monitor (on-demand sweeps)
    pub server_monitor: MonitorHandle,

    /// Handle to the website-kind monitor
    pub website_monitor: MonitorHandle,

    /// Broadcast sender for snapshot events (WebSocket streaming)
    pub snapshot_tx: broadcast::Sender<SnapshotEvent>,
}

impl ApiState {
    pub fn new(
        store: Arc<dyn TargetStore>,
        server_monitor: MonitorHandle,
        website_monitor: MonitorHandle,
        snapshot_tx: broadcast::Sender<SnapshotEvent>,
    ) -> Self {
        Self {
            store,
            server_monitor,
            website_monitor,
            snapshot_tx,
        }
    }
}

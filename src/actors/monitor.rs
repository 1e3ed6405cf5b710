//! MonitorActor - periodic sweep driver for one target kind
//!
//! One actor per kind (servers, websites), each on its own timer. A
//! sweep lists the kind's targets, fans probes out with bounded
//! concurrency, feeds every result through the outage tracker,
//! persists the decision, conditionally notifies, and collects one
//! snapshot row per target. Scheduled sweeps publish the snapshot on
//! the injected broadcast channel; on-demand sweeps return it to the
//! caller and suppress notifications. Both paths share the same sweep
//! function, so reconciliation decisions are identical.
//!
//! Ticks for one kind never interleave: the select loop awaits the
//! whole sweep before the ticker can fire again, which serializes the
//! read-modify-write cycle per target.
//!
//! ## Message Flow
//!
//! ```text
//! Timer tick → list targets → probe fan-out → reconcile → persist
//!            → notify (if confirmed) → publish SnapshotEvent
//!     ↑
//!     └─── Commands (CheckNow, UpdateInterval, Shutdown)
//! ```

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Utc;
use futures::StreamExt;
use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::time::{interval_at, Instant};
use tracing::{debug, error, instrument, trace, warn};

use crate::config::MonitoringConfig;
use crate::notify::{Notifier, TargetDisplay};
use crate::outage::reconcile;
use crate::probe::{ProbeClient, ProbeOutcome};
use crate::store::{ServerPatch, ServerRecord, TargetStore, WebsitePatch, WebsiteRecord};
use crate::util::bytes_to_gb;
use crate::TargetKind;

use super::messages::{MonitorCommand, ServerRow, SnapshotEvent, SnapshotRow, SweepReport, WebsiteRow};

/// Whether a sweep runs on the tick cadence or on demand.
///
/// The only behavioral differences are the output sink and whether
/// notification is permitted to fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepMode {
    /// Periodic tick: publish the snapshot, allow notifications.
    Scheduled,

    /// API-triggered: return the snapshot, suppress notifications.
    OnDemand,
}

impl SweepMode {
    fn allows_notify(&self) -> bool {
        matches!(self, SweepMode::Scheduled)
    }
}

/// Actor sweeping all targets of one kind.
pub struct MonitorActor {
    kind: TargetKind,
    store: Arc<dyn TargetStore>,
    probes: ProbeClient,
    notifier: Arc<dyn Notifier>,

    /// Snapshot sink for scheduled sweeps; injected, never global.
    snapshot_tx: broadcast::Sender<SnapshotEvent>,

    command_rx: mpsc::Receiver<MonitorCommand>,

    interval_duration: Duration,
    window: chrono::Duration,
    concurrency: usize,
}

impl MonitorActor {
    pub fn new(
        kind: TargetKind,
        config: &MonitoringConfig,
        store: Arc<dyn TargetStore>,
        notifier: Arc<dyn Notifier>,
        command_rx: mpsc::Receiver<MonitorCommand>,
        snapshot_tx: broadcast::Sender<SnapshotEvent>,
    ) -> Self {
        Self {
            kind,
            store,
            probes: ProbeClient::new(),
            notifier,
            snapshot_tx,
            command_rx,
            interval_duration: Duration::from_secs(config.interval_secs),
            window: config.confirmation_window(kind),
            concurrency: config.max_concurrent_probes.max(1),
        }
    }

    /// Run the actor's main loop until shutdown.
    #[instrument(skip(self), fields(kind = %self.kind))]
    pub async fn run(mut self) {
        debug!("starting monitor actor");

        // Cron cadence: first sweep after one full interval, not at
        // spawn time.
        let mut ticker = interval_at(
            Instant::now() + self.interval_duration,
            self.interval_duration,
        );

        loop {
            tokio::select! {
                // Timer tick: sweep and publish.
                _ = ticker.tick() => {
                    match self.sweep(SweepMode::Scheduled).await {
                        Ok(SweepReport::Rows(rows)) => self.publish(rows),
                        Ok(SweepReport::NoTargets) => {
                            trace!("no targets registered, skipping publish");
                        }
                        // Listing failed; next tick is attempted
                        // independently.
                        Err(e) => error!("tick failed: {:#}", e),
                    }
                }

                // Handle commands
                Some(cmd) = self.command_rx.recv() => {
                    match cmd {
                        MonitorCommand::CheckNow { respond_to } => {
                            debug!("received CheckNow command");
                            let result = self.sweep(SweepMode::OnDemand).await;
                            let _ = respond_to.send(result);
                        }

                        MonitorCommand::UpdateInterval { interval_secs } => {
                            debug!("updating interval to {interval_secs}s");
                            self.interval_duration = Duration::from_secs(interval_secs);
                            ticker = interval_at(
                                Instant::now() + self.interval_duration,
                                self.interval_duration,
                            );
                        }

                        MonitorCommand::Shutdown => {
                            debug!("received shutdown command");
                            break;
                        }
                    }
                }

                // Command channel closed - exit
                else => {
                    warn!("command channel closed, shutting down");
                    break;
                }
            }
        }

        debug!("monitor actor stopped");
    }

    fn publish(&self, rows: Vec<SnapshotRow>) {
        let event = SnapshotEvent {
            kind: self.kind,
            rows,
            timestamp: Utc::now(),
        };

        // Fire-and-forget: no subscribers is fine, laggy subscribers
        // drop ticks.
        match self.snapshot_tx.send(event) {
            Ok(receivers) => trace!("published snapshot to {receivers} receivers"),
            Err(_) => trace!("no snapshot receivers"),
        }
    }

    /// Run one sweep over every target of this kind.
    ///
    /// Only a failure to *list* targets surfaces as an error; every
    /// per-target failure is folded into that target's row.
    #[instrument(skip(self), fields(kind = %self.kind))]
    async fn sweep(&self, mode: SweepMode) -> Result<SweepReport> {
        match self.kind {
            TargetKind::Server => self.sweep_servers(mode).await,
            TargetKind::Website => self.sweep_websites(mode).await,
        }
    }

    async fn sweep_servers(&self, mode: SweepMode) -> Result<SweepReport> {
        let servers = self
            .store
            .list_servers()
            .await
            .context("failed to list servers")?;

        if servers.is_empty() {
            return Ok(SweepReport::NoTargets);
        }

        trace!("sweeping {} servers", servers.len());

        let rows = futures::stream::iter(servers)
            .map(|record| self.process_server(record, mode))
            .buffer_unordered(self.concurrency)
            .collect::<Vec<_>>()
            .await;

        Ok(SweepReport::Rows(rows))
    }

    async fn sweep_websites(&self, mode: SweepMode) -> Result<SweepReport> {
        let websites = self
            .store
            .list_websites()
            .await
            .context("failed to list websites")?;

        if websites.is_empty() {
            return Ok(SweepReport::NoTargets);
        }

        trace!("sweeping {} websites", websites.len());

        let rows = futures::stream::iter(websites)
            .map(|record| self.process_website(record, mode))
            .buffer_unordered(self.concurrency)
            .collect::<Vec<_>>()
            .await;

        Ok(SweepReport::Rows(rows))
    }

    /// Probe, reconcile, persist and (maybe) notify for one server.
    async fn process_server(&self, record: ServerRecord, mode: SweepMode) -> SnapshotRow {
        let outcome = self.probes.probe_server(&record).await;
        let now = Utc::now();

        let decision = reconcile(&record.monitor_state(), outcome.is_up(), now, self.window);

        let mut patch = ServerPatch::from_state(&decision.next, now);
        if let ProbeOutcome::Up(report) = &outcome {
            patch = patch.with_metrics(report.clone());
        }

        // A write failure isolates to this target; the row still
        // reflects the reconciliation decision.
        if let Err(e) = self.store.update_server(record.id, patch).await {
            error!("failed to persist update for server {}: {e}", record.name);
        }

        if decision.should_notify && mode.allows_notify() {
            self.notify_server(&record).await;
        }

        let address = record.address();
        let row = match outcome {
            ProbeOutcome::Up(report) => ServerRow {
                id: record.id,
                name: record.name,
                address,
                status: decision.next.status,
                cpu: Some(report.cpu),
                mem_used_gb: Some(bytes_to_gb(report.mem_used)),
                mem_total_gb: Some(bytes_to_gb(report.mem_total)),
                mem_usage_percent: report.memory_usage_percent(),
                disk_used_gb: Some(bytes_to_gb(report.disk_used)),
                disk_total_gb: Some(bytes_to_gb(report.disk_total)),
                disk_usage_percent: report.disk_usage_percent(),
                error: None,
                last_checked_at: now,
            },
            ProbeOutcome::Down(reason) => ServerRow {
                id: record.id,
                name: record.name,
                address,
                status: decision.next.status,
                cpu: None,
                mem_used_gb: None,
                mem_total_gb: None,
                mem_usage_percent: None,
                disk_used_gb: None,
                disk_total_gb: None,
                disk_usage_percent: None,
                error: Some(reason),
                last_checked_at: now,
            },
        };

        SnapshotRow::Server(row)
    }

    /// Probe, reconcile, persist and (maybe) notify for one website.
    async fn process_website(&self, record: WebsiteRecord, mode: SweepMode) -> SnapshotRow {
        let outcome = self.probes.probe_website(&record).await;
        let now = Utc::now();

        let decision = reconcile(&record.monitor_state(), outcome.is_up(), now, self.window);

        let mut patch = WebsitePatch::from_state(&decision.next, now);
        if let ProbeOutcome::Up(probe) = &outcome {
            patch = patch.with_latency(probe.latency_ms);
        }

        if let Err(e) = self.store.update_website(record.id, patch).await {
            error!("failed to persist update for website {}: {e}", record.url);
        }

        if decision.should_notify && mode.allows_notify() {
            self.notify_website(&record).await;
        }

        let row = match outcome {
            ProbeOutcome::Up(probe) => WebsiteRow {
                id: record.id,
                url: record.url.clone(),
                name: record.display_name(),
                status: decision.next.status,
                latency_ms: Some(probe.latency_ms),
                error: None,
                last_checked_at: now,
            },
            ProbeOutcome::Down(reason) => WebsiteRow {
                id: record.id,
                url: record.url.clone(),
                name: record.display_name(),
                status: decision.next.status,
                latency_ms: None,
                error: Some(reason),
                last_checked_at: now,
            },
        };

        SnapshotRow::Website(row)
    }

    /// Dispatch a confirmed server outage; mark the streak paged only
    /// if dispatch succeeded, so a failed send retries next tick.
    async fn notify_server(&self, record: &ServerRecord) {
        let display = TargetDisplay {
            name: record.name.clone(),
            address: record.address(),
        };

        if self
            .notifier
            .send_down_alert(TargetKind::Server, &display)
            .await
        {
            if let Err(e) = self
                .store
                .update_server(record.id, ServerPatch::alert_sent(true))
                .await
            {
                error!("failed to record alert for server {}: {e}", record.name);
            }
        } else {
            warn!(
                "down-alert for server {} not dispatched, retrying next tick",
                record.name
            );
        }
    }

    async fn notify_website(&self, record: &WebsiteRecord) {
        let display = TargetDisplay {
            name: record.display_name(),
            address: record.url.clone(),
        };

        if self
            .notifier
            .send_down_alert(TargetKind::Website, &display)
            .await
        {
            if let Err(e) = self
                .store
                .update_website(record.id, WebsitePatch::alert_sent(true))
                .await
            {
                error!("failed to record alert for website {}: {e}", record.url);
            }
        } else {
            warn!(
                "down-alert for website {} not dispatched, retrying next tick",
                record.url
            );
        }
    }
}

/// Handle for controlling a [`MonitorActor`]
///
/// Cloneable; the API layer uses it to trigger on-demand sweeps.
#[derive(Clone)]
pub struct MonitorHandle {
    sender: mpsc::Sender<MonitorCommand>,
    kind: TargetKind,
}

impl MonitorHandle {
    /// Spawn a monitor actor for one target kind.
    pub fn spawn(
        kind: TargetKind,
        config: &MonitoringConfig,
        store: Arc<dyn TargetStore>,
        notifier: Arc<dyn Notifier>,
        snapshot_tx: broadcast::Sender<SnapshotEvent>,
    ) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel(32);

        let actor = MonitorActor::new(kind, config, store, notifier, cmd_rx, snapshot_tx);

        tokio::spawn(actor.run());

        Self {
            sender: cmd_tx,
            kind,
        }
    }

    /// Run a sweep immediately, outside the tick cadence.
    ///
    /// Reconciles and persists like a scheduled tick, but suppresses
    /// notifications and returns the snapshot instead of publishing.
    pub async fn check_now(&self) -> Result<SweepReport> {
        let (tx, rx) = oneshot::channel();
        self.sender
            .send(MonitorCommand::CheckNow { respond_to: tx })
            .await
            .context("failed to send CheckNow command")?;

        rx.await.context("failed to receive sweep result")?
    }

    /// Update the tick interval.
    pub async fn update_interval(&self, interval_secs: u64) -> Result<()> {
        self.sender
            .send(MonitorCommand::UpdateInterval { interval_secs })
            .await
            .context("failed to send UpdateInterval command")?;
        Ok(())
    }

    /// Gracefully shut down the monitor.
    pub async fn shutdown(&self) -> Result<()> {
        self.sender
            .send(MonitorCommand::Shutdown)
            .await
            .context("failed to send Shutdown command")?;
        Ok(())
    }

    pub fn kind(&self) -> TargetKind {
        self.kind
    }
}

//! Outbound down-alerts
//!
//! The tracker owns the "send at most once per streak" decision; a
//! notifier only performs the dispatch and reports whether it went
//! out. A `false` return leaves `alert_sent` untouched so the next
//! confirmed tick retries.

use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde_json::json;
use tracing::{error, info, instrument};

use crate::TargetKind;

/// Display fields handed to a notifier for message formatting.
#[derive(Debug, Clone)]
pub struct TargetDisplay {
    pub name: String,
    /// "host:port" for servers, the URL for websites.
    pub address: String,
}

/// Dispatch contract for down-alerts.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Send a down-alert for the given target. Returns true iff the
    /// alert was actually dispatched.
    async fn send_down_alert(&self, kind: TargetKind, target: &TargetDisplay) -> bool;
}

/// Notifier posting a JSON payload to a configured webhook
/// (mail bridge, chat hook, pager endpoint - anything that accepts a
/// POST).
#[derive(Debug, Clone)]
pub struct WebhookNotifier {
    client: Client,
    url: String,
}

impl WebhookNotifier {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            url: url.into(),
        }
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    #[instrument(skip(self))]
    async fn send_down_alert(&self, kind: TargetKind, target: &TargetDisplay) -> bool {
        let message = format!(
            "🚨 {} DOWN: {} ({})",
            kind.to_string().to_uppercase(),
            target.name,
            target.address
        );

        let payload = json!({
            "message": message,
            "kind": kind,
            "name": target.name,
            "address": target.address,
            "timestamp": Utc::now().to_rfc3339(),
        });

        match self.client.post(&self.url).json(&payload).send().await {
            Ok(response) => {
                if response.status().is_success() {
                    info!("dispatched down-alert for {} {}", kind, target.name);
                    true
                } else {
                    error!("down-alert rejected with status {}", response.status());
                    false
                }
            }
            Err(e) => {
                error!("failed to dispatch down-alert: {e}");
                false
            }
        }
    }
}

/// Notifier used when no alert sink is configured.
///
/// Reports success so confirmed outages are not re-dispatched every
/// tick against a sink that will never exist.
#[derive(Debug, Clone, Default)]
pub struct NoopNotifier;

#[async_trait]
impl Notifier for NoopNotifier {
    async fn send_down_alert(&self, kind: TargetKind, target: &TargetDisplay) -> bool {
        tracing::warn!(
            "no notifier configured, dropping down-alert for {} {} ({})",
            kind,
            target.name,
            target.address
        );
        true
    }
}

//! In-memory target store
//!
//! The reference backend: two RwLock'd maps keyed by id. Suitable for
//! a single hub process; everything is lost on restart. Listing
//! returns records in name/url order so snapshots are stable.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::backend::TargetStore;
use super::error::{StoreError, StoreResult};
use super::schema::{ServerPatch, ServerRecord, WebsitePatch, WebsiteRecord};

#[derive(Default)]
pub struct MemoryStore {
    servers: RwLock<HashMap<Uuid, ServerRecord>>,
    websites: RwLock<HashMap<Uuid, WebsiteRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TargetStore for MemoryStore {
    async fn list_servers(&self) -> StoreResult<Vec<ServerRecord>> {
        let servers = self.servers.read().await;
        let mut records: Vec<_> = servers.values().cloned().collect();
        records.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(records)
    }

    async fn list_websites(&self) -> StoreResult<Vec<WebsiteRecord>> {
        let websites = self.websites.read().await;
        let mut records: Vec<_> = websites.values().cloned().collect();
        records.sort_by(|a, b| a.url.cmp(&b.url));
        Ok(records)
    }

    async fn get_server(&self, id: Uuid) -> StoreResult<ServerRecord> {
        let servers = self.servers.read().await;
        servers.get(&id).cloned().ok_or(StoreError::NotFound(id))
    }

    async fn get_website(&self, id: Uuid) -> StoreResult<WebsiteRecord> {
        let websites = self.websites.read().await;
        websites.get(&id).cloned().ok_or(StoreError::NotFound(id))
    }

    async fn insert_server(&self, record: ServerRecord) -> StoreResult<ServerRecord> {
        let mut servers = self.servers.write().await;
        servers.insert(record.id, record.clone());
        Ok(record)
    }

    async fn insert_website(&self, record: WebsiteRecord) -> StoreResult<WebsiteRecord> {
        let mut websites = self.websites.write().await;
        websites.insert(record.id, record.clone());
        Ok(record)
    }

    async fn update_server(&self, id: Uuid, patch: ServerPatch) -> StoreResult<ServerRecord> {
        let mut servers = self.servers.write().await;
        let record = servers.get_mut(&id).ok_or(StoreError::NotFound(id))?;

        if let Some(status) = patch.status {
            record.status = status;
        }
        if let Some(last_checked_at) = patch.last_checked_at {
            record.last_checked_at = Some(last_checked_at);
        }
        if let Some(down_since) = patch.down_since {
            record.down_since = down_since;
        }
        if let Some(alert_sent) = patch.alert_sent {
            record.alert_sent = alert_sent;
        }
        if let Some(metrics) = patch.metrics {
            record.metrics = Some(metrics);
        }

        Ok(record.clone())
    }

    async fn update_website(&self, id: Uuid, patch: WebsitePatch) -> StoreResult<WebsiteRecord> {
        let mut websites = self.websites.write().await;
        let record = websites.get_mut(&id).ok_or(StoreError::NotFound(id))?;

        if let Some(status) = patch.status {
            record.status = status;
        }
        if let Some(last_checked_at) = patch.last_checked_at {
            record.last_checked_at = Some(last_checked_at);
        }
        if let Some(down_since) = patch.down_since {
            record.down_since = down_since;
        }
        if let Some(alert_sent) = patch.alert_sent {
            record.alert_sent = alert_sent;
        }
        if let Some(latency_ms) = patch.latency_ms {
            record.latency_ms = Some(latency_ms);
        }

        Ok(record.clone())
    }

    async fn delete_server(&self, id: Uuid) -> StoreResult<()> {
        let mut servers = self.servers.write().await;
        servers.remove(&id).map(|_| ()).ok_or(StoreError::NotFound(id))
    }

    async fn delete_website(&self, id: Uuid) -> StoreResult<()> {
        let mut websites = self.websites.write().await;
        websites.remove(&id).map(|_| ()).ok_or(StoreError::NotFound(id))
    }
}

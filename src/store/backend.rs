//! Target store trait definition
//!
//! The monitoring core treats persistence abstractly: a document store
//! offering list, get-by-id and partial-update operations per target
//! kind. Backends must support partial updates without rewriting the
//! whole record, so reconciliation writes stay field-exact.

use async_trait::async_trait;
use uuid::Uuid;

use super::error::StoreResult;
use super::schema::{ServerPatch, ServerRecord, WebsitePatch, WebsiteRecord};

/// Trait for target persistence backends
///
/// Implementations must be `Send + Sync`: records are read and written
/// from concurrent per-target reconciliation tasks. The scheduler
/// guarantees that the same record is never patched by two ticks at
/// once, but distinct records are patched concurrently.
#[async_trait]
pub trait TargetStore: Send + Sync {
    /// List every registered server.
    ///
    /// Failure here is tick-fatal for the server kind: without the
    /// list there is nothing to reconcile this tick.
    async fn list_servers(&self) -> StoreResult<Vec<ServerRecord>>;

    /// List every registered website.
    async fn list_websites(&self) -> StoreResult<Vec<WebsiteRecord>>;

    async fn get_server(&self, id: Uuid) -> StoreResult<ServerRecord>;

    async fn get_website(&self, id: Uuid) -> StoreResult<WebsiteRecord>;

    /// Register a new server (created with status Unknown).
    async fn insert_server(&self, record: ServerRecord) -> StoreResult<ServerRecord>;

    /// Register a new website (created with status Unknown).
    async fn insert_website(&self, record: WebsiteRecord) -> StoreResult<WebsiteRecord>;

    /// Apply a partial update; untouched fields keep their values.
    /// Returns the updated record.
    async fn update_server(&self, id: Uuid, patch: ServerPatch) -> StoreResult<ServerRecord>;

    async fn update_website(&self, id: Uuid, patch: WebsitePatch) -> StoreResult<WebsiteRecord>;

    async fn delete_server(&self, id: Uuid) -> StoreResult<()>;

    async fn delete_website(&self, id: Uuid) -> StoreResult<()>;
}

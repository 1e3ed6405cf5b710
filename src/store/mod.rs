//! Target persistence
//!
//! The core treats the store abstractly (see [`TargetStore`]); the
//! shipped backend keeps everything in memory. Swapping in a real
//! document store only means implementing the trait.

pub mod backend;
pub mod error;
pub mod memory;
pub mod schema;

pub use backend::TargetStore;
pub use error::{StoreError, StoreResult};
pub use memory::MemoryStore;
pub use schema::{ServerPatch, ServerRecord, WebsitePatch, WebsiteRecord};

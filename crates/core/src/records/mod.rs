//! Record store - indexed, previously downloaded content.
//!
//! Records are written by an external ingestion process. The resolver only
//! reads them, so the trait exposes lookups and nothing else.

mod sqlite;
mod types;

pub use sqlite::SqliteRecordStore;
pub use types::*;

use async_trait::async_trait;

/// Read-side access to indexed records.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Backend name for logging.
    fn name(&self) -> &str;

    /// Find a completed record by identifier.
    ///
    /// The identifier is matched case-insensitively (stored identifiers are
    /// lowercase). Incomplete records are never returned.
    async fn find_completed(&self, identifier: &str) -> Result<Option<Record>, RecordStoreError>;

    /// List every completed record in store order.
    async fn list_completed(&self) -> Result<Vec<Record>, RecordStoreError>;
}

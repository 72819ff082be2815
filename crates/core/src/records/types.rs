//! Types for the record store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A previously indexed content item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    /// Unique identifier (lowercase info hash).
    pub identifier: String,
    /// Name of the playable file.
    pub file_name: String,
    /// Sub-path of the file on the storage host.
    pub file_path: String,
    /// Human-readable title.
    pub display_name: String,
    /// Whether the content is fully available on the storage host.
    pub completed: bool,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
}

impl Record {
    /// Create an incomplete record stamped with the current time.
    pub fn new(
        identifier: impl Into<String>,
        file_name: impl Into<String>,
        file_path: impl Into<String>,
        display_name: impl Into<String>,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            file_name: file_name.into(),
            file_path: file_path.into(),
            display_name: display_name.into(),
            completed: false,
            created_at: Utc::now(),
        }
    }

    /// Set the completion flag.
    pub fn with_completed(mut self, completed: bool) -> Self {
        self.completed = completed;
        self
    }

    /// Set the creation timestamp.
    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }
}

/// Errors for record store operations.
#[derive(Debug, Error)]
pub enum RecordStoreError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Record already exists: {0}")]
    Duplicate(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

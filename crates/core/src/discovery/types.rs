//! Types for metadata discovery.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while discovering metadata.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),

    #[error("Failed to start discovery session: {0}")]
    SessionInit(String),

    #[error("Swarm error: {0}")]
    Swarm(String),

    #[error("Timed out after {0}s waiting for metadata")]
    Timeout(u64),

    #[error("Invalid metadata: {0}")]
    InvalidMetadata(String),
}

impl DiscoveryError {
    /// Short label for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            DiscoveryError::Timeout(_) => "timeout",
            DiscoveryError::InvalidIdentifier(_) => "invalid_identifier",
            _ => "error",
        }
    }
}

/// A file listed in the swarm's metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoveredFile {
    /// Path within the torrent, `/`-separated.
    pub path: String,
    /// Last path component.
    pub name: String,
    /// Size in bytes.
    pub length: u64,
}

impl DiscoveredFile {
    pub fn new(path: impl Into<String>, length: u64) -> Self {
        let path = path.into();
        let name = path.rsplit('/').next().unwrap_or(&path).to_string();
        Self { path, name, length }
    }
}

/// Metadata learned from the swarm for one identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoveredMetadata {
    /// Display name of the content.
    pub display_name: String,
    /// Name of the largest file (first one wins on ties).
    pub primary_file: String,
    /// Every file in the torrent, in metadata order.
    pub files: Vec<DiscoveredFile>,
}

impl DiscoveredMetadata {
    /// Build metadata from a file listing.
    ///
    /// Falls back to the primary file name when the torrent carries no name.
    pub fn from_files(
        name: Option<String>,
        files: Vec<DiscoveredFile>,
    ) -> Result<Self, DiscoveryError> {
        let mut largest: Option<&DiscoveredFile> = None;
        for file in &files {
            if largest.map_or(true, |current| file.length > current.length) {
                largest = Some(file);
            }
        }

        let primary_file = largest
            .map(|f| f.name.clone())
            .ok_or_else(|| DiscoveryError::InvalidMetadata("torrent lists no files".to_string()))?;

        let display_name = name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| primary_file.clone());

        Ok(Self {
            display_name,
            primary_file,
            files,
        })
    }
}

/// Trait for metadata discovery backends.
#[async_trait]
pub trait MetadataDiscoverer: Send + Sync {
    /// Backend name for logging.
    fn name(&self) -> &str;

    /// Learn the metadata for `identifier` (magnet URI or info hash).
    async fn discover(&self, identifier: &str) -> Result<DiscoveredMetadata, DiscoveryError>;

    /// Release shared resources. Further calls may re-initialize them.
    async fn shutdown(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_name_is_last_component() {
        let file = DiscoveredFile::new("Show/Season 1/episode.mkv", 10);
        assert_eq!(file.name, "episode.mkv");
        assert_eq!(DiscoveredFile::new("single.mkv", 1).name, "single.mkv");
    }

    #[test]
    fn test_primary_file_is_largest() {
        let meta = DiscoveredMetadata::from_files(
            Some("Movie".to_string()),
            vec![
                DiscoveredFile::new("Movie/sample.mkv", 100),
                DiscoveredFile::new("Movie/movie.mkv", 9_000),
                DiscoveredFile::new("Movie/movie.nfo", 2),
            ],
        )
        .unwrap();
        assert_eq!(meta.primary_file, "movie.mkv");
        assert_eq!(meta.display_name, "Movie");
        assert_eq!(meta.files.len(), 3);
    }

    #[test]
    fn test_primary_file_tie_keeps_first() {
        let meta = DiscoveredMetadata::from_files(
            None,
            vec![
                DiscoveredFile::new("a.mkv", 500),
                DiscoveredFile::new("b.mkv", 500),
            ],
        )
        .unwrap();
        assert_eq!(meta.primary_file, "a.mkv");
        assert_eq!(meta.display_name, "a.mkv");
    }

    #[test]
    fn test_empty_listing_is_invalid() {
        let result = DiscoveredMetadata::from_files(Some("x".to_string()), Vec::new());
        assert!(matches!(result, Err(DiscoveryError::InvalidMetadata(_))));
    }

    #[test]
    fn test_error_kind() {
        assert_eq!(DiscoveryError::Timeout(30).kind(), "timeout");
        assert_eq!(DiscoveryError::Swarm("x".into()).kind(), "error");
    }
}

//! Mock metadata discoverer for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::discovery::{DiscoveredMetadata, DiscoveryError, MetadataDiscoverer};

/// Mock implementation of the MetadataDiscoverer trait.
///
/// Identifiers without configured metadata fail as if no peer answered.
#[derive(Debug, Default)]
pub struct MockDiscoverer {
    results: Arc<RwLock<HashMap<String, DiscoveredMetadata>>>,
    calls: Arc<RwLock<Vec<String>>>,
    delay: Arc<RwLock<Option<Duration>>>,
}

impl MockDiscoverer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Metadata returned for `identifier`.
    pub async fn set_metadata(&self, identifier: impl Into<String>, metadata: DiscoveredMetadata) {
        self.results.write().await.insert(identifier.into(), metadata);
    }

    /// Simulated swarm latency applied to every lookup.
    pub async fn set_delay(&self, delay: Duration) {
        *self.delay.write().await = Some(delay);
    }

    /// Identifiers looked up so far.
    pub async fn calls(&self) -> Vec<String> {
        self.calls.read().await.clone()
    }
}

#[async_trait]
impl MetadataDiscoverer for MockDiscoverer {
    fn name(&self) -> &str {
        "mock"
    }

    async fn discover(&self, identifier: &str) -> Result<DiscoveredMetadata, DiscoveryError> {
        self.calls.write().await.push(identifier.to_string());

        let delay = *self.delay.read().await;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        self.results
            .read()
            .await
            .get(identifier)
            .cloned()
            .ok_or_else(|| DiscoveryError::Swarm("no peers furnished metadata".to_string()))
    }
}

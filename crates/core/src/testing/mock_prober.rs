//! Mock URL prober for testing.

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::prober::UrlProber;

/// Mock implementation of the UrlProber trait.
///
/// Only URLs registered with [`set_reachable`](Self::set_reachable) answer;
/// every probe is recorded in call order.
#[derive(Debug, Default)]
pub struct MockUrlProber {
    reachable: Arc<RwLock<HashSet<String>>>,
    probed: Arc<RwLock<Vec<String>>>,
}

impl MockUrlProber {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a URL as serving.
    pub async fn set_reachable(&self, url: impl Into<String>) {
        self.reachable.write().await.insert(url.into());
    }

    /// URLs probed so far.
    pub async fn probed(&self) -> Vec<String> {
        self.probed.read().await.clone()
    }
}

#[async_trait]
impl UrlProber for MockUrlProber {
    async fn is_reachable(&self, url: &str) -> bool {
        self.probed.write().await.push(url.to_string());
        self.reachable.read().await.contains(url)
    }
}

//! The resolution pipeline.

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::urls::{fallback_url, playlist_document, storage_candidates};
use super::{RedirectTarget, Resolution, StreamMode, StreamRequest};
use crate::config::ResolverConfig;
use crate::discovery::MetadataDiscoverer;
use crate::matcher;
use crate::metrics::{MATCH_SCORE, RESOLUTIONS_TOTAL};
use crate::prober::UrlProber;
use crate::records::{Record, RecordStore};

/// Resolves stream requests against the record store, the swarm and the
/// storage host, degrading to the fallback mirror whenever a step comes up
/// empty.
pub struct StreamResolver {
    config: ResolverConfig,
    store: Arc<dyn RecordStore>,
    prober: Arc<dyn UrlProber>,
    discoverer: Option<Arc<dyn MetadataDiscoverer>>,
}

impl StreamResolver {
    pub fn new(
        config: ResolverConfig,
        store: Arc<dyn RecordStore>,
        prober: Arc<dyn UrlProber>,
    ) -> Self {
        Self {
            config,
            store,
            prober,
            discoverer: None,
        }
    }

    /// Enable swarm discovery for lookup misses.
    pub fn with_discoverer(mut self, discoverer: Arc<dyn MetadataDiscoverer>) -> Self {
        self.discoverer = Some(discoverer);
        self
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Produce the outcome for one request. Never fails: every problem along
    /// the way degrades to the fallback mirror.
    pub async fn resolve(&self, request: &StreamRequest) -> Resolution {
        let resolution = match request.mode {
            // The playlist entry hits the play endpoint, which resolves on its own.
            StreamMode::Playlist => Resolution::Playlist(playlist_document(
                &self.config.direct_play_base_url,
                &request.link,
                request.index.as_deref(),
            )),
            StreamMode::Preload => match self.find_record(&request.link).await {
                Some(record) => Resolution::Available(record),
                None => self.fallback(request),
            },
            StreamMode::Play => match self.find_record(&request.link).await {
                Some(record) => match self.validate_storage(&record).await {
                    Some(location) => Resolution::Redirect {
                        location,
                        target: RedirectTarget::Storage,
                    },
                    None => self.fallback(request),
                },
                None => self.fallback(request),
            },
        };

        RESOLUTIONS_TOTAL
            .with_label_values(&[request.mode.as_str(), resolution.outcome()])
            .inc();
        info!(
            link = %request.link,
            mode = request.mode.as_str(),
            outcome = resolution.outcome(),
            "Stream resolved"
        );

        resolution
    }

    /// Find the record for a link: exact lookup first, then a fuzzy match on
    /// the title learned from the swarm.
    pub async fn find_record(&self, link: &str) -> Option<Record> {
        match self.store.find_completed(link).await {
            Ok(Some(record)) => return Some(record),
            Ok(None) => debug!(link = %link, "No completed record"),
            Err(e) => warn!(link = %link, error = %e, "Record lookup failed"),
        }

        self.match_discovered(link).await
    }

    async fn match_discovered(&self, link: &str) -> Option<Record> {
        let discoverer = self.discoverer.as_ref()?;

        let metadata = match discoverer.discover(link).await {
            Ok(metadata) => metadata,
            Err(e) => {
                warn!(link = %link, backend = discoverer.name(), error = %e, "Discovery failed");
                return None;
            }
        };

        let records = match self.store.list_completed().await {
            Ok(records) => records,
            Err(e) => {
                warn!(link = %link, error = %e, "Listing records for matching failed");
                return None;
            }
        };

        let best = matcher::best_match(
            &metadata.display_name,
            &records,
            self.config.similarity_threshold,
        );

        match best {
            Some(scored) => {
                MATCH_SCORE.with_label_values(&[]).observe(scored.score);
                info!(
                    link = %link,
                    title = %metadata.display_name,
                    matched = %scored.record.identifier,
                    score = scored.score,
                    "Matched discovered title to record"
                );
                Some(scored.record)
            }
            None => {
                debug!(link = %link, title = %metadata.display_name, "No record matched discovered title");
                None
            }
        }
    }

    /// First storage URL that answers a probe, in preference order.
    async fn validate_storage(&self, record: &Record) -> Option<String> {
        for candidate in storage_candidates(&self.config.storage_base_url, record) {
            if self.prober.is_reachable(&candidate).await {
                return Some(candidate);
            }
            debug!(url = %candidate, "Storage candidate unreachable");
        }
        None
    }

    fn fallback(&self, request: &StreamRequest) -> Resolution {
        Resolution::Redirect {
            location: fallback_url(
                &self.config.fallback_base_url,
                &request.link,
                request.index.as_deref(),
                request.mode.fallback_marker(),
            ),
            target: RedirectTarget::Fallback,
        }
    }
}

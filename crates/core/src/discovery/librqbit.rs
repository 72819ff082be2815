//! librqbit-backed metadata discovery.

use std::ops::Range;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use librqbit::{AddTorrent, AddTorrentOptions, AddTorrentResponse, Session, SessionOptions};
use librqbit_core::torrent_metainfo::TorrentMetaV1Info;
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

use super::{
    magnet_for, DiscoveredFile, DiscoveredMetadata, DiscoveryError, MetadataDiscoverer,
};
use crate::config::DiscoveryConfig;
use crate::metrics::{DISCOVERY_ATTEMPTS, DISCOVERY_DURATION};

/// Metadata discoverer backed by an embedded librqbit session.
///
/// The session is created on first use and shared by every lookup. Lookups
/// use list-only adds, so the session never manages a torrent and nothing is
/// downloaded.
pub struct LibrqbitDiscoverer {
    config: DiscoveryConfig,
    session: OnceCell<Arc<Session>>,
}

impl LibrqbitDiscoverer {
    pub fn new(config: DiscoveryConfig) -> Self {
        Self {
            config,
            session: OnceCell::new(),
        }
    }

    /// Get the shared session, starting it if this is the first lookup.
    async fn session(&self) -> Result<&Arc<Session>, DiscoveryError> {
        self.session
            .get_or_try_init(|| async {
                let session_dir = PathBuf::from(&self.config.session_dir);
                if !session_dir.exists() {
                    std::fs::create_dir_all(&session_dir).map_err(|e| {
                        DiscoveryError::SessionInit(format!(
                            "Failed to create session directory: {}",
                            e
                        ))
                    })?;
                }

                let mut opts = SessionOptions::default();
                if !self.config.enable_dht {
                    opts.disable_dht = true;
                }
                if let Some(port) = self.config.listen_port {
                    opts.listen_port_range = Some(listen_range(port)?);
                }

                info!(
                    session_dir = %session_dir.display(),
                    dht_enabled = !opts.disable_dht,
                    "Initializing discovery session"
                );

                Session::new_with_opts(session_dir, opts)
                    .await
                    .map_err(|e| DiscoveryError::SessionInit(e.to_string()))
            })
            .await
    }

    async fn lookup(&self, identifier: &str) -> Result<DiscoveredMetadata, DiscoveryError> {
        let magnet = magnet_for(identifier, &self.config.trackers)?;
        let session = self.session().await?;

        let opts = AddTorrentOptions {
            list_only: true,
            ..Default::default()
        };

        let add_future = session.add_torrent(AddTorrent::from_url(&magnet), Some(opts));
        let response = tokio::time::timeout(
            Duration::from_secs(self.config.timeout_secs),
            add_future,
        )
        .await
        .map_err(|_| DiscoveryError::Timeout(self.config.timeout_secs))?
        .map_err(|e| DiscoveryError::Swarm(e.to_string()))?;

        match response {
            AddTorrentResponse::ListOnly(listing) => metadata_from_info(&listing.info),
            AddTorrentResponse::Added(id, _) => {
                // Only happens if list-only was ignored; do not keep the swarm.
                warn!(identifier = %identifier, "Discovery add was not list-only, removing");
                if let Err(e) = session.delete(id.into(), true).await {
                    warn!(identifier = %identifier, error = %e, "Failed to remove torrent");
                }
                Err(DiscoveryError::Swarm(
                    "torrent was added instead of listed".to_string(),
                ))
            }
            AddTorrentResponse::AlreadyManaged(_, _) => Err(DiscoveryError::Swarm(
                "torrent is already managed by the discovery session".to_string(),
            )),
        }
    }
}

/// Single-port range for the session listener.
fn listen_range(port: u16) -> Result<Range<u16>, DiscoveryError> {
    let end = port.checked_add(1).ok_or_else(|| {
        DiscoveryError::SessionInit(format!("listen port {} leaves no room for a range", port))
    })?;
    Ok(port..end)
}

/// Extract name and file listing from torrent info. BEP-47 padding files are skipped.
fn metadata_from_info<B: AsRef<[u8]>>(
    info: &TorrentMetaV1Info<B>,
) -> Result<DiscoveredMetadata, DiscoveryError> {
    let name = info
        .name
        .as_ref()
        .map(|n| String::from_utf8_lossy(n.as_ref()).into_owned());

    let mut files = Vec::new();
    for details in info
        .iter_file_details()
        .map_err(|e| DiscoveryError::InvalidMetadata(e.to_string()))?
    {
        if details.attrs().padding {
            continue;
        }
        let parts = details
            .filename
            .to_vec()
            .map_err(|e| DiscoveryError::InvalidMetadata(e.to_string()))?;
        files.push(DiscoveredFile::new(parts.join("/"), details.len));
    }

    DiscoveredMetadata::from_files(name, files)
}

#[async_trait]
impl MetadataDiscoverer for LibrqbitDiscoverer {
    fn name(&self) -> &str {
        "librqbit"
    }

    async fn discover(&self, identifier: &str) -> Result<DiscoveredMetadata, DiscoveryError> {
        let start = Instant::now();
        let result = self.lookup(identifier).await;

        let label = match &result {
            Ok(_) => "success",
            Err(e) => e.kind(),
        };
        DISCOVERY_ATTEMPTS.with_label_values(&[label]).inc();
        DISCOVERY_DURATION
            .with_label_values(&[label])
            .observe(start.elapsed().as_secs_f64());

        match &result {
            Ok(meta) => debug!(
                identifier = %identifier,
                display_name = %meta.display_name,
                files = meta.files.len(),
                "Metadata discovered"
            ),
            Err(e) => debug!(identifier = %identifier, error = %e, "Metadata discovery failed"),
        }

        result
    }

    async fn shutdown(&self) {
        if let Some(session) = self.session.get() {
            info!("Stopping discovery session");
            session.stop().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use librqbit_core::torrent_metainfo::TorrentMetaV1File;

    fn offline_config() -> DiscoveryConfig {
        DiscoveryConfig {
            enable_dht: false,
            timeout_secs: 1,
            session_dir: std::env::temp_dir()
                .join("hashgate-discovery-test")
                .display()
                .to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_invalid_identifier_fails_without_session() {
        let discoverer = LibrqbitDiscoverer::new(offline_config());
        let result = discoverer.discover("definitely not a hash").await;
        assert!(matches!(result, Err(DiscoveryError::InvalidIdentifier(_))));
        assert!(discoverer.session.get().is_none());
    }

    #[test]
    fn test_backend_name() {
        let discoverer = LibrqbitDiscoverer::new(offline_config());
        assert_eq!(discoverer.name(), "librqbit");
    }

    fn file(path: &[&str], length: u64, attr: Option<&str>) -> TorrentMetaV1File<Vec<u8>> {
        TorrentMetaV1File {
            length,
            path: path.iter().map(|p| p.as_bytes().to_vec()).collect(),
            attr: attr.map(|a| a.as_bytes().to_vec()),
            sha1: None,
            symlink_path: None,
        }
    }

    #[test]
    fn test_metadata_from_multi_file_info_skips_padding() {
        let info = TorrentMetaV1Info::<Vec<u8>> {
            name: Some(b"Sintel (2010)".to_vec()),
            piece_length: 262144,
            files: Some(vec![
                file(&["Sintel.srt"], 40_000, None),
                file(&[".pad", "262104"], 9_000_000, Some("p")),
                file(&["video", "Sintel.mkv"], 650_000_000, None),
                file(&["poster.jpg"], 120_000, Some("h")),
            ]),
            ..Default::default()
        };

        let meta = metadata_from_info(&info).unwrap();
        assert_eq!(meta.display_name, "Sintel (2010)");
        assert_eq!(meta.primary_file, "Sintel.mkv");
        let paths: Vec<&str> = meta.files.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(paths, vec!["Sintel.srt", "video/Sintel.mkv", "poster.jpg"]);
        assert_eq!(meta.files[1].length, 650_000_000);
    }

    #[test]
    fn test_metadata_from_single_file_info() {
        let info = TorrentMetaV1Info::<Vec<u8>> {
            name: Some(b"bbb.mp4".to_vec()),
            piece_length: 262144,
            length: Some(1_000),
            ..Default::default()
        };

        let meta = metadata_from_info(&info).unwrap();
        assert_eq!(meta.display_name, "bbb.mp4");
        assert_eq!(meta.primary_file, "bbb.mp4");
        assert_eq!(meta.files, vec![DiscoveredFile::new("bbb.mp4", 1_000)]);
    }

    #[test]
    fn test_metadata_from_info_without_files_is_invalid() {
        let info = TorrentMetaV1Info::<Vec<u8>>::default();
        assert!(matches!(
            metadata_from_info(&info),
            Err(DiscoveryError::InvalidMetadata(_))
        ));
    }

    #[test]
    fn test_listen_range_top_port_is_an_error() {
        assert_eq!(listen_range(6881).unwrap(), 6881..6882);
        assert!(matches!(
            listen_range(u16::MAX),
            Err(DiscoveryError::SessionInit(_))
        ));
    }

    #[tokio::test]
    async fn test_top_listen_port_fails_discovery_without_panicking() {
        let config = DiscoveryConfig {
            listen_port: Some(u16::MAX),
            ..offline_config()
        };
        let discoverer = LibrqbitDiscoverer::new(config);

        let result = discoverer
            .discover("dd8255ecdc7ca55fb0bbf81323d87062db1f6d1c")
            .await;
        assert!(matches!(result, Err(DiscoveryError::SessionInit(_))));
    }
}

use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::path::PathBuf;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub resolver: ResolverConfig,
    #[serde(default)]
    pub prober: ProberConfig,
    #[serde(default)]
    pub discovery: DiscoveryConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    IpAddr::from([0, 0, 0, 0])
}

fn default_port() -> u16 {
    3000
}

/// Database configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// Connection string: a SQLite file path, optionally prefixed with `sqlite://`.
    /// `:memory:` opens a private in-memory database.
    #[serde(default = "default_db_url")]
    pub url: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_db_url(),
        }
    }
}

impl DatabaseConfig {
    /// Filesystem path the connection string points at, or `None` for in-memory.
    pub fn sqlite_path(&self) -> Option<PathBuf> {
        let raw = self.url.strip_prefix("sqlite://").unwrap_or(&self.url);
        if raw == ":memory:" {
            None
        } else {
            Some(PathBuf::from(raw))
        }
    }
}

fn default_db_url() -> String {
    "hashgate.db".to_string()
}

/// Endpoints and thresholds used by the resolution pipeline.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ResolverConfig {
    /// External mirror that handles anything we cannot serve directly.
    #[serde(default = "default_fallback_base_url")]
    pub fallback_base_url: String,
    /// Static file host serving completed downloads.
    #[serde(default = "default_storage_base_url")]
    pub storage_base_url: String,
    /// Public base URL of the play endpoint referenced from generated playlists.
    #[serde(default = "default_direct_play_base_url")]
    pub direct_play_base_url: String,
    /// Minimum title similarity (inclusive) for a fuzzy match.
    #[serde(default = "default_similarity_threshold")]
    pub similarity_threshold: f64,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            fallback_base_url: default_fallback_base_url(),
            storage_base_url: default_storage_base_url(),
            direct_play_base_url: default_direct_play_base_url(),
            similarity_threshold: default_similarity_threshold(),
        }
    }
}

fn default_fallback_base_url() -> String {
    "https://fallback.invalid".to_string()
}

fn default_storage_base_url() -> String {
    "https://storage.invalid".to_string()
}

fn default_direct_play_base_url() -> String {
    "https://play.invalid".to_string()
}

fn default_similarity_threshold() -> f64 {
    0.6
}

/// URL probe configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProberConfig {
    /// Request timeout in seconds (default: 5)
    #[serde(default = "default_probe_timeout")]
    pub timeout_secs: u64,
}

impl Default for ProberConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_probe_timeout(),
        }
    }
}

fn default_probe_timeout() -> u64 {
    5
}

/// Swarm metadata discovery configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DiscoveryConfig {
    /// Disable to skip swarm lookups entirely (lookup misses go straight to fallback).
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Upper bound on a single metadata lookup, in seconds (default: 30)
    #[serde(default = "default_discovery_timeout")]
    pub timeout_secs: u64,
    /// Enable DHT peer discovery (default: true)
    #[serde(default = "default_true")]
    pub enable_dht: bool,
    /// Fixed listen port; a random one is used if unset.
    #[serde(default)]
    pub listen_port: Option<u16>,
    /// Scratch directory handed to the session. Nothing is written here in list-only mode.
    #[serde(default = "default_session_dir")]
    pub session_dir: String,
    /// Trackers appended to magnets built from bare info hashes.
    #[serde(default)]
    pub trackers: Vec<String>,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            timeout_secs: default_discovery_timeout(),
            enable_dht: true,
            listen_port: None,
            session_dir: default_session_dir(),
            trackers: Vec::new(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_discovery_timeout() -> u64 {
    30
}

fn default_session_dir() -> String {
    std::env::temp_dir()
        .join("hashgate-discovery")
        .display()
        .to_string()
}

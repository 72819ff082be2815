pub mod config;
pub mod discovery;
pub mod matcher;
pub mod metrics;
pub mod prober;
pub mod records;
pub mod resolver;
pub mod testing;

pub use config::{
    load_config, load_config_from_env, load_config_from_str, validate_config, Config,
    ConfigError, DatabaseConfig, DiscoveryConfig, ProberConfig, ResolverConfig, ServerConfig,
};
pub use discovery::{
    DiscoveredFile, DiscoveredMetadata, DiscoveryError, LibrqbitDiscoverer, MetadataDiscoverer,
};
pub use prober::{HttpProber, UrlProber};
pub use records::{Record, RecordStore, RecordStoreError, SqliteRecordStore};
pub use resolver::{RedirectTarget, Resolution, StreamMode, StreamRequest, StreamResolver};

//! Testing utilities and mock implementations.
//!
//! Mocks for every collaborator of the resolution pipeline, so the pipeline
//! and the HTTP surface can be exercised without a database, a storage host
//! or a live swarm.
//!
//! # Example
//!
//! ```rust,ignore
//! use hashgate_core::testing::{MockDiscoverer, MockRecordStore, MockUrlProber};
//!
//! let store = MockRecordStore::new();
//! let prober = MockUrlProber::new();
//! let discoverer = MockDiscoverer::new();
//!
//! prober.set_reachable("https://files.example.com/movie.mkv").await;
//! discoverer.set_metadata("abc...", metadata).await;
//! ```

mod mock_discoverer;
mod mock_prober;
mod mock_record_store;

pub use mock_discoverer::MockDiscoverer;
pub use mock_prober::MockUrlProber;
pub use mock_record_store::MockRecordStore;

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::discovery::{DiscoveredFile, DiscoveredMetadata};
    use crate::records::Record;

    /// A completed record whose file lives under `movies/{identifier}`.
    pub fn completed_record(identifier: &str, display_name: &str, file_name: &str) -> Record {
        Record::new(
            identifier,
            file_name,
            format!("movies/{}", identifier),
            display_name,
        )
        .with_completed(true)
    }

    /// Single-file discovery result.
    pub fn single_file_metadata(display_name: &str, file_name: &str) -> DiscoveredMetadata {
        DiscoveredMetadata {
            display_name: display_name.to_string(),
            primary_file: file_name.to_string(),
            files: vec![DiscoveredFile::new(file_name, 700 * 1024 * 1024)],
        }
    }
}

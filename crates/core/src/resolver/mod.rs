//! Stream resolution pipeline.
//!
//! Decides what a `/stream` request receives: a record payload, a playlist,
//! a redirect to verified storage, or a redirect to the fallback mirror.

mod pipeline;
mod types;
mod urls;

pub use pipeline::StreamResolver;
pub use types::*;
pub use urls::{fallback_url, playlist_document, storage_candidates, DEFAULT_INDEX};

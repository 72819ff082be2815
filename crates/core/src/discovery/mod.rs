//! Swarm metadata discovery.
//!
//! Joins a torrent's swarm just long enough to learn what it contains (name
//! and file listing), then leaves without fetching payload.

mod librqbit;
mod magnet;
mod types;

pub use librqbit::LibrqbitDiscoverer;
pub use magnet::magnet_for;
pub use types::*;

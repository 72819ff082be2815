//! Types for stream resolution.

use serde::{Deserialize, Serialize};

use crate::records::Record;

/// How the caller wants the stream delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreamMode {
    /// Report whether the content is already available.
    Preload,
    /// Return an M3U playlist pointing back at the play endpoint.
    Playlist,
    /// Redirect to something playable.
    Play,
}

impl StreamMode {
    /// Pick the mode from request markers. Preload wins over playlist.
    pub fn from_markers(preload: bool, playlist: bool) -> Self {
        if preload {
            StreamMode::Preload
        } else if playlist {
            StreamMode::Playlist
        } else {
            StreamMode::Play
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StreamMode::Preload => "preload",
            StreamMode::Playlist => "playlist",
            StreamMode::Play => "play",
        }
    }

    /// Marker appended to fallback URLs.
    pub fn fallback_marker(&self) -> &'static str {
        match self {
            StreamMode::Preload => "preload",
            StreamMode::Playlist | StreamMode::Play => "play",
        }
    }
}

/// A validated stream request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamRequest {
    /// Content identifier as supplied by the caller.
    pub link: String,
    /// Opaque file index, passed through to generated URLs.
    pub index: Option<String>,
    pub mode: StreamMode,
}

impl StreamRequest {
    pub fn new(link: impl Into<String>, mode: StreamMode) -> Self {
        Self {
            link: link.into(),
            index: None,
            mode,
        }
    }

    pub fn with_index(mut self, index: impl Into<String>) -> Self {
        self.index = Some(index.into());
        self
    }
}

/// Where a redirect points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectTarget {
    /// Verified URL on the storage host.
    Storage,
    /// External fallback mirror.
    Fallback,
}

/// The single outcome of a resolution.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// Preload hit: the record is available.
    Available(Record),
    /// M3U playlist body.
    Playlist(String),
    /// Redirect to `location`.
    Redirect {
        location: String,
        target: RedirectTarget,
    },
}

impl Resolution {
    /// Short label for metrics and logs.
    pub fn outcome(&self) -> &'static str {
        match self {
            Resolution::Available(_) => "record",
            Resolution::Playlist(_) => "playlist",
            Resolution::Redirect {
                target: RedirectTarget::Storage,
                ..
            } => "storage",
            Resolution::Redirect {
                target: RedirectTarget::Fallback,
                ..
            } => "fallback",
        }
    }
}

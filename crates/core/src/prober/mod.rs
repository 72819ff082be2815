//! URL availability probing.
//!
//! A probe answers "is this URL serving right now?" with a HEAD request.
//! Failures of any kind are folded into `false`.

mod http;

pub use http::HttpProber;

use async_trait::async_trait;

/// Cheap existence check against a URL.
#[async_trait]
pub trait UrlProber: Send + Sync {
    /// Returns true only when the URL answers with a success status.
    async fn is_reachable(&self, url: &str) -> bool;
}

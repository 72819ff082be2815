//! GET /stream

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::debug;

use hashgate_core::{Record, Resolution, StreamMode, StreamRequest};

use super::ApiError;
use crate::state::AppState;

pub const PLAYLIST_CONTENT_TYPE: &str = "application/vnd.apple.mpegurl";
pub const PLAYLIST_DISPOSITION: &str = "attachment; filename=\"playlist.m3u\"";

#[derive(Debug, Serialize)]
pub struct AvailableResponse {
    pub status: &'static str,
    pub message: &'static str,
    pub data: Record,
}

/// Build a request from the raw query. `preload` and `m3u` are flags: their
/// presence matters, their value does not.
pub fn parse_request(params: &HashMap<String, String>) -> Result<StreamRequest, ApiError> {
    let link = params
        .get("link")
        .filter(|l| !l.trim().is_empty())
        .ok_or(ApiError::MissingParameter("link"))?;

    let mode = StreamMode::from_markers(
        params.contains_key("preload"),
        params.contains_key("m3u"),
    );

    let mut request = StreamRequest::new(link.as_str(), mode);
    if let Some(index) = params.get("index").filter(|i| !i.is_empty()) {
        request = request.with_index(index.as_str());
    }
    Ok(request)
}

pub async fn stream(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Response, ApiError> {
    let request = parse_request(&params)?;
    debug!(link = %request.link, mode = request.mode.as_str(), "Stream request");

    match state.resolver().resolve(&request).await {
        Resolution::Available(record) => Ok(Json(AvailableResponse {
            status: "success",
            message: "File is already available",
            data: record,
        })
        .into_response()),
        Resolution::Playlist(body) => Ok((
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, PLAYLIST_CONTENT_TYPE),
                (header::CONTENT_DISPOSITION, PLAYLIST_DISPOSITION),
            ],
            body,
        )
            .into_response()),
        Resolution::Redirect { location, .. } => {
            let location = HeaderValue::from_str(&location)
                .map_err(|e| ApiError::Internal(format!("invalid redirect location: {}", e)))?;
            Ok((StatusCode::FOUND, [(header::LOCATION, location)]).into_response())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_missing_link_rejected() {
        assert!(matches!(
            parse_request(&params(&[("index", "2")])),
            Err(ApiError::MissingParameter("link"))
        ));
        assert!(matches!(
            parse_request(&params(&[("link", "  ")])),
            Err(ApiError::MissingParameter("link"))
        ));
    }

    #[test]
    fn test_link_kept_verbatim() {
        let request = parse_request(&params(&[("link", " abc ")])).unwrap();
        assert_eq!(request.link, " abc ");
    }

    #[test]
    fn test_flags_by_presence() {
        let request = parse_request(&params(&[("link", "abc"), ("preload", "")])).unwrap();
        assert_eq!(request.mode, StreamMode::Preload);

        let request = parse_request(&params(&[("link", "abc"), ("m3u", "")])).unwrap();
        assert_eq!(request.mode, StreamMode::Playlist);

        let request = parse_request(&params(&[("link", "abc")])).unwrap();
        assert_eq!(request.mode, StreamMode::Play);
    }

    #[test]
    fn test_preload_wins_over_playlist() {
        let request =
            parse_request(&params(&[("link", "abc"), ("m3u", ""), ("preload", "")])).unwrap();
        assert_eq!(request.mode, StreamMode::Preload);
    }

    #[test]
    fn test_index_passthrough() {
        let request = parse_request(&params(&[("link", "abc"), ("index", "3")])).unwrap();
        assert_eq!(request.index.as_deref(), Some("3"));

        let request = parse_request(&params(&[("link", "abc"), ("index", "")])).unwrap();
        assert_eq!(request.index, None);
    }
}

//! URL and document builders for resolution outcomes.

use urlencoding::encode;

use crate::records::Record;

/// Index used when the caller did not send one.
pub const DEFAULT_INDEX: &str = "1";

fn trim_base(base: &str) -> &str {
    base.trim_end_matches('/')
}

/// Fallback mirror URL: `{base}/stream?link={link}&index={index}&{marker}`.
pub fn fallback_url(base: &str, link: &str, index: Option<&str>, marker: &str) -> String {
    format!(
        "{}/stream?link={}&index={}&{}",
        trim_base(base),
        encode(link),
        encode(index.unwrap_or(DEFAULT_INDEX)),
        marker
    )
}

/// M3U playlist whose single entry defers resolution to the play endpoint.
pub fn playlist_document(direct_play_base: &str, link: &str, index: Option<&str>) -> String {
    format!(
        "#EXTM3U\n#EXTINF:0,video\n{}/stream/video?link={}&index={}&play",
        trim_base(direct_play_base),
        encode(link),
        encode(index.unwrap_or(DEFAULT_INDEX)),
    )
}

/// Storage URLs to try for a record, in order of preference.
///
/// First `{base}/{filePath}/{fileName}`, then `{base}/{fileName}`. Path
/// segments are percent-encoded individually. A record without a sub-path
/// only yields the second form.
pub fn storage_candidates(storage_base: &str, record: &Record) -> Vec<String> {
    let base = trim_base(storage_base);
    let file_name = encode(&record.file_name);

    let sub_path: Vec<String> = record
        .file_path
        .split('/')
        .filter(|segment| !segment.is_empty())
        .map(|segment| encode(segment).into_owned())
        .collect();

    let mut candidates = Vec::with_capacity(2);
    if !sub_path.is_empty() {
        candidates.push(format!("{}/{}/{}", base, sub_path.join("/"), file_name));
    }
    candidates.push(format!("{}/{}", base, file_name));
    candidates
}

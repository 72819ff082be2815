//! Turning request identifiers into magnet URIs.

use std::str::FromStr;

use librqbit_core::magnet::Magnet;
use librqbit_core::Id20;

use super::DiscoveryError;

/// Build the magnet URI to look up for `identifier`.
///
/// Magnet URIs are validated and passed through untouched. Bare info hashes
/// (40 hex or 32 base32 characters) become `urn:btih` magnets with `trackers`
/// appended.
pub fn magnet_for(identifier: &str, trackers: &[String]) -> Result<String, DiscoveryError> {
    let identifier = identifier.trim();

    if identifier
        .get(..7)
        .is_some_and(|scheme| scheme.eq_ignore_ascii_case("magnet:"))
    {
        Magnet::parse(identifier)
            .map_err(|e| DiscoveryError::InvalidIdentifier(e.to_string()))?;
        return Ok(identifier.to_string());
    }

    let hash = if identifier.len() == 40 && identifier.chars().all(|c| c.is_ascii_hexdigit()) {
        Id20::from_str(identifier)
            .map_err(|e| DiscoveryError::InvalidIdentifier(e.to_string()))?
            .as_string()
    } else if identifier.len() == 32 && identifier.chars().all(is_base32) {
        identifier.to_ascii_uppercase()
    } else {
        return Err(DiscoveryError::InvalidIdentifier(identifier.to_string()));
    };

    let mut magnet = format!("magnet:?xt=urn:btih:{}", hash);
    for tracker in trackers {
        magnet.push_str("&tr=");
        magnet.push_str(&urlencoding::encode(tracker));
    }
    Ok(magnet)
}

fn is_base32(c: char) -> bool {
    matches!(c.to_ascii_uppercase(), 'A'..='Z' | '2'..='7')
}

#[cfg(test)]
mod tests {
    use super::*;

    const HASH: &str = "dd8255ecdc7ca55fb0bbf81323d87062db1f6d1c";

    #[test]
    fn test_hex_hash_becomes_magnet() {
        let magnet = magnet_for(&HASH.to_uppercase(), &[]).unwrap();
        assert_eq!(magnet, format!("magnet:?xt=urn:btih:{}", HASH));
    }

    #[test]
    fn test_trackers_are_appended_encoded() {
        let trackers = vec!["udp://tracker.example.com:1337/announce".to_string()];
        let magnet = magnet_for(HASH, &trackers).unwrap();
        assert!(magnet.ends_with("&tr=udp%3A%2F%2Ftracker.example.com%3A1337%2Fannounce"));
    }

    #[test]
    fn test_base32_hash_is_accepted() {
        let magnet = magnet_for("3ECFL3G4PSSV7MF37AJSHWDQMLNR63I4", &[]).unwrap();
        assert_eq!(magnet, "magnet:?xt=urn:btih:3ECFL3G4PSSV7MF37AJSHWDQMLNR63I4");
    }

    #[test]
    fn test_magnet_passes_through() {
        let uri = format!("magnet:?xt=urn:btih:{}&dn=Big+Buck+Bunny", HASH);
        assert_eq!(magnet_for(&uri, &["udp://x".to_string()]).unwrap(), uri);
    }

    #[test]
    fn test_garbage_is_rejected() {
        for bad in ["", "not-a-hash", "abc123", &HASH[..39]] {
            assert!(
                matches!(magnet_for(bad, &[]), Err(DiscoveryError::InvalidIdentifier(_))),
                "{:?}",
                bad
            );
        }
    }
}

use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Server port is not 0
/// - Resolver base URLs are absolute http(s) URLs
/// - Similarity threshold lies in [0, 1]
/// - Probe and discovery timeouts are non-zero
/// - Discovery listen port, when set, is in 1..=65534
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    let resolver = &config.resolver;
    for (key, value) in [
        ("resolver.fallback_base_url", &resolver.fallback_base_url),
        ("resolver.storage_base_url", &resolver.storage_base_url),
        ("resolver.direct_play_base_url", &resolver.direct_play_base_url),
    ] {
        validate_base_url(key, value)?;
    }

    if !(0.0..=1.0).contains(&resolver.similarity_threshold) {
        return Err(ConfigError::ValidationError(format!(
            "resolver.similarity_threshold must be between 0 and 1, got {}",
            resolver.similarity_threshold
        )));
    }

    if config.prober.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "prober.timeout_secs cannot be 0".to_string(),
        ));
    }

    if config.discovery.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "discovery.timeout_secs cannot be 0".to_string(),
        ));
    }

    if let Some(port) = config.discovery.listen_port {
        if port == 0 || port == u16::MAX {
            return Err(ConfigError::ValidationError(format!(
                "discovery.listen_port must be between 1 and {}, got {}",
                u16::MAX - 1,
                port
            )));
        }
    }

    Ok(())
}

fn validate_base_url(key: &str, value: &str) -> Result<(), ConfigError> {
    let url = reqwest::Url::parse(value)
        .map_err(|e| ConfigError::ValidationError(format!("{} is not a valid URL: {}", key, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::ValidationError(format!(
            "{} must use http or https, got {}",
            key,
            url.scheme()
        )));
    }

    if url.query().is_some() {
        return Err(ConfigError::ValidationError(format!(
            "{} must not carry a query string",
            key
        )));
    }

    Ok(())
}

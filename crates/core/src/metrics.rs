//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - Resolution outcomes per mode
//! - Swarm metadata discovery
//! - Storage URL probes

use once_cell::sync::Lazy;
use prometheus::{HistogramOpts, HistogramVec, IntCounterVec, Opts};

// =============================================================================
// Resolution Metrics
// =============================================================================

/// Resolutions by mode and outcome.
pub static RESOLUTIONS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("hashgate_resolutions_total", "Total stream resolutions"),
        &["mode", "outcome"], // outcome: "record", "playlist", "storage", "fallback"
    )
    .unwrap()
});

/// Best fuzzy match scores above the threshold.
pub static MATCH_SCORE: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "hashgate_match_score",
            "Distribution of accepted title match scores",
        )
        .buckets(vec![0.6, 0.7, 0.8, 0.9, 0.95, 1.0]),
        &[],
    )
    .unwrap()
});

// =============================================================================
// Discovery Metrics
// =============================================================================

/// Discovery attempts by result.
pub static DISCOVERY_ATTEMPTS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "hashgate_discovery_attempts_total",
            "Total swarm metadata lookups",
        ),
        &["result"], // "success", "timeout", "invalid_identifier", "error"
    )
    .unwrap()
});

/// Discovery duration in seconds.
pub static DISCOVERY_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "hashgate_discovery_duration_seconds",
            "Duration of swarm metadata lookups",
        )
        .buckets(vec![0.5, 1.0, 2.5, 5.0, 10.0, 20.0, 30.0, 60.0]),
        &["result"],
    )
    .unwrap()
});

// =============================================================================
// Probe Metrics
// =============================================================================

/// Storage URL probes by result.
pub static PROBES_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("hashgate_probes_total", "Total storage URL probes"),
        &["result"], // "reachable", "unreachable"
    )
    .unwrap()
});

/// All core metrics, for registration with the server's registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        Box::new(RESOLUTIONS_TOTAL.clone()),
        Box::new(MATCH_SCORE.clone()),
        Box::new(DISCOVERY_ATTEMPTS.clone()),
        Box::new(DISCOVERY_DURATION.clone()),
        Box::new(PROBES_TOTAL.clone()),
    ]
}

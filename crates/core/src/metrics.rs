//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - The dimension cache (lookups, evictions, size)
//! - Catalog provider calls (TMDB)
//! - Availability sync runs

use once_cell::sync::Lazy;
use prometheus::{HistogramOpts, HistogramVec, IntCounter, IntCounterVec, IntGauge, Opts};

// =============================================================================
// Cache Metrics
// =============================================================================

/// Cache lookups by result.
pub static CACHE_LOOKUPS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("popflix_cache_lookups_total", "Total dimension cache lookups"),
        &["result"], // "hit", "miss", "expired"
    )
    .unwrap()
});

/// Entries evicted because the cache was full.
pub static CACHE_EVICTIONS: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "popflix_cache_evictions_total",
        "Total least-recently-used evictions",
    )
    .unwrap()
});

/// Entries currently held by the cache.
pub static CACHE_ENTRIES: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new("popflix_cache_entries", "Number of cached dimensions").unwrap()
});

// =============================================================================
// Provider Metrics
// =============================================================================

/// Provider request duration.
pub static PROVIDER_REQUEST_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "popflix_provider_request_duration_seconds",
            "Duration of catalog provider calls",
        )
        .buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]),
        &["operation"],
    )
    .unwrap()
});

/// Provider requests total.
pub static PROVIDER_REQUESTS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "popflix_provider_requests_total",
            "Total catalog provider requests",
        ),
        &["operation", "status"], // status: "success", "error"
    )
    .unwrap()
});

// =============================================================================
// Availability Metrics
// =============================================================================

/// Items whose platform availability was resolved from the provider.
pub static AVAILABILITY_CHECKS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "popflix_availability_checks_total",
            "Total availability lookups against the provider",
        ),
        &["result"], // "success", "error"
    )
    .unwrap()
});

// =============================================================================
// Helper functions
// =============================================================================

/// Get all core metrics for registration in a registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        // Cache
        Box::new(CACHE_LOOKUPS.clone()),
        Box::new(CACHE_EVICTIONS.clone()),
        Box::new(CACHE_ENTRIES.clone()),
        // Provider
        Box::new(PROVIDER_REQUEST_DURATION.clone()),
        Box::new(PROVIDER_REQUESTS.clone()),
        // Availability
        Box::new(AVAILABILITY_CHECKS.clone()),
    ]
}

//! Prometheus metrics for the HTTP layer.
//!
//! Core metrics (cache, provider, availability) are registered here as well
//! so `/metrics` exposes everything from one registry.

use once_cell::sync::Lazy;
use prometheus::{
    self, Encoder, HistogramOpts, HistogramVec, IntCounterVec, IntGauge, Opts, Registry,
    TextEncoder,
};
use regex_lite::Regex;

use crate::state::AppState;

/// Global metrics registry.
pub static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let registry = Registry::new();
    register_metrics(&registry);
    registry
});

// =============================================================================
// HTTP Request Metrics
// =============================================================================

/// HTTP request duration in seconds.
pub static HTTP_REQUEST_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "popflix_http_request_duration_seconds",
            "HTTP request duration in seconds",
        )
        .buckets(vec![
            0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
        ]),
        &["method", "path", "status"],
    )
    .unwrap()
});

/// HTTP requests total count.
pub static HTTP_REQUESTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("popflix_http_requests_total", "Total HTTP requests"),
        &["method", "path", "status"],
    )
    .unwrap()
});

/// HTTP requests currently in flight.
pub static HTTP_REQUESTS_IN_FLIGHT: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "popflix_http_requests_in_flight",
        "Number of HTTP requests currently being processed",
    )
    .unwrap()
});

// =============================================================================
// Catalog Metrics (collected dynamically)
// =============================================================================

/// Catalog items persisted in the store.
pub static CATALOG_ITEMS: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new("popflix_catalog_items", "Number of stored catalog items").unwrap()
});

// =============================================================================
// Registration
// =============================================================================

fn register_metrics(registry: &Registry) {
    registry
        .register(Box::new(HTTP_REQUEST_DURATION.clone()))
        .unwrap();
    registry
        .register(Box::new(HTTP_REQUESTS_TOTAL.clone()))
        .unwrap();
    registry
        .register(Box::new(HTTP_REQUESTS_IN_FLIGHT.clone()))
        .unwrap();
    registry.register(Box::new(CATALOG_ITEMS.clone())).unwrap();

    // Cache, provider and availability metrics
    for metric in popflix_core::metrics::all_metrics() {
        registry.register(metric).unwrap();
    }
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!(error = %e, "Failed to encode metrics");
    }
    String::from_utf8(buffer).unwrap_or_default()
}

/// Refresh gauges read from application state before encoding.
pub fn collect_dynamic_metrics(state: &AppState) {
    if let Ok(count) = state.catalog().item_count() {
        CATALOG_ITEMS.set(count as i64);
    }
}

static NUMERIC_SEGMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"/\d+(/|$)").unwrap());

static FREE_TEXT_SEGMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/(search|genre)/[^/]+").unwrap());

/// Normalize a path for metric labels.
///
/// Numeric ids become `{id}`; search terms and genre keys become `{query}`
/// and `{genre}` so user input cannot grow label cardinality.
pub fn normalize_path(path: &str) -> String {
    let path = FREE_TEXT_SEGMENT.replace_all(path, |caps: &regex_lite::Captures| {
        match &caps[1] {
            "search" => "/search/{query}".to_string(),
            _ => "/genre/{genre}".to_string(),
        }
    });
    // Two passes: adjacent numeric segments share a slash.
    let once = NUMERIC_SEGMENT.replace_all(&path, "/{id}$1");
    NUMERIC_SEGMENT.replace_all(&once, "/{id}$1").to_string()
}

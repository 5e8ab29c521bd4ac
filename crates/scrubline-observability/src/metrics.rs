//! Metrics collection with Prometheus
//!
//! This module provides Prometheus metrics for Scrubline:
//! - Request counts per endpoint
//! - Detected matches by kind and severity
//! - Sanitization latency per endpoint
//! - Validation failures and rejected requests

use prometheus::{Counter, CounterVec, HistogramOpts, HistogramVec, Opts, Registry};
use scrubline_sanitizer::Match;
use std::sync::Arc;

/// Metrics collector for Scrubline
#[derive(Clone)]
pub struct Metrics {
    registry: Arc<Registry>,

    /// Requests handled, by endpoint
    pub sanitize_requests_total: CounterVec,
    /// Canonical matches found, by kind and severity
    pub matches_total: CounterVec,
    /// Time spent scanning and redacting, by endpoint
    pub sanitize_duration_seconds: HistogramVec,
    /// Validations that found residual matches
    pub validation_failures_total: Counter,
    /// Requests refused before scanning, by reason
    pub rejected_requests_total: CounterVec,
}

impl Metrics {
    /// Create a new metrics collector
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let sanitize_requests_total = CounterVec::new(
            Opts::new(
                "scrubline_sanitize_requests_total",
                "Total number of sanitization requests",
            ),
            &["endpoint"],
        )?;

        let matches_total = CounterVec::new(
            Opts::new("scrubline_matches_total", "Total number of detected matches"),
            &["kind", "severity"],
        )?;

        let sanitize_duration_seconds = HistogramVec::new(
            HistogramOpts::new(
                "scrubline_sanitize_duration_seconds",
                "Time spent scanning and redacting in seconds",
            )
            .buckets(vec![
                0.0001, 0.0005, 0.001, 0.0025, 0.005, 0.01, 0.025, 0.05, 0.1, 0.5,
            ]),
            &["endpoint"],
        )?;

        let validation_failures_total = Counter::new(
            "scrubline_validation_failures_total",
            "Validations that found residual matches",
        )?;

        let rejected_requests_total = CounterVec::new(
            Opts::new(
                "scrubline_rejected_requests_total",
                "Requests rejected before scanning",
            ),
            &["reason"],
        )?;

        registry.register(Box::new(sanitize_requests_total.clone()))?;
        registry.register(Box::new(matches_total.clone()))?;
        registry.register(Box::new(sanitize_duration_seconds.clone()))?;
        registry.register(Box::new(validation_failures_total.clone()))?;
        registry.register(Box::new(rejected_requests_total.clone()))?;

        Ok(Self {
            registry: Arc::new(registry),
            sanitize_requests_total,
            matches_total,
            sanitize_duration_seconds,
            validation_failures_total,
            rejected_requests_total,
        })
    }

    /// Get the Prometheus registry
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Record a handled request and the matches it produced
    pub fn record_request<'a>(
        &self,
        endpoint: &str,
        matches: impl IntoIterator<Item = &'a Match>,
        duration_secs: f64,
    ) {
        self.sanitize_requests_total
            .with_label_values(&[endpoint])
            .inc();
        self.sanitize_duration_seconds
            .with_label_values(&[endpoint])
            .observe(duration_secs);

        for m in matches {
            self.matches_total
                .with_label_values(&[m.kind.as_str(), m.severity.as_str()])
                .inc();
        }
    }

    pub fn record_validation_failure(&self) {
        self.validation_failures_total.inc();
    }

    pub fn record_rejection(&self, reason: &str) {
        self.rejected_requests_total
            .with_label_values(&[reason])
            .inc();
    }
}

//! Negotiation metrics and observability module.
//!
//! Counts how often each stage of the precedence chain decided the language.
//! The engine itself stays pure; the web layer records each result here.

use crate::i18n::{NegotiationResult, NegotiationSource};
use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::OnceLock;

/// Global negotiation metrics singleton.
pub struct NegotiationMetrics {
    /// One counter per `NegotiationSource`, in `NegotiationSource::ALL` order
    by_source: [AtomicUsize; 6],

    /// Number of collaborator failures swallowed at the boundary
    collaborator_failures: AtomicUsize,
}

/// Global metrics instance (initialized lazily)
static METRICS: OnceLock<NegotiationMetrics> = OnceLock::new();

fn slot(source: NegotiationSource) -> usize {
    match source {
        NegotiationSource::Explicit => 0,
        NegotiationSource::Stored => 1,
        NegotiationSource::Persisted => 2,
        NegotiationSource::Negotiated => 3,
        NegotiationSource::Geolocated => 4,
        NegotiationSource::Default => 5,
    }
}

impl NegotiationMetrics {
    /// Create a detached set of counters (all zero).
    pub fn new() -> Self {
        Self {
            by_source: Default::default(),
            collaborator_failures: AtomicUsize::new(0),
        }
    }

    /// Get the global negotiation metrics instance.
    pub fn global() -> &'static NegotiationMetrics {
        METRICS.get_or_init(NegotiationMetrics::new)
    }

    /// Record one negotiation outcome.
    pub fn record(&self, result: &NegotiationResult) {
        self.by_source[slot(result.source)].fetch_add(1, Ordering::Relaxed);
    }

    /// Record a session/cookie/geo collaborator that failed and was ignored.
    pub fn record_collaborator_failure(&self) {
        self.collaborator_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Get the count for a single source.
    pub fn count(&self, source: NegotiationSource) -> usize {
        self.by_source[slot(source)].load(Ordering::Relaxed)
    }

    pub fn total(&self) -> usize {
        NegotiationSource::ALL.iter().map(|&s| self.count(s)).sum()
    }

    pub fn collaborator_failures(&self) -> usize {
        self.collaborator_failures.load(Ordering::Relaxed)
    }

    /// Generate a metrics report.
    pub fn report(&self) -> MetricsReport {
        let total = self.total();
        let fallback = self.count(NegotiationSource::Default);
        let default_rate = if total > 0 {
            (fallback as f64 / total as f64) * 100.0
        } else {
            0.0
        };

        MetricsReport {
            total,
            explicit: self.count(NegotiationSource::Explicit),
            stored: self.count(NegotiationSource::Stored),
            persisted: self.count(NegotiationSource::Persisted),
            negotiated: self.count(NegotiationSource::Negotiated),
            geolocated: self.count(NegotiationSource::Geolocated),
            default: fallback,
            default_rate,
            collaborator_failures: self.collaborator_failures(),
        }
    }

    /// Reset all metrics to zero (useful for testing).
    #[cfg(test)]
    pub fn reset(&self) {
        for counter in &self.by_source {
            counter.store(0, Ordering::Relaxed);
        }
        self.collaborator_failures.store(0, Ordering::Relaxed);
    }
}

impl Default for NegotiationMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Metrics report containing current negotiation statistics.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsReport {
    /// Number of negotiations recorded
    pub total: usize,

    pub explicit: usize,
    pub stored: usize,
    pub persisted: usize,
    pub negotiated: usize,
    pub geolocated: usize,
    pub default: usize,

    /// Share of requests that ended on the default language (0-100)
    pub default_rate: f64,

    /// Number of collaborator failures treated as "no value"
    pub collaborator_failures: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::LanguageRegistry;
    use serial_test::serial;

    fn result(source: NegotiationSource) -> NegotiationResult {
        let registry = LanguageRegistry::standard().expect("standard catalog");
        NegotiationResult {
            code: registry.default_code(),
            source,
        }
    }

    // ==================== Counter Tests ====================

    #[test]
    fn test_record_counts_per_source() {
        let metrics = NegotiationMetrics::new();

        metrics.record(&result(NegotiationSource::Explicit));
        metrics.record(&result(NegotiationSource::Negotiated));
        metrics.record(&result(NegotiationSource::Negotiated));

        assert_eq!(metrics.count(NegotiationSource::Explicit), 1);
        assert_eq!(metrics.count(NegotiationSource::Negotiated), 2);
        assert_eq!(metrics.count(NegotiationSource::Default), 0);
        assert_eq!(metrics.total(), 3);
    }

    #[test]
    fn test_record_collaborator_failure() {
        let metrics = NegotiationMetrics::new();
        assert_eq!(metrics.collaborator_failures(), 0);
        metrics.record_collaborator_failure();
        assert_eq!(metrics.collaborator_failures(), 1);
    }

    // ==================== Report Tests ====================

    #[test]
    fn test_report_empty() {
        let report = NegotiationMetrics::new().report();
        assert_eq!(report.total, 0);
        assert_eq!(report.default_rate, 0.0);
    }

    #[test]
    fn test_report_default_rate() {
        let metrics = NegotiationMetrics::new();

        // 1 default out of 4 = 25%
        metrics.record(&result(NegotiationSource::Default));
        metrics.record(&result(NegotiationSource::Stored));
        metrics.record(&result(NegotiationSource::Persisted));
        metrics.record(&result(NegotiationSource::Geolocated));

        let report = metrics.report();
        assert_eq!(report.total, 4);
        assert_eq!(report.default, 1);
        assert_eq!(report.stored, 1);
        assert_eq!(report.persisted, 1);
        assert_eq!(report.geolocated, 1);
        assert_eq!(report.default_rate, 25.0);
    }

    // ==================== Singleton Tests ====================

    #[test]
    fn test_global_returns_same_instance() {
        let metrics1 = NegotiationMetrics::global();
        let metrics2 = NegotiationMetrics::global();

        // Should return the same instance (same memory address)
        assert!(std::ptr::eq(metrics1, metrics2));
    }

    #[test]
    #[serial]
    fn test_global_reset() {
        let metrics = NegotiationMetrics::global();
        metrics.record(&result(NegotiationSource::Explicit));
        metrics.reset();
        assert_eq!(metrics.total(), 0);
    }
}

//! Prometheus metrics for the trust engine.
//!
//! Exposes counters and histograms covering report creation, voting,
//! settlement and classifier health.  The [`EngineMetrics`] struct owns a
//! dedicated [`Registry`] that an embedding process can encode into the
//! Prometheus text exposition format via [`EngineMetrics::encode`].

use prometheus::{
    register_histogram_with_registry, register_int_counter_vec_with_registry,
    register_int_counter_with_registry, Encoder, Histogram, HistogramOpts, IntCounter,
    IntCounterVec, Opts, Registry, TextEncoder,
};

/// Central collection of all engine-level Prometheus metrics.
pub struct EngineMetrics {
    /// The Prometheus registry that owns every metric below.
    pub registry: Registry,

    // ── Counters ────────────────────────────────────────────────────────
    /// Reports accepted and persisted.
    pub reports_created: IntCounter,
    /// Votes accepted and persisted.
    pub votes_cast: IntCounter,
    /// Votes refused by validation or by the ledger.
    pub votes_rejected: IntCounter,
    /// Completed settlements (one per principal per report).
    pub settlements: IntCounter,
    /// Settlements rolled back after a failed reward transfer.
    pub settlement_rollbacks: IntCounter,
    /// Evaluations where the classifier failed or timed out.
    pub classifier_unavailable: IntCounter,
    /// Trust verdicts served, by provenance.
    pub verdicts: IntCounterVec,

    // ── Histograms ──────────────────────────────────────────────────────
    /// Time for the classifier to answer, in milliseconds.
    pub classifier_latency_ms: Histogram,
}

impl EngineMetrics {
    /// Create a fresh set of metrics, all registered under a new
    /// [`Registry`].
    pub fn new() -> Self {
        let registry = Registry::new();

        let reports_created = register_int_counter_with_registry!(
            Opts::new("fradium_reports_created_total", "Total reports created"),
            registry
        )
        .expect("failed to register reports_created counter");

        let votes_cast = register_int_counter_with_registry!(
            Opts::new("fradium_votes_cast_total", "Total votes recorded"),
            registry
        )
        .expect("failed to register votes_cast counter");

        let votes_rejected = register_int_counter_with_registry!(
            Opts::new("fradium_votes_rejected_total", "Total votes rejected"),
            registry
        )
        .expect("failed to register votes_rejected counter");

        let settlements = register_int_counter_with_registry!(
            Opts::new(
                "fradium_settlements_total",
                "Total completed participant settlements"
            ),
            registry
        )
        .expect("failed to register settlements counter");

        let settlement_rollbacks = register_int_counter_with_registry!(
            Opts::new(
                "fradium_settlement_rollbacks_total",
                "Settlements rolled back after a failed reward transfer"
            ),
            registry
        )
        .expect("failed to register settlement_rollbacks counter");

        let classifier_unavailable = register_int_counter_with_registry!(
            Opts::new(
                "fradium_classifier_unavailable_total",
                "Evaluations where the AI classifier failed or timed out"
            ),
            registry
        )
        .expect("failed to register classifier_unavailable counter");

        let verdicts = register_int_counter_vec_with_registry!(
            Opts::new("fradium_verdicts_total", "Trust verdicts served by provenance"),
            &["provenance"],
            registry
        )
        .expect("failed to register verdicts counter");

        // 1 ms → ~16 s, enough to see calls that run into the timeout.
        let classifier_latency_ms = register_histogram_with_registry!(
            HistogramOpts::new(
                "fradium_classifier_latency_ms",
                "Classifier response time in milliseconds"
            )
            .buckets(prometheus::exponential_buckets(1.0, 2.0, 15).unwrap()),
            registry
        )
        .expect("failed to register classifier_latency_ms histogram");

        Self {
            registry,
            reports_created,
            votes_cast,
            votes_rejected,
            settlements,
            settlement_rollbacks,
            classifier_unavailable,
            verdicts,
            classifier_latency_ms,
        }
    }

    /// Render every metric in the Prometheus text exposition format.
    pub fn encode(&self) -> Result<String, prometheus::Error> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}

impl Default for EngineMetrics {
    fn default() -> Self {
        Self::new()
    }
}

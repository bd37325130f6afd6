// Private module declaration
mod server;

use prometheus::{IntCounter, IntCounterVec, Opts, Registry};

// Re-export for public API
pub use server::start_metrics_server;

// ============================================================================
// Metrics Module - Prometheus metrics for observability
// ============================================================================
//
// Counters for the write-path coordinator:
// - successful operations per kind
// - event publishes rejected by the bus
// - compensations that cleanly rolled the store back
// - inconsistent states (compensation itself failed)
//
// `inconsistent_state_total` is the alerting signal: any non-zero value
// means the store and the event stream disagree somewhere and an operator
// or reconciliation job has to intervene.
//
// ============================================================================

/// Central metrics registry for the entire application
pub struct Metrics {
    registry: Registry,

    pub operations: IntCounterVec,
    pub publish_failures: IntCounterVec,
    pub compensations: IntCounterVec,
    pub inconsistent_state_total: IntCounter,
}

impl Metrics {
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let operations = IntCounterVec::new(
            Opts::new(
                "company_operations_total",
                "Successful company operations (record persisted and event accepted)",
            ),
            &["operation"],
        )?;
        registry.register(Box::new(operations.clone()))?;

        let publish_failures = IntCounterVec::new(
            Opts::new(
                "company_event_publish_failures_total",
                "Event publishes rejected by the bus after a successful store write",
            ),
            &["operation"],
        )?;
        registry.register(Box::new(publish_failures.clone()))?;

        let compensations = IntCounterVec::new(
            Opts::new(
                "company_store_compensations_total",
                "Store writes rolled back cleanly after a failed publish",
            ),
            &["operation"],
        )?;
        registry.register(Box::new(compensations.clone()))?;

        let inconsistent_state_total = IntCounter::new(
            "company_inconsistent_state_total",
            "Primary write succeeded but compensation failed; operator intervention required",
        )?;
        registry.register(Box::new(inconsistent_state_total.clone()))?;

        Ok(Self {
            registry,
            operations,
            publish_failures,
            compensations,
            inconsistent_state_total,
        })
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }
}

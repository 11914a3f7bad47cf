//! # Metrics
//!
//! Prometheus metrics for monitoring the provider.
//!
//! ## Metrics Exposed
//!
//! - `provider_aws_reconciliations_total{kind}` - Total number of reconciliations
//! - `provider_aws_reconciliation_errors_total{kind}` - Total number of reconciliation errors
//! - `provider_aws_reconciliation_duration_seconds{kind}` - Duration of reconciliations
//! - `provider_aws_requeues_total{kind,reason}` - Requeues scheduled by the error policy
//! - `provider_aws_external_operations_total{kind,operation}` - AWS calls made
//! - `provider_aws_external_operation_errors_total{kind,operation}` - Failed AWS calls (not-found excluded)
//! - `provider_aws_external_operation_duration_seconds{kind,operation}` - Duration of AWS calls

use anyhow::Result;
use prometheus::{HistogramVec, IntCounterVec, Registry};
use std::sync::LazyLock;

pub(crate) static REGISTRY: LazyLock<Registry> = LazyLock::new(Registry::new);

static RECONCILIATIONS_TOTAL: LazyLock<IntCounterVec> = LazyLock::new(|| {
    IntCounterVec::new(
        prometheus::Opts::new(
            "provider_aws_reconciliations_total",
            "Total number of reconciliations by resource kind",
        ),
        &["kind"],
    )
    .expect("Failed to create RECONCILIATIONS_TOTAL metric - this should never happen")
});

static RECONCILIATION_ERRORS_TOTAL: LazyLock<IntCounterVec> = LazyLock::new(|| {
    IntCounterVec::new(
        prometheus::Opts::new(
            "provider_aws_reconciliation_errors_total",
            "Total number of reconciliation errors by resource kind",
        ),
        &["kind"],
    )
    .expect("Failed to create RECONCILIATION_ERRORS_TOTAL metric - this should never happen")
});

static RECONCILIATION_DURATION: LazyLock<HistogramVec> = LazyLock::new(|| {
    HistogramVec::new(
        prometheus::HistogramOpts::new(
            "provider_aws_reconciliation_duration_seconds",
            "Duration of reconciliation in seconds by resource kind",
        )
        .buckets(vec![0.1, 0.5, 1.0, 2.0, 5.0, 10.0, 30.0]),
        &["kind"],
    )
    .expect("Failed to create RECONCILIATION_DURATION metric - this should never happen")
});

static REQUEUES_TOTAL: LazyLock<IntCounterVec> = LazyLock::new(|| {
    IntCounterVec::new(
        prometheus::Opts::new(
            "provider_aws_requeues_total",
            "Total number of requeues by resource kind and reason",
        ),
        &["kind", "reason"],
    )
    .expect("Failed to create REQUEUES_TOTAL metric - this should never happen")
});

static EXTERNAL_OPERATIONS_TOTAL: LazyLock<IntCounterVec> = LazyLock::new(|| {
    IntCounterVec::new(
        prometheus::Opts::new(
            "provider_aws_external_operations_total",
            "Total number of AWS API operations by resource kind and operation",
        ),
        &["kind", "operation"],
    )
    .expect("Failed to create EXTERNAL_OPERATIONS_TOTAL metric - this should never happen")
});

static EXTERNAL_OPERATION_ERRORS_TOTAL: LazyLock<IntCounterVec> = LazyLock::new(|| {
    IntCounterVec::new(
        prometheus::Opts::new(
            "provider_aws_external_operation_errors_total",
            "Total number of failed AWS API operations by resource kind and operation",
        ),
        &["kind", "operation"],
    )
    .expect("Failed to create EXTERNAL_OPERATION_ERRORS_TOTAL metric - this should never happen")
});

static EXTERNAL_OPERATION_DURATION: LazyLock<HistogramVec> = LazyLock::new(|| {
    HistogramVec::new(
        prometheus::HistogramOpts::new(
            "provider_aws_external_operation_duration_seconds",
            "Duration of AWS API operations in seconds by resource kind and operation",
        )
        .buckets(vec![0.05, 0.1, 0.5, 1.0, 2.0, 5.0, 10.0]),
        &["kind", "operation"],
    )
    .expect("Failed to create EXTERNAL_OPERATION_DURATION metric - this should never happen")
});

pub fn register_metrics() -> Result<()> {
    REGISTRY.register(Box::new(RECONCILIATIONS_TOTAL.clone()))?;
    REGISTRY.register(Box::new(RECONCILIATION_ERRORS_TOTAL.clone()))?;
    REGISTRY.register(Box::new(RECONCILIATION_DURATION.clone()))?;
    REGISTRY.register(Box::new(REQUEUES_TOTAL.clone()))?;
    REGISTRY.register(Box::new(EXTERNAL_OPERATIONS_TOTAL.clone()))?;
    REGISTRY.register(Box::new(EXTERNAL_OPERATION_ERRORS_TOTAL.clone()))?;
    REGISTRY.register(Box::new(EXTERNAL_OPERATION_DURATION.clone()))?;
    Ok(())
}

pub fn increment_reconciliations(kind: &str) {
    RECONCILIATIONS_TOTAL.with_label_values(&[kind]).inc();
}

pub fn increment_reconciliation_errors(kind: &str) {
    RECONCILIATION_ERRORS_TOTAL.with_label_values(&[kind]).inc();
}

pub fn observe_reconciliation_duration(kind: &str, duration: f64) {
    RECONCILIATION_DURATION
        .with_label_values(&[kind])
        .observe(duration);
}

pub fn increment_requeues(kind: &str, reason: &str) {
    REQUEUES_TOTAL.with_label_values(&[kind, reason]).inc();
}

/// Record one AWS call, successful or not
pub fn record_external_operation(kind: &str, operation: &str, duration: f64) {
    EXTERNAL_OPERATIONS_TOTAL
        .with_label_values(&[kind, operation])
        .inc();
    EXTERNAL_OPERATION_DURATION
        .with_label_values(&[kind, operation])
        .observe(duration);
}

pub fn increment_external_operation_errors(kind: &str, operation: &str) {
    EXTERNAL_OPERATION_ERRORS_TOTAL
        .with_label_values(&[kind, operation])
        .inc();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_increment_reconciliations() {
        let before = RECONCILIATIONS_TOTAL.with_label_values(&["Role"]).get();
        increment_reconciliations("Role");
        let after = RECONCILIATIONS_TOTAL.with_label_values(&["Role"]).get();
        assert_eq!(after, before + 1u64);
    }

    #[test]
    fn test_increment_reconciliation_errors() {
        let before = RECONCILIATION_ERRORS_TOTAL
            .with_label_values(&["Connection"])
            .get();
        increment_reconciliation_errors("Connection");
        let after = RECONCILIATION_ERRORS_TOTAL
            .with_label_values(&["Connection"])
            .get();
        assert_eq!(after, before + 1u64);
    }

    #[test]
    fn test_increment_requeues() {
        let before = REQUEUES_TOTAL
            .with_label_values(&["Role", "error-backoff"])
            .get();
        increment_requeues("Role", "error-backoff");
        let after = REQUEUES_TOTAL
            .with_label_values(&["Role", "error-backoff"])
            .get();
        assert_eq!(after, before + 1u64);
    }

    #[test]
    fn test_record_external_operation() {
        let before = EXTERNAL_OPERATIONS_TOTAL
            .with_label_values(&["RouteResponse", "describe"])
            .get();
        record_external_operation("RouteResponse", "describe", 0.2);
        let after = EXTERNAL_OPERATIONS_TOTAL
            .with_label_values(&["RouteResponse", "describe"])
            .get();
        assert_eq!(after, before + 1u64);
    }

    #[test]
    fn test_external_operation_errors_are_labelled() {
        increment_external_operation_errors("ConfigurationSet", "create");
        let errors = EXTERNAL_OPERATION_ERRORS_TOTAL
            .with_label_values(&["ConfigurationSet", "create"])
            .get();
        assert!(errors >= 1);
    }
}

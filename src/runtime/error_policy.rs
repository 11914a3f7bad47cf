//! # Error Policy
//!
//! Requeue decisions for reconciliations that returned an error. Failures are
//! retried with a per-resource Fibonacci backoff, so one failing resource
//! never delays the others. A deletion that is still in progress is polled
//! at a fixed interval and is not counted as a failure.

use crate::constants::DEFAULT_DELETION_POLL_SECS;
use crate::controller::reconciler::{backoff_key, BackoffState, ReconcileContext, ReconcilerError};
use crate::crd::Managed;
use crate::observability;
use kube_runtime::controller::Action;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::{error, info, warn};

/// Fallback delay when the backoff table is unavailable
const FALLBACK_BACKOFF_SECS: u64 = 60;

pub fn handle_reconciliation_error<R: Managed>(
    obj: Arc<R>,
    error: &ReconcilerError,
    ctx: Arc<ReconcileContext<R>>,
) -> Action {
    let kind = R::kind(&()).to_string();
    let name = obj.resource_name();

    if matches!(error, ReconcilerError::DeletionPending) {
        info!(
            "⏳ {} {} is still being deleted, checking again in {}s",
            kind, name, DEFAULT_DELETION_POLL_SECS
        );
        observability::metrics::increment_requeues(&kind, "deletion-pending");
        return Action::requeue(Duration::from_secs(DEFAULT_DELETION_POLL_SECS));
    }

    let error_span = tracing::span!(
        tracing::Level::ERROR,
        "controller.reconciliation_error",
        resource.kind = %kind,
        resource.name = name,
        error = %error
    );
    let _error_guard = error_span.enter();

    error!("Reconciliation error for {} {}: {:?}", kind, name, error);
    observability::metrics::increment_reconciliation_errors(&kind);

    let (backoff_seconds, error_count) = next_backoff(
        &ctx.backoff_states,
        &backoff_key(obj.as_ref()),
        ctx.backoff_min_secs,
        ctx.backoff_max_secs,
    );

    let next_trigger_time = chrono::Utc::now()
        + chrono::Duration::seconds(i64::try_from(backoff_seconds).unwrap_or_default());

    info!(
        "🔄 Retrying with Fibonacci backoff: {}s (error count: {}, trigger source: error-backoff)",
        backoff_seconds, error_count
    );
    info!(
        "📅 Next retry scheduled: {} (in {}s, trigger source: error-backoff)",
        next_trigger_time.to_rfc3339(),
        backoff_seconds
    );

    observability::metrics::increment_requeues(&kind, "error-backoff");
    Action::requeue(Duration::from_secs(backoff_seconds))
}

/// Record one more failure for `key` and return `(delay_secs, error_count)`
pub(crate) fn next_backoff(
    states: &Mutex<HashMap<String, BackoffState>>,
    key: &str,
    min_secs: u64,
    max_secs: u64,
) -> (u64, u32) {
    match states.lock() {
        Ok(mut states) => {
            let state = states
                .entry(key.to_string())
                .or_insert_with(|| BackoffState::new(min_secs, max_secs));
            state.increment_error();
            (state.backoff.next_backoff_seconds(), state.error_count)
        }
        Err(e) => {
            warn!(
                "Failed to lock backoff_states: {}, using default backoff",
                e
            );
            (FALLBACK_BACKOFF_SECS, 0)
        }
    }
}

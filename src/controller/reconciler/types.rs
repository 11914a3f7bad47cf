//! # Types
//!
//! Core types for the managed resource reconciler.

use super::managed::ManagedReconciler;
use crate::controller::backoff::FibonacciBackoff;
use crate::crd::Managed;
use crate::managed;
use kube::Client;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReconcilerError {
    #[error("Reconciliation failed: {0:#}")]
    ReconciliationFailed(#[from] anyhow::Error),
    #[error(transparent)]
    External(#[from] managed::Error),
    #[error("external {kind} {name} does not exist and may not be created")]
    ExternalResourceMissing { kind: String, name: String },
    /// The delete call succeeded but the external resource is still observed
    #[error("deletion of external resource in progress")]
    DeletionPending,
    #[error("finalizer error: {0}")]
    Finalizer(#[source] Box<kube_runtime::finalizer::Error<ReconcilerError>>),
}

/// Backoff state for a specific resource
/// Tracks error count and backoff calculator for progressive retries
#[derive(Debug, Clone)]
pub struct BackoffState {
    pub backoff: FibonacciBackoff,
    pub error_count: u32,
}

impl BackoffState {
    #[must_use]
    pub fn new(min_secs: u64, max_secs: u64) -> Self {
        Self {
            backoff: FibonacciBackoff::new(min_secs, max_secs),
            error_count: 0,
        }
    }

    pub fn increment_error(&mut self) {
        self.error_count += 1;
    }

    pub fn reset(&mut self) {
        self.error_count = 0;
        self.backoff.reset();
    }
}

/// Shared context of one kind's controller
pub struct ReconcileContext<R: Managed> {
    pub client: Client,
    pub reconciler: ManagedReconciler<R>,
    /// Per-resource error backoff, keyed by `<Kind>/<name>`
    pub backoff_states: Arc<Mutex<HashMap<String, BackoffState>>>,
    pub backoff_min_secs: u64,
    pub backoff_max_secs: u64,
}

impl<R: Managed> ReconcileContext<R> {
    #[must_use]
    pub fn new(
        client: Client,
        reconciler: ManagedReconciler<R>,
        backoff_min_secs: u64,
        backoff_max_secs: u64,
    ) -> Self {
        Self {
            client,
            reconciler,
            backoff_states: Arc::default(),
            backoff_min_secs,
            backoff_max_secs,
        }
    }
}

impl<R: Managed> fmt::Debug for ReconcileContext<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReconcileContext")
            .field("kind", &R::kind(&()))
            .field("reconciler", &self.reconciler)
            .finish_non_exhaustive()
    }
}

/// Key of a resource in the backoff map
pub(crate) fn backoff_key<R: Managed>(cr: &R) -> String {
    format!("{}/{}", R::kind(&()), cr.resource_name())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_state_reset() {
        let mut state = BackoffState::new(1, 10);
        state.increment_error();
        state.increment_error();
        state.backoff.next_backoff_seconds();
        state.backoff.next_backoff_seconds();
        state.backoff.next_backoff_seconds();
        state.reset();
        assert_eq!(state.error_count, 0);
        assert_eq!(state.backoff.next_backoff_seconds(), 1);
    }

    #[test]
    fn test_external_error_is_transparent() {
        let err = ReconcilerError::from(managed::Error::Session(anyhow::anyhow!(
            "ProviderConfig default not found"
        )));
        assert_eq!(
            err.to_string(),
            "cannot create a new session: ProviderConfig default not found"
        );
    }
}

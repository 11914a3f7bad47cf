//! # Reconcile Entry Point
//!
//! Called by `kube_runtime::Controller` for every change and requeue of a
//! managed resource. The finalizer helper routes live resources to
//! [`ManagedReconciler::apply`](super::ManagedReconciler::apply) and deleted
//! ones to [`ManagedReconciler::cleanup`](super::ManagedReconciler::cleanup).

use super::types::{backoff_key, ReconcileContext, ReconcilerError};
use crate::constants::MANAGED_FINALIZER;
use crate::crd::Managed;
use crate::observability::metrics;
use kube::api::Api;
use kube_runtime::controller::Action;
use kube_runtime::finalizer::{finalizer, Error as FinalizerError, Event as FinalizerEvent};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info_span, warn, Instrument};

pub async fn reconcile<R: Managed>(
    obj: Arc<R>,
    ctx: Arc<ReconcileContext<R>>,
) -> Result<Action, ReconcilerError> {
    let kind = R::kind(&()).to_string();
    let name = obj.resource_name().to_string();
    let key = backoff_key(obj.as_ref());
    let span = info_span!(
        "managed.reconcile",
        resource.kind = %kind,
        resource.name = %name,
        resource.generation = obj.meta().generation.unwrap_or(0)
    );

    async move {
        let start = Instant::now();
        metrics::increment_reconciliations(&kind);

        let api: Api<R> = Api::all(ctx.client.clone());
        let reconciler = &ctx.reconciler;
        let result = finalizer(&api, MANAGED_FINALIZER, obj, |event| async move {
            match event {
                FinalizerEvent::Apply(obj) => {
                    let mut cr = (*obj).clone();
                    reconciler.apply(&mut cr).await
                }
                FinalizerEvent::Cleanup(obj) => {
                    let mut cr = (*obj).clone();
                    reconciler.cleanup(&mut cr).await
                }
            }
        })
        .await;

        metrics::observe_reconciliation_duration(&kind, start.elapsed().as_secs_f64());

        match result {
            Ok(action) => {
                reset_backoff(&ctx, &key);
                Ok(action)
            }
            Err(FinalizerError::ApplyFailed(e) | FinalizerError::CleanupFailed(e)) => Err(e),
            Err(e) => Err(ReconcilerError::Finalizer(Box::new(e))),
        }
    }
    .instrument(span)
    .await
}

fn reset_backoff<R: Managed>(ctx: &ReconcileContext<R>, key: &str) {
    match ctx.backoff_states.lock() {
        Ok(mut states) => {
            if let Some(state) = states.get_mut(key) {
                state.reset();
            }
        }
        Err(e) => warn!("Failed to lock backoff_states: {}", e),
    }
}

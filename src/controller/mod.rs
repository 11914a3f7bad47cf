//! # Controller
//!
//! Per-kind controllers and the machinery they share.
//!
//! - `reconciler`: Generic managed resource reconciliation
//! - `connector`: ProviderConfig to AWS client resolution
//! - `backoff`: Fibonacci backoff for failing resources
//! - `iam`, `glue`, `apigatewayv2`, `sesv2`, `ec2`: One module per AWS service

pub mod apigatewayv2;
pub mod backoff;
pub mod connector;
pub mod ec2;
pub mod glue;
pub mod iam;
pub mod reconciler;
pub mod sesv2;

use crate::config::ControllerConfig;
use crate::crd::{Condition, Managed};
use crate::managed::{
    ExternalObservation, Initializer, KubeResourceUpdater, Mapping, ResourceUpdater,
    SecretPublisher,
};
use crate::provider::SessionResolver;
use connector::{AwsConnector, BuildFn, RegionFn};
use kube::Client;
use reconciler::{ManagedReconciler, ReconcileContext};
use std::sync::Arc;

/// Builds a kind's initializers around the shared updater
pub type InitializersFn<R> = fn(Arc<dyn ResourceUpdater<R>>) -> Vec<Arc<dyn Initializer<R>>>;

/// Wire a kind's connector and initializers into a controller context
pub(crate) fn managed_context<R: Managed>(
    client: &Client,
    config: &ControllerConfig,
    region: RegionFn<R>,
    build: BuildFn<R>,
    initializers: InitializersFn<R>,
) -> ReconcileContext<R> {
    let updater: Arc<dyn ResourceUpdater<R>> = Arc::new(KubeResourceUpdater::new(client.clone()));
    let connector = AwsConnector::new(SessionResolver::new(client.clone()), region, build);

    let reconciler = ManagedReconciler::new(
        Arc::new(connector),
        Arc::clone(&updater),
        Arc::new(SecretPublisher::new(client.clone())),
    )
    .with_initializers(initializers(updater))
    .with_poll_interval(config.poll_interval())
    .with_create_grace(config.create_grace_requeue());

    ReconcileContext::new(
        client.clone(),
        reconciler,
        config.backoff_min_secs,
        config.backoff_max_secs,
    )
}

/// Post-observe hook: an observed resource is usable
pub(crate) fn set_available<M: Mapping>(
    cr: &mut M::Resource,
    _: &M::DescribeOutput,
    obs: ExternalObservation,
) -> anyhow::Result<ExternalObservation> {
    cr.set_conditions([Condition::available()]);
    Ok(obs)
}

//! # Managed Reconciler
//!
//! Drives one managed resource towards its desired state:
//!
//! 1. Initializers (external-name defaulting, tagging)
//! 2. Connect and observe the external resource
//! 3. Create, late-initialize, or update as the management policies allow
//! 4. Publish connection details and report `Synced`
//!
//! Deletion goes through [`ManagedReconciler::cleanup`], which deletes the
//! external resource unless it is orphaned and only lets the finalizer go
//! once the resource is no longer observed.

use super::types::ReconcilerError;
use crate::crd::{Condition, DeletionPolicy, Managed, ManagementAction};
use crate::managed::{
    ConnectionDetails, ConnectionPublisher, ExternalClient, ExternalConnecter, ExternalObservation,
    Initializer, ResourceUpdater,
};
use anyhow::Context;
use kube_runtime::controller::Action;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

pub struct ManagedReconciler<R: Managed> {
    connecter: Arc<dyn ExternalConnecter<R>>,
    initializers: Vec<Arc<dyn Initializer<R>>>,
    updater: Arc<dyn ResourceUpdater<R>>,
    publisher: Arc<dyn ConnectionPublisher<R>>,
    poll_interval: Duration,
    create_grace: Duration,
}

impl<R: Managed> fmt::Debug for ManagedReconciler<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManagedReconciler")
            .field("initializers", &self.initializers.len())
            .field("poll_interval", &self.poll_interval)
            .field("create_grace", &self.create_grace)
            .finish_non_exhaustive()
    }
}

impl<R: Managed> ManagedReconciler<R> {
    pub fn new(
        connecter: Arc<dyn ExternalConnecter<R>>,
        updater: Arc<dyn ResourceUpdater<R>>,
        publisher: Arc<dyn ConnectionPublisher<R>>,
    ) -> Self {
        Self {
            connecter,
            initializers: Vec::new(),
            updater,
            publisher,
            poll_interval: Duration::from_secs(crate::constants::DEFAULT_POLL_INTERVAL_SECS),
            create_grace: Duration::from_secs(crate::constants::DEFAULT_CREATE_GRACE_REQUEUE_SECS),
        }
    }

    #[must_use]
    pub fn with_initializers(mut self, initializers: Vec<Arc<dyn Initializer<R>>>) -> Self {
        self.initializers = initializers;
        self
    }

    #[must_use]
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    #[must_use]
    pub fn with_create_grace(mut self, grace: Duration) -> Self {
        self.create_grace = grace;
        self
    }

    /// Reconcile a resource that is not being deleted
    pub async fn apply(&self, cr: &mut R) -> Result<Action, ReconcilerError> {
        if !cr.management_policies().allows(ManagementAction::Observe) {
            info!("⏸️  {} {} is paused", R::kind(&()), cr.resource_name());
            cr.set_conditions([Condition::reconcile_paused()]);
            self.updater.update_status(cr).await?;
            return Ok(Action::await_change());
        }

        match self.sync(cr).await {
            Ok(action) => Ok(action),
            Err(err) => {
                self.record_failure(cr, &err).await;
                Err(err)
            }
        }
    }

    /// Handle a deletion request; `Ok` releases the finalizer
    pub async fn cleanup(&self, cr: &mut R) -> Result<Action, ReconcilerError> {
        let policies = cr.management_policies();
        if cr.deletion_policy() == DeletionPolicy::Orphan
            || !policies.allows(ManagementAction::Delete)
            || !policies.allows(ManagementAction::Observe)
        {
            info!(
                "Orphaning external resource of {} {}",
                R::kind(&()),
                cr.resource_name()
            );
            return Ok(Action::await_change());
        }

        match self.delete_external(cr).await {
            Ok(action) => Ok(action),
            Err(ReconcilerError::DeletionPending) => Err(ReconcilerError::DeletionPending),
            Err(err) => {
                self.record_failure(cr, &err).await;
                Err(err)
            }
        }
    }

    async fn sync(&self, cr: &mut R) -> Result<Action, ReconcilerError> {
        for initializer in &self.initializers {
            initializer.initialize(cr).await?;
        }

        let client = self.connecter.connect(cr).await?;
        let observation = client.observe(cr).await?;
        let policies = cr.management_policies().clone();

        if !observation.resource_exists {
            if !policies.allows(ManagementAction::Create) {
                return Err(ReconcilerError::ExternalResourceMissing {
                    kind: R::kind(&()).to_string(),
                    name: cr.resource_name().to_string(),
                });
            }
            return self.create(cr, client.as_ref()).await;
        }

        if observation.resource_late_initialized
            && policies.allows(ManagementAction::LateInitialize)
        {
            debug!("Persisting late-initialized spec of {}", cr.resource_name());
            self.updater
                .update(cr)
                .await
                .context("cannot persist late-initialized spec")?;
        }

        let mut details = observation.connection_details.clone();
        if observation.resource_up_to_date {
            debug!("{} {} is up to date", R::kind(&()), cr.resource_name());
        } else if policies.allows(ManagementAction::Update) {
            info!(
                "🔄 Updating external {} {}: {}",
                R::kind(&()),
                cr.resource_name(),
                observation.diff
            );
            let update = client.update(cr).await?;
            details.extend(update.connection_details);
        } else {
            warn!(
                "{} {} drifted but updates are not allowed: {}",
                R::kind(&()),
                cr.resource_name(),
                observation.diff
            );
        }

        self.succeed(cr, &details).await?;
        Ok(Action::requeue(self.poll_interval))
    }

    async fn create(
        &self,
        cr: &mut R,
        client: &dyn ExternalClient<R>,
    ) -> Result<Action, ReconcilerError> {
        info!("✨ Creating external {} {}", R::kind(&()), cr.resource_name());
        let creation = client.create(cr).await?;

        // The external name may only be known after create
        self.updater
            .update(cr)
            .await
            .context("cannot persist external name after create")?;

        self.succeed(cr, &creation.connection_details).await?;
        Ok(Action::requeue(self.create_grace))
    }

    async fn delete_external(&self, cr: &mut R) -> Result<Action, ReconcilerError> {
        let client = self.connecter.connect(cr).await?;
        if !client.observe(cr).await?.resource_exists {
            return Ok(Action::await_change());
        }

        info!("🗑️  Deleting external {} {}", R::kind(&()), cr.resource_name());
        client.delete(cr).await?;
        if let Err(e) = self.updater.update_status(cr).await {
            warn!("Failed to record deletion status: {:#}", e);
        }

        let ExternalObservation {
            resource_exists, ..
        } = client.observe(cr).await?;
        if resource_exists {
            return Err(ReconcilerError::DeletionPending);
        }
        Ok(Action::await_change())
    }

    async fn succeed(&self, cr: &mut R, details: &ConnectionDetails) -> Result<(), ReconcilerError> {
        self.publisher
            .publish(cr, details)
            .await
            .context("cannot publish connection details")?;
        cr.set_conditions([Condition::reconcile_success()]);
        self.updater.update_status(cr).await?;
        Ok(())
    }

    /// Best-effort `Synced=False` status for a failed reconcile
    async fn record_failure(&self, cr: &mut R, err: &ReconcilerError) {
        cr.set_conditions([Condition::reconcile_error(err.to_string())]);
        if let Err(e) = self.updater.update_status(cr).await {
            warn!(
                "Failed to record reconcile error on {} {}: {:#}",
                R::kind(&()),
                cr.resource_name(),
                e
            );
        }
    }
}

//! # Resource Persistence
//!
//! Writes managed resources back to the Kubernetes API. Spec and metadata
//! changes (tags, late-initialized fields, the external-name annotation) go
//! through a full replace; status goes through the status subresource.

use crate::constants::FIELD_MANAGER;
use crate::crd::Managed;
use anyhow::{Context, Result};
use async_trait::async_trait;
use kube::api::{Api, Patch, PatchParams, PostParams};
use kube::{Client, Resource};
use std::fmt;
use tracing::debug;

/// Persists a managed resource
#[async_trait]
pub trait ResourceUpdater<R: Managed>: Send + Sync {
    /// Persist spec and metadata, refreshing `cr`'s resource version
    async fn update(&self, cr: &mut R) -> Result<()>;

    /// Persist `status`
    async fn update_status(&self, cr: &R) -> Result<()>;
}

/// [`ResourceUpdater`] backed by the Kubernetes API
#[derive(Clone)]
pub struct KubeResourceUpdater {
    client: Client,
}

impl KubeResourceUpdater {
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

impl fmt::Debug for KubeResourceUpdater {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KubeResourceUpdater").finish_non_exhaustive()
    }
}

#[async_trait]
impl<R: Managed> ResourceUpdater<R> for KubeResourceUpdater {
    async fn update(&self, cr: &mut R) -> Result<()> {
        let api: Api<R> = Api::all(self.client.clone());
        let name = cr.resource_name().to_string();

        let updated = api
            .replace(&name, &PostParams::default(), cr)
            .await
            .with_context(|| format!("Failed to update {} {}", R::kind(&()), name))?;

        // Keep in-memory status; only the version moves forward
        cr.meta_mut().resource_version = updated.meta().resource_version.clone();
        debug!("Updated {} {}", R::kind(&()), name);
        Ok(())
    }

    async fn update_status(&self, cr: &R) -> Result<()> {
        let api: Api<R> = Api::all(self.client.clone());
        let name = cr.resource_name();

        let status = serde_json::to_value(cr)
            .context("Failed to serialize managed resource")?
            .get("status")
            .cloned()
            .unwrap_or(serde_json::Value::Null);
        let patch = serde_json::json!({ "status": status });

        api.patch_status(name, &PatchParams::apply(FIELD_MANAGER), &Patch::Merge(patch))
            .await
            .with_context(|| format!("Failed to update status of {} {}", R::kind(&()), name))?;

        debug!("Updated status of {} {}", R::kind(&()), name);
        Ok(())
    }
}

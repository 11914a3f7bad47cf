//! # External Name Initializer
//!
//! Kinds whose provider-side identifier is chosen by the user (IAM roles,
//! Glue connections, SES configuration sets) default the external-name
//! annotation to `metadata.name`.

use super::error::Error;
use super::external::Initializer;
use super::store::ResourceUpdater;
use crate::crd::Managed;
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

pub struct NameAsExternalName<R: Managed> {
    updater: Arc<dyn ResourceUpdater<R>>,
}

impl<R: Managed> NameAsExternalName<R> {
    pub fn new(updater: Arc<dyn ResourceUpdater<R>>) -> Self {
        Self { updater }
    }
}

impl<R: Managed> fmt::Debug for NameAsExternalName<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NameAsExternalName").finish_non_exhaustive()
    }
}

#[async_trait]
impl<R: Managed> Initializer<R> for NameAsExternalName<R> {
    async fn initialize(&self, cr: &mut R) -> Result<(), Error> {
        if cr.external_name().is_some() {
            return Ok(());
        }

        let name = cr.resource_name().to_string();
        debug!("Defaulting external name of {} to {}", R::kind(&()), name);
        cr.set_external_name(name);
        self.updater
            .update(cr)
            .await
            .map_err(|source| Error::KubeUpdate {
                kind: R::kind(&()).to_string(),
                source,
            })
    }
}

//! # AWS Connector
//!
//! [`ExternalConnecter`] shared by every kind: resolves the resource's
//! ProviderConfig into an `SdkConfig` for the resource's region and hands it
//! to the kind's client constructor.

use crate::crd::Managed;
use crate::managed::{Error, ExternalClient, ExternalConnecter};
use crate::provider::SessionResolver;
use async_trait::async_trait;
use aws_config::SdkConfig;
use std::fmt;

/// Region a resource's AWS calls go to
pub type RegionFn<R> = fn(&R) -> String;

/// Builds the kind's external client from resolved credentials
pub type BuildFn<R> = fn(&SdkConfig) -> Box<dyn ExternalClient<R>>;

pub struct AwsConnector<R: Managed> {
    sessions: SessionResolver,
    region: RegionFn<R>,
    build: BuildFn<R>,
}

impl<R: Managed> AwsConnector<R> {
    #[must_use]
    pub fn new(sessions: SessionResolver, region: RegionFn<R>, build: BuildFn<R>) -> Self {
        Self {
            sessions,
            region,
            build,
        }
    }
}

impl<R: Managed> fmt::Debug for AwsConnector<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AwsConnector")
            .field("kind", &R::kind(&()))
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl<R: Managed> ExternalConnecter<R> for AwsConnector<R> {
    async fn connect(&self, cr: &R) -> Result<Box<dyn ExternalClient<R>>, Error> {
        let region = (self.region)(cr);
        let config = self
            .sessions
            .sdk_config(cr, &region)
            .await
            .map_err(Error::Session)?;
        Ok((self.build)(&config))
    }
}

//! # External Client Contract
//!
//! The traits a managed resource kind plugs into the reconciler with:
//!
//! - [`ExternalConnecter`] resolves credentials for one resource and returns an [`ExternalClient`]
//! - [`ExternalClient`] observes, creates, updates and deletes the external resource
//! - [`Initializer`] runs before every reconcile (external-name defaulting, tagging)
//!
//! All traits are generic over the concrete resource type, so a client for one
//! kind cannot be handed a resource of another kind.

use super::error::Error;
use crate::crd::Managed;
use async_trait::async_trait;
use std::collections::BTreeMap;

/// Sensitive values published to the connection secret
pub type ConnectionDetails = BTreeMap<String, Vec<u8>>;

/// Result of observing the external resource
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExternalObservation {
    pub resource_exists: bool,
    pub resource_up_to_date: bool,
    /// Late initialization changed the spec and it needs persisting
    pub resource_late_initialized: bool,
    pub connection_details: ConnectionDetails,
    /// Human-readable description of what is out of date
    pub diff: String,
}

impl ExternalObservation {
    /// Observation of an external resource that does not exist
    #[must_use]
    pub fn missing() -> Self {
        Self::default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExternalCreation {
    pub connection_details: ConnectionDetails,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExternalUpdate {
    pub connection_details: ConnectionDetails,
}

/// Operations on the external resource backing one managed resource
///
/// Implementations are created per reconcile by an [`ExternalConnecter`].
#[async_trait]
pub trait ExternalClient<R: Managed>: Send + Sync {
    /// Report whether the external resource exists and is up to date.
    /// May late-initialize the spec and always refreshes observed status.
    async fn observe(&self, cr: &mut R) -> Result<ExternalObservation, Error>;

    /// Create the external resource, recording its identifier on `cr`
    async fn create(&self, cr: &mut R) -> Result<ExternalCreation, Error>;

    async fn update(&self, cr: &mut R) -> Result<ExternalUpdate, Error>;

    /// Delete the external resource; an already missing resource is not an error
    async fn delete(&self, cr: &mut R) -> Result<(), Error>;
}

/// Produces an [`ExternalClient`] bound to the credentials of one resource
#[async_trait]
pub trait ExternalConnecter<R: Managed>: Send + Sync {
    async fn connect(&self, cr: &R) -> Result<Box<dyn ExternalClient<R>>, Error>;
}

/// Runs before any external call on every reconcile
#[async_trait]
pub trait Initializer<R: Managed>: Send + Sync {
    async fn initialize(&self, cr: &mut R) -> Result<(), Error>;
}

//! # Connection Controller
//!
//! Glue Data Catalog connections, addressed by the external name within the
//! optional `catalogID`.

use crate::config::ControllerConfig;
use crate::controller::reconciler::ReconcileContext;
use crate::controller::{managed_context, set_available};
use crate::crd::{Connection, ConnectionObservation, ConnectionParameters, Managed};
use crate::managed::{
    External, ExternalClient, Hooks, Initializer, Mapping, NameAsExternalName, ResourceUpdater,
    ServiceApi,
};
use crate::provider::glue::{ConnectionKey, ConnectionWrite, GlueClient, GlueConnection};
use crate::provider::ApiError;
use anyhow::Result;
use async_trait::async_trait;
use aws_config::SdkConfig;
use kube::Client;
use std::sync::Arc;

pub fn setup(client: &Client, config: &ControllerConfig) -> ReconcileContext<Connection> {
    managed_context(client, config, region, connect, initializers)
}

fn region(cr: &Connection) -> String {
    cr.spec.for_provider.region.clone()
}

fn connect(config: &SdkConfig) -> Box<dyn ExternalClient<Connection>> {
    Box::new(External::new(GlueClient::new(config), hooks()))
}

fn initializers(
    updater: Arc<dyn ResourceUpdater<Connection>>,
) -> Vec<Arc<dyn Initializer<Connection>>> {
    vec![Arc::new(NameAsExternalName::new(updater))]
}

#[must_use]
pub fn hooks() -> Hooks<ConnectionMapping> {
    Hooks {
        post_observe: set_available::<ConnectionMapping>,
        late_initialize,
        is_up_to_date,
        ..Hooks::default()
    }
}

#[derive(Debug)]
pub struct ConnectionMapping;

fn key(cr: &Connection) -> ConnectionKey {
    ConnectionKey {
        catalog_id: cr.spec.for_provider.catalog_id.clone(),
        name: cr.external_name().unwrap_or_default().to_string(),
    }
}

fn write(cr: &Connection) -> ConnectionWrite {
    ConnectionWrite {
        key: key(cr),
        input: cr.spec.for_provider.connection_input.clone(),
    }
}

impl Mapping for ConnectionMapping {
    type Resource = Connection;
    type Parameters = ConnectionParameters;

    type DescribeInput = ConnectionKey;
    type DescribeOutput = GlueConnection;
    type CreateInput = ConnectionWrite;
    type CreateOutput = ();
    type UpdateInput = ConnectionWrite;
    type UpdateOutput = ();
    type DeleteInput = ConnectionKey;
    type DeleteOutput = ();

    const KIND: &'static str = "Connection";

    fn for_provider(cr: &Connection) -> &ConnectionParameters {
        &cr.spec.for_provider
    }

    fn for_provider_mut(cr: &mut Connection) -> &mut ConnectionParameters {
        &mut cr.spec.for_provider
    }

    fn describe_input(cr: &Connection) -> ConnectionKey {
        key(cr)
    }

    fn create_input(cr: &Connection) -> ConnectionWrite {
        write(cr)
    }

    fn update_input(cr: &Connection) -> ConnectionWrite {
        write(cr)
    }

    fn delete_input(cr: &Connection) -> ConnectionKey {
        key(cr)
    }

    fn observe_into(cr: &mut Connection, output: &GlueConnection) {
        cr.status.get_or_insert_with(Default::default).at_provider = ConnectionObservation {
            creation_time: output.creation_time.clone(),
            last_updated_by: output.last_updated_by.clone(),
            last_updated_time: output.last_updated_time.clone(),
        };
    }
}

#[async_trait]
impl ServiceApi<ConnectionMapping> for GlueClient {
    async fn describe(&self, input: ConnectionKey) -> Result<GlueConnection, ApiError> {
        self.get_connection(input).await
    }

    async fn create(&self, input: ConnectionWrite) -> Result<(), ApiError> {
        self.create_connection(input).await
    }

    async fn update(&self, input: ConnectionWrite) -> Result<(), ApiError> {
        self.update_connection(input).await
    }

    async fn delete(&self, input: ConnectionKey) -> Result<(), ApiError> {
        self.delete_connection(input).await
    }
}

fn late_initialize(params: &mut ConnectionParameters, observed: &GlueConnection) -> Result<()> {
    let input = &mut params.connection_input;
    if input.description.is_none() {
        input.description.clone_from(&observed.input.description);
    }
    if input.match_criteria.is_empty() {
        input.match_criteria.clone_from(&observed.input.match_criteria);
    }
    if input.physical_connection_requirements.is_none() {
        input
            .physical_connection_requirements
            .clone_from(&observed.input.physical_connection_requirements);
    }
    Ok(())
}

fn is_up_to_date(cr: &Connection, observed: &GlueConnection) -> Result<(bool, String)> {
    let desired = &cr.spec.for_provider.connection_input;
    let current = &observed.input;

    let mut diff = Vec::new();
    if desired.connection_type != current.connection_type {
        diff.push("connectionType");
    }
    if desired.connection_properties != current.connection_properties {
        diff.push("connectionProperties");
    }
    if desired.description != current.description {
        diff.push("description");
    }
    if desired.match_criteria != current.match_criteria {
        diff.push("matchCriteria");
    }
    if desired.physical_connection_requirements != current.physical_connection_requirements {
        diff.push("physicalConnectionRequirements");
    }
    Ok((diff.is_empty(), diff.join(", ")))
}

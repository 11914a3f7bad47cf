//! # VPCEndpointServiceConfiguration Controller
//!
//! The service id is issued by EC2 on create and becomes the external name.
//! EC2 reports the lifecycle through `serviceState`, which drives the
//! `Ready` condition. Updates are incremental: load balancers and IP address
//! types are added and removed rather than replaced.

use crate::config::ControllerConfig;
use crate::controller::managed_context;
use crate::controller::reconciler::ReconcileContext;
use crate::crd::{
    Condition, Managed, VpcEndpointServiceConfiguration,
    VpcEndpointServiceConfigurationObservation, VpcEndpointServiceConfigurationParameters,
};
use crate::managed::{
    External, ExternalClient, ExternalCreation, ExternalObservation, Hooks, Initializer, Mapping,
    ResourceUpdater, ServiceApi, Tagged, Tagger,
};
use crate::provider::ec2::{
    CreateServiceConfiguration, Ec2Client, ModifyServiceConfiguration, ServiceConfiguration,
};
use crate::provider::ApiError;
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use aws_config::SdkConfig;
use kube::Client;
use std::sync::Arc;

const STATE_PENDING: &str = "Pending";
const STATE_AVAILABLE: &str = "Available";
const STATE_DELETING: &str = "Deleting";
const STATE_DELETED: &str = "Deleted";
const STATE_FAILED: &str = "Failed";

pub fn setup(
    client: &Client,
    config: &ControllerConfig,
) -> ReconcileContext<VpcEndpointServiceConfiguration> {
    managed_context(client, config, region, connect, initializers)
}

fn region(cr: &VpcEndpointServiceConfiguration) -> String {
    cr.spec.for_provider.region.clone()
}

fn connect(config: &SdkConfig) -> Box<dyn ExternalClient<VpcEndpointServiceConfiguration>> {
    Box::new(External::new(Ec2Client::new(config), hooks()))
}

fn initializers(
    updater: Arc<dyn ResourceUpdater<VpcEndpointServiceConfiguration>>,
) -> Vec<Arc<dyn Initializer<VpcEndpointServiceConfiguration>>> {
    vec![Arc::new(Tagger::new(updater))]
}

#[must_use]
pub fn hooks() -> Hooks<ServiceConfigurationMapping> {
    Hooks {
        post_observe,
        late_initialize,
        is_up_to_date,
        post_create,
        ..Hooks::default()
    }
}

/// Desired parameters of an existing service
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceConfigurationUpdate {
    pub service_id: String,
    pub desired: VpcEndpointServiceConfigurationParameters,
}

#[derive(Debug)]
pub struct ServiceConfigurationMapping;

fn service_id(cr: &VpcEndpointServiceConfiguration) -> String {
    cr.external_name().unwrap_or_default().to_string()
}

impl Mapping for ServiceConfigurationMapping {
    type Resource = VpcEndpointServiceConfiguration;
    type Parameters = VpcEndpointServiceConfigurationParameters;

    type DescribeInput = String;
    type DescribeOutput = ServiceConfiguration;
    type CreateInput = CreateServiceConfiguration;
    type CreateOutput = ServiceConfiguration;
    type UpdateInput = ServiceConfigurationUpdate;
    type UpdateOutput = ();
    type DeleteInput = String;
    type DeleteOutput = ();

    const KIND: &'static str = "VPCEndpointServiceConfiguration";

    fn for_provider(
        cr: &VpcEndpointServiceConfiguration,
    ) -> &VpcEndpointServiceConfigurationParameters {
        &cr.spec.for_provider
    }

    fn for_provider_mut(
        cr: &mut VpcEndpointServiceConfiguration,
    ) -> &mut VpcEndpointServiceConfigurationParameters {
        &mut cr.spec.for_provider
    }

    fn describe_input(cr: &VpcEndpointServiceConfiguration) -> String {
        service_id(cr)
    }

    fn create_input(cr: &VpcEndpointServiceConfiguration) -> CreateServiceConfiguration {
        let params = &cr.spec.for_provider;
        CreateServiceConfiguration {
            acceptance_required: params.acceptance_required,
            private_dns_name: params.private_dns_name.clone(),
            gateway_load_balancer_arns: params.gateway_load_balancer_arns.clone(),
            network_load_balancer_arns: params.network_load_balancer_arns.clone(),
            supported_ip_address_types: params.supported_ip_address_types.clone(),
            tags: cr.tags().to_vec(),
        }
    }

    fn update_input(cr: &VpcEndpointServiceConfiguration) -> ServiceConfigurationUpdate {
        ServiceConfigurationUpdate {
            service_id: service_id(cr),
            desired: cr.spec.for_provider.clone(),
        }
    }

    fn delete_input(cr: &VpcEndpointServiceConfiguration) -> String {
        service_id(cr)
    }

    fn observe_into(cr: &mut VpcEndpointServiceConfiguration, output: &ServiceConfiguration) {
        cr.status.get_or_insert_with(Default::default).at_provider =
            VpcEndpointServiceConfigurationObservation {
                service_id: output.service_id.clone(),
                service_name: output.service_name.clone(),
                service_state: output.service_state.clone(),
                base_endpoint_dns_names: output.base_endpoint_dns_names.clone(),
            };
    }
}

#[async_trait]
impl ServiceApi<ServiceConfigurationMapping> for Ec2Client {
    async fn describe(&self, input: String) -> Result<ServiceConfiguration, ApiError> {
        self.describe_service_configuration(input).await
    }

    async fn create(
        &self,
        input: CreateServiceConfiguration,
    ) -> Result<ServiceConfiguration, ApiError> {
        self.create_service_configuration(input).await
    }

    /// EC2 takes add/remove lists, so the current configuration is read first
    async fn update(&self, input: ServiceConfigurationUpdate) -> Result<(), ApiError> {
        let current = self
            .describe_service_configuration(input.service_id.clone())
            .await?;
        self.modify_service_configuration(modification(&input, &current))
            .await
    }

    async fn delete(&self, input: String) -> Result<(), ApiError> {
        self.delete_service_configuration(input).await
    }
}

/// Elements of `a` missing from `b`
fn missing_from(a: &[String], b: &[String]) -> Vec<String> {
    a.iter().filter(|v| !b.contains(v)).cloned().collect()
}

/// Changes that turn `current` into the desired configuration
#[must_use]
pub fn modification(
    update: &ServiceConfigurationUpdate,
    current: &ServiceConfiguration,
) -> ModifyServiceConfiguration {
    let desired = &update.desired;
    ModifyServiceConfiguration {
        service_id: update.service_id.clone(),
        acceptance_required: desired
            .acceptance_required
            .filter(|v| current.acceptance_required != Some(*v)),
        private_dns_name: desired
            .private_dns_name
            .clone()
            .filter(|v| current.private_dns_name.as_ref() != Some(v)),
        add_gateway_load_balancer_arns: missing_from(
            &desired.gateway_load_balancer_arns,
            &current.gateway_load_balancer_arns,
        ),
        remove_gateway_load_balancer_arns: missing_from(
            &current.gateway_load_balancer_arns,
            &desired.gateway_load_balancer_arns,
        ),
        add_network_load_balancer_arns: missing_from(
            &desired.network_load_balancer_arns,
            &current.network_load_balancer_arns,
        ),
        remove_network_load_balancer_arns: missing_from(
            &current.network_load_balancer_arns,
            &desired.network_load_balancer_arns,
        ),
        add_supported_ip_address_types: missing_from(
            &desired.supported_ip_address_types,
            &current.supported_ip_address_types,
        ),
        remove_supported_ip_address_types: missing_from(
            &current.supported_ip_address_types,
            &desired.supported_ip_address_types,
        ),
    }
}

fn post_observe(
    cr: &mut VpcEndpointServiceConfiguration,
    output: &ServiceConfiguration,
    mut obs: ExternalObservation,
) -> Result<ExternalObservation> {
    match output.service_state.as_deref() {
        Some(STATE_AVAILABLE) => cr.set_conditions([Condition::available()]),
        Some(STATE_PENDING) => cr.set_conditions([Condition::creating()]),
        Some(STATE_DELETING) => cr.set_conditions([Condition::deleting()]),
        Some(STATE_DELETED) => {
            cr.set_conditions([Condition::deleting()]);
            obs.resource_exists = false;
        }
        Some(STATE_FAILED) => cr.set_conditions([Condition::unavailable()]),
        _ => {}
    }
    Ok(obs)
}

fn late_initialize(
    params: &mut VpcEndpointServiceConfigurationParameters,
    observed: &ServiceConfiguration,
) -> Result<()> {
    if params.acceptance_required.is_none() {
        params.acceptance_required = observed.acceptance_required;
    }
    if params.private_dns_name.is_none() {
        params.private_dns_name.clone_from(&observed.private_dns_name);
    }
    if params.supported_ip_address_types.is_empty() {
        params
            .supported_ip_address_types
            .clone_from(&observed.supported_ip_address_types);
    }
    Ok(())
}

fn same_set(a: &[String], b: &[String]) -> bool {
    missing_from(a, b).is_empty() && missing_from(b, a).is_empty()
}

fn is_up_to_date(
    cr: &VpcEndpointServiceConfiguration,
    observed: &ServiceConfiguration,
) -> Result<(bool, String)> {
    let params = &cr.spec.for_provider;
    let mut diff = Vec::new();
    if params.acceptance_required.is_some()
        && params.acceptance_required != observed.acceptance_required
    {
        diff.push("acceptanceRequired");
    }
    if params.private_dns_name.is_some() && params.private_dns_name != observed.private_dns_name {
        diff.push("privateDNSName");
    }
    if !same_set(
        &params.gateway_load_balancer_arns,
        &observed.gateway_load_balancer_arns,
    ) {
        diff.push("gatewayLoadBalancerARNs");
    }
    if !same_set(
        &params.network_load_balancer_arns,
        &observed.network_load_balancer_arns,
    ) {
        diff.push("networkLoadBalancerARNs");
    }
    if !same_set(
        &params.supported_ip_address_types,
        &observed.supported_ip_address_types,
    ) {
        diff.push("supportedIPAddressTypes");
    }
    Ok((diff.is_empty(), diff.join(", ")))
}

fn post_create(
    cr: &mut VpcEndpointServiceConfiguration,
    output: &ServiceConfiguration,
    creation: ExternalCreation,
) -> Result<ExternalCreation> {
    let id = output
        .service_id
        .as_deref()
        .ok_or_else(|| anyhow!("EC2 did not return a service id"))?;
    cr.set_external_name(id);
    Ok(creation)
}

//! # EC2 VPC Endpoint Service Configuration
//!
//! `VPCEndpointServiceConfiguration.ec2.aws.crossplane.io/v1alpha1`. The
//! external name is the service ID (`vpce-svc-...`) issued by AWS on create.

use super::common::{ResourceSpec, ResourceStatus, Tag};
use super::managed::managed_resource;
use kube::CustomResource;
use serde::{Deserialize, Serialize};

/// Resource type of the tag specification carrying the service's tags
pub const VPC_ENDPOINT_SERVICE_RESOURCE_TYPE: &str = "vpc-endpoint-service";

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TagSpecification {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,
    #[serde(default)]
    pub tags: Vec<Tag>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct VpcEndpointServiceConfigurationParameters {
    pub region: String,
    /// Whether requests from consumers to create an endpoint must be accepted manually
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub acceptance_required: Option<bool>,
    #[serde(default, rename = "gatewayLoadBalancerARNs", skip_serializing_if = "Vec::is_empty")]
    pub gateway_load_balancer_arns: Vec<String>,
    #[serde(default, rename = "networkLoadBalancerARNs", skip_serializing_if = "Vec::is_empty")]
    pub network_load_balancer_arns: Vec<String>,
    #[serde(default, rename = "privateDNSName", skip_serializing_if = "Option::is_none")]
    pub private_dns_name: Option<String>,
    /// ipv4 and/or ipv6
    #[serde(default, rename = "supportedIPAddressTypes", skip_serializing_if = "Vec::is_empty")]
    pub supported_ip_address_types: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tag_specifications: Vec<TagSpecification>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct VpcEndpointServiceConfigurationObservation {
    #[serde(default, rename = "serviceID", skip_serializing_if = "Option::is_none")]
    pub service_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_name: Option<String>,
    /// Pending, Available, Deleting, Deleted or Failed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_state: Option<String>,
    #[serde(default, rename = "baseEndpointDNSNames", skip_serializing_if = "Vec::is_empty")]
    pub base_endpoint_dns_names: Vec<String>,
}

#[derive(CustomResource, Debug, Clone, Default, PartialEq, Deserialize, Serialize, schemars::JsonSchema)]
#[kube(
    group = "ec2.aws.crossplane.io",
    version = "v1alpha1",
    kind = "VPCEndpointServiceConfiguration",
    struct = "VpcEndpointServiceConfiguration",
    status = "VpcEndpointServiceConfigurationStatus",
    category = "crossplane",
    category = "managed",
    category = "aws",
    printcolumn = r#"{"name":"Ready", "type":"string", "jsonPath":".status.conditions[?(@.type==\"Ready\")].status"}"#,
    printcolumn = r#"{"name":"Synced", "type":"string", "jsonPath":".status.conditions[?(@.type==\"Synced\")].status"}"#,
    printcolumn = r#"{"name":"State", "type":"string", "jsonPath":".status.atProvider.serviceState"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct VpcEndpointServiceConfigurationSpec {
    #[serde(flatten)]
    pub resource_spec: ResourceSpec,
    pub for_provider: VpcEndpointServiceConfigurationParameters,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct VpcEndpointServiceConfigurationStatus {
    #[serde(flatten)]
    pub resource_status: ResourceStatus,
    #[serde(default)]
    pub at_provider: VpcEndpointServiceConfigurationObservation,
}

managed_resource!(VpcEndpointServiceConfiguration);

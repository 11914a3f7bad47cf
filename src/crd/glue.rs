//! # Glue Connection
//!
//! `Connection.glue.aws.crossplane.io/v1alpha1`. The external name is the connection name.

use super::common::{ResourceSpec, ResourceStatus};
use super::managed::managed_resource;
use kube::CustomResource;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Network requirements for reaching the data store
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PhysicalConnectionRequirements {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub availability_zone: Option<String>,
    #[serde(default, rename = "securityGroupIDList", skip_serializing_if = "Vec::is_empty")]
    pub security_group_id_list: Vec<String>,
    #[serde(default, rename = "subnetID", skip_serializing_if = "Option::is_none")]
    pub subnet_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionInput {
    /// JDBC, KAFKA, MONGODB, NETWORK, MARKETPLACE or CUSTOM
    pub connection_type: String,
    /// Key/value pairs used as parameters for this connection, e.g. `JDBC_CONNECTION_URL`
    #[serde(default)]
    pub connection_properties: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub match_criteria: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub physical_connection_requirements: Option<PhysicalConnectionRequirements>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionParameters {
    pub region: String,
    /// Data Catalog the connection lives in; defaults to the account ID
    #[serde(default, rename = "catalogID", skip_serializing_if = "Option::is_none")]
    pub catalog_id: Option<String>,
    pub connection_input: ConnectionInput,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionObservation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated_time: Option<String>,
}

#[derive(CustomResource, Debug, Clone, Default, PartialEq, Deserialize, Serialize, schemars::JsonSchema)]
#[kube(
    group = "glue.aws.crossplane.io",
    version = "v1alpha1",
    kind = "Connection",
    status = "ConnectionStatus",
    category = "crossplane",
    category = "managed",
    category = "aws",
    printcolumn = r#"{"name":"Ready", "type":"string", "jsonPath":".status.conditions[?(@.type==\"Ready\")].status"}"#,
    printcolumn = r#"{"name":"Synced", "type":"string", "jsonPath":".status.conditions[?(@.type==\"Synced\")].status"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionSpec {
    #[serde(flatten)]
    pub resource_spec: ResourceSpec,
    pub for_provider: ConnectionParameters,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionStatus {
    #[serde(flatten)]
    pub resource_status: ResourceStatus,
    #[serde(default)]
    pub at_provider: ConnectionObservation,
}

managed_resource!(Connection);

//! # API Gateway v2 RouteResponse
//!
//! `RouteResponse.apigatewayv2.aws.crossplane.io/v1alpha1`. The external name
//! is the route response ID issued by AWS on create.

use super::common::{ResourceSpec, ResourceStatus};
use super::managed::managed_resource;
use kube::CustomResource;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize, schemars::JsonSchema)]
pub struct ParameterConstraints {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RouteResponseParameters {
    pub region: String,
    #[serde(rename = "apiID")]
    pub api_id: String,
    #[serde(rename = "routeID")]
    pub route_id: String,
    pub route_response_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_selection_expression: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub response_models: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub response_parameters: BTreeMap<String, ParameterConstraints>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RouteResponseObservation {
    #[serde(default, rename = "routeResponseID", skip_serializing_if = "Option::is_none")]
    pub route_response_id: Option<String>,
}

#[derive(CustomResource, Debug, Clone, Default, PartialEq, Deserialize, Serialize, schemars::JsonSchema)]
#[kube(
    group = "apigatewayv2.aws.crossplane.io",
    version = "v1alpha1",
    kind = "RouteResponse",
    status = "RouteResponseStatus",
    category = "crossplane",
    category = "managed",
    category = "aws",
    printcolumn = r#"{"name":"Ready", "type":"string", "jsonPath":".status.conditions[?(@.type==\"Ready\")].status"}"#,
    printcolumn = r#"{"name":"Synced", "type":"string", "jsonPath":".status.conditions[?(@.type==\"Synced\")].status"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct RouteResponseSpec {
    #[serde(flatten)]
    pub resource_spec: ResourceSpec,
    pub for_provider: RouteResponseParameters,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RouteResponseStatus {
    #[serde(flatten)]
    pub resource_status: ResourceStatus,
    #[serde(default)]
    pub at_provider: RouteResponseObservation,
}

managed_resource!(RouteResponse);

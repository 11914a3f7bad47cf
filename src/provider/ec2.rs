//! # EC2 Client
//!
//! VPC endpoint service configuration operations. EC2 reports a missing
//! service either as `InvalidVpcEndpointServiceId.NotFound` or as an empty
//! describe result; both become [`ApiError::NotFound`].

use super::ApiError;
use crate::crd::{Tag, VPC_ENDPOINT_SERVICE_RESOURCE_TYPE};
use aws_config::SdkConfig;
use aws_sdk_ec2::types::{self as sdk, ResourceType};
use aws_sdk_ec2::Client as Ec2SdkClient;
use std::fmt;

const NOT_FOUND_CODE: &str = "InvalidVpcEndpointServiceId.NotFound";
const NOT_FOUND: &[&str] = &[NOT_FOUND_CODE];

/// A service configuration as reported by EC2
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceConfiguration {
    pub service_id: Option<String>,
    pub service_name: Option<String>,
    /// `Pending`, `Available`, `Deleting`, `Deleted` or `Failed`
    pub service_state: Option<String>,
    pub acceptance_required: Option<bool>,
    pub private_dns_name: Option<String>,
    pub gateway_load_balancer_arns: Vec<String>,
    pub network_load_balancer_arns: Vec<String>,
    pub supported_ip_address_types: Vec<String>,
    pub base_endpoint_dns_names: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateServiceConfiguration {
    pub acceptance_required: Option<bool>,
    pub private_dns_name: Option<String>,
    pub gateway_load_balancer_arns: Vec<String>,
    pub network_load_balancer_arns: Vec<String>,
    pub supported_ip_address_types: Vec<String>,
    pub tags: Vec<Tag>,
}

/// Incremental change to a service configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModifyServiceConfiguration {
    pub service_id: String,
    pub acceptance_required: Option<bool>,
    pub private_dns_name: Option<String>,
    pub add_gateway_load_balancer_arns: Vec<String>,
    pub remove_gateway_load_balancer_arns: Vec<String>,
    pub add_network_load_balancer_arns: Vec<String>,
    pub remove_network_load_balancer_arns: Vec<String>,
    pub add_supported_ip_address_types: Vec<String>,
    pub remove_supported_ip_address_types: Vec<String>,
}

#[derive(Clone)]
pub struct Ec2Client {
    client: Ec2SdkClient,
}

impl fmt::Debug for Ec2Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ec2Client").finish_non_exhaustive()
    }
}

fn non_empty(v: Vec<String>) -> Option<Vec<String>> {
    (!v.is_empty()).then_some(v)
}

fn from_sdk_configuration(config: &sdk::ServiceConfiguration) -> ServiceConfiguration {
    ServiceConfiguration {
        service_id: config.service_id().map(ToString::to_string),
        service_name: config.service_name().map(ToString::to_string),
        service_state: config.service_state().map(|s| s.as_str().to_string()),
        acceptance_required: config.acceptance_required(),
        private_dns_name: config.private_dns_name().map(ToString::to_string),
        gateway_load_balancer_arns: config.gateway_load_balancer_arns().to_vec(),
        network_load_balancer_arns: config.network_load_balancer_arns().to_vec(),
        supported_ip_address_types: config
            .supported_ip_address_types()
            .iter()
            .map(|t| t.as_str().to_string())
            .collect(),
        base_endpoint_dns_names: config.base_endpoint_dns_names().to_vec(),
    }
}

/// An empty describe result means the service is gone
fn first_configuration(
    configs: &[sdk::ServiceConfiguration],
    service_id: &str,
) -> Result<ServiceConfiguration, ApiError> {
    configs.first().map(from_sdk_configuration).ok_or_else(|| {
        ApiError::not_found(
            NOT_FOUND_CODE,
            format!("service configuration {service_id} not returned"),
        )
    })
}

impl Ec2Client {
    #[must_use]
    pub fn new(config: &SdkConfig) -> Self {
        Self {
            client: Ec2SdkClient::new(config),
        }
    }

    pub async fn describe_service_configuration(
        &self,
        service_id: String,
    ) -> Result<ServiceConfiguration, ApiError> {
        let output = self
            .client
            .describe_vpc_endpoint_service_configurations()
            .service_ids(&service_id)
            .send()
            .await
            .map_err(|e| ApiError::from_sdk(e, NOT_FOUND))?;

        first_configuration(output.service_configurations(), &service_id)
    }

    pub async fn create_service_configuration(
        &self,
        input: CreateServiceConfiguration,
    ) -> Result<ServiceConfiguration, ApiError> {
        let tag_specifications = (!input.tags.is_empty()).then(|| {
            vec![sdk::TagSpecification::builder()
                .resource_type(ResourceType::from(VPC_ENDPOINT_SERVICE_RESOURCE_TYPE))
                .set_tags(Some(
                    input
                        .tags
                        .iter()
                        .map(|t| sdk::Tag::builder().key(&t.key).value(&t.value).build())
                        .collect(),
                ))
                .build()]
        });

        let output = self
            .client
            .create_vpc_endpoint_service_configuration()
            .set_acceptance_required(input.acceptance_required)
            .set_private_dns_name(input.private_dns_name)
            .set_gateway_load_balancer_arns(non_empty(input.gateway_load_balancer_arns))
            .set_network_load_balancer_arns(non_empty(input.network_load_balancer_arns))
            .set_supported_ip_address_types(non_empty(input.supported_ip_address_types))
            .set_tag_specifications(tag_specifications)
            .send()
            .await
            .map_err(|e| ApiError::from_sdk(e, NOT_FOUND))?;

        Ok(output
            .service_configuration()
            .map(from_sdk_configuration)
            .unwrap_or_default())
    }

    pub async fn modify_service_configuration(
        &self,
        input: ModifyServiceConfiguration,
    ) -> Result<(), ApiError> {
        self.client
            .modify_vpc_endpoint_service_configuration()
            .service_id(input.service_id)
            .set_acceptance_required(input.acceptance_required)
            .set_private_dns_name(input.private_dns_name)
            .set_add_gateway_load_balancer_arns(non_empty(input.add_gateway_load_balancer_arns))
            .set_remove_gateway_load_balancer_arns(non_empty(
                input.remove_gateway_load_balancer_arns,
            ))
            .set_add_network_load_balancer_arns(non_empty(input.add_network_load_balancer_arns))
            .set_remove_network_load_balancer_arns(non_empty(
                input.remove_network_load_balancer_arns,
            ))
            .set_add_supported_ip_address_types(non_empty(input.add_supported_ip_address_types))
            .set_remove_supported_ip_address_types(non_empty(
                input.remove_supported_ip_address_types,
            ))
            .send()
            .await
            .map_err(|e| ApiError::from_sdk(e, NOT_FOUND))?;
        Ok(())
    }

    /// EC2 reports per-service failures in the response body rather than as an error
    pub async fn delete_service_configuration(&self, service_id: String) -> Result<(), ApiError> {
        let output = self
            .client
            .delete_vpc_endpoint_service_configurations()
            .service_ids(&service_id)
            .send()
            .await
            .map_err(|e| ApiError::from_sdk(e, NOT_FOUND))?;

        match output.unsuccessful().first().and_then(|item| item.error()) {
            Some(err) => {
                let code = err.code().unwrap_or_default();
                let message = err.message().unwrap_or_default();
                if code == NOT_FOUND_CODE {
                    Err(ApiError::not_found(code, message))
                } else {
                    Err(ApiError::service(code, message))
                }
            }
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_describe_result_is_not_found() {
        let err = first_configuration(&[], "vpce-svc-0123").unwrap_err();

        assert!(err.is_not_found());
        assert!(err.to_string().contains("vpce-svc-0123"));
    }

    #[test]
    fn test_first_configuration_is_converted() {
        let configs = [sdk::ServiceConfiguration::builder()
            .service_id("vpce-svc-0123")
            .service_state(sdk::ServiceState::Available)
            .network_load_balancer_arns("arn:aws:elasticloadbalancing:eu-west-1:1:loadbalancer/net/a/1")
            .supported_ip_address_types(sdk::ServiceConnectivityType::Ipv4)
            .build()];

        let config = first_configuration(&configs, "vpce-svc-0123").unwrap();

        assert_eq!(config.service_id.as_deref(), Some("vpce-svc-0123"));
        assert_eq!(config.service_state.as_deref(), Some("Available"));
        assert_eq!(config.network_load_balancer_arns.len(), 1);
        assert_eq!(config.supported_ip_address_types, vec!["ipv4"]);
    }
}

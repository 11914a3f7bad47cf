//! # Custom Resource Definitions
//!
//! CRD types for the AWS provider.
//!
//! ## Module Structure
//!
//! - `common.rs` - Spec/status fields shared by every managed resource
//! - `condition.rs` - `Ready`/`Synced` status conditions
//! - `managed.rs` - The `Managed` accessor trait
//! - `provider_config.rs` - Credentials configuration
//! - `iam.rs`, `glue.rs`, `apigatewayv2.rs`, `sesv2.rs`, `ec2.rs` - Managed resource kinds

mod apigatewayv2;
mod common;
mod condition;
mod ec2;
mod glue;
mod iam;
mod managed;
mod provider_config;
mod sesv2;

// Re-export all public types
pub use apigatewayv2::{
    ParameterConstraints, RouteResponse, RouteResponseObservation, RouteResponseParameters,
    RouteResponseSpec, RouteResponseStatus,
};
pub use common::{
    ConnectionSecretMetadata, DeletionPolicy, ManagementAction, ManagementPolicies,
    PublishConnectionDetailsTo, Reference, ResourceSpec, ResourceStatus, SecretKeySelector,
    SecretReference, Tag,
};
pub use condition::{
    get_condition, set_conditions, Condition, ConditionReason, ConditionStatus, ConditionType,
};
pub use ec2::{
    TagSpecification, VpcEndpointServiceConfiguration,
    VpcEndpointServiceConfigurationObservation, VpcEndpointServiceConfigurationParameters,
    VpcEndpointServiceConfigurationSpec, VpcEndpointServiceConfigurationStatus,
    VPC_ENDPOINT_SERVICE_RESOURCE_TYPE,
};
pub use glue::{
    Connection, ConnectionInput, ConnectionObservation, ConnectionParameters, ConnectionSpec,
    ConnectionStatus, PhysicalConnectionRequirements,
};
pub use iam::{Role, RoleObservation, RoleParameters, RoleSpec, RoleStatus};
pub use managed::Managed;
pub use provider_config::{
    CredentialsSource, EndpointConfig, ProviderConfig, ProviderConfigSpec, ProviderCredentials,
};
pub use sesv2::{
    ConfigurationSet, ConfigurationSetObservation, ConfigurationSetParameters,
    ConfigurationSetSpec, ConfigurationSetStatus, DeliveryOptions, ReputationOptions,
    SendingOptions,
};

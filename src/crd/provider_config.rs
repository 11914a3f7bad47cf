//! # ProviderConfig
//!
//! `ProviderConfig.aws.crossplane.io/v1beta1` tells the provider how to
//! authenticate against an AWS account. Managed resources select one through
//! `spec.providerConfigRef`.
//!
//! ```yaml
//! apiVersion: aws.crossplane.io/v1beta1
//! kind: ProviderConfig
//! metadata:
//!   name: default
//! spec:
//!   credentials:
//!     source: Secret
//!     secretRef:
//!       namespace: crossplane-system
//!       name: aws-creds
//!       key: credentials
//!   assumeRoleARN: arn:aws:iam::123456789012:role/crossplane
//! ```

use super::common::SecretKeySelector;
use kube::CustomResource;
use serde::{Deserialize, Serialize};

/// Where the base credentials come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, schemars::JsonSchema)]
pub enum CredentialsSource {
    /// AWS default credential chain of the provider pod (IRSA, env, instance profile)
    InjectedIdentity,
    /// Shared-credentials INI document stored in a Kubernetes Secret
    Secret,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProviderCredentials {
    pub source: CredentialsSource,
    /// Required when `source` is `Secret`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret_ref: Option<SecretKeySelector>,
}

/// Override for the AWS API endpoint, e.g. for LocalStack
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, schemars::JsonSchema)]
pub struct EndpointConfig {
    pub url: String,
}

#[derive(CustomResource, Debug, Clone, PartialEq, Eq, Deserialize, Serialize, schemars::JsonSchema)]
#[kube(
    group = "aws.crossplane.io",
    version = "v1beta1",
    kind = "ProviderConfig",
    category = "crossplane",
    category = "provider",
    category = "aws"
)]
#[serde(rename_all = "camelCase")]
pub struct ProviderConfigSpec {
    pub credentials: ProviderCredentials,
    /// Role assumed with the base credentials before calling AWS
    #[serde(default, rename = "assumeRoleARN", skip_serializing_if = "Option::is_none")]
    pub assume_role_arn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<EndpointConfig>,
}

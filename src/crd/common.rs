//! # Common Managed Resource Fields
//!
//! Spec and status fields shared by every managed resource kind.
//! Each kind flattens [`ResourceSpec`] into its spec and [`ResourceStatus`]
//! into its status, so the wire format matches the Crossplane resource model.

use crate::constants::DEFAULT_PROVIDER_CONFIG;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::condition::Condition;

/// What happens to the external resource when the managed resource is deleted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, schemars::JsonSchema)]
pub enum DeletionPolicy {
    /// Leave the external resource in place
    Orphan,
    /// Delete the external resource
    #[default]
    Delete,
}

/// A single management action the provider is allowed to take
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize, schemars::JsonSchema)]
pub enum ManagementAction {
    #[serde(rename = "*")]
    All,
    Observe,
    Create,
    Update,
    Delete,
    LateInitialize,
}

/// Set of actions the provider may take on the external resource
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, schemars::JsonSchema)]
#[serde(transparent)]
pub struct ManagementPolicies(pub Vec<ManagementAction>);

impl Default for ManagementPolicies {
    fn default() -> Self {
        Self(vec![ManagementAction::All])
    }
}

impl ManagementPolicies {
    /// Whether the given action is permitted
    ///
    /// An empty policy list is treated like the default (`*`).
    #[must_use]
    pub fn allows(&self, action: ManagementAction) -> bool {
        self.0.is_empty()
            || self
                .0
                .iter()
                .any(|a| *a == ManagementAction::All || *a == action)
    }

    /// Only `Observe` is allowed: the provider imports but never changes the external resource
    #[must_use]
    pub fn is_observe_only(&self) -> bool {
        self.allows(ManagementAction::Observe)
            && !self.allows(ManagementAction::Create)
            && !self.allows(ManagementAction::Update)
            && !self.allows(ManagementAction::Delete)
            && !self.allows(ManagementAction::LateInitialize)
    }
}

/// Reference to a cluster-scoped object by name
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, schemars::JsonSchema)]
pub struct Reference {
    pub name: String,
}

/// Reference to a namespaced Secret
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, schemars::JsonSchema)]
pub struct SecretReference {
    pub name: String,
    pub namespace: String,
}

/// Reference to a key within a namespaced Secret
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, schemars::JsonSchema)]
pub struct SecretKeySelector {
    pub name: String,
    pub namespace: String,
    pub key: String,
}

/// Metadata applied to published connection secrets
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionSecretMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotations: Option<BTreeMap<String, String>>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub secret_type: Option<String>,
}

/// Target for connection details published to an external secret store
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PublishConnectionDetailsTo {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_ref: Option<Reference>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ConnectionSecretMetadata>,
}

fn default_provider_config_ref() -> Option<Reference> {
    Some(Reference {
        name: DEFAULT_PROVIDER_CONFIG.to_string(),
    })
}

/// Spec fields every managed resource carries
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResourceSpec {
    /// What to do with the external resource when this resource is deleted
    #[serde(default)]
    pub deletion_policy: DeletionPolicy,
    /// Actions the provider may take on the external resource
    #[serde(default)]
    pub management_policies: ManagementPolicies,
    /// ProviderConfig holding credentials for the AWS account
    #[serde(default = "default_provider_config_ref")]
    pub provider_config_ref: Option<Reference>,
    /// Secret the connection details are written to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub write_connection_secret_to_ref: Option<SecretReference>,
    /// External secret store the connection details are published to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publish_connection_details_to: Option<PublishConnectionDetailsTo>,
}

impl Default for ResourceSpec {
    fn default() -> Self {
        Self {
            deletion_policy: DeletionPolicy::default(),
            management_policies: ManagementPolicies::default(),
            provider_config_ref: default_provider_config_ref(),
            write_connection_secret_to_ref: None,
            publish_connection_details_to: None,
        }
    }
}

/// Status fields every managed resource carries
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResourceStatus {
    /// Conditions represent the latest available observations
    #[serde(default)]
    pub conditions: Vec<Condition>,
}

/// A key/value tag as stored in resource specs
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, schemars::JsonSchema)]
pub struct Tag {
    pub key: String,
    pub value: String,
}

impl Tag {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policies_allow_everything() {
        let policies = ManagementPolicies::default();
        assert!(policies.allows(ManagementAction::Create));
        assert!(policies.allows(ManagementAction::LateInitialize));
        assert!(!policies.is_observe_only());
    }

    #[test]
    fn test_observe_only_policies() {
        let policies = ManagementPolicies(vec![ManagementAction::Observe]);
        assert!(policies.is_observe_only());
        assert!(!policies.allows(ManagementAction::Delete));
    }

    #[test]
    fn test_resource_spec_defaults_from_empty_object() {
        let spec: ResourceSpec = serde_json::from_str("{}").unwrap();
        assert_eq!(spec.deletion_policy, DeletionPolicy::Delete);
        assert_eq!(spec.provider_config_ref.unwrap().name, "default");
        assert_eq!(spec.management_policies, ManagementPolicies::default());
    }

    #[test]
    fn test_management_policy_wildcard_serializes_as_star() {
        let json = serde_json::to_string(&ManagementPolicies::default()).unwrap();
        assert_eq!(json, r#"["*"]"#);
    }
}

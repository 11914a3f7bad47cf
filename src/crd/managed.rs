//! # Managed Resource Accessors
//!
//! The [`Managed`] trait exposes the generic spec/status fields every managed
//! resource kind carries. Kinds implement the four field accessors through
//! [`managed_resource!`]; everything else is provided.

use super::common::{
    DeletionPolicy, ManagementPolicies, PublishConnectionDetailsTo, Reference, ResourceSpec,
    ResourceStatus, SecretReference,
};
use super::condition::{self, Condition, ConditionType};
use crate::constants::EXTERNAL_NAME_ANNOTATION;
use kube::Resource;
use serde::{de::DeserializeOwned, Serialize};
use std::fmt::Debug;

pub trait Managed:
    Resource<DynamicType = ()> + Clone + Debug + Serialize + DeserializeOwned + Send + Sync + 'static
{
    fn resource_spec(&self) -> &ResourceSpec;
    fn resource_spec_mut(&mut self) -> &mut ResourceSpec;
    fn resource_status(&self) -> Option<&ResourceStatus>;
    fn resource_status_mut(&mut self) -> &mut ResourceStatus;

    fn get_condition(&self, r#type: ConditionType) -> Condition {
        let conditions = self
            .resource_status()
            .map(|s| s.conditions.as_slice())
            .unwrap_or_default();
        condition::get_condition(conditions, r#type)
    }

    fn set_conditions<I>(&mut self, conditions: I)
    where
        I: IntoIterator<Item = Condition>,
        Self: Sized,
    {
        condition::set_conditions(&mut self.resource_status_mut().conditions, conditions);
    }

    fn deletion_policy(&self) -> DeletionPolicy {
        self.resource_spec().deletion_policy
    }

    fn set_deletion_policy(&mut self, policy: DeletionPolicy) {
        self.resource_spec_mut().deletion_policy = policy;
    }

    fn management_policies(&self) -> &ManagementPolicies {
        &self.resource_spec().management_policies
    }

    fn set_management_policies(&mut self, policies: ManagementPolicies) {
        self.resource_spec_mut().management_policies = policies;
    }

    fn provider_config_reference(&self) -> Option<&Reference> {
        self.resource_spec().provider_config_ref.as_ref()
    }

    fn set_provider_config_reference(&mut self, reference: Option<Reference>) {
        self.resource_spec_mut().provider_config_ref = reference;
    }

    fn write_connection_secret_to_reference(&self) -> Option<&SecretReference> {
        self.resource_spec().write_connection_secret_to_ref.as_ref()
    }

    fn set_write_connection_secret_to_reference(&mut self, reference: Option<SecretReference>) {
        self.resource_spec_mut().write_connection_secret_to_ref = reference;
    }

    fn publish_connection_details_to(&self) -> Option<&PublishConnectionDetailsTo> {
        self.resource_spec().publish_connection_details_to.as_ref()
    }

    fn set_publish_connection_details_to(&mut self, target: Option<PublishConnectionDetailsTo>) {
        self.resource_spec_mut().publish_connection_details_to = target;
    }

    /// Provider-side identifier, `None` when unset or empty
    fn external_name(&self) -> Option<&str> {
        self.meta()
            .annotations
            .as_ref()
            .and_then(|a| a.get(EXTERNAL_NAME_ANNOTATION))
            .map(String::as_str)
            .filter(|name| !name.is_empty())
    }

    fn set_external_name(&mut self, name: impl Into<String>)
    where
        Self: Sized,
    {
        self.meta_mut()
            .annotations
            .get_or_insert_with(Default::default)
            .insert(EXTERNAL_NAME_ANNOTATION.to_string(), name.into());
    }

    /// `<Kind>.<group>`, e.g. `Role.iam.aws.crossplane.io`
    fn group_kind() -> String
    where
        Self: Sized,
    {
        format!("{}.{}", Self::kind(&()), Self::group(&()))
    }

    /// `metadata.name`, empty when unset
    fn resource_name(&self) -> &str {
        self.meta().name.as_deref().unwrap_or_default()
    }
}

/// Implement [`Managed`] for CRD types whose spec flattens `resource_spec`
/// and whose status flattens `resource_status`
macro_rules! managed_resource {
    ($($kind:ty),+ $(,)?) => {
        $(
            impl $crate::crd::Managed for $kind {
                fn resource_spec(&self) -> &$crate::crd::ResourceSpec {
                    &self.spec.resource_spec
                }

                fn resource_spec_mut(&mut self) -> &mut $crate::crd::ResourceSpec {
                    &mut self.spec.resource_spec
                }

                fn resource_status(&self) -> Option<&$crate::crd::ResourceStatus> {
                    self.status.as_ref().map(|s| &s.resource_status)
                }

                fn resource_status_mut(&mut self) -> &mut $crate::crd::ResourceStatus {
                    &mut self.status.get_or_insert_with(Default::default).resource_status
                }
            }
        )+
    };
}

pub(crate) use managed_resource;

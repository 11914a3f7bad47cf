//! # CRD Validation Tests
//!
//! Managed resources as users write them: defaults of the shared spec
//! fields, the external-name annotation and the generated CRD schemas.

mod common;

use common::{connection_from_yaml, role_from_yaml, CONNECTION_YAML, ROLE_YAML};
use kube::core::CustomResourceExt;
use provider_aws::crd::{
    ConfigurationSet, Connection, DeletionPolicy, Managed, ManagementAction, ManagementPolicies,
    ProviderConfig, Role, RouteResponse, VpcEndpointServiceConfiguration,
};

#[test]
fn test_role_defaults() {
    let role = role_from_yaml(ROLE_YAML);

    assert_eq!(role.deletion_policy(), DeletionPolicy::Delete);
    assert_eq!(role.management_policies(), &ManagementPolicies::default());
    assert_eq!(
        role.provider_config_reference().map(|r| r.name.as_str()),
        Some("default")
    );
    assert!(role.write_connection_secret_to_reference().is_none());
    assert_eq!(role.external_name(), Some("app-role"));
    assert_eq!(role.spec.for_provider.tags.len(), 1);
}

#[test]
fn test_connection_explicit_fields() {
    let connection = connection_from_yaml(CONNECTION_YAML);

    assert_eq!(connection.deletion_policy(), DeletionPolicy::Orphan);
    assert_eq!(
        connection.provider_config_reference().map(|r| r.name.as_str()),
        Some("analytics")
    );
    assert_eq!(connection.external_name(), None);
    assert_eq!(
        connection.spec.for_provider.connection_input.connection_type,
        "JDBC"
    );
}

#[test]
fn test_management_policies_parse() {
    let yaml = r#"
apiVersion: iam.aws.crossplane.io/v1beta1
kind: Role
metadata:
  name: imported
spec:
  managementPolicies: ["Observe"]
  forProvider:
    assumeRolePolicyDocument: "{}"
"#;
    let role = role_from_yaml(yaml);

    let policies = role.management_policies();
    assert!(policies.allows(ManagementAction::Observe));
    assert!(!policies.allows(ManagementAction::Create));
    assert!(policies.is_observe_only());
}

#[test]
fn test_set_external_name_keeps_other_annotations() {
    let yaml = r#"
apiVersion: glue.aws.crossplane.io/v1alpha1
kind: Connection
metadata:
  name: warehouse
  annotations:
    example.com/owner: data
spec:
  forProvider:
    region: eu-west-1
    connectionInput:
      connectionType: JDBC
"#;
    let mut connection = connection_from_yaml(yaml);

    connection.set_external_name("warehouse");

    let annotations = connection.metadata.annotations.unwrap();
    assert_eq!(annotations["crossplane.io/external-name"], "warehouse");
    assert_eq!(annotations["example.com/owner"], "data");
}

#[test]
fn test_group_kind() {
    assert_eq!(Role::group_kind(), "Role.iam.aws.crossplane.io");
    assert_eq!(
        VpcEndpointServiceConfiguration::group_kind(),
        "VPCEndpointServiceConfiguration.ec2.aws.crossplane.io"
    );
}

#[test]
fn test_managed_crds_are_cluster_scoped() {
    let crds = [
        Role::crd(),
        Connection::crd(),
        RouteResponse::crd(),
        ConfigurationSet::crd(),
        VpcEndpointServiceConfiguration::crd(),
    ];

    for crd in &crds {
        assert_eq!(crd.spec.scope, "Cluster", "{}", crd.spec.names.kind);
        let version = &crd.spec.versions[0];
        assert!(version.served);
        assert!(version.storage);
        assert!(
            version
                .subresources
                .as_ref()
                .and_then(|s| s.status.as_ref())
                .is_some(),
            "{} has a status subresource",
            crd.spec.names.kind
        );
    }
}

#[test]
fn test_provider_config_crd_is_cluster_scoped() {
    let crd = ProviderConfig::crd();
    assert_eq!(crd.spec.scope, "Cluster");
    assert_eq!(crd.spec.group, "aws.crossplane.io");
}

#[test]
fn test_managed_crds_carry_categories() {
    let crd = Role::crd();
    let categories = crd.spec.names.categories.unwrap_or_default();
    assert!(categories.contains(&"managed".to_string()));
    assert!(categories.contains(&"crossplane".to_string()));
}

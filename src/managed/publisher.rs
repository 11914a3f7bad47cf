//! # Connection Details Publishing
//!
//! Connection details returned by an external client are written to the
//! Secret named by `spec.writeConnectionSecretToRef`. The Secret is owned by
//! the managed resource, so Kubernetes garbage-collects it on deletion.

use super::external::ConnectionDetails;
use crate::constants::{CONNECTION_SECRET_TYPE, FIELD_MANAGER};
use crate::crd::Managed;
use anyhow::{Context, Result};
use async_trait::async_trait;
use k8s_openapi::api::core::v1::Secret;
use k8s_openapi::ByteString;
use kube::api::{Api, ObjectMeta, Patch, PatchParams};
use kube::{Client, Resource};
use std::fmt;
use tracing::debug;

#[async_trait]
pub trait ConnectionPublisher<R: Managed>: Send + Sync {
    async fn publish(&self, cr: &R, details: &ConnectionDetails) -> Result<()>;
}

/// Build the connection Secret for `cr`, `None` when nothing should be written
pub fn connection_secret<R: Managed>(cr: &R, details: &ConnectionDetails) -> Option<Secret> {
    let target = cr.write_connection_secret_to_reference()?;
    if details.is_empty() {
        return None;
    }

    let data = details
        .iter()
        .map(|(k, v)| (k.clone(), ByteString(v.clone())))
        .collect();

    Some(Secret {
        metadata: ObjectMeta {
            name: Some(target.name.clone()),
            namespace: Some(target.namespace.clone()),
            owner_references: cr.controller_owner_ref(&()).map(|owner| vec![owner]),
            ..Default::default()
        },
        type_: Some(CONNECTION_SECRET_TYPE.to_string()),
        data: Some(data),
        ..Default::default()
    })
}

/// Publishes connection details to a Kubernetes Secret with server-side apply
#[derive(Clone)]
pub struct SecretPublisher {
    client: Client,
}

impl SecretPublisher {
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

impl fmt::Debug for SecretPublisher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretPublisher").finish_non_exhaustive()
    }
}

#[async_trait]
impl<R: Managed> ConnectionPublisher<R> for SecretPublisher {
    async fn publish(&self, cr: &R, details: &ConnectionDetails) -> Result<()> {
        let Some(secret) = connection_secret(cr, details) else {
            return Ok(());
        };
        let name = secret.metadata.name.clone().unwrap_or_default();
        let namespace = secret.metadata.namespace.clone().unwrap_or_default();

        let api: Api<Secret> = Api::namespaced(self.client.clone(), &namespace);
        api.patch(
            &name,
            &PatchParams::apply(FIELD_MANAGER).force(),
            &Patch::Apply(&secret),
        )
        .await
        .with_context(|| format!("Failed to publish connection secret {namespace}/{name}"))?;

        debug!(
            "Published {} connection details to secret {}/{}",
            details.len(),
            namespace,
            name
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crd::{Role, RoleSpec, SecretReference};

    fn role() -> Role {
        let mut role = Role::new("test", RoleSpec::default());
        role.metadata.uid = Some("1234".to_string());
        role
    }

    fn details() -> ConnectionDetails {
        ConnectionDetails::from([("arn".to_string(), b"arn:aws:iam::1:role/test".to_vec())])
    }

    #[test]
    fn test_no_secret_without_reference() {
        assert!(connection_secret(&role(), &details()).is_none());
    }

    #[test]
    fn test_no_secret_without_details() {
        let mut role = role();
        role.set_write_connection_secret_to_reference(Some(SecretReference {
            name: "conn".to_string(),
            namespace: "crossplane-system".to_string(),
        }));
        assert!(connection_secret(&role, &ConnectionDetails::new()).is_none());
    }

    #[test]
    fn test_secret_is_owned_by_resource() {
        let mut role = role();
        role.set_write_connection_secret_to_reference(Some(SecretReference {
            name: "conn".to_string(),
            namespace: "crossplane-system".to_string(),
        }));

        let secret = connection_secret(&role, &details()).unwrap();
        assert_eq!(secret.metadata.namespace.as_deref(), Some("crossplane-system"));
        assert_eq!(secret.type_.as_deref(), Some(CONNECTION_SECRET_TYPE));
        let owners = secret.metadata.owner_references.unwrap();
        assert_eq!(owners[0].kind, "Role");
        assert_eq!(owners[0].controller, Some(true));
        assert!(secret.data.unwrap().contains_key("arn"));
    }
}

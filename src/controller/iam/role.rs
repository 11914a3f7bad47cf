//! # Role Controller
//!
//! IAM roles do not fit the single-request hook shape: an update touches up
//! to five IAM calls (`UpdateRole`, `UpdateAssumeRolePolicy`,
//! `PutRolePermissionsBoundary`, `TagRole`, `UntagRole`), so the external
//! client is written out by hand against [`RoleApi`].

use crate::config::ControllerConfig;
use crate::constants::GLOBAL_REGION;
use crate::controller::managed_context;
use crate::controller::reconciler::ReconcileContext;
use crate::crd::{Condition, Managed, Role, RoleObservation, RoleParameters, Tag};
use crate::managed::{
    ConnectionDetails, Error, ExternalClient, ExternalCreation, ExternalObservation,
    ExternalUpdate, Initializer, NameAsExternalName, Operation, ResourceUpdater, Tagger,
};
use crate::provider::iam::{IamClient, IamRole, RoleApi};
use crate::provider::ApiError;
use async_trait::async_trait;
use aws_config::SdkConfig;
use kube::Client;
use percent_encoding::percent_decode_str;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

const KIND: &str = "Role";

/// Connection detail key holding the role ARN
pub const CONNECTION_KEY_ARN: &str = "arn";

/// Controller context for `Role`
pub fn setup(client: &Client, config: &ControllerConfig) -> ReconcileContext<Role> {
    managed_context(client, config, region, connect, initializers)
}

fn region(_: &Role) -> String {
    GLOBAL_REGION.to_string()
}

fn connect(config: &SdkConfig) -> Box<dyn ExternalClient<Role>> {
    Box::new(RoleExternal::new(IamClient::new(config)))
}

fn initializers(updater: Arc<dyn ResourceUpdater<Role>>) -> Vec<Arc<dyn Initializer<Role>>> {
    vec![
        Arc::new(NameAsExternalName::new(Arc::clone(&updater))),
        Arc::new(Tagger::new(updater)),
    ]
}

/// [`ExternalClient`] for IAM roles
pub struct RoleExternal<A> {
    client: A,
}

impl<A> RoleExternal<A> {
    pub fn new(client: A) -> Self {
        Self { client }
    }
}

impl<A> fmt::Debug for RoleExternal<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RoleExternal").finish_non_exhaustive()
    }
}

fn role_name(cr: &Role) -> &str {
    cr.external_name().unwrap_or_else(|| cr.resource_name())
}

fn provider_error(operation: Operation, source: ApiError) -> Error {
    Error::provider(KIND, operation, source)
}

/// Fill unset parameters from the observed role
pub fn late_initialize(params: &mut RoleParameters, observed: &IamRole) {
    if params.description.is_none() {
        params.description.clone_from(&observed.description);
    }
    if params.max_session_duration.is_none() {
        params.max_session_duration = observed.max_session_duration;
    }
    if params.path.is_none() {
        params.path.clone_from(&observed.path);
    }
    if params.permissions_boundary.is_none() {
        params.permissions_boundary.clone_from(&observed.permissions_boundary);
    }
    if params.tags.is_empty() {
        params.tags.clone_from(&observed.tags);
    }
}

/// Whether two policy documents are semantically equal
///
/// IAM returns documents URL-encoded; both sides are decoded and compared as
/// JSON values so whitespace and key order do not matter.
#[must_use]
pub fn policies_equal(desired: &str, observed: &str) -> bool {
    let decode = |doc: &str| {
        percent_decode_str(doc)
            .decode_utf8()
            .map(|d| d.into_owned())
            .unwrap_or_else(|_| doc.to_string())
    };
    let desired = decode(desired);
    let observed = decode(observed);

    match (
        serde_json::from_str::<serde_json::Value>(&desired),
        serde_json::from_str::<serde_json::Value>(&observed),
    ) {
        (Ok(a), Ok(b)) => a == b,
        _ => desired == observed,
    }
}

fn tag_map(tags: &[Tag]) -> BTreeMap<&str, &str> {
    tags.iter()
        .map(|t| (t.key.as_str(), t.value.as_str()))
        .collect()
}

/// Tags to add or overwrite, and keys to remove, to go from `observed` to `desired`
#[must_use]
pub fn diff_tags(desired: &[Tag], observed: &[Tag]) -> (Vec<Tag>, Vec<String>) {
    let current = tag_map(observed);
    let wanted = tag_map(desired);

    let add = wanted
        .iter()
        .filter(|(k, v)| current.get(*k) != Some(*v))
        .map(|(k, v)| Tag::new(*k, *v))
        .collect();
    let remove = current
        .keys()
        .filter(|k| !wanted.contains_key(*k))
        .map(ToString::to_string)
        .collect();
    (add, remove)
}

/// Compare the spec against the observed role; the second value names what differs
#[must_use]
pub fn is_up_to_date(params: &RoleParameters, observed: &IamRole) -> (bool, String) {
    let mut diff = Vec::new();
    if params.description != observed.description {
        diff.push("description");
    }
    if params.max_session_duration != observed.max_session_duration {
        diff.push("maxSessionDuration");
    }
    if !policies_equal(
        &params.assume_role_policy_document,
        observed.assume_role_policy_document.as_deref().unwrap_or_default(),
    ) {
        diff.push("assumeRolePolicyDocument");
    }
    if params.permissions_boundary.is_some()
        && params.permissions_boundary != observed.permissions_boundary
    {
        diff.push("permissionsBoundary");
    }
    if tag_map(&params.tags) != tag_map(&observed.tags) {
        diff.push("tags");
    }
    (diff.is_empty(), diff.join(", "))
}

fn observation(role: &IamRole) -> RoleObservation {
    RoleObservation {
        arn: Some(role.arn.clone()),
        role_id: Some(role.role_id.clone()),
        create_date: role.create_date.clone(),
    }
}

#[async_trait]
impl<A: RoleApi> ExternalClient<Role> for RoleExternal<A> {
    async fn observe(&self, cr: &mut Role) -> Result<ExternalObservation, Error> {
        if cr.external_name().is_none() {
            return Ok(ExternalObservation::missing());
        }

        let observed = match self.client.get_role(role_name(cr)).await {
            Ok(role) => role,
            Err(e) if e.is_not_found() => return Ok(ExternalObservation::missing()),
            Err(e) => return Err(provider_error(Operation::Describe, e)),
        };

        let current = cr.spec.for_provider.clone();
        late_initialize(&mut cr.spec.for_provider, &observed);
        cr.status.get_or_insert_with(Default::default).at_provider = observation(&observed);
        cr.set_conditions([Condition::available()]);

        let (up_to_date, diff) = is_up_to_date(&cr.spec.for_provider, &observed);
        Ok(ExternalObservation {
            resource_exists: true,
            resource_up_to_date: up_to_date,
            resource_late_initialized: cr.spec.for_provider != current,
            connection_details: ConnectionDetails::from([(
                CONNECTION_KEY_ARN.to_string(),
                observed.arn.into_bytes(),
            )]),
            diff,
        })
    }

    async fn create(&self, cr: &mut Role) -> Result<ExternalCreation, Error> {
        cr.set_conditions([Condition::creating()]);

        let created = self
            .client
            .create_role(role_name(cr), &cr.spec.for_provider)
            .await
            .map_err(|e| provider_error(Operation::Create, e))?;
        debug!("Created role {}", created.arn);
        Ok(ExternalCreation::default())
    }

    async fn update(&self, cr: &mut Role) -> Result<ExternalUpdate, Error> {
        let name = role_name(cr).to_string();
        let params = &cr.spec.for_provider;

        let observed = self
            .client
            .get_role(&name)
            .await
            .map_err(|e| provider_error(Operation::Describe, e))?;

        self.client
            .update_role(&name, params.description.as_deref(), params.max_session_duration)
            .await
            .map_err(|e| provider_error(Operation::Update, e))?;

        if !policies_equal(
            &params.assume_role_policy_document,
            observed.assume_role_policy_document.as_deref().unwrap_or_default(),
        ) {
            self.client
                .update_assume_role_policy(&name, &params.assume_role_policy_document)
                .await
                .map_err(|e| provider_error(Operation::Update, e))?;
        }

        if let Some(boundary) = &params.permissions_boundary {
            if observed.permissions_boundary.as_ref() != Some(boundary) {
                self.client
                    .put_permissions_boundary(&name, boundary)
                    .await
                    .map_err(|e| provider_error(Operation::Update, e))?;
            }
        }

        let (add, remove) = diff_tags(&params.tags, &observed.tags);
        if !add.is_empty() {
            self.client
                .tag_role(&name, &add)
                .await
                .map_err(|e| provider_error(Operation::Tag, e))?;
        }
        if !remove.is_empty() {
            self.client
                .untag_role(&name, &remove)
                .await
                .map_err(|e| provider_error(Operation::Untag, e))?;
        }

        Ok(ExternalUpdate::default())
    }

    async fn delete(&self, cr: &mut Role) -> Result<(), Error> {
        cr.set_conditions([Condition::deleting()]);

        match self.client.delete_role(role_name(cr)).await {
            Ok(()) => Ok(()),
            Err(e) if e.is_not_found() => Ok(()),
            Err(e) => Err(provider_error(Operation::Delete, e)),
        }
    }
}

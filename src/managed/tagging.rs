//! # Tagging
//!
//! Stamps the reserved identifying tags onto a resource's tag list:
//!
//! | Key | Value |
//! |-----|-------|
//! | `Name` | `metadata.name` |
//! | `crossplane-kind` | `<Kind>.<group>` |
//! | `crossplane-name` | `metadata.name` |
//! | `crossplane-providerconfig` | provider config name, when referenced |
//!
//! Reserved keys always carry the resource's own values. Any other tag is
//! kept in its original order.

use super::error::Error;
use super::external::Initializer;
use super::store::ResourceUpdater;
use crate::constants::{TAG_KEY_KIND, TAG_KEY_NAME, TAG_KEY_PROVIDER_CONFIG, TAG_KEY_RESOURCE_NAME};
use crate::crd::{
    ConfigurationSet, Managed, Role, Tag, TagSpecification, VpcEndpointServiceConfiguration,
    VPC_ENDPOINT_SERVICE_RESOURCE_TYPE,
};
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// A managed resource that carries a provider-side tag list in its spec
pub trait Tagged: Managed {
    fn tags(&self) -> &[Tag];
    fn set_tags(&mut self, tags: Vec<Tag>);
}

/// Reserved tags for `cr`, in canonical order
pub fn reserved_tags<R: Managed>(cr: &R) -> Vec<Tag> {
    let name = cr.resource_name();
    let mut tags = vec![
        Tag::new(TAG_KEY_NAME, name),
        Tag::new(TAG_KEY_KIND, R::group_kind()),
        Tag::new(TAG_KEY_RESOURCE_NAME, name),
    ];
    if let Some(reference) = cr.provider_config_reference() {
        tags.push(Tag::new(TAG_KEY_PROVIDER_CONFIG, &reference.name));
    }
    tags
}

fn is_reserved(key: &str) -> bool {
    matches!(
        key,
        TAG_KEY_NAME | TAG_KEY_KIND | TAG_KEY_RESOURCE_NAME | TAG_KEY_PROVIDER_CONFIG
    )
}

/// Merge `reserved` into `existing`
///
/// Reserved tags come first, followed by every non-reserved tag of `existing`.
/// Stale or duplicated reserved entries are dropped. A reserved key missing
/// from `reserved` (no provider config) is dropped too, so it is never stale.
#[must_use]
pub fn merge_tags(existing: &[Tag], reserved: &[Tag]) -> Vec<Tag> {
    reserved
        .iter()
        .cloned()
        .chain(existing.iter().filter(|t| !is_reserved(&t.key)).cloned())
        .collect()
}

/// Initializer that keeps the reserved tags of a [`Tagged`] resource current
pub struct Tagger<R: Tagged> {
    updater: Arc<dyn ResourceUpdater<R>>,
}

impl<R: Tagged> Tagger<R> {
    pub fn new(updater: Arc<dyn ResourceUpdater<R>>) -> Self {
        Self { updater }
    }
}

impl<R: Tagged> fmt::Debug for Tagger<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tagger").finish_non_exhaustive()
    }
}

#[async_trait]
impl<R: Tagged> Initializer<R> for Tagger<R> {
    async fn initialize(&self, cr: &mut R) -> Result<(), Error> {
        let merged = merge_tags(cr.tags(), &reserved_tags(cr));
        if merged.as_slice() == cr.tags() {
            return Ok(());
        }

        debug!("Updating reserved tags on {} {}", R::kind(&()), cr.resource_name());
        cr.set_tags(merged);
        self.updater
            .update(cr)
            .await
            .map_err(|source| Error::KubeUpdate {
                kind: R::kind(&()).to_string(),
                source,
            })
    }
}

impl Tagged for Role {
    fn tags(&self) -> &[Tag] {
        &self.spec.for_provider.tags
    }

    fn set_tags(&mut self, tags: Vec<Tag>) {
        self.spec.for_provider.tags = tags;
    }
}

impl Tagged for ConfigurationSet {
    fn tags(&self) -> &[Tag] {
        &self.spec.for_provider.tags
    }

    fn set_tags(&mut self, tags: Vec<Tag>) {
        self.spec.for_provider.tags = tags;
    }
}

/// Tags live in the `vpc-endpoint-service` tag specification
impl Tagged for VpcEndpointServiceConfiguration {
    fn tags(&self) -> &[Tag] {
        self.spec
            .for_provider
            .tag_specifications
            .iter()
            .find(|s| s.resource_type.as_deref() == Some(VPC_ENDPOINT_SERVICE_RESOURCE_TYPE))
            .map(|s| s.tags.as_slice())
            .unwrap_or_default()
    }

    fn set_tags(&mut self, tags: Vec<Tag>) {
        let specs = &mut self.spec.for_provider.tag_specifications;
        match specs
            .iter_mut()
            .find(|s| s.resource_type.as_deref() == Some(VPC_ENDPOINT_SERVICE_RESOURCE_TYPE))
        {
            Some(spec) => spec.tags = tags,
            None => specs.push(TagSpecification {
                resource_type: Some(VPC_ENDPOINT_SERVICE_RESOURCE_TYPE.to_string()),
                tags,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crd::{ConfigurationSetSpec, Reference, RoleSpec};
    use crate::managed::testing::MockUpdater;

    fn tag(key: &str, value: &str) -> Tag {
        Tag::new(key, value)
    }

    fn reserved() -> Vec<Tag> {
        vec![
            tag(TAG_KEY_NAME, "test"),
            tag(TAG_KEY_KIND, "Role.iam.aws.crossplane.io"),
            tag(TAG_KEY_RESOURCE_NAME, "test"),
        ]
    }

    #[test]
    fn test_merge_keeps_user_tags_after_reserved() {
        let merged = merge_tags(&[tag("foo", "bar")], &reserved());
        assert_eq!(merged.len(), 4);
        assert_eq!(merged[0].key, TAG_KEY_NAME);
        assert_eq!(merged[3], tag("foo", "bar"));
    }

    #[test]
    fn test_merge_overwrites_stale_reserved_values() {
        let merged = merge_tags(
            &[tag(TAG_KEY_KIND, "bar"), tag(TAG_KEY_RESOURCE_NAME, "old")],
            &reserved(),
        );
        assert_eq!(merged, reserved());
    }

    #[test]
    fn test_merge_collapses_duplicate_reserved_keys() {
        let merged = merge_tags(
            &[tag(TAG_KEY_NAME, "a"), tag(TAG_KEY_NAME, "b"), tag("env", "dev")],
            &reserved(),
        );
        let names = merged.iter().filter(|t| t.key == TAG_KEY_NAME).count();
        assert_eq!(names, 1);
        assert_eq!(merged.last(), Some(&tag("env", "dev")));
    }

    #[test]
    fn test_merge_is_idempotent() {
        let once = merge_tags(&[tag("foo", "bar")], &reserved());
        let twice = merge_tags(&once, &reserved());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_merge_drops_stale_provider_config_tag() {
        let merged = merge_tags(&[tag(TAG_KEY_PROVIDER_CONFIG, "old")], &reserved());
        assert_eq!(merged, reserved());
    }

    fn role(tags: Vec<Tag>) -> Role {
        let mut role = Role::new("test", RoleSpec::default());
        role.spec.for_provider.tags = tags;
        role.set_provider_config_reference(None);
        role
    }

    #[tokio::test]
    async fn test_tagger_adds_reserved_tags() {
        let updater = Arc::new(MockUpdater::default());
        let tagger = Tagger::new(Arc::clone(&updater) as Arc<dyn ResourceUpdater<Role>>);
        let mut cr = role(vec![tag("foo", "bar")]);

        tagger.initialize(&mut cr).await.unwrap();

        let mut want = reserved();
        want.push(tag("foo", "bar"));
        assert_eq!(cr.tags(), want.as_slice());
        assert_eq!(updater.updates(), 1);
    }

    #[tokio::test]
    async fn test_tagger_overwrites_user_supplied_reserved_values() {
        let updater = Arc::new(MockUpdater::default());
        let tagger = Tagger::new(Arc::clone(&updater) as Arc<dyn ResourceUpdater<Role>>);
        let mut cr = role(vec![tag(TAG_KEY_KIND, "bar"), tag(TAG_KEY_RESOURCE_NAME, "other")]);

        tagger.initialize(&mut cr).await.unwrap();

        assert_eq!(cr.tags(), reserved().as_slice());
        assert_eq!(updater.updates(), 1);
    }

    #[tokio::test]
    async fn test_tagger_skips_update_when_unchanged() {
        let updater = Arc::new(MockUpdater::default());
        let tagger = Tagger::new(Arc::clone(&updater) as Arc<dyn ResourceUpdater<Role>>);
        let mut cr = role(reserved());

        tagger.initialize(&mut cr).await.unwrap();

        assert_eq!(updater.updates(), 0);
    }

    #[tokio::test]
    async fn test_tagger_surfaces_update_failure() {
        let updater = Arc::new(MockUpdater::failing());
        let tagger = Tagger::new(Arc::clone(&updater) as Arc<dyn ResourceUpdater<Role>>);
        let mut cr = role(Vec::new());

        let err = tagger.initialize(&mut cr).await.unwrap_err();

        assert!(matches!(err, Error::KubeUpdate { .. }));
        assert!(err.to_string().starts_with("cannot update Role custom resource"));
    }

    #[tokio::test]
    async fn test_tagger_adds_provider_config_tag() {
        let updater = Arc::new(MockUpdater::default());
        let tagger =
            Tagger::new(Arc::clone(&updater) as Arc<dyn ResourceUpdater<ConfigurationSet>>);
        let mut cr = ConfigurationSet::new("mail", ConfigurationSetSpec::default());
        cr.set_provider_config_reference(Some(Reference {
            name: "prod".to_string(),
        }));

        tagger.initialize(&mut cr).await.unwrap();

        assert_eq!(
            cr.tags().last(),
            Some(&tag(TAG_KEY_PROVIDER_CONFIG, "prod"))
        );
        assert_eq!(cr.tags()[1].value, "ConfigurationSet.sesv2.aws.crossplane.io");
    }

    #[test]
    fn test_vpc_endpoint_tags_create_tag_specification() {
        let mut cr = VpcEndpointServiceConfiguration::new("svc", Default::default());
        assert!(cr.tags().is_empty());

        cr.set_tags(vec![tag("foo", "bar")]);
        cr.set_tags(vec![tag("foo", "baz")]);

        let specs = &cr.spec.for_provider.tag_specifications;
        assert_eq!(specs.len(), 1);
        assert_eq!(specs[0].resource_type.as_deref(), Some("vpc-endpoint-service"));
        assert_eq!(cr.tags(), &[tag("foo", "baz")]);
    }
}

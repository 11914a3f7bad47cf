//! # ConfigurationSet Controller
//!
//! SES configuration sets are addressed by name, taken from the external
//! name. Updates rewrite the delivery, reputation and sending option blocks.

use crate::config::ControllerConfig;
use crate::controller::reconciler::ReconcileContext;
use crate::controller::{managed_context, set_available};
use crate::crd::{
    ConfigurationSet, ConfigurationSetObservation, ConfigurationSetParameters, DeliveryOptions,
    Managed, ReputationOptions, SendingOptions,
};
use crate::managed::{
    External, ExternalClient, Hooks, Initializer, Mapping, NameAsExternalName, ResourceUpdater,
    ServiceApi, Tagger,
};
use crate::provider::sesv2::{ConfigurationSetState, SesV2Client};
use crate::provider::ApiError;
use anyhow::Result;
use async_trait::async_trait;
use aws_config::SdkConfig;
use kube::Client;
use std::sync::Arc;

pub fn setup(client: &Client, config: &ControllerConfig) -> ReconcileContext<ConfigurationSet> {
    managed_context(client, config, region, connect, initializers)
}

fn region(cr: &ConfigurationSet) -> String {
    cr.spec.for_provider.region.clone()
}

fn connect(config: &SdkConfig) -> Box<dyn ExternalClient<ConfigurationSet>> {
    Box::new(External::new(SesV2Client::new(config), hooks()))
}

fn initializers(
    updater: Arc<dyn ResourceUpdater<ConfigurationSet>>,
) -> Vec<Arc<dyn Initializer<ConfigurationSet>>> {
    vec![
        Arc::new(NameAsExternalName::new(Arc::clone(&updater))),
        Arc::new(Tagger::new(updater)),
    ]
}

#[must_use]
pub fn hooks() -> Hooks<ConfigurationSetMapping> {
    Hooks {
        post_observe: set_available::<ConfigurationSetMapping>,
        late_initialize,
        is_up_to_date,
        ..Hooks::default()
    }
}

#[derive(Debug)]
pub struct ConfigurationSetMapping;

fn name(cr: &ConfigurationSet) -> String {
    cr.external_name().unwrap_or_default().to_string()
}

fn desired_state(cr: &ConfigurationSet) -> ConfigurationSetState {
    let params = &cr.spec.for_provider;
    ConfigurationSetState {
        name: name(cr),
        delivery_options: params.delivery_options.clone(),
        reputation_options: params.reputation_options.clone(),
        sending_options: params.sending_options.clone(),
        tags: params.tags.clone(),
    }
}

impl Mapping for ConfigurationSetMapping {
    type Resource = ConfigurationSet;
    type Parameters = ConfigurationSetParameters;

    type DescribeInput = String;
    type DescribeOutput = ConfigurationSetState;
    type CreateInput = ConfigurationSetState;
    type CreateOutput = ();
    type UpdateInput = ConfigurationSetState;
    type UpdateOutput = ();
    type DeleteInput = String;
    type DeleteOutput = ();

    const KIND: &'static str = "ConfigurationSet";

    fn for_provider(cr: &ConfigurationSet) -> &ConfigurationSetParameters {
        &cr.spec.for_provider
    }

    fn for_provider_mut(cr: &mut ConfigurationSet) -> &mut ConfigurationSetParameters {
        &mut cr.spec.for_provider
    }

    fn describe_input(cr: &ConfigurationSet) -> String {
        name(cr)
    }

    fn create_input(cr: &ConfigurationSet) -> ConfigurationSetState {
        desired_state(cr)
    }

    fn update_input(cr: &ConfigurationSet) -> ConfigurationSetState {
        desired_state(cr)
    }

    fn delete_input(cr: &ConfigurationSet) -> String {
        name(cr)
    }

    fn observe_into(cr: &mut ConfigurationSet, output: &ConfigurationSetState) {
        cr.status.get_or_insert_with(Default::default).at_provider = ConfigurationSetObservation {
            configuration_set_name: Some(output.name.clone()),
        };
    }
}

#[async_trait]
impl ServiceApi<ConfigurationSetMapping> for SesV2Client {
    async fn describe(&self, input: String) -> Result<ConfigurationSetState, ApiError> {
        self.get_configuration_set(input).await
    }

    async fn create(&self, input: ConfigurationSetState) -> Result<(), ApiError> {
        self.create_configuration_set(input).await
    }

    async fn update(&self, input: ConfigurationSetState) -> Result<(), ApiError> {
        self.put_configuration_set_options(input).await
    }

    async fn delete(&self, input: String) -> Result<(), ApiError> {
        self.delete_configuration_set(input).await
    }
}

fn late_initialize(
    params: &mut ConfigurationSetParameters,
    observed: &ConfigurationSetState,
) -> Result<()> {
    if let Some(current) = &observed.delivery_options {
        let desired = params.delivery_options.get_or_insert_with(DeliveryOptions::default);
        fill(&mut desired.sending_pool_name, current.sending_pool_name.as_ref());
        fill(&mut desired.tls_policy, current.tls_policy.as_ref());
    }
    if let Some(current) = &observed.reputation_options {
        let desired = params
            .reputation_options
            .get_or_insert_with(ReputationOptions::default);
        fill(
            &mut desired.reputation_metrics_enabled,
            current.reputation_metrics_enabled.as_ref(),
        );
    }
    if let Some(current) = &observed.sending_options {
        let desired = params.sending_options.get_or_insert_with(SendingOptions::default);
        fill(&mut desired.sending_enabled, current.sending_enabled.as_ref());
    }
    Ok(())
}

fn fill<T: Clone>(desired: &mut Option<T>, observed: Option<&T>) {
    if desired.is_none() {
        *desired = observed.cloned();
    }
}

/// Fields left unset in the spec never count as drift
fn differs<T: PartialEq>(desired: Option<&T>, observed: Option<&T>) -> bool {
    desired.is_some_and(|d| observed != Some(d))
}

fn is_up_to_date(cr: &ConfigurationSet, observed: &ConfigurationSetState) -> Result<(bool, String)> {
    let params = &cr.spec.for_provider;
    let mut diff = Vec::new();

    let delivery = params.delivery_options.as_ref();
    let current_delivery = observed.delivery_options.as_ref();
    if differs(
        delivery.and_then(|d| d.sending_pool_name.as_ref()),
        current_delivery.and_then(|d| d.sending_pool_name.as_ref()),
    ) || differs(
        delivery.and_then(|d| d.tls_policy.as_ref()),
        current_delivery.and_then(|d| d.tls_policy.as_ref()),
    ) {
        diff.push("deliveryOptions");
    }
    if differs(
        params
            .reputation_options
            .as_ref()
            .and_then(|r| r.reputation_metrics_enabled.as_ref()),
        observed
            .reputation_options
            .as_ref()
            .and_then(|r| r.reputation_metrics_enabled.as_ref()),
    ) {
        diff.push("reputationOptions");
    }
    if differs(
        params
            .sending_options
            .as_ref()
            .and_then(|s| s.sending_enabled.as_ref()),
        observed
            .sending_options
            .as_ref()
            .and_then(|s| s.sending_enabled.as_ref()),
    ) {
        diff.push("sendingOptions");
    }
    Ok((diff.is_empty(), diff.join(", ")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crd::{ConditionReason, ConditionType, ConfigurationSetSpec};
    use crate::managed::testing::MockServiceApi;
    use crate::managed::Operation;

    fn configuration_set() -> ConfigurationSet {
        let mut cr = ConfigurationSet::new(
            "transactional",
            ConfigurationSetSpec {
                for_provider: ConfigurationSetParameters {
                    region: "eu-west-1".to_string(),
                    sending_options: Some(SendingOptions {
                        sending_enabled: Some(true),
                    }),
                    ..ConfigurationSetParameters::default()
                },
                ..ConfigurationSetSpec::default()
            },
        );
        cr.set_external_name("transactional");
        cr
    }

    fn remote() -> ConfigurationSetState {
        ConfigurationSetState {
            name: "transactional".to_string(),
            delivery_options: Some(DeliveryOptions {
                sending_pool_name: None,
                tls_policy: Some("OPTIONAL".to_string()),
            }),
            reputation_options: Some(ReputationOptions {
                reputation_metrics_enabled: Some(false),
            }),
            sending_options: Some(SendingOptions {
                sending_enabled: Some(true),
            }),
            tags: Vec::new(),
        }
    }

    #[tokio::test]
    async fn test_observe_late_initializes_option_blocks() {
        let api = MockServiceApi::<ConfigurationSetMapping>::new().with_describe(|name| {
            assert_eq!(name, "transactional");
            Ok(remote())
        });
        let external = External::new(api, hooks());
        let mut cr = configuration_set();

        let obs = external.observe(&mut cr).await.unwrap();

        assert!(obs.resource_exists);
        assert!(obs.resource_up_to_date);
        assert!(obs.resource_late_initialized);
        assert_eq!(cr.spec.for_provider.delivery_options, remote().delivery_options);
        assert_eq!(
            cr.get_condition(ConditionType::Ready).reason,
            Some(ConditionReason::Available)
        );
        assert_eq!(
            cr.status.unwrap().at_provider.configuration_set_name.as_deref(),
            Some("transactional")
        );
    }

    #[tokio::test]
    async fn test_partial_delivery_options_converge() {
        let mut cr = configuration_set();
        cr.spec.for_provider.delivery_options = Some(DeliveryOptions {
            sending_pool_name: Some("pool".to_string()),
            tls_policy: None,
        });
        let api = MockServiceApi::<ConfigurationSetMapping>::new().with_describe(|_| {
            Ok(ConfigurationSetState {
                delivery_options: Some(DeliveryOptions {
                    sending_pool_name: Some("pool".to_string()),
                    tls_policy: Some("OPTIONAL".to_string()),
                }),
                ..remote()
            })
        });
        let external = External::new(api, hooks());

        let obs = external.observe(&mut cr).await.unwrap();

        assert!(obs.resource_up_to_date, "diff: {}", obs.diff);
        assert!(obs.resource_late_initialized);
        assert_eq!(
            cr.spec.for_provider.delivery_options,
            Some(DeliveryOptions {
                sending_pool_name: Some("pool".to_string()),
                tls_policy: Some("OPTIONAL".to_string()),
            })
        );
    }

    #[test]
    fn test_unset_option_fields_are_not_drift() {
        let mut cr = configuration_set();
        cr.spec.for_provider.reputation_options = Some(ReputationOptions::default());
        cr.spec.for_provider.sending_options = Some(SendingOptions::default());

        let (up_to_date, diff) = is_up_to_date(&cr, &remote()).unwrap();

        assert!(up_to_date, "diff: {diff}");
    }

    #[test]
    fn test_set_tls_policy_drift_is_reported() {
        let mut cr = configuration_set();
        cr.spec.for_provider.delivery_options = Some(DeliveryOptions {
            sending_pool_name: None,
            tls_policy: Some("REQUIRE".to_string()),
        });

        let (up_to_date, diff) = is_up_to_date(&cr, &remote()).unwrap();

        assert!(!up_to_date);
        assert_eq!(diff, "deliveryOptions");
    }

    #[tokio::test]
    async fn test_observe_reports_sending_drift() {
        let api = MockServiceApi::<ConfigurationSetMapping>::new().with_describe(|_| {
            Ok(ConfigurationSetState {
                sending_options: Some(SendingOptions {
                    sending_enabled: Some(false),
                }),
                ..remote()
            })
        });
        let external = External::new(api, hooks());
        let mut cr = configuration_set();

        let obs = external.observe(&mut cr).await.unwrap();

        assert!(!obs.resource_up_to_date);
        assert_eq!(obs.diff, "sendingOptions");
    }

    #[tokio::test]
    async fn test_observe_not_found() {
        let api = MockServiceApi::<ConfigurationSetMapping>::new()
            .with_describe(|_| Err(ApiError::not_found("NotFoundException", "missing")));
        let external = External::new(api, hooks());
        let mut cr = configuration_set();

        let obs = external.observe(&mut cr).await.unwrap();

        assert!(!obs.resource_exists);
    }

    #[tokio::test]
    async fn test_update_puts_desired_options() {
        let api = MockServiceApi::<ConfigurationSetMapping>::new().with_update(|state| {
            assert_eq!(state.name, "transactional");
            assert_eq!(
                state.sending_options,
                Some(SendingOptions {
                    sending_enabled: Some(true)
                })
            );
            Ok(())
        });
        let external = External::new(api, hooks());
        let mut cr = configuration_set();

        external.update(&mut cr).await.unwrap();
    }

    #[tokio::test]
    async fn test_create_failure_is_labelled() {
        let api = MockServiceApi::<ConfigurationSetMapping>::new()
            .with_create(|_| Err(ApiError::service("AlreadyExistsException", "boom")));
        let external = External::new(api, hooks());
        let mut cr = configuration_set();

        let err = external.create(&mut cr).await.unwrap_err();

        assert_eq!(err.operation(), Some(Operation::Create));
        assert_eq!(err.to_string(), "cannot create ConfigurationSet in AWS: boom");
        assert_eq!(
            cr.get_condition(ConditionType::Ready).reason,
            Some(ConditionReason::Creating)
        );
    }

    #[tokio::test]
    async fn test_delete_error_is_labelled() {
        let api = MockServiceApi::<ConfigurationSetMapping>::new()
            .with_delete(|_| Err(ApiError::service("TooManyRequestsException", "boom")));
        let external = External::new(api, hooks());
        let mut cr = configuration_set();

        let err = external.delete(&mut cr).await.unwrap_err();

        assert_eq!(err.to_string(), "failed to delete ConfigurationSet: boom");
    }
}

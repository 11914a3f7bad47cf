//! # RouteResponse Controller
//!
//! The API and route ids live in the spec rather than in the request shape,
//! so the hooks copy them into every request. The route response id is only
//! known after create and becomes the external name.

use crate::config::ControllerConfig;
use crate::controller::reconciler::ReconcileContext;
use crate::controller::{managed_context, set_available};
use crate::crd::{Managed, RouteResponse, RouteResponseObservation, RouteResponseParameters};
use crate::managed::{
    External, ExternalClient, ExternalCreation, Hooks, Initializer, Mapping, ResourceUpdater,
    ServiceApi,
};
use crate::provider::apigatewayv2::{
    ApiGatewayV2Client, RouteResponseDescription, RouteResponseKey, RouteResponseWrite,
};
use crate::provider::ApiError;
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use aws_config::SdkConfig;
use kube::Client;
use std::sync::Arc;

pub fn setup(client: &Client, config: &ControllerConfig) -> ReconcileContext<RouteResponse> {
    managed_context(client, config, region, connect, initializers)
}

fn region(cr: &RouteResponse) -> String {
    cr.spec.for_provider.region.clone()
}

fn connect(config: &SdkConfig) -> Box<dyn ExternalClient<RouteResponse>> {
    Box::new(External::new(ApiGatewayV2Client::new(config), hooks()))
}

/// The external name is issued by AWS, so nothing runs before observe
fn initializers(
    _: Arc<dyn ResourceUpdater<RouteResponse>>,
) -> Vec<Arc<dyn Initializer<RouteResponse>>> {
    Vec::new()
}

#[must_use]
pub fn hooks() -> Hooks<RouteResponseMapping> {
    Hooks {
        pre_observe,
        post_observe: set_available::<RouteResponseMapping>,
        pre_create,
        post_create,
        pre_update,
        pre_delete,
        ..Hooks::default()
    }
}

#[derive(Debug)]
pub struct RouteResponseMapping;

fn write(cr: &RouteResponse) -> RouteResponseWrite {
    let params = &cr.spec.for_provider;
    RouteResponseWrite {
        route_response_key: params.route_response_key.clone(),
        model_selection_expression: params.model_selection_expression.clone(),
        response_models: params.response_models.clone(),
        response_parameters: params.response_parameters.clone(),
        ..RouteResponseWrite::default()
    }
}

impl Mapping for RouteResponseMapping {
    type Resource = RouteResponse;
    type Parameters = RouteResponseParameters;

    type DescribeInput = RouteResponseKey;
    type DescribeOutput = RouteResponseDescription;
    type CreateInput = RouteResponseWrite;
    type CreateOutput = Option<String>;
    type UpdateInput = RouteResponseWrite;
    type UpdateOutput = ();
    type DeleteInput = RouteResponseKey;
    type DeleteOutput = ();

    const KIND: &'static str = "RouteResponse";

    fn for_provider(cr: &RouteResponse) -> &RouteResponseParameters {
        &cr.spec.for_provider
    }

    fn for_provider_mut(cr: &mut RouteResponse) -> &mut RouteResponseParameters {
        &mut cr.spec.for_provider
    }

    fn describe_input(_: &RouteResponse) -> RouteResponseKey {
        RouteResponseKey::default()
    }

    fn create_input(cr: &RouteResponse) -> RouteResponseWrite {
        write(cr)
    }

    fn update_input(cr: &RouteResponse) -> RouteResponseWrite {
        write(cr)
    }

    fn delete_input(_: &RouteResponse) -> RouteResponseKey {
        RouteResponseKey::default()
    }

    fn observe_into(cr: &mut RouteResponse, output: &RouteResponseDescription) {
        cr.status.get_or_insert_with(Default::default).at_provider = RouteResponseObservation {
            route_response_id: output.route_response_id.clone(),
        };
    }
}

#[async_trait]
impl ServiceApi<RouteResponseMapping> for ApiGatewayV2Client {
    async fn describe(&self, input: RouteResponseKey) -> Result<RouteResponseDescription, ApiError> {
        self.get_route_response(input).await
    }

    async fn create(&self, input: RouteResponseWrite) -> Result<Option<String>, ApiError> {
        self.create_route_response(input).await
    }

    async fn update(&self, input: RouteResponseWrite) -> Result<(), ApiError> {
        self.update_route_response(input).await
    }

    async fn delete(&self, input: RouteResponseKey) -> Result<(), ApiError> {
        self.delete_route_response(input).await
    }
}

fn fill_key(cr: &RouteResponse, key: &mut RouteResponseKey) {
    key.api_id.clone_from(&cr.spec.for_provider.api_id);
    key.route_id.clone_from(&cr.spec.for_provider.route_id);
    key.route_response_id = cr.external_name().unwrap_or_default().to_string();
}

fn pre_observe(cr: &RouteResponse, input: &mut RouteResponseKey) -> Result<()> {
    fill_key(cr, input);
    Ok(())
}

fn pre_create(cr: &RouteResponse, input: &mut RouteResponseWrite) -> Result<()> {
    input.api_id.clone_from(&cr.spec.for_provider.api_id);
    input.route_id.clone_from(&cr.spec.for_provider.route_id);
    Ok(())
}

fn post_create(
    cr: &mut RouteResponse,
    route_response_id: &Option<String>,
    creation: ExternalCreation,
) -> Result<ExternalCreation> {
    let id = route_response_id
        .as_deref()
        .ok_or_else(|| anyhow!("CreateRouteResponse returned no route response id"))?;
    cr.set_external_name(id);
    Ok(creation)
}

fn pre_update(cr: &RouteResponse, input: &mut RouteResponseWrite) -> Result<()> {
    pre_create(cr, input)?;
    input.route_response_id = cr.external_name().map(ToString::to_string);
    Ok(())
}

fn pre_delete(cr: &RouteResponse, input: &mut RouteResponseKey) -> Result<bool> {
    fill_key(cr, input);
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crd::{ConditionReason, ConditionType, RouteResponseSpec};
    use crate::managed::testing::MockServiceApi;
    use crate::managed::{ExternalObservation, HookStage, Operation};

    fn route_response() -> RouteResponse {
        RouteResponse::new(
            "default-response",
            RouteResponseSpec {
                for_provider: RouteResponseParameters {
                    region: "us-east-1".to_string(),
                    api_id: "a1b2c3".to_string(),
                    route_id: "r1".to_string(),
                    route_response_key: "$default".to_string(),
                    ..RouteResponseParameters::default()
                },
                ..RouteResponseSpec::default()
            },
        )
    }

    fn created() -> RouteResponse {
        let mut cr = route_response();
        cr.set_external_name("rr-42");
        cr
    }

    #[tokio::test]
    async fn test_observe_without_external_name_makes_no_call() {
        let api = MockServiceApi::<RouteResponseMapping>::new();
        let calls = api.call_log();
        let external = External::new(api, hooks());
        let mut cr = route_response();

        let obs = external.observe(&mut cr).await.unwrap();

        assert_eq!(obs, ExternalObservation::missing());
        assert!(calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_observe_fills_ids_from_spec_and_external_name() {
        let api = MockServiceApi::<RouteResponseMapping>::new().with_describe(|key| {
            assert_eq!(
                key,
                RouteResponseKey {
                    api_id: "a1b2c3".to_string(),
                    route_id: "r1".to_string(),
                    route_response_id: "rr-42".to_string(),
                }
            );
            Ok(RouteResponseDescription {
                route_response_id: Some("rr-42".to_string()),
                ..RouteResponseDescription::default()
            })
        });
        let external = External::new(api, hooks());
        let mut cr = created();

        let obs = external.observe(&mut cr).await.unwrap();

        assert!(obs.resource_exists);
        assert_eq!(
            cr.get_condition(ConditionType::Ready).reason,
            Some(ConditionReason::Available)
        );
        assert_eq!(
            cr.status.unwrap().at_provider.route_response_id.as_deref(),
            Some("rr-42")
        );
    }

    #[tokio::test]
    async fn test_observe_not_found() {
        let api = MockServiceApi::<RouteResponseMapping>::new()
            .with_describe(|_| Err(ApiError::not_found("NotFoundException", "missing")));
        let external = External::new(api, hooks());
        let mut cr = created();

        let obs = external.observe(&mut cr).await.unwrap();

        assert!(!obs.resource_exists);
    }

    #[tokio::test]
    async fn test_observe_error_is_labelled() {
        let api = MockServiceApi::<RouteResponseMapping>::new()
            .with_describe(|_| Err(ApiError::service("TooManyRequestsException", "boom")));
        let external = External::new(api, hooks());
        let mut cr = created();

        let err = external.observe(&mut cr).await.unwrap_err();

        assert_eq!(err.to_string(), "failed to describe RouteResponse: boom");
    }

    #[tokio::test]
    async fn test_create_stores_issued_id() {
        let api = MockServiceApi::<RouteResponseMapping>::new().with_create(|write| {
            assert_eq!(write.api_id, "a1b2c3");
            assert_eq!(write.route_id, "r1");
            assert_eq!(write.route_response_key, "$default");
            Ok(Some("rr-42".to_string()))
        });
        let external = External::new(api, hooks());
        let mut cr = route_response();

        external.create(&mut cr).await.unwrap();

        assert_eq!(cr.external_name(), Some("rr-42"));
    }

    #[tokio::test]
    async fn test_create_without_id_fails_post_create() {
        let api = MockServiceApi::<RouteResponseMapping>::new().with_create(|_| Ok(None));
        let external = External::new(api, hooks());
        let mut cr = route_response();

        let err = external.create(&mut cr).await.unwrap_err();

        assert!(matches!(
            err,
            crate::managed::Error::Hook {
                stage: HookStage::PostCreate,
                ..
            }
        ));
        assert_eq!(cr.external_name(), None);
    }

    #[tokio::test]
    async fn test_create_error_is_labelled() {
        let api = MockServiceApi::<RouteResponseMapping>::new()
            .with_create(|_| Err(ApiError::service("BadRequestException", "boom")));
        let external = External::new(api, hooks());
        let mut cr = route_response();

        let err = external.create(&mut cr).await.unwrap_err();

        assert_eq!(err.operation(), Some(Operation::Create));
        assert_eq!(err.to_string(), "cannot create RouteResponse in AWS: boom");
        assert_eq!(
            cr.get_condition(ConditionType::Ready).reason,
            Some(ConditionReason::Creating)
        );
    }

    #[tokio::test]
    async fn test_update_addresses_existing_response() {
        let api = MockServiceApi::<RouteResponseMapping>::new().with_update(|write| {
            assert_eq!(write.route_response_id.as_deref(), Some("rr-42"));
            assert_eq!(write.api_id, "a1b2c3");
            Ok(())
        });
        let external = External::new(api, hooks());
        let mut cr = created();

        external.update(&mut cr).await.unwrap();
    }

    #[tokio::test]
    async fn test_delete_fills_all_ids() {
        let api = MockServiceApi::<RouteResponseMapping>::new().with_delete(|key| {
            assert_eq!(key.route_response_id, "rr-42");
            assert_eq!(key.route_id, "r1");
            Ok(())
        });
        let calls = api.call_log();
        let external = External::new(api, hooks());
        let mut cr = created();

        external.delete(&mut cr).await.unwrap();

        assert_eq!(*calls.lock().unwrap(), vec![Operation::Delete]);
        assert_eq!(
            cr.get_condition(ConditionType::Ready).reason,
            Some(ConditionReason::Deleting)
        );
    }
}

//! # API Gateway v2 Client
//!
//! Route response operations. A route response is addressed by the triple
//! (API id, route id, route response id).

use super::ApiError;
use crate::crd::ParameterConstraints;
use aws_config::SdkConfig;
use aws_sdk_apigatewayv2::types as sdk;
use aws_sdk_apigatewayv2::Client as ApiGatewaySdkClient;
use std::collections::{BTreeMap, HashMap};
use std::fmt;

const NOT_FOUND: &[&str] = &["NotFoundException"];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteResponseKey {
    pub api_id: String,
    pub route_id: String,
    pub route_response_id: String,
}

/// A route response as reported by API Gateway
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteResponseDescription {
    pub route_response_id: Option<String>,
    pub route_response_key: Option<String>,
    pub model_selection_expression: Option<String>,
    pub response_models: BTreeMap<String, String>,
    pub response_parameters: BTreeMap<String, ParameterConstraints>,
}

/// Body of a create or update call; `route_response_id` is only set on update
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteResponseWrite {
    pub api_id: String,
    pub route_id: String,
    pub route_response_id: Option<String>,
    pub route_response_key: String,
    pub model_selection_expression: Option<String>,
    pub response_models: BTreeMap<String, String>,
    pub response_parameters: BTreeMap<String, ParameterConstraints>,
}

#[derive(Clone)]
pub struct ApiGatewayV2Client {
    client: ApiGatewaySdkClient,
}

impl fmt::Debug for ApiGatewayV2Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiGatewayV2Client").finish_non_exhaustive()
    }
}

fn to_sdk_parameters(
    params: &BTreeMap<String, ParameterConstraints>,
) -> Option<HashMap<String, sdk::ParameterConstraints>> {
    if params.is_empty() {
        return None;
    }
    Some(
        params
            .iter()
            .map(|(k, v)| {
                let constraints = sdk::ParameterConstraints::builder()
                    .set_required(v.required)
                    .build();
                (k.clone(), constraints)
            })
            .collect(),
    )
}

fn to_sdk_models(models: &BTreeMap<String, String>) -> Option<HashMap<String, String>> {
    (!models.is_empty()).then(|| models.clone().into_iter().collect())
}

fn from_sdk_parameters(
    params: Option<&HashMap<String, sdk::ParameterConstraints>>,
) -> BTreeMap<String, ParameterConstraints> {
    params
        .into_iter()
        .flatten()
        .map(|(k, v)| {
            let required: Option<bool> = v.required().into();
            (k.clone(), ParameterConstraints { required })
        })
        .collect()
}

fn from_sdk_models(models: Option<&HashMap<String, String>>) -> BTreeMap<String, String> {
    models
        .into_iter()
        .flatten()
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}

impl ApiGatewayV2Client {
    #[must_use]
    pub fn new(config: &SdkConfig) -> Self {
        Self {
            client: ApiGatewaySdkClient::new(config),
        }
    }

    pub async fn get_route_response(
        &self,
        key: RouteResponseKey,
    ) -> Result<RouteResponseDescription, ApiError> {
        let output = self
            .client
            .get_route_response()
            .api_id(key.api_id)
            .route_id(key.route_id)
            .route_response_id(key.route_response_id)
            .send()
            .await
            .map_err(|e| ApiError::from_sdk(e, NOT_FOUND))?;

        Ok(RouteResponseDescription {
            route_response_id: output.route_response_id().map(ToString::to_string),
            route_response_key: output.route_response_key().map(ToString::to_string),
            model_selection_expression: output
                .model_selection_expression()
                .map(ToString::to_string),
            response_models: from_sdk_models(output.response_models()),
            response_parameters: from_sdk_parameters(output.response_parameters()),
        })
    }

    /// Returns the id API Gateway assigned to the new route response
    pub async fn create_route_response(
        &self,
        write: RouteResponseWrite,
    ) -> Result<Option<String>, ApiError> {
        let output = self
            .client
            .create_route_response()
            .api_id(write.api_id)
            .route_id(write.route_id)
            .route_response_key(write.route_response_key)
            .set_model_selection_expression(write.model_selection_expression)
            .set_response_models(to_sdk_models(&write.response_models))
            .set_response_parameters(to_sdk_parameters(&write.response_parameters))
            .send()
            .await
            .map_err(|e| ApiError::from_sdk(e, NOT_FOUND))?;

        Ok(output.route_response_id().map(ToString::to_string))
    }

    pub async fn update_route_response(&self, write: RouteResponseWrite) -> Result<(), ApiError> {
        self.client
            .update_route_response()
            .api_id(write.api_id)
            .route_id(write.route_id)
            .set_route_response_id(write.route_response_id)
            .route_response_key(write.route_response_key)
            .set_model_selection_expression(write.model_selection_expression)
            .set_response_models(to_sdk_models(&write.response_models))
            .set_response_parameters(to_sdk_parameters(&write.response_parameters))
            .send()
            .await
            .map_err(|e| ApiError::from_sdk(e, NOT_FOUND))?;
        Ok(())
    }

    pub async fn delete_route_response(&self, key: RouteResponseKey) -> Result<(), ApiError> {
        self.client
            .delete_route_response()
            .api_id(key.api_id)
            .route_id(key.route_id)
            .route_response_id(key.route_response_id)
            .send()
            .await
            .map_err(|e| ApiError::from_sdk(e, NOT_FOUND))?;
        Ok(())
    }
}

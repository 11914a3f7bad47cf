//! # SES v2 Client
//!
//! Configuration set operations. SES has no single update call: each option
//! block is written with its own `PutConfigurationSet*Options` request.

use super::ApiError;
use crate::crd::{DeliveryOptions, ReputationOptions, SendingOptions, Tag};
use aws_config::SdkConfig;
use aws_sdk_sesv2::operation::get_configuration_set::GetConfigurationSetOutput;
use aws_sdk_sesv2::types::{self as sdk, TlsPolicy};
use aws_sdk_sesv2::Client as SesSdkClient;
use std::fmt;

const NOT_FOUND: &[&str] = &["NotFoundException"];

/// A configuration set as reported by SES, or the desired state written to it
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigurationSetState {
    pub name: String,
    pub delivery_options: Option<DeliveryOptions>,
    pub reputation_options: Option<ReputationOptions>,
    pub sending_options: Option<SendingOptions>,
    pub tags: Vec<Tag>,
}

#[derive(Clone)]
pub struct SesV2Client {
    client: SesSdkClient,
}

impl fmt::Debug for SesV2Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SesV2Client").finish_non_exhaustive()
    }
}

fn to_sdk_tags(tags: &[Tag]) -> Result<Option<Vec<sdk::Tag>>, ApiError> {
    if tags.is_empty() {
        return Ok(None);
    }
    let tags = tags
        .iter()
        .map(|t| sdk::Tag::builder().key(&t.key).value(&t.value).build())
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Some(tags))
}

fn from_sdk_state(name: &str, output: &GetConfigurationSetOutput) -> ConfigurationSetState {
    ConfigurationSetState {
        name: output.configuration_set_name().unwrap_or(name).to_string(),
        delivery_options: output.delivery_options().map(|d| DeliveryOptions {
            sending_pool_name: d.sending_pool_name().map(ToString::to_string),
            tls_policy: d.tls_policy().map(|p| p.as_str().to_string()),
        }),
        reputation_options: output.reputation_options().map(|r| {
            let enabled: Option<bool> = r.reputation_metrics_enabled().into();
            ReputationOptions {
                reputation_metrics_enabled: enabled,
            }
        }),
        sending_options: output.sending_options().map(|s| {
            let enabled: Option<bool> = s.sending_enabled().into();
            SendingOptions {
                sending_enabled: enabled,
            }
        }),
        tags: output
            .tags()
            .iter()
            .map(|t| {
                let key: Option<&str> = t.key().into();
                let value: Option<&str> = t.value().into();
                Tag::new(key.unwrap_or_default(), value.unwrap_or_default())
            })
            .collect(),
    }
}

impl SesV2Client {
    #[must_use]
    pub fn new(config: &SdkConfig) -> Self {
        Self {
            client: SesSdkClient::new(config),
        }
    }

    pub async fn get_configuration_set(
        &self,
        name: String,
    ) -> Result<ConfigurationSetState, ApiError> {
        let output = self
            .client
            .get_configuration_set()
            .configuration_set_name(&name)
            .send()
            .await
            .map_err(|e| ApiError::from_sdk(e, NOT_FOUND))?;
        Ok(from_sdk_state(&name, &output))
    }

    pub async fn create_configuration_set(
        &self,
        state: ConfigurationSetState,
    ) -> Result<(), ApiError> {
        let delivery = state.delivery_options.map(|d| {
            sdk::DeliveryOptions::builder()
                .set_sending_pool_name(d.sending_pool_name)
                .set_tls_policy(d.tls_policy.as_deref().map(TlsPolicy::from))
                .build()
        });
        let reputation = state.reputation_options.map(|r| {
            sdk::ReputationOptions::builder()
                .set_reputation_metrics_enabled(r.reputation_metrics_enabled)
                .build()
        });
        let sending = state.sending_options.map(|s| {
            sdk::SendingOptions::builder()
                .set_sending_enabled(s.sending_enabled)
                .build()
        });

        self.client
            .create_configuration_set()
            .configuration_set_name(state.name)
            .set_delivery_options(delivery)
            .set_reputation_options(reputation)
            .set_sending_options(sending)
            .set_tags(to_sdk_tags(&state.tags)?)
            .send()
            .await
            .map_err(|e| ApiError::from_sdk(e, NOT_FOUND))?;
        Ok(())
    }

    /// Write every option block present in `state`
    pub async fn put_configuration_set_options(
        &self,
        state: ConfigurationSetState,
    ) -> Result<(), ApiError> {
        if let Some(delivery) = state.delivery_options {
            self.client
                .put_configuration_set_delivery_options()
                .configuration_set_name(&state.name)
                .set_sending_pool_name(delivery.sending_pool_name)
                .set_tls_policy(delivery.tls_policy.as_deref().map(TlsPolicy::from))
                .send()
                .await
                .map_err(|e| ApiError::from_sdk(e, NOT_FOUND))?;
        }
        if let Some(reputation) = state.reputation_options {
            self.client
                .put_configuration_set_reputation_options()
                .configuration_set_name(&state.name)
                .set_reputation_metrics_enabled(reputation.reputation_metrics_enabled)
                .send()
                .await
                .map_err(|e| ApiError::from_sdk(e, NOT_FOUND))?;
        }
        if let Some(sending) = state.sending_options {
            self.client
                .put_configuration_set_sending_options()
                .configuration_set_name(&state.name)
                .set_sending_enabled(sending.sending_enabled)
                .send()
                .await
                .map_err(|e| ApiError::from_sdk(e, NOT_FOUND))?;
        }
        Ok(())
    }

    pub async fn delete_configuration_set(&self, name: String) -> Result<(), ApiError> {
        self.client
            .delete_configuration_set()
            .configuration_set_name(name)
            .send()
            .await
            .map_err(|e| ApiError::from_sdk(e, NOT_FOUND))?;
        Ok(())
    }
}

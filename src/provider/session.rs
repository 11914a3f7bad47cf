//! # AWS Sessions
//!
//! Builds an [`SdkConfig`] for one managed resource from the ProviderConfig
//! it references:
//!
//! 1. Base credentials: the pod's default credential chain
//!    (`InjectedIdentity`) or a shared-credentials document in a Secret
//! 2. Optional endpoint override
//! 3. Optional `assumeRoleARN`, exchanged through STS

use super::credentials::load_profile_credentials;
use crate::constants::{ASSUME_ROLE_SESSION_NAME, DEFAULT_CREDENTIALS_PROFILE, DEFAULT_PROVIDER_CONFIG};
use crate::crd::{CredentialsSource, Managed, ProviderConfig, ProviderConfigSpec, SecretKeySelector};
use anyhow::{Context, Result};
use aws_config::{BehaviorVersion, Region, SdkConfig};
use aws_credential_types::provider::SharedCredentialsProvider;
use aws_credential_types::Credentials;
use k8s_openapi::api::core::v1::Secret;
use kube::api::Api;
use kube::Client;
use std::fmt;
use std::time::SystemTime;
use tracing::{debug, info_span, Instrument};

/// Resolves ProviderConfigs into AWS SDK configuration
#[derive(Clone)]
pub struct SessionResolver {
    client: Client,
}

impl fmt::Debug for SessionResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionResolver").finish_non_exhaustive()
    }
}

/// Name of the ProviderConfig `cr` uses
pub fn provider_config_name<R: Managed>(cr: &R) -> &str {
    cr.provider_config_reference()
        .map_or(DEFAULT_PROVIDER_CONFIG, |r| r.name.as_str())
}

impl SessionResolver {
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// SDK configuration for calling AWS in `region` on behalf of `cr`
    pub async fn sdk_config<R: Managed>(&self, cr: &R, region: &str) -> Result<SdkConfig> {
        let pc_name = provider_config_name(cr);
        let span = info_span!("aws.session", provider_config = pc_name, region = region);

        async move {
            let api: Api<ProviderConfig> = Api::all(self.client.clone());
            let pc = api
                .get(pc_name)
                .await
                .with_context(|| format!("Failed to get ProviderConfig {pc_name}"))?;

            let base = self.base_config(&pc.spec, region).await?;
            match &pc.spec.assume_role_arn {
                Some(role_arn) => assume_role(&base, role_arn).await,
                None => Ok(base),
            }
        }
        .instrument(span)
        .await
    }

    async fn base_config(&self, spec: &ProviderConfigSpec, region: &str) -> Result<SdkConfig> {
        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(region.to_string()));
        if let Some(endpoint) = &spec.endpoint {
            loader = loader.endpoint_url(&endpoint.url);
        }

        match spec.credentials.source {
            CredentialsSource::InjectedIdentity => {
                debug!("Using injected identity credentials");
            }
            CredentialsSource::Secret => {
                let selector = spec
                    .credentials
                    .secret_ref
                    .as_ref()
                    .context("spec.credentials.secretRef is required when source is Secret")?;
                let creds = self.read_credentials(selector).await?;
                loader = loader.credentials_provider(creds);
            }
        }

        Ok(loader.load().await)
    }

    async fn read_credentials(&self, selector: &SecretKeySelector) -> Result<Credentials> {
        let secrets: Api<Secret> = Api::namespaced(self.client.clone(), &selector.namespace);
        let secret = secrets
            .get(&selector.name)
            .await
            .with_context(|| {
                format!("Failed to get secret {}/{}", selector.namespace, selector.name)
            })?;

        let document = secret
            .data
            .as_ref()
            .and_then(|data| data.get(&selector.key))
            .with_context(|| {
                format!(
                    "Key {} missing from secret {}/{}",
                    selector.key, selector.namespace, selector.name
                )
            })?;

        load_profile_credentials(&document.0, DEFAULT_CREDENTIALS_PROFILE).await
    }
}

/// Exchange the credentials of `base` for those of `role_arn`
async fn assume_role(base: &SdkConfig, role_arn: &str) -> Result<SdkConfig> {
    debug!("Assuming role {}", role_arn);
    let sts = aws_sdk_sts::Client::new(base);
    let output = sts
        .assume_role()
        .role_arn(role_arn)
        .role_session_name(ASSUME_ROLE_SESSION_NAME)
        .send()
        .await
        .with_context(|| format!("Failed to assume role {role_arn}"))?;

    let assumed = output
        .credentials()
        .with_context(|| format!("AssumeRole for {role_arn} returned no credentials"))?;
    let credentials = Credentials::new(
        assumed.access_key_id(),
        assumed.secret_access_key(),
        Some(assumed.session_token().to_string()),
        SystemTime::try_from(*assumed.expiration()).ok(),
        "AssumeRole",
    );

    Ok(base
        .to_builder()
        .credentials_provider(SharedCredentialsProvider::new(credentials))
        .build())
}

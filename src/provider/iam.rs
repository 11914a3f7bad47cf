//! # IAM Client
//!
//! Role operations used by the `Role` controller. IAM is a global service;
//! callers build the client against [`GLOBAL_REGION`](crate::constants::GLOBAL_REGION).

use super::{format_timestamp, ApiError};
use crate::crd::{RoleParameters, Tag};
use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_iam::primitives::DateTime;
use aws_sdk_iam::Client as IamSdkClient;
use std::fmt;

const NOT_FOUND: &[&str] = &["NoSuchEntity"];

/// An IAM role as reported by AWS
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IamRole {
    pub arn: String,
    pub role_id: String,
    pub role_name: String,
    pub path: Option<String>,
    pub create_date: Option<String>,
    /// URL-encoded JSON, as IAM returns it
    pub assume_role_policy_document: Option<String>,
    pub description: Option<String>,
    pub max_session_duration: Option<i32>,
    pub permissions_boundary: Option<String>,
    pub tags: Vec<Tag>,
}

/// IAM role operations
#[async_trait]
pub trait RoleApi: Send + Sync {
    async fn get_role(&self, name: &str) -> Result<IamRole, ApiError>;
    async fn create_role(&self, name: &str, params: &RoleParameters) -> Result<IamRole, ApiError>;
    async fn update_role(
        &self,
        name: &str,
        description: Option<&str>,
        max_session_duration: Option<i32>,
    ) -> Result<(), ApiError>;
    async fn update_assume_role_policy(&self, name: &str, policy: &str) -> Result<(), ApiError>;
    async fn put_permissions_boundary(&self, name: &str, arn: &str) -> Result<(), ApiError>;
    async fn tag_role(&self, name: &str, tags: &[Tag]) -> Result<(), ApiError>;
    async fn untag_role(&self, name: &str, keys: &[String]) -> Result<(), ApiError>;
    async fn delete_role(&self, name: &str) -> Result<(), ApiError>;
}

/// [`RoleApi`] backed by the AWS SDK
#[derive(Clone)]
pub struct IamClient {
    client: IamSdkClient,
}

impl IamClient {
    #[must_use]
    pub fn new(config: &SdkConfig) -> Self {
        Self {
            client: IamSdkClient::new(config),
        }
    }
}

impl fmt::Debug for IamClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IamClient").finish_non_exhaustive()
    }
}

fn sdk_tags(tags: &[Tag]) -> Result<Vec<aws_sdk_iam::types::Tag>, ApiError> {
    tags.iter()
        .map(|t| {
            aws_sdk_iam::types::Tag::builder()
                .key(&t.key)
                .value(&t.value)
                .build()
                .map_err(ApiError::from)
        })
        .collect()
}

fn from_sdk_role(role: &aws_sdk_iam::types::Role) -> IamRole {
    let arn: Option<&str> = role.arn().into();
    let role_id: Option<&str> = role.role_id().into();
    let role_name: Option<&str> = role.role_name().into();
    let path: Option<&str> = role.path().into();
    let create_date: Option<&DateTime> = role.create_date().into();

    IamRole {
        arn: arn.unwrap_or_default().to_string(),
        role_id: role_id.unwrap_or_default().to_string(),
        role_name: role_name.unwrap_or_default().to_string(),
        path: path.filter(|p| !p.is_empty()).map(ToString::to_string),
        create_date: create_date.and_then(format_timestamp),
        assume_role_policy_document: role.assume_role_policy_document().map(ToString::to_string),
        description: role.description().map(ToString::to_string),
        max_session_duration: role.max_session_duration(),
        permissions_boundary: role
            .permissions_boundary()
            .and_then(|b| b.permissions_boundary_arn())
            .map(ToString::to_string),
        tags: role
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

fn role_from_output(role: Option<&aws_sdk_iam::types::Role>, name: &str) -> Result<IamRole, ApiError> {
    role.map(from_sdk_role)
        .ok_or_else(|| ApiError::not_found("NoSuchEntity", format!("role {name} not returned")))
}

#[async_trait]
impl RoleApi for IamClient {
    async fn get_role(&self, name: &str) -> Result<IamRole, ApiError> {
        let output = self
            .client
            .get_role()
            .role_name(name)
            .send()
            .await
            .map_err(|e| ApiError::from_sdk(e, NOT_FOUND))?;
        let role: Option<&aws_sdk_iam::types::Role> = output.role().into();
        role_from_output(role, name)
    }

    async fn create_role(&self, name: &str, params: &RoleParameters) -> Result<IamRole, ApiError> {
        let mut request = self
            .client
            .create_role()
            .role_name(name)
            .assume_role_policy_document(&params.assume_role_policy_document)
            .set_description(params.description.clone())
            .set_max_session_duration(params.max_session_duration)
            .set_path(params.path.clone())
            .set_permissions_boundary(params.permissions_boundary.clone());
        if !params.tags.is_empty() {
            request = request.set_tags(Some(sdk_tags(&params.tags)?));
        }

        let output = request
            .send()
            .await
            .map_err(|e| ApiError::from_sdk(e, NOT_FOUND))?;
        let role: Option<&aws_sdk_iam::types::Role> = output.role().into();
        role_from_output(role, name)
    }

    async fn update_role(
        &self,
        name: &str,
        description: Option<&str>,
        max_session_duration: Option<i32>,
    ) -> Result<(), ApiError> {
        self.client
            .update_role()
            .role_name(name)
            .set_description(description.map(ToString::to_string))
            .set_max_session_duration(max_session_duration)
            .send()
            .await
            .map_err(|e| ApiError::from_sdk(e, NOT_FOUND))?;
        Ok(())
    }

    async fn update_assume_role_policy(&self, name: &str, policy: &str) -> Result<(), ApiError> {
        self.client
            .update_assume_role_policy()
            .role_name(name)
            .policy_document(policy)
            .send()
            .await
            .map_err(|e| ApiError::from_sdk(e, NOT_FOUND))?;
        Ok(())
    }

    async fn put_permissions_boundary(&self, name: &str, arn: &str) -> Result<(), ApiError> {
        self.client
            .put_role_permissions_boundary()
            .role_name(name)
            .permissions_boundary(arn)
            .send()
            .await
            .map_err(|e| ApiError::from_sdk(e, NOT_FOUND))?;
        Ok(())
    }

    async fn tag_role(&self, name: &str, tags: &[Tag]) -> Result<(), ApiError> {
        self.client
            .tag_role()
            .role_name(name)
            .set_tags(Some(sdk_tags(tags)?))
            .send()
            .await
            .map_err(|e| ApiError::from_sdk(e, NOT_FOUND))?;
        Ok(())
    }

    async fn untag_role(&self, name: &str, keys: &[String]) -> Result<(), ApiError> {
        self.client
            .untag_role()
            .role_name(name)
            .set_tag_keys(Some(keys.to_vec()))
            .send()
            .await
            .map_err(|e| ApiError::from_sdk(e, NOT_FOUND))?;
        Ok(())
    }

    async fn delete_role(&self, name: &str) -> Result<(), ApiError> {
        self.client
            .delete_role()
            .role_name(name)
            .send()
            .await
            .map_err(|e| ApiError::from_sdk(e, NOT_FOUND))?;
        Ok(())
    }
}

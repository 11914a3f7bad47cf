//! # Glue Client
//!
//! Data Catalog connection operations. The connection body is exchanged as
//! the CRD's [`ConnectionInput`], which mirrors the Glue API shape.

use super::{format_timestamp, ApiError};
use crate::crd::{ConnectionInput, PhysicalConnectionRequirements};
use aws_config::SdkConfig;
use aws_sdk_glue::types::{self as sdk, ConnectionPropertyKey, ConnectionType};
use aws_sdk_glue::Client as GlueSdkClient;
use std::fmt;

const NOT_FOUND: &[&str] = &["EntityNotFoundException"];

/// Identifies a connection in a catalog; the account's catalog when `catalog_id` is unset
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectionKey {
    pub catalog_id: Option<String>,
    pub name: String,
}

/// A connection as reported by Glue
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GlueConnection {
    pub name: String,
    pub input: ConnectionInput,
    pub creation_time: Option<String>,
    pub last_updated_by: Option<String>,
    pub last_updated_time: Option<String>,
}

/// Body of a create or update call
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConnectionWrite {
    pub key: ConnectionKey,
    pub input: ConnectionInput,
}

#[derive(Clone)]
pub struct GlueClient {
    client: GlueSdkClient,
}

impl fmt::Debug for GlueClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GlueClient").finish_non_exhaustive()
    }
}

fn to_sdk_input(name: &str, input: &ConnectionInput) -> Result<sdk::ConnectionInput, ApiError> {
    let properties = input
        .connection_properties
        .iter()
        .map(|(k, v)| (ConnectionPropertyKey::from(k.as_str()), v.clone()))
        .collect();

    let requirements = input.physical_connection_requirements.as_ref().map(|p| {
        sdk::PhysicalConnectionRequirements::builder()
            .set_availability_zone(p.availability_zone.clone())
            .set_security_group_id_list(Some(p.security_group_id_list.clone()))
            .set_subnet_id(p.subnet_id.clone())
            .build()
    });

    Ok(sdk::ConnectionInput::builder()
        .name(name)
        .connection_type(ConnectionType::from(input.connection_type.as_str()))
        .set_connection_properties(Some(properties))
        .set_description(input.description.clone())
        .set_match_criteria(Some(input.match_criteria.clone()))
        .set_physical_connection_requirements(requirements)
        .build()?)
}

fn from_sdk_connection(name: &str, conn: &sdk::Connection) -> GlueConnection {
    let input = ConnectionInput {
        connection_type: conn
            .connection_type()
            .map(|t| t.as_str().to_string())
            .unwrap_or_default(),
        connection_properties: conn
            .connection_properties()
            .into_iter()
            .flatten()
            .map(|(k, v)| (k.as_str().to_string(), v.clone()))
            .collect(),
        description: conn.description().map(ToString::to_string),
        match_criteria: conn.match_criteria().to_vec(),
        physical_connection_requirements: conn.physical_connection_requirements().map(|p| {
            PhysicalConnectionRequirements {
                availability_zone: p.availability_zone().map(ToString::to_string),
                security_group_id_list: p.security_group_id_list().to_vec(),
                subnet_id: p.subnet_id().map(ToString::to_string),
            }
        }),
    };

    GlueConnection {
        name: conn.name().unwrap_or(name).to_string(),
        input,
        creation_time: conn.creation_time().and_then(format_timestamp),
        last_updated_by: conn.last_updated_by().map(ToString::to_string),
        last_updated_time: conn.last_updated_time().and_then(format_timestamp),
    }
}

impl GlueClient {
    #[must_use]
    pub fn new(config: &SdkConfig) -> Self {
        Self {
            client: GlueSdkClient::new(config),
        }
    }

    pub async fn get_connection(&self, key: ConnectionKey) -> Result<GlueConnection, ApiError> {
        let output = self
            .client
            .get_connection()
            .set_catalog_id(key.catalog_id)
            .name(&key.name)
            .send()
            .await
            .map_err(|e| ApiError::from_sdk(e, NOT_FOUND))?;

        output
            .connection()
            .map(|c| from_sdk_connection(&key.name, c))
            .ok_or_else(|| {
                ApiError::not_found(
                    "EntityNotFoundException",
                    format!("connection {} not returned", key.name),
                )
            })
    }

    pub async fn create_connection(&self, write: ConnectionWrite) -> Result<(), ApiError> {
        let input = to_sdk_input(&write.key.name, &write.input)?;
        self.client
            .create_connection()
            .set_catalog_id(write.key.catalog_id)
            .connection_input(input)
            .send()
            .await
            .map_err(|e| ApiError::from_sdk(e, NOT_FOUND))?;
        Ok(())
    }

    pub async fn update_connection(&self, write: ConnectionWrite) -> Result<(), ApiError> {
        let input = to_sdk_input(&write.key.name, &write.input)?;
        self.client
            .update_connection()
            .set_catalog_id(write.key.catalog_id)
            .name(&write.key.name)
            .connection_input(input)
            .send()
            .await
            .map_err(|e| ApiError::from_sdk(e, NOT_FOUND))?;
        Ok(())
    }

    pub async fn delete_connection(&self, key: ConnectionKey) -> Result<(), ApiError> {
        self.client
            .delete_connection()
            .set_catalog_id(key.catalog_id)
            .connection_name(&key.name)
            .send()
            .await
            .map_err(|e| ApiError::from_sdk(e, NOT_FOUND))?;
        Ok(())
    }
}

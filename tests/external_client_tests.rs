//! # External Client Tests
//!
//! Drives the hook-driven client through a resource's whole lifecycle
//! against an in-memory Glue fake.

mod common;

use async_trait::async_trait;
use common::{connection_from_yaml, CallLog, CONNECTION_YAML};
use provider_aws::controller::glue::connection::{hooks, ConnectionMapping};
use provider_aws::crd::{ConditionReason, ConditionType, Managed};
use provider_aws::managed::{External, ExternalClient, ServiceApi};
use provider_aws::provider::glue::{ConnectionKey, ConnectionWrite, GlueConnection};
use provider_aws::provider::ApiError;
use std::sync::Mutex;

/// One Glue catalog holding at most one connection
#[derive(Debug, Default)]
struct FakeGlue {
    stored: Mutex<Option<GlueConnection>>,
    log: CallLog,
}

impl FakeGlue {
    fn not_found(name: &str) -> ApiError {
        ApiError::not_found("EntityNotFoundException", format!("{name} not found"))
    }
}

#[async_trait]
impl ServiceApi<ConnectionMapping> for FakeGlue {
    async fn describe(&self, input: ConnectionKey) -> Result<GlueConnection, ApiError> {
        self.log.push(format!("describe {}", input.name));
        self.stored
            .lock()
            .unwrap()
            .clone()
            .filter(|c| c.name == input.name)
            .ok_or_else(|| Self::not_found(&input.name))
    }

    async fn create(&self, input: ConnectionWrite) -> Result<(), ApiError> {
        self.log.push(format!("create {}", input.key.name));
        *self.stored.lock().unwrap() = Some(GlueConnection {
            name: input.key.name,
            input: input.input,
            creation_time: Some("2026-10-19T09:00:00Z".to_string()),
            ..GlueConnection::default()
        });
        Ok(())
    }

    async fn update(&self, input: ConnectionWrite) -> Result<(), ApiError> {
        self.log.push(format!("update {}", input.key.name));
        let mut stored = self.stored.lock().unwrap();
        match stored.as_mut() {
            Some(connection) => {
                connection.input = input.input;
                Ok(())
            }
            None => Err(Self::not_found(&input.key.name)),
        }
    }

    async fn delete(&self, input: ConnectionKey) -> Result<(), ApiError> {
        self.log.push(format!("delete {}", input.name));
        match self.stored.lock().unwrap().take() {
            Some(_) => Ok(()),
            None => Err(Self::not_found(&input.name)),
        }
    }
}

#[tokio::test]
async fn test_connection_lifecycle() {
    let fake = FakeGlue::default();
    let log = fake.log.clone();
    let external = External::new(fake, hooks());
    let mut cr = connection_from_yaml(CONNECTION_YAML);

    // no external name yet: nothing to look up
    let obs = external.observe(&mut cr).await.unwrap();
    assert!(!obs.resource_exists);
    assert!(log.calls().is_empty());

    cr.set_external_name("warehouse");
    let obs = external.observe(&mut cr).await.unwrap();
    assert!(!obs.resource_exists);

    external.create(&mut cr).await.unwrap();
    assert_eq!(
        cr.get_condition(ConditionType::Ready).reason,
        Some(ConditionReason::Creating)
    );

    let obs = external.observe(&mut cr).await.unwrap();
    assert!(obs.resource_exists);
    assert!(obs.resource_up_to_date);
    assert_eq!(
        cr.get_condition(ConditionType::Ready).reason,
        Some(ConditionReason::Available)
    );
    assert_eq!(
        cr.status.as_ref().unwrap().at_provider.creation_time.as_deref(),
        Some("2026-10-19T09:00:00Z")
    );

    cr.spec.for_provider.connection_input.description = Some("warehouse replica".to_string());
    let obs = external.observe(&mut cr).await.unwrap();
    assert!(!obs.resource_up_to_date);
    assert_eq!(obs.diff, "description");

    external.update(&mut cr).await.unwrap();
    let obs = external.observe(&mut cr).await.unwrap();
    assert!(obs.resource_up_to_date);

    external.delete(&mut cr).await.unwrap();
    let obs = external.observe(&mut cr).await.unwrap();
    assert!(!obs.resource_exists);

    // deleting again is not an error
    external.delete(&mut cr).await.unwrap();

    assert_eq!(
        log.calls(),
        vec![
            "describe warehouse",
            "create warehouse",
            "describe warehouse",
            "describe warehouse",
            "update warehouse",
            "describe warehouse",
            "delete warehouse",
            "describe warehouse",
            "delete warehouse",
        ]
    );
}

#[tokio::test]
async fn test_describe_failure_is_labelled() {
    struct Throttled;

    #[async_trait]
    impl ServiceApi<ConnectionMapping> for Throttled {
        async fn describe(&self, _: ConnectionKey) -> Result<GlueConnection, ApiError> {
            Err(ApiError::service("ThrottlingException", "rate exceeded"))
        }
        async fn create(&self, _: ConnectionWrite) -> Result<(), ApiError> {
            Ok(())
        }
        async fn update(&self, _: ConnectionWrite) -> Result<(), ApiError> {
            Ok(())
        }
        async fn delete(&self, _: ConnectionKey) -> Result<(), ApiError> {
            Ok(())
        }
    }

    let external = External::new(Throttled, hooks());
    let mut cr = connection_from_yaml(CONNECTION_YAML);
    cr.set_external_name("warehouse");

    let err = external.observe(&mut cr).await.unwrap_err();

    assert_eq!(err.to_string(), "failed to describe Connection: rate exceeded");
}

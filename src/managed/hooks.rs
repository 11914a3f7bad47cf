//! # Hook-Based External Client
//!
//! Most kinds follow the same shape: build one request from the spec, call
//! AWS, fold the response back. [`External`] implements that shape once.
//! A kind describes its request/response types through [`Mapping`], talks to
//! AWS through [`ServiceApi`], and customizes individual stages through
//! [`Hooks`], a struct of plain functions that default to no-ops:
//!
//! ```ignore
//! let hooks = Hooks::<RouteResponseMapping> {
//!     pre_observe,
//!     post_observe,
//!     post_create,
//!     ..Hooks::default()
//! };
//! let client = External::new(api, hooks);
//! ```
//!
//! Because `External<M, _>` only implements `ExternalClient<M::Resource>`,
//! passing it any other kind is a compile error:
//!
//! ```compile_fail
//! use provider_aws::controller::glue::connection::ConnectionMapping;
//! use provider_aws::crd::Role;
//! use provider_aws::managed::{External, ExternalClient};
//!
//! async fn observe_role<A>(client: &External<ConnectionMapping, A>, role: &mut Role)
//! where
//!     A: provider_aws::managed::ServiceApi<ConnectionMapping>,
//! {
//!     let _ = client.observe(role).await;
//! }
//! ```

use super::error::{Error, HookStage, Operation};
use super::external::{
    ExternalClient, ExternalCreation, ExternalObservation, ExternalUpdate,
};
use crate::crd::{Condition, Managed};
use crate::observability::metrics;
use crate::provider::ApiError;
use anyhow::Result;
use async_trait::async_trait;
use std::fmt;
use std::time::Instant;
use tracing::{debug, info_span, Instrument};

/// Request/response types of one managed resource kind and the pure
/// translations between them and the resource
pub trait Mapping: Send + Sync + 'static {
    type Resource: Managed;
    type Parameters: Clone + PartialEq + Send + Sync;

    type DescribeInput: Send + 'static;
    type DescribeOutput: Send + Sync + 'static;
    type CreateInput: Send + 'static;
    type CreateOutput: Send + Sync + 'static;
    type UpdateInput: Send + 'static;
    type UpdateOutput: Send + Sync + 'static;
    type DeleteInput: Send + 'static;
    type DeleteOutput: Send + Sync + 'static;

    /// Kind name used in error labels
    const KIND: &'static str;

    fn for_provider(cr: &Self::Resource) -> &Self::Parameters;
    fn for_provider_mut(cr: &mut Self::Resource) -> &mut Self::Parameters;

    fn describe_input(cr: &Self::Resource) -> Self::DescribeInput;
    fn create_input(cr: &Self::Resource) -> Self::CreateInput;
    fn update_input(cr: &Self::Resource) -> Self::UpdateInput;
    fn delete_input(cr: &Self::Resource) -> Self::DeleteInput;

    /// Copy provider-reported fields into `status.atProvider`
    fn observe_into(cr: &mut Self::Resource, output: &Self::DescribeOutput);
}

/// AWS calls for one kind
#[async_trait]
pub trait ServiceApi<M: Mapping>: Send + Sync {
    async fn describe(&self, input: M::DescribeInput) -> Result<M::DescribeOutput, ApiError>;
    async fn create(&self, input: M::CreateInput) -> Result<M::CreateOutput, ApiError>;
    async fn update(&self, input: M::UpdateInput) -> Result<M::UpdateOutput, ApiError>;
    async fn delete(&self, input: M::DeleteInput) -> Result<M::DeleteOutput, ApiError>;
}

pub type PreObserveFn<M> =
    fn(&<M as Mapping>::Resource, &mut <M as Mapping>::DescribeInput) -> Result<()>;
pub type PostObserveFn<M> = fn(
    &mut <M as Mapping>::Resource,
    &<M as Mapping>::DescribeOutput,
    ExternalObservation,
) -> Result<ExternalObservation>;
pub type LateInitializeFn<M> =
    fn(&mut <M as Mapping>::Parameters, &<M as Mapping>::DescribeOutput) -> Result<()>;
pub type IsUpToDateFn<M> =
    fn(&<M as Mapping>::Resource, &<M as Mapping>::DescribeOutput) -> Result<(bool, String)>;
pub type PreCreateFn<M> =
    fn(&<M as Mapping>::Resource, &mut <M as Mapping>::CreateInput) -> Result<()>;
pub type PostCreateFn<M> = fn(
    &mut <M as Mapping>::Resource,
    &<M as Mapping>::CreateOutput,
    ExternalCreation,
) -> Result<ExternalCreation>;
pub type PreUpdateFn<M> =
    fn(&<M as Mapping>::Resource, &mut <M as Mapping>::UpdateInput) -> Result<()>;
pub type PostUpdateFn<M> = fn(
    &mut <M as Mapping>::Resource,
    &<M as Mapping>::UpdateOutput,
    ExternalUpdate,
) -> Result<ExternalUpdate>;
/// Returns `true` to skip the delete call
pub type PreDeleteFn<M> =
    fn(&<M as Mapping>::Resource, &mut <M as Mapping>::DeleteInput) -> Result<bool>;
pub type PostDeleteFn<M> =
    fn(&mut <M as Mapping>::Resource, &<M as Mapping>::DeleteOutput) -> Result<()>;

/// Per-stage customization of [`External`]
pub struct Hooks<M: Mapping> {
    pub pre_observe: PreObserveFn<M>,
    pub post_observe: PostObserveFn<M>,
    pub late_initialize: LateInitializeFn<M>,
    pub is_up_to_date: IsUpToDateFn<M>,
    pub pre_create: PreCreateFn<M>,
    pub post_create: PostCreateFn<M>,
    pub pre_update: PreUpdateFn<M>,
    pub post_update: PostUpdateFn<M>,
    pub pre_delete: PreDeleteFn<M>,
    pub post_delete: PostDeleteFn<M>,
}

fn nop_pre_observe<M: Mapping>(_: &M::Resource, _: &mut M::DescribeInput) -> Result<()> {
    Ok(())
}

fn nop_post_observe<M: Mapping>(
    _: &mut M::Resource,
    _: &M::DescribeOutput,
    obs: ExternalObservation,
) -> Result<ExternalObservation> {
    Ok(obs)
}

fn nop_late_initialize<M: Mapping>(_: &mut M::Parameters, _: &M::DescribeOutput) -> Result<()> {
    Ok(())
}

fn always_up_to_date<M: Mapping>(_: &M::Resource, _: &M::DescribeOutput) -> Result<(bool, String)> {
    Ok((true, String::new()))
}

fn nop_pre_create<M: Mapping>(_: &M::Resource, _: &mut M::CreateInput) -> Result<()> {
    Ok(())
}

fn nop_post_create<M: Mapping>(
    _: &mut M::Resource,
    _: &M::CreateOutput,
    cre: ExternalCreation,
) -> Result<ExternalCreation> {
    Ok(cre)
}

fn nop_pre_update<M: Mapping>(_: &M::Resource, _: &mut M::UpdateInput) -> Result<()> {
    Ok(())
}

fn nop_post_update<M: Mapping>(
    _: &mut M::Resource,
    _: &M::UpdateOutput,
    upd: ExternalUpdate,
) -> Result<ExternalUpdate> {
    Ok(upd)
}

fn nop_pre_delete<M: Mapping>(_: &M::Resource, _: &mut M::DeleteInput) -> Result<bool> {
    Ok(false)
}

fn nop_post_delete<M: Mapping>(_: &mut M::Resource, _: &M::DeleteOutput) -> Result<()> {
    Ok(())
}

impl<M: Mapping> Default for Hooks<M> {
    fn default() -> Self {
        Self {
            pre_observe: nop_pre_observe::<M>,
            post_observe: nop_post_observe::<M>,
            late_initialize: nop_late_initialize::<M>,
            is_up_to_date: always_up_to_date::<M>,
            pre_create: nop_pre_create::<M>,
            post_create: nop_post_create::<M>,
            pre_update: nop_pre_update::<M>,
            post_update: nop_post_update::<M>,
            pre_delete: nop_pre_delete::<M>,
            post_delete: nop_post_delete::<M>,
        }
    }
}

impl<M: Mapping> Clone for Hooks<M> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<M: Mapping> Copy for Hooks<M> {}

impl<M: Mapping> fmt::Debug for Hooks<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hooks")
            .field("kind", &M::KIND)
            .finish_non_exhaustive()
    }
}

/// [`ExternalClient`] driving a [`ServiceApi`] through [`Hooks`]
pub struct External<M: Mapping, A> {
    client: A,
    hooks: Hooks<M>,
}

impl<M: Mapping, A> External<M, A> {
    pub fn new(client: A, hooks: Hooks<M>) -> Self {
        Self { client, hooks }
    }
}

impl<M: Mapping, A> fmt::Debug for External<M, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("External")
            .field("kind", &M::KIND)
            .finish_non_exhaustive()
    }
}

/// Time an AWS call and record it in the external operation metrics
async fn timed<T>(
    kind: &'static str,
    operation: Operation,
    call: impl std::future::Future<Output = Result<T, ApiError>>,
) -> Result<T, ApiError> {
    let start = Instant::now();
    let result = call.await;
    metrics::record_external_operation(kind, operation.as_str(), start.elapsed().as_secs_f64());
    if let Err(e) = &result {
        if !e.is_not_found() {
            metrics::increment_external_operation_errors(kind, operation.as_str());
        }
    }
    result
}

#[async_trait]
impl<M, A> ExternalClient<M::Resource> for External<M, A>
where
    M: Mapping,
    A: ServiceApi<M>,
{
    async fn observe(&self, cr: &mut M::Resource) -> Result<ExternalObservation, Error> {
        if cr.external_name().is_none() {
            return Ok(ExternalObservation::missing());
        }
        let span = info_span!(
            "external.observe",
            resource.kind = M::KIND,
            resource.name = cr.resource_name()
        );

        async move {
            let mut input = M::describe_input(cr);
            (self.hooks.pre_observe)(cr, &mut input)
                .map_err(|e| Error::hook(HookStage::PreObserve, e))?;

            let described = timed(M::KIND, Operation::Describe, self.client.describe(input)).await;
            let output = match described {
                Ok(output) => output,
                Err(e) if e.is_not_found() => {
                    debug!("{} {} not found", M::KIND, cr.resource_name());
                    return Ok(ExternalObservation::missing());
                }
                Err(e) => return Err(Error::provider(M::KIND, Operation::Describe, e)),
            };

            let current = M::for_provider(cr).clone();
            (self.hooks.late_initialize)(M::for_provider_mut(cr), &output)
                .map_err(|e| Error::hook(HookStage::LateInitialize, e))?;
            M::observe_into(cr, &output);

            let (up_to_date, diff) = (self.hooks.is_up_to_date)(cr, &output)
                .map_err(|e| Error::hook(HookStage::IsUpToDate, e))?;

            let observation = ExternalObservation {
                resource_exists: true,
                resource_up_to_date: up_to_date,
                resource_late_initialized: *M::for_provider(cr) != current,
                connection_details: Default::default(),
                diff,
            };
            (self.hooks.post_observe)(cr, &output, observation)
                .map_err(|e| Error::hook(HookStage::PostObserve, e))
        }
        .instrument(span)
        .await
    }

    async fn create(&self, cr: &mut M::Resource) -> Result<ExternalCreation, Error> {
        cr.set_conditions([Condition::creating()]);

        let mut input = M::create_input(cr);
        (self.hooks.pre_create)(cr, &mut input)
            .map_err(|e| Error::hook(HookStage::PreCreate, e))?;

        let output = timed(M::KIND, Operation::Create, self.client.create(input))
            .await
            .map_err(|e| Error::provider(M::KIND, Operation::Create, e))?;

        (self.hooks.post_create)(cr, &output, ExternalCreation::default())
            .map_err(|e| Error::hook(HookStage::PostCreate, e))
    }

    async fn update(&self, cr: &mut M::Resource) -> Result<ExternalUpdate, Error> {
        let mut input = M::update_input(cr);
        (self.hooks.pre_update)(cr, &mut input)
            .map_err(|e| Error::hook(HookStage::PreUpdate, e))?;

        let output = timed(M::KIND, Operation::Update, self.client.update(input))
            .await
            .map_err(|e| Error::provider(M::KIND, Operation::Update, e))?;

        (self.hooks.post_update)(cr, &output, ExternalUpdate::default())
            .map_err(|e| Error::hook(HookStage::PostUpdate, e))
    }

    async fn delete(&self, cr: &mut M::Resource) -> Result<(), Error> {
        cr.set_conditions([Condition::deleting()]);

        let mut input = M::delete_input(cr);
        let skip = (self.hooks.pre_delete)(cr, &mut input)
            .map_err(|e| Error::hook(HookStage::PreDelete, e))?;
        if skip {
            return Ok(());
        }

        match timed(M::KIND, Operation::Delete, self.client.delete(input)).await {
            Ok(output) => (self.hooks.post_delete)(cr, &output)
                .map_err(|e| Error::hook(HookStage::PostDelete, e)),
            Err(e) if e.is_not_found() => Ok(()),
            Err(e) => Err(Error::provider(M::KIND, Operation::Delete, e)),
        }
    }
}

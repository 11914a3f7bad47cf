//! Test doubles for the managed resource layer

use super::error::Operation;
use super::hooks::{Mapping, ServiceApi};
use super::store::ResourceUpdater;
use crate::crd::Managed;
use crate::provider::ApiError;
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

type Call<I, O> = Box<dyn Fn(I) -> Result<O, ApiError> + Send + Sync>;

/// [`ServiceApi`] answering each call with a closure; unexpected calls panic
pub(crate) struct MockServiceApi<M: Mapping> {
    describe: Option<Call<M::DescribeInput, M::DescribeOutput>>,
    create: Option<Call<M::CreateInput, M::CreateOutput>>,
    update: Option<Call<M::UpdateInput, M::UpdateOutput>>,
    delete: Option<Call<M::DeleteInput, M::DeleteOutput>>,
    calls: Arc<Mutex<Vec<Operation>>>,
}

impl<M: Mapping> MockServiceApi<M> {
    pub(crate) fn new() -> Self {
        Self {
            describe: None,
            create: None,
            update: None,
            delete: None,
            calls: Arc::default(),
        }
    }

    pub(crate) fn with_describe(
        mut self,
        f: impl Fn(M::DescribeInput) -> Result<M::DescribeOutput, ApiError> + Send + Sync + 'static,
    ) -> Self {
        self.describe = Some(Box::new(f));
        self
    }

    pub(crate) fn with_create(
        mut self,
        f: impl Fn(M::CreateInput) -> Result<M::CreateOutput, ApiError> + Send + Sync + 'static,
    ) -> Self {
        self.create = Some(Box::new(f));
        self
    }

    pub(crate) fn with_update(
        mut self,
        f: impl Fn(M::UpdateInput) -> Result<M::UpdateOutput, ApiError> + Send + Sync + 'static,
    ) -> Self {
        self.update = Some(Box::new(f));
        self
    }

    pub(crate) fn with_delete(
        mut self,
        f: impl Fn(M::DeleteInput) -> Result<M::DeleteOutput, ApiError> + Send + Sync + 'static,
    ) -> Self {
        self.delete = Some(Box::new(f));
        self
    }

    /// Shared log of the calls made, in order
    pub(crate) fn call_log(&self) -> Arc<Mutex<Vec<Operation>>> {
        Arc::clone(&self.calls)
    }

    fn record(&self, operation: Operation) {
        self.calls.lock().unwrap().push(operation);
    }
}

fn answer<I, O>(call: Option<&Call<I, O>>, operation: Operation, input: I) -> Result<O, ApiError> {
    match call {
        Some(f) => f(input),
        None => panic!("unexpected {operation} call"),
    }
}

#[async_trait]
impl<M: Mapping> ServiceApi<M> for MockServiceApi<M> {
    async fn describe(&self, input: M::DescribeInput) -> Result<M::DescribeOutput, ApiError> {
        self.record(Operation::Describe);
        answer(self.describe.as_ref(), Operation::Describe, input)
    }

    async fn create(&self, input: M::CreateInput) -> Result<M::CreateOutput, ApiError> {
        self.record(Operation::Create);
        answer(self.create.as_ref(), Operation::Create, input)
    }

    async fn update(&self, input: M::UpdateInput) -> Result<M::UpdateOutput, ApiError> {
        self.record(Operation::Update);
        answer(self.update.as_ref(), Operation::Update, input)
    }

    async fn delete(&self, input: M::DeleteInput) -> Result<M::DeleteOutput, ApiError> {
        self.record(Operation::Delete);
        answer(self.delete.as_ref(), Operation::Delete, input)
    }
}

/// [`ResourceUpdater`] counting writes, optionally failing them
#[derive(Debug, Default)]
pub(crate) struct MockUpdater {
    pub(crate) updates: AtomicUsize,
    pub(crate) status_updates: AtomicUsize,
    pub(crate) fail: bool,
}

impl MockUpdater {
    pub(crate) fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub(crate) fn updates(&self) -> usize {
        self.updates.load(Ordering::SeqCst)
    }

    pub(crate) fn status_updates(&self) -> usize {
        self.status_updates.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl<R: Managed> ResourceUpdater<R> for MockUpdater {
    async fn update(&self, _cr: &mut R) -> Result<()> {
        self.updates.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(anyhow!("boom"));
        }
        Ok(())
    }

    async fn update_status(&self, _cr: &R) -> Result<()> {
        self.status_updates.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

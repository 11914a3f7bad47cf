//! # Managed Resource Runtime
//!
//! The contract between the generic reconciler and per-kind AWS adapters.
//!
//! ## Module Structure
//!
//! - `external.rs` - `ExternalClient`, `ExternalConnecter` and `Initializer` traits
//! - `hooks.rs` - Hook-driven `ExternalClient` shared by the generated kinds
//! - `error.rs` - Operation-labelled errors
//! - `tagging.rs` - Reserved tag merge and the `Tagger` initializer
//! - `initializer.rs` - `NameAsExternalName` initializer
//! - `store.rs` - Persisting spec, metadata and status
//! - `publisher.rs` - Connection secret publishing

mod error;
mod external;
mod hooks;
mod initializer;
mod publisher;
mod store;
mod tagging;

#[cfg(test)]
pub(crate) mod testing;

pub use error::{Error, HookStage, Operation};
pub use external::{
    ConnectionDetails, ExternalClient, ExternalConnecter, ExternalCreation, ExternalObservation,
    ExternalUpdate, Initializer,
};
pub use hooks::{
    External, Hooks, IsUpToDateFn, LateInitializeFn, Mapping, PostCreateFn, PostDeleteFn,
    PostObserveFn, PostUpdateFn, PreCreateFn, PreDeleteFn, PreObserveFn, PreUpdateFn, ServiceApi,
};
pub use initializer::NameAsExternalName;
pub use publisher::{connection_secret, ConnectionPublisher, SecretPublisher};
pub use store::{KubeResourceUpdater, ResourceUpdater};
pub use tagging::{merge_tags, reserved_tags, Tagged, Tagger};

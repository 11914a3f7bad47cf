//! # Reconciler
//!
//! Generic reconciler shared by every managed resource kind.
//!
//! ## Module Structure
//!
//! - `types.rs` - `ReconcilerError`, `BackoffState`, `ReconcileContext`
//! - `managed.rs` - `ManagedReconciler`: observe/create/update/delete decisions
//! - `reconcile.rs` - Controller entry point with finalizer handling

mod managed;
mod reconcile;
mod types;

pub use managed::ManagedReconciler;
pub use reconcile::reconcile;
pub use types::{BackoffState, ReconcileContext, ReconcilerError};
pub(crate) use types::backoff_key;

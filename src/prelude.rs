//! # Prelude
//!
//! Re-exports commonly used types and traits.
//!
//! ```rust
//! use provider_aws::prelude::*;
//! ```

// CRD types
pub use crate::crd::*;

// Managed resource contract
pub use crate::managed::{
    ExternalClient, ExternalConnecter, ExternalCreation, ExternalObservation, ExternalUpdate,
    Hooks, Initializer, Mapping, ServiceApi, Tagged,
};

// Reconciler types
pub use crate::controller::reconciler::{
    reconcile, BackoffState, ManagedReconciler, ReconcileContext, ReconcilerError,
};

pub use crate::config::ControllerConfig;

pub use crate::managed::Error as ExternalError;
pub use crate::provider::ApiError;

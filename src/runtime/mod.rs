//! # Runtime
//!
//! Process startup and the per-kind controller loops.
//!
//! - `initialization`: rustls, tracing, metrics, HTTP server and Kubernetes client
//! - `watch_loop`: One `kube_runtime::Controller` per managed resource kind
//! - `error_policy`: Requeue decisions for failed reconciliations

pub mod error_policy;
pub mod initialization;
pub mod watch_loop;

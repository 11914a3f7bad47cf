//! # AWS Service Clients
//!
//! Thin wrappers over the AWS SDK clients. Each wrapper speaks in plain
//! crate-owned request/response types and collapses SDK errors into
//! [`ApiError`], so controllers can be tested against in-memory fakes.
//!
//! ## Module Structure
//!
//! - `session.rs` - ProviderConfig to `SdkConfig` resolution
//! - `credentials.rs` - Shared-credentials documents from Secrets
//! - `error.rs` - `ApiError`
//! - `iam.rs`, `glue.rs`, `apigatewayv2.rs`, `sesv2.rs`, `ec2.rs` - Service clients

mod credentials;
mod error;
mod session;

pub mod apigatewayv2;
pub mod ec2;
pub mod glue;
pub mod iam;
pub mod sesv2;

pub use credentials::load_profile_credentials;
pub use error::ApiError;
pub use session::{provider_config_name, SessionResolver};

use aws_sdk_sts::primitives::{DateTime, DateTimeFormat};

/// RFC 3339 rendering of an AWS timestamp
pub(crate) fn format_timestamp(time: &DateTime) -> Option<String> {
    time.fmt(DateTimeFormat::DateTime).ok()
}

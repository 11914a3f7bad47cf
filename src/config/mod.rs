//! # Configuration
//!
//! Provider settings loaded from environment variables, overridable by CLI flags.

mod controller;

pub use controller::ControllerConfig;

//! # SESv2 Controllers

pub mod configuration_set;

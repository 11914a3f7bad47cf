//! # IAM Controllers

pub mod role;

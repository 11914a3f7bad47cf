//! # EC2 Controllers

pub mod vpc_endpoint_service_configuration;

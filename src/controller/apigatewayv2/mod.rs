//! # API Gateway v2 Controllers

pub mod route_response;

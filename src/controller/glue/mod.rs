//! # Glue Controllers

pub mod connection;

//! Configuration and payload models shared by both Lambdas

pub mod config;
pub mod models;

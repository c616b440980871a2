//! AWS-oriented adapters and handlers for resume upload and search.
//!
//! This crate owns runtime integration details (Lambda handlers, DynamoDB
//! and S3 adapters, configuration and logging) on top of the domain
//! primitives in `resume_search_core`.

pub mod adapters;
pub mod config;
pub mod error;
pub mod handlers;
pub mod telemetry;

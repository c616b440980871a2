//! Error types for store adapters, configuration and handlers.

use resume_search_core::contract::ValidationError;
use thiserror::Error;

/// Errors raised by the document table and object store adapters.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The table rejected the request due to capacity limits.
    #[error("Scan of table {table} was throttled: {message}")]
    Throttled { table: String, message: String },

    /// Any other scan failure (transport, permissions, validation).
    #[error("Scan of table {table} failed: {message}")]
    Scan { table: String, message: String },

    #[error("Failed to write s3://{bucket}/{key}: {message}")]
    Write {
        bucket: String,
        key: String,
        message: String,
    },

    #[error("Failed to presign s3://{bucket}/{key}: {message}")]
    Presign {
        bucket: String,
        key: String,
        message: String,
    },

    /// An attribute value or cursor could not be converted.
    #[error("Attribute decoding failed: {message}")]
    Decode { message: String },

    #[error("Invalid scan request: {message}")]
    InvalidRequest { message: String },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name} must be configured")]
    Missing { name: &'static str },

    #[error("{name} has invalid value '{value}': {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },
}

/// Everything that can fail inside a handler before the response boundary.
#[derive(Error, Debug)]
pub enum HandlerError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Invalid request: {0}")]
    Validation(#[from] ValidationError),

    #[error("Request body is missing")]
    MissingBody,

    #[error("Request body is invalid: {message}")]
    InvalidBody { message: String },

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Failed to serialize response: {0}")]
    Serialize(#[from] serde_json::Error),
}

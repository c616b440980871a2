//! Shared resume search domain primitives.
//!
//! This crate owns the search request contract, skill filter composition,
//! the opaque pagination cursor and object key layout. It intentionally
//! excludes AWS SDK and Lambda runtime concerns.

pub mod contract;
pub mod cursor;
pub mod filter;
pub mod storage_keys;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

use crate::cursor::PageCursor;

pub const DEFAULT_PAGE_SIZE: usize = 5;
pub const DEFAULT_LINK_EXPIRY_SECS: u64 = 600;

pub const SKILL_PARAM: &str = "skill";
pub const PAGE_PARAM: &str = "page";
pub const LAST_KEY_PARAM: &str = "last_key";

/// Multi-valued query string parameters, keyed by parameter name.
pub type QueryParams = BTreeMap<String, Vec<String>>;

/// A single stored resume document, decoded into plain JSON.
pub type ResumeRecord = Map<String, Value>;

/// Parsed form of a resume search request.
///
/// `scan_limit` bounds the number of items the store inspects, not the
/// number of matches returned. The wire parameter keeps its historical
/// name `page`.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    pub skills: Vec<String>,
    pub scan_limit: usize,
    pub cursor: Option<PageCursor>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchResponse {
    pub items: Vec<ResumeRecord>,
    pub last_key: Option<PageCursor>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    message: String,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ValidationError {}

pub fn parse_search_params(
    params: &QueryParams,
    default_scan_limit: usize,
) -> Result<SearchRequest, ValidationError> {
    let skills = params.get(SKILL_PARAM).cloned().unwrap_or_default();
    if skills.is_empty() {
        return Err(ValidationError::new("at least one skill is required"));
    }
    if skills.iter().any(|skill| skill.is_empty()) {
        return Err(ValidationError::new("skill values must be non-empty"));
    }

    let scan_limit = match first_value(params, PAGE_PARAM) {
        Some(raw) => parse_scan_limit(raw)?,
        None => default_scan_limit,
    };
    if scan_limit == 0 {
        return Err(ValidationError::new("page must be a positive integer"));
    }

    let cursor = match first_value(params, LAST_KEY_PARAM) {
        Some(raw) if !raw.trim().is_empty() => Some(PageCursor::parse(raw)?),
        _ => None,
    };

    Ok(SearchRequest {
        skills,
        scan_limit,
        cursor,
    })
}

fn first_value<'a>(params: &'a QueryParams, name: &str) -> Option<&'a str> {
    params
        .get(name)
        .and_then(|values| values.first())
        .map(String::as_str)
}

fn parse_scan_limit(raw: &str) -> Result<usize, ValidationError> {
    raw.trim()
        .parse::<usize>()
        .map_err(|_| ValidationError::new(format!("page must be a positive integer, got '{raw}'")))
}

/// Hex-encoded SHA-256 of an object body, used to correlate uploads in logs.
pub fn content_fingerprint(body: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(body);
    format!("{:x}", hasher.finalize())
}

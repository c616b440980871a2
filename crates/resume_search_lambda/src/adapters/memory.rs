//! In-process store implementations for local runs and tests.
//!
//! `InMemoryResumeTable` follows DynamoDB scan semantics: `limit` bounds the
//! items inspected, the filter is applied afterwards, and a last evaluated
//! key is returned whenever the scan stopped because the limit was reached.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use chrono::Utc;
use resume_search_core::contract::ResumeRecord;
use resume_search_core::cursor::PageCursor;
use serde_json::{Map, Value};

use crate::adapters::document_store::{ResumeTable, ScanPage, ScanRequest};
use crate::adapters::object_store::{LinkSigner, ObjectStore};
use crate::error::StoreError;

pub const DEFAULT_KEY_ATTRIBUTE: &str = "id";

#[derive(Debug, Clone)]
pub struct InMemoryResumeTable {
    key_attribute: String,
    records: Vec<ResumeRecord>,
}

impl InMemoryResumeTable {
    /// Records are scanned in the order given. Each must carry a string
    /// `id` attribute.
    pub fn new(records: Vec<ResumeRecord>) -> Self {
        Self {
            key_attribute: DEFAULT_KEY_ATTRIBUTE.to_string(),
            records,
        }
    }

    fn record_key(&self, record: &ResumeRecord) -> Result<String, StoreError> {
        record
            .get(&self.key_attribute)
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| StoreError::Decode {
                message: format!("record is missing string key '{}'", self.key_attribute),
            })
    }

    fn cursor_for(&self, record: &ResumeRecord) -> Result<PageCursor, StoreError> {
        let mut typed = Map::new();
        typed.insert("S".to_string(), Value::String(self.record_key(record)?));
        let mut key = Map::new();
        key.insert(self.key_attribute.clone(), Value::Object(typed));
        Ok(PageCursor::from_map(key))
    }

    fn start_index(&self, cursor: Option<&PageCursor>) -> Result<usize, StoreError> {
        let Some(cursor) = cursor else {
            return Ok(0);
        };
        let wanted = cursor
            .as_map()
            .get(&self.key_attribute)
            .and_then(|typed| typed.get("S"))
            .and_then(Value::as_str)
            .ok_or_else(|| StoreError::InvalidRequest {
                message: "exclusive start key does not match the table key schema".to_string(),
            })?;

        for (index, record) in self.records.iter().enumerate() {
            if self.record_key(record)? == wanted {
                return Ok(index + 1);
            }
        }
        Err(StoreError::InvalidRequest {
            message: format!("exclusive start key '{wanted}' is not present in the table"),
        })
    }
}

impl ResumeTable for InMemoryResumeTable {
    fn scan_page(&self, request: &ScanRequest<'_>) -> Result<ScanPage, StoreError> {
        if request.limit == 0 {
            return Err(StoreError::InvalidRequest {
                message: "scan limit must be at least 1".to_string(),
            });
        }

        let start = self.start_index(request.exclusive_start_key)?;
        let end = start.saturating_add(request.limit).min(self.records.len());
        let scanned = &self.records[start.min(end)..end];

        let items = scanned
            .iter()
            .filter(|record| request.filter.matches(record))
            .cloned()
            .collect();

        let last_evaluated_key = match scanned.last() {
            Some(last) if scanned.len() == request.limit => Some(self.cursor_for(last)?),
            _ => None,
        };

        Ok(ScanPage {
            items,
            last_evaluated_key,
            scanned_count: scanned.len(),
        })
    }
}

/// Object store that keeps writes in memory and signs fake links carrying a
/// timestamp and a nonce, so every link it issues is distinct.
#[derive(Debug, Default)]
pub struct InMemoryObjectStore {
    objects: Mutex<BTreeMap<(String, String), Vec<u8>>>,
    unsignable_keys: Mutex<BTreeSet<String>>,
    nonce: AtomicU64,
}

impl InMemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes `presign_get` fail for `key`.
    pub fn refuse_signing(&self, key: &str) {
        self.unsignable_keys
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(key.to_string());
    }

    pub fn object(&self, bucket: &str, key: &str) -> Option<Vec<u8>> {
        self.objects
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
    }

    pub fn keys(&self, bucket: &str) -> Vec<String> {
        self.objects
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .keys()
            .filter(|(object_bucket, _)| object_bucket == bucket)
            .map(|(_, key)| key.clone())
            .collect()
    }
}

impl ObjectStore for InMemoryObjectStore {
    fn put_object(&self, bucket: &str, key: &str, body: &[u8]) -> Result<(), StoreError> {
        self.objects
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert((bucket.to_string(), key.to_string()), body.to_vec());
        Ok(())
    }
}

impl LinkSigner for InMemoryObjectStore {
    fn presign_get(
        &self,
        bucket: &str,
        key: &str,
        expires_in: Duration,
    ) -> Result<String, StoreError> {
        let refused = self
            .unsignable_keys
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .contains(key);
        if refused {
            return Err(StoreError::Presign {
                bucket: bucket.to_string(),
                key: key.to_string(),
                message: "signing refused".to_string(),
            });
        }

        let nonce = self.nonce.fetch_add(1, Ordering::Relaxed);
        Ok(format!(
            "https://{bucket}.s3.localhost/{key}?X-Amz-Date={}&X-Amz-Expires={}&X-Amz-Nonce={nonce}",
            Utc::now().format("%Y%m%dT%H%M%SZ"),
            expires_in.as_secs(),
        ))
    }
}

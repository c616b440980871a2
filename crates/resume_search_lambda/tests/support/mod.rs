#![allow(dead_code)]

use std::collections::BTreeMap;

use resume_search_core::contract::ResumeRecord;
use serde_json::{json, Value};

pub const TABLE_NAME: &str = "resumes";
pub const BUCKET: &str = "resume-uploads";

/// Environment shared by both handlers in tests.
pub fn test_config() -> BTreeMap<String, String> {
    BTreeMap::from([
        ("STORE_TABLE_NAME".to_string(), TABLE_NAME.to_string()),
        ("UPLOAD_S3_NAME".to_string(), BUCKET.to_string()),
    ])
}

/// A resume document as the table stores it.
pub fn resume(id: &str, skills: &[&str]) -> ResumeRecord {
    json!({
        "id": id,
        "skills": skills,
        "resume_key": format!("uploads/{id}.pdf"),
    })
    .as_object()
    .cloned()
    .expect("resume must be an object")
}

/// API Gateway search event with repeated `skill` values.
pub fn search_event(skills: &[&str], page: Option<usize>, last_key: Option<&Value>) -> Value {
    let mut params = serde_json::Map::new();
    params.insert("skill".to_string(), json!(skills));
    if let Some(page) = page {
        params.insert("page".to_string(), json!([page.to_string()]));
    }
    if let Some(last_key) = last_key {
        params.insert("last_key".to_string(), json!([last_key.to_string()]));
    }
    json!({ "multiValueQueryStringParameters": params })
}

pub fn body_json(body: &str) -> Value {
    serde_json::from_str(body).expect("body should be JSON")
}

pub fn item_ids(body: &Value) -> Vec<String> {
    body["items"]
        .as_array()
        .expect("items should be an array")
        .iter()
        .map(|item| item["id"].as_str().expect("item id").to_string())
        .collect()
}

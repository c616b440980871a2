use base64::engine::general_purpose::STANDARD as B64;
use base64::Engine as _;
use resume_search_core::contract::content_fingerprint;
use resume_search_core::storage_keys::upload_object_key;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::adapters::object_store::ObjectStore;
use crate::config::{ConfigSource, UploaderConfig};
use crate::error::HandlerError;
use crate::handlers::response::{json_response, text_response, ApiGatewayResponse};
use crate::telemetry::UPLOADER_COMPONENT;

pub const UPLOAD_SUCCESS_MESSAGE: &str = "File Uploaded";
pub const UPLOAD_FAILURE_BODY: &str = "Something Went Wrong";

pub trait ObjectIdGenerator {
    fn next_id(&self) -> String;
}

/// Random v4 UUIDs; every upload lands under a new key.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomObjectIds;

impl ObjectIdGenerator for RandomObjectIds {
    fn next_id(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadReceipt {
    pub bucket: String,
    pub key: String,
    pub size_bytes: usize,
    pub content_sha256: String,
}

pub fn handle_upload_event(
    event: &Value,
    config: &dyn ConfigSource,
    store: &dyn ObjectStore,
    ids: &dyn ObjectIdGenerator,
) -> ApiGatewayResponse {
    match upload_object(event, config, store, ids) {
        Ok(_) => json_response(200, json!(UPLOAD_SUCCESS_MESSAGE).to_string()),
        Err(error) => {
            tracing::error!(
                component = UPLOADER_COMPONENT,
                event = "request_failed",
                error = %error,
                "upload failed"
            );
            text_response(500, UPLOAD_FAILURE_BODY)
        }
    }
}

/// Decodes the base64 body and stores it under a freshly generated key.
/// No dedup: identical content uploaded twice yields two objects.
pub fn upload_object(
    event: &Value,
    config: &dyn ConfigSource,
    store: &dyn ObjectStore,
    ids: &dyn ObjectIdGenerator,
) -> Result<UploadReceipt, HandlerError> {
    let config = UploaderConfig::from_source(config)?;
    let body = decode_body(event)?;
    let key = upload_object_key(config.key_prefix.as_deref(), &ids.next_id());

    tracing::info!(
        component = UPLOADER_COMPONENT,
        event = "upload_started",
        bucket = %config.bucket,
        key = %key,
        size_bytes = body.len(),
        "uploading object"
    );

    store.put_object(&config.bucket, &key, &body)?;

    let receipt = UploadReceipt {
        bucket: config.bucket,
        key,
        size_bytes: body.len(),
        content_sha256: content_fingerprint(&body),
    };
    tracing::info!(
        component = UPLOADER_COMPONENT,
        event = "upload_completed",
        key = %receipt.key,
        content_sha256 = %receipt.content_sha256,
        "object uploaded"
    );
    Ok(receipt)
}

fn decode_body(event: &Value) -> Result<Vec<u8>, HandlerError> {
    match event.get("body") {
        None | Some(Value::Null) => Err(HandlerError::MissingBody),
        Some(Value::String(text)) => {
            // Line-wrapped (MIME style) base64 is accepted.
            let compact: String = text
                .chars()
                .filter(|character| !character.is_ascii_whitespace())
                .collect();
            B64.decode(compact)
                .map_err(|error| HandlerError::InvalidBody {
                    message: format!("body is not valid base64: {error}"),
                })
        }
        Some(_) => Err(HandlerError::InvalidBody {
            message: "body must be a base64 string".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::{BTreeMap, HashMap};
    use std::sync::Mutex;

    use super::*;
    use crate::error::StoreError;

    struct RecordingStore {
        writes: Mutex<HashMap<(String, String), Vec<u8>>>,
    }

    impl RecordingStore {
        fn new() -> Self {
            Self {
                writes: Mutex::new(HashMap::new()),
            }
        }

        fn keys(&self) -> Vec<String> {
            self.writes
                .lock()
                .expect("poisoned mutex")
                .keys()
                .map(|(_, key)| key.clone())
                .collect()
        }

        fn body(&self, bucket: &str, key: &str) -> Option<Vec<u8>> {
            self.writes
                .lock()
                .expect("poisoned mutex")
                .get(&(bucket.to_string(), key.to_string()))
                .cloned()
        }
    }

    impl ObjectStore for RecordingStore {
        fn put_object(&self, bucket: &str, key: &str, body: &[u8]) -> Result<(), StoreError> {
            self.writes
                .lock()
                .expect("poisoned mutex")
                .insert((bucket.to_string(), key.to_string()), body.to_vec());
            Ok(())
        }
    }

    struct RejectingStore;

    impl ObjectStore for RejectingStore {
        fn put_object(&self, bucket: &str, key: &str, _body: &[u8]) -> Result<(), StoreError> {
            Err(StoreError::Write {
                bucket: bucket.to_string(),
                key: key.to_string(),
                message: "AccessDenied".to_string(),
            })
        }
    }

    struct FixedId(&'static str);

    impl ObjectIdGenerator for FixedId {
        fn next_id(&self) -> String {
            self.0.to_string()
        }
    }

    fn sample_config() -> BTreeMap<String, String> {
        BTreeMap::from([("UPLOAD_S3_NAME".to_string(), "resume-uploads".to_string())])
    }

    #[test]
    fn stores_decoded_body_under_generated_key() {
        let store = RecordingStore::new();
        let response = handle_upload_event(
            &json!({"body": B64.encode(b"%PDF-1.7 resume")}),
            &sample_config(),
            &store,
            &FixedId("7f1c2a9e-0000-4000-8000-000000000001"),
        );

        assert_eq!(response.status_code, 200);
        assert_eq!(response.body, "\"File Uploaded\"");
        assert_eq!(
            store.body("resume-uploads", "7f1c2a9e-0000-4000-8000-000000000001"),
            Some(b"%PDF-1.7 resume".to_vec())
        );
    }

    #[test]
    fn applies_configured_key_prefix() {
        let store = RecordingStore::new();
        let mut config = sample_config();
        config.insert("UPLOAD_KEY_PREFIX".to_string(), "incoming/".to_string());

        let receipt = upload_object(
            &json!({"body": B64.encode(b"cv")}),
            &config,
            &store,
            &FixedId("abc"),
        )
        .expect("upload should succeed");

        assert_eq!(receipt.key, "incoming/abc");
        assert_eq!(receipt.size_bytes, 2);
        assert_eq!(store.keys(), vec!["incoming/abc".to_string()]);
    }

    #[test]
    fn random_ids_are_valid_uuids() {
        let id = RandomObjectIds.next_id();
        assert!(Uuid::parse_str(&id).is_ok());
        assert_ne!(id, RandomObjectIds.next_id());
    }

    #[test]
    fn accepts_line_wrapped_base64() {
        let store = RecordingStore::new();
        let encoded = B64.encode(vec![7u8; 120]);
        let wrapped = format!("{}\r\n{}\n", &encoded[..76], &encoded[76..]);

        let response = handle_upload_event(
            &json!({ "body": wrapped }),
            &sample_config(),
            &store,
            &FixedId("wrapped"),
        );

        assert_eq!(response.status_code, 200);
        assert_eq!(store.body("resume-uploads", "wrapped"), Some(vec![7u8; 120]));
    }

    #[test]
    fn empty_body_uploads_empty_object() {
        let store = RecordingStore::new();
        let response = handle_upload_event(
            &json!({"body": ""}),
            &sample_config(),
            &store,
            &FixedId("empty"),
        );

        assert_eq!(response.status_code, 200);
        assert_eq!(store.body("resume-uploads", "empty"), Some(Vec::new()));
    }

    #[test]
    fn rejects_missing_or_malformed_body_without_writing() {
        let cases = [
            json!({}),
            json!({"body": null}),
            json!({"body": 42}),
            json!({"body": "not*base64"}),
        ];

        for event in cases {
            let store = RecordingStore::new();
            let response = handle_upload_event(&event, &sample_config(), &store, &FixedId("x"));
            assert_eq!(response.status_code, 500, "event {event} should fail");
            assert_eq!(response.body, "Something Went Wrong");
            assert!(store.keys().is_empty());
        }
    }

    #[test]
    fn missing_bucket_returns_generic_error() {
        let store = RecordingStore::new();
        let response = handle_upload_event(
            &json!({"body": B64.encode(b"cv")}),
            &BTreeMap::<String, String>::new(),
            &store,
            &FixedId("x"),
        );

        assert_eq!(response.status_code, 500);
        assert_eq!(response.body, "Something Went Wrong");
        assert!(store.keys().is_empty());
    }

    #[test]
    fn store_rejection_returns_generic_error() {
        let response = handle_upload_event(
            &json!({"body": B64.encode(b"cv")}),
            &sample_config(),
            &RejectingStore,
            &FixedId("x"),
        );

        assert_eq!(response.status_code, 500);
        assert_eq!(response.body, "Something Went Wrong");
    }
}

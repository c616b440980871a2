//! DynamoDB and S3 implementations of the store traits.
//!
//! The handlers are synchronous; each call bridges into the async SDK on the
//! current multi-threaded runtime.

use std::collections::HashMap;
use std::time::Duration;

use aws_sdk_dynamodb::error::DisplayErrorContext;
use aws_sdk_dynamodb::operation::scan::builders::ScanFluentBuilder;
use aws_sdk_dynamodb::operation::scan::ScanError;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::primitives::ByteStream;

use crate::adapters::attribute_codec::{cursor_to_key, item_to_record, key_to_cursor};
use crate::adapters::document_store::{ResumeTable, ScanPage, ScanRequest};
use crate::adapters::object_store::{LinkSigner, ObjectStore};
use crate::error::StoreError;

#[derive(Debug, Clone)]
pub struct DynamoResumeTable {
    client: aws_sdk_dynamodb::Client,
}

impl DynamoResumeTable {
    pub fn new(client: aws_sdk_dynamodb::Client) -> Self {
        Self { client }
    }

    /// Builds the filtered, limited scan for one page without sending it.
    pub fn scan_request(
        &self,
        request: &ScanRequest<'_>,
    ) -> Result<ScanFluentBuilder, StoreError> {
        let limit = i32::try_from(request.limit).map_err(|_| StoreError::InvalidRequest {
            message: format!("scan limit {} exceeds the supported maximum", request.limit),
        })?;
        let exclusive_start_key = request.exclusive_start_key.map(cursor_to_key).transpose()?;
        let names: HashMap<String, String> = request.filter.attribute_names().into_iter().collect();
        let values: HashMap<String, AttributeValue> = request
            .filter
            .attribute_values()
            .into_iter()
            .map(|(placeholder, skill)| (placeholder, AttributeValue::S(skill)))
            .collect();

        Ok(self
            .client
            .scan()
            .table_name(request.table_name)
            .filter_expression(request.filter.expression())
            .set_expression_attribute_names(Some(names))
            .set_expression_attribute_values(Some(values))
            .limit(limit)
            .set_exclusive_start_key(exclusive_start_key))
    }
}

/// Capacity and request-rate rejections, as opposed to hard failures.
pub fn is_throttling(error: &ScanError) -> bool {
    error.is_provisioned_throughput_exceeded_exception() || error.is_request_limit_exceeded()
}

impl ResumeTable for DynamoResumeTable {
    fn scan_page(&self, request: &ScanRequest<'_>) -> Result<ScanPage, StoreError> {
        let table = request.table_name.to_string();
        let scan = self.scan_request(request)?;

        let output = tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async move {
                scan.send().await.map_err(|error| {
                    let throttled = error.as_service_error().is_some_and(is_throttling);
                    let message = DisplayErrorContext(&error).to_string();
                    if throttled {
                        StoreError::Throttled { table, message }
                    } else {
                        StoreError::Scan { table, message }
                    }
                })
            })
        })?;

        let items = output
            .items()
            .iter()
            .map(item_to_record)
            .collect::<Result<Vec<_>, _>>()?;
        let last_evaluated_key = output
            .last_evaluated_key()
            .filter(|key| !key.is_empty())
            .map(key_to_cursor)
            .transpose()?;

        Ok(ScanPage {
            items,
            last_evaluated_key,
            scanned_count: usize::try_from(output.scanned_count()).unwrap_or_default(),
        })
    }
}

#[derive(Debug, Clone)]
pub struct S3ObjectStore {
    client: aws_sdk_s3::Client,
}

impl S3ObjectStore {
    pub fn new(client: aws_sdk_s3::Client) -> Self {
        Self { client }
    }
}

impl ObjectStore for S3ObjectStore {
    fn put_object(&self, bucket: &str, key: &str, body: &[u8]) -> Result<(), StoreError> {
        let bucket = bucket.to_string();
        let object_key = key.to_string();
        let body_bytes = body.to_vec();
        let client = self.client.clone();

        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async move {
                client
                    .put_object()
                    .bucket(bucket.clone())
                    .key(object_key.clone())
                    .body(ByteStream::from(body_bytes))
                    .send()
                    .await
                    .map(|_| ())
                    .map_err(|error| StoreError::Write {
                        bucket,
                        key: object_key,
                        message: aws_sdk_s3::error::DisplayErrorContext(&error).to_string(),
                    })
            })
        })
    }
}

impl LinkSigner for S3ObjectStore {
    fn presign_get(
        &self,
        bucket: &str,
        key: &str,
        expires_in: Duration,
    ) -> Result<String, StoreError> {
        let presign_error = |message: String| StoreError::Presign {
            bucket: bucket.to_string(),
            key: key.to_string(),
            message,
        };
        let presigning = PresigningConfig::expires_in(expires_in)
            .map_err(|error| presign_error(error.to_string()))?;
        let bucket_name = bucket.to_string();
        let object_key = key.to_string();
        let client = self.client.clone();

        let request = tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async move {
                client
                    .get_object()
                    .bucket(bucket_name)
                    .key(object_key)
                    .presigned(presigning)
                    .await
            })
        })
        .map_err(|error| {
            presign_error(aws_sdk_s3::error::DisplayErrorContext(&error).to_string())
        })?;

        Ok(request.uri().to_string())
    }
}

use std::time::Duration;

use chrono::Utc;
use resume_search_core::contract::{
    parse_search_params, QueryParams, ResumeRecord, SearchResponse, ValidationError,
};
use resume_search_core::filter::SkillFilter;
use resume_search_core::storage_keys::{resume_object_key, RESUME_KEY_ATTRIBUTE};
use serde_json::{json, Value};

use crate::adapters::document_store::{ResumeTable, ScanRequest};
use crate::adapters::object_store::LinkSigner;
use crate::config::{ConfigSource, FinderConfig};
use crate::error::HandlerError;
use crate::handlers::response::{json_response, ApiGatewayResponse};
use crate::telemetry::FINDER_COMPONENT;

pub const FINDER_FAILURE_MESSAGE: &str = "Something went wrong";

/// Response boundary for the resume search endpoint: any failure collapses
/// into the generic 500 body.
pub fn handle_finder_event(
    event: &Value,
    config: &dyn ConfigSource,
    table: &dyn ResumeTable,
    signer: &dyn LinkSigner,
) -> ApiGatewayResponse {
    let outcome = find_resumes(event, config, table, signer)
        .and_then(|response| serde_json::to_string(&response).map_err(HandlerError::from));

    match outcome {
        Ok(body) => json_response(200, body),
        Err(error) => {
            tracing::error!(
                component = FINDER_COMPONENT,
                event = "request_failed",
                error = %error,
                "resume search failed"
            );
            failure_response()
        }
    }
}

/// Runs one scan page and swaps every `resume_key` for a download link.
///
/// The page holds the matches among at most `scan_limit` scanned items, so
/// it can be shorter than the limit (or empty) while `last_key` is still
/// present. Callers follow `last_key` to continue.
pub fn find_resumes(
    event: &Value,
    config: &dyn ConfigSource,
    table: &dyn ResumeTable,
    signer: &dyn LinkSigner,
) -> Result<SearchResponse, HandlerError> {
    let config = FinderConfig::from_source(config)?;
    let params = query_params_from_event(event)?;
    let request = parse_search_params(&params, config.default_scan_limit)?;

    tracing::info!(
        component = FINDER_COMPONENT,
        event = "search_started",
        skills = ?request.skills,
        scan_limit = request.scan_limit,
        has_cursor = request.cursor.is_some(),
        "searching resumes"
    );

    let filter = SkillFilter::any_of(&request.skills)?;
    let page = table.scan_page(&ScanRequest {
        table_name: &config.table_name,
        filter: &filter,
        limit: request.scan_limit,
        exclusive_start_key: request.cursor.as_ref(),
    })?;

    let mut items = page.items;
    let mut failed_links = 0usize;
    for record in &mut items {
        if !attach_download_link(record, &config.bucket, config.link_expiry, signer) {
            failed_links += 1;
        }
    }

    let link_expires_at =
        Utc::now() + chrono::Duration::seconds(config.link_expiry.as_secs() as i64);
    tracing::info!(
        component = FINDER_COMPONENT,
        event = "search_completed",
        scanned_count = page.scanned_count,
        returned = items.len(),
        failed_links,
        has_next_page = page.last_evaluated_key.is_some(),
        link_expires_at = %link_expires_at.to_rfc3339(),
        "resume search completed"
    );

    Ok(SearchResponse {
        items,
        last_key: page.last_evaluated_key,
    })
}

/// Replaces the record's `resume_key` with a presigned link, or with null
/// when no link can be produced. Returns whether a link was attached.
fn attach_download_link(
    record: &mut ResumeRecord,
    bucket: &str,
    expires_in: Duration,
    signer: &dyn LinkSigner,
) -> bool {
    let link = match resume_object_key(record) {
        Some(key) => match signer.presign_get(bucket, key, expires_in) {
            Ok(url) => Some(url),
            Err(error) => {
                tracing::warn!(
                    component = FINDER_COMPONENT,
                    event = "link_failed",
                    record_id = ?record.get("id"),
                    error = %error,
                    "could not sign resume link"
                );
                None
            }
        },
        None => {
            tracing::warn!(
                component = FINDER_COMPONENT,
                event = "link_failed",
                record_id = ?record.get("id"),
                "resume record has no usable resume_key"
            );
            None
        }
    };

    let attached = link.is_some();
    record.insert(
        RESUME_KEY_ATTRIBUTE.to_string(),
        link.map(Value::String).unwrap_or(Value::Null),
    );
    attached
}

/// Reads API Gateway query parameters, preferring the multi-valued form.
fn query_params_from_event(event: &Value) -> Result<QueryParams, ValidationError> {
    let Some(object) = event.as_object() else {
        return Err(ValidationError::new("Request payload must be a JSON object"));
    };

    match object.get("multiValueQueryStringParameters") {
        Some(Value::Object(params)) => params
            .iter()
            .map(|(name, values)| {
                Ok::<_, ValidationError>((name.clone(), string_values(name, values)?))
            })
            .collect(),
        Some(Value::Null) | None => match object.get("queryStringParameters") {
            Some(Value::Object(params)) => params
                .iter()
                .map(|(name, value)| {
                    Ok::<_, ValidationError>((name.clone(), string_values(name, value)?))
                })
                .collect(),
            Some(Value::Null) | None => Ok(QueryParams::new()),
            Some(_) => Err(ValidationError::new(
                "queryStringParameters must be an object",
            )),
        },
        Some(_) => Err(ValidationError::new(
            "multiValueQueryStringParameters must be an object",
        )),
    }
}

fn string_values(name: &str, value: &Value) -> Result<Vec<String>, ValidationError> {
    let invalid = || ValidationError::new(format!("Query parameter '{name}' must be text"));
    match value {
        Value::String(text) => Ok(vec![text.clone()]),
        Value::Array(values) => values
            .iter()
            .map(|value| value.as_str().map(str::to_string).ok_or_else(invalid))
            .collect(),
        _ => Err(invalid()),
    }
}

fn failure_response() -> ApiGatewayResponse {
    json_response(500, json!({ "message": FINDER_FAILURE_MESSAGE }).to_string())
}

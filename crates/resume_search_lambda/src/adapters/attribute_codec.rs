//! Conversions between DynamoDB attribute values and JSON.
//!
//! Items are decoded into plain JSON for the response body. Scan keys are
//! encoded in the typed DynamoDB JSON form (`{"id": {"S": "r-1"}}`) so the
//! cursor converts back into the exact `ExclusiveStartKey` it came from.

use std::collections::HashMap;

use aws_sdk_dynamodb::primitives::Blob;
use aws_sdk_dynamodb::types::AttributeValue;
use base64::engine::general_purpose::STANDARD as B64;
use base64::Engine as _;
use resume_search_core::contract::ResumeRecord;
use resume_search_core::cursor::PageCursor;
use serde_json::{Map, Number, Value};

use crate::error::StoreError;

pub type Item = HashMap<String, AttributeValue>;

pub fn item_to_record(item: &Item) -> Result<ResumeRecord, StoreError> {
    item.iter()
        .map(|(name, value)| Ok::<_, StoreError>((name.clone(), attribute_to_json(value)?)))
        .collect()
}

pub fn attribute_to_json(value: &AttributeValue) -> Result<Value, StoreError> {
    let json = match value {
        AttributeValue::S(text) => Value::String(text.clone()),
        AttributeValue::N(number) => number_to_json(number)?,
        AttributeValue::Bool(flag) => Value::Bool(*flag),
        AttributeValue::Null(_) => Value::Null,
        AttributeValue::B(blob) => Value::String(B64.encode(blob.as_ref())),
        AttributeValue::L(values) => Value::Array(
            values
                .iter()
                .map(attribute_to_json)
                .collect::<Result<Vec<_>, StoreError>>()?,
        ),
        AttributeValue::M(map) => Value::Object(item_to_record(map)?),
        AttributeValue::Ss(values) => {
            Value::Array(values.iter().cloned().map(Value::String).collect())
        }
        AttributeValue::Ns(values) => Value::Array(
            values
                .iter()
                .map(|number| number_to_json(number))
                .collect::<Result<Vec<_>, StoreError>>()?,
        ),
        AttributeValue::Bs(values) => Value::Array(
            values
                .iter()
                .map(|blob| Value::String(B64.encode(blob.as_ref())))
                .collect(),
        ),
        other => {
            return Err(StoreError::Decode {
                message: format!("unsupported attribute value: {other:?}"),
            })
        }
    };
    Ok(json)
}

/// Keeps the number text exactly as stored; `N` values carry up to 38
/// significant digits, beyond what `f64` holds.
fn number_to_json(number: &str) -> Result<Value, StoreError> {
    number
        .parse::<Number>()
        .map(Value::Number)
        .map_err(|_| StoreError::Decode {
            message: format!("number attribute '{number}' is not a valid number"),
        })
}

pub fn key_to_cursor(key: &Item) -> Result<PageCursor, StoreError> {
    let mut map = Map::new();
    for (name, value) in key {
        let (tag, payload) = match value {
            AttributeValue::S(text) => ("S", text.clone()),
            AttributeValue::N(number) => ("N", number.clone()),
            AttributeValue::B(blob) => ("B", B64.encode(blob.as_ref())),
            other => {
                return Err(StoreError::Decode {
                    message: format!("unsupported key attribute '{name}': {other:?}"),
                })
            }
        };
        let mut typed = Map::new();
        typed.insert(tag.to_string(), Value::String(payload));
        map.insert(name.clone(), Value::Object(typed));
    }
    Ok(PageCursor::from_map(map))
}

pub fn cursor_to_key(cursor: &PageCursor) -> Result<Item, StoreError> {
    let mut key = HashMap::with_capacity(cursor.as_map().len());
    for (name, typed) in cursor.as_map() {
        let entry = typed
            .as_object()
            .filter(|entry| entry.len() == 1)
            .and_then(|entry| entry.iter().next())
            .ok_or_else(|| cursor_error(name))?;
        let value = match entry {
            (tag, Value::String(payload)) if tag == "S" => AttributeValue::S(payload.clone()),
            (tag, Value::String(payload)) if tag == "N" => AttributeValue::N(payload.clone()),
            (tag, Value::String(payload)) if tag == "B" => {
                let bytes = B64.decode(payload).map_err(|_| cursor_error(name))?;
                AttributeValue::B(Blob::new(bytes))
            }
            _ => return Err(cursor_error(name)),
        };
        key.insert(name.clone(), value);
    }
    Ok(key)
}

fn cursor_error(name: &str) -> StoreError {
    StoreError::Decode {
        message: format!("last_key attribute '{name}' is not a typed S, N or B value"),
    }
}

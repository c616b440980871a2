use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::contract::ValidationError;

/// Opaque pagination token handed out by the store after a page boundary.
///
/// The contents are never interpreted here; callers echo the token back
/// verbatim as the `last_key` query parameter to resume the scan.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct PageCursor(Map<String, Value>);

impl PageCursor {
    pub fn from_map(map: Map<String, Value>) -> Self {
        Self(map)
    }

    /// Parses the JSON text a caller sends back as `last_key`.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        match serde_json::from_str::<Value>(raw) {
            Ok(Value::Object(map)) if !map.is_empty() => Ok(Self(map)),
            Ok(Value::Object(_)) => Err(ValidationError::new("last_key cannot be an empty object")),
            Ok(_) => Err(ValidationError::new("last_key must be a JSON object")),
            Err(error) => Err(ValidationError::new(format!(
                "last_key is not valid JSON: {error}"
            ))),
        }
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }
}

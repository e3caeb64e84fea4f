use std::collections::HashMap;

use serde_json::{Map, Value};

use crate::error::VaultError;
use crate::options::KvVersion;

/// Flat key/value content of a secret.
pub type SecretData = HashMap<String, Value>;

/// Terminal state of a lookup that did not fail.
#[derive(Debug, Clone, PartialEq)]
pub enum LookupOutcome {
    Found(SecretData),
    /// The path holds no secret. Not an error.
    NotFound,
}

impl LookupOutcome {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }

    pub fn into_data(self) -> Option<SecretData> {
        match self {
            Self::Found(data) => Some(data),
            Self::NotFound => None,
        }
    }
}

/// Extracts the secret mapping from a KV response envelope.
///
/// A `null` payload (as KV v2 returns for deleted versions) parses to an
/// empty mapping.
pub fn parse(envelope: &Value, version: KvVersion) -> Result<SecretData, VaultError> {
    let payload = match version {
        KvVersion::V1 => parse_v1(envelope)?,
        KvVersion::V2 => parse_v2(envelope)?,
    };

    Ok(payload
        .map(|map| {
            map.iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect::<SecretData>()
        })
        .unwrap_or_default())
}

/// `{"data": {...}}`
fn parse_v1(envelope: &Value) -> Result<Option<&Map<String, Value>>, VaultError> {
    mapping_field(envelope, "data", "data")
}

/// `{"data": {"data": {...}, "metadata": {...}}}`
fn parse_v2(envelope: &Value) -> Result<Option<&Map<String, Value>>, VaultError> {
    let outer = mapping_field(envelope, "data", "data")?
        .ok_or_else(|| VaultError::Protocol("KV v2 response has a null 'data' field".to_string()))?;

    match outer.get("data") {
        None => Err(VaultError::Protocol(
            "KV v2 response is missing 'data.data'".to_string(),
        )),
        Some(Value::Null) => Ok(None),
        Some(Value::Object(map)) => Ok(Some(map)),
        Some(other) => Err(not_a_mapping("data.data", other)),
    }
}

fn mapping_field<'a>(
    value: &'a Value,
    field: &str,
    location: &str,
) -> Result<Option<&'a Map<String, Value>>, VaultError> {
    let object = value
        .as_object()
        .ok_or_else(|| not_a_mapping("response body", value))?;

    match object.get(field) {
        None => Err(VaultError::Protocol(format!(
            "response is missing the '{}' field",
            location
        ))),
        Some(Value::Null) => Ok(None),
        Some(Value::Object(map)) => Ok(Some(map)),
        Some(other) => Err(not_a_mapping(location, other)),
    }
}

fn not_a_mapping(location: &str, value: &Value) -> VaultError {
    let kind = match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    };
    VaultError::Protocol(format!("'{}' is {}, expected a mapping", location, kind))
}

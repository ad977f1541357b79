use crate::{
    error::BoxError,
    payload::{RawMapping, RawPayload},
};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Deserialize a [`RawMapping`] as the desired type.
///
/// Satisfies the mapper signature of every [`ParsePipeline`](crate::pipeline::ParsePipeline)
/// operation, eg/ `pipeline.parse_single(request, deserialize_mapping::<Order>)`.
pub fn deserialize_mapping<T>(mapping: RawMapping) -> Result<T, serde_json::Error>
where
    T: DeserializeOwned,
{
    serde_json::from_value(Value::Object(mapping))
}

/// Extract the named `field` from a JSON response envelope and shape-check it as a
/// [`RawPayload`].
///
/// Example envelope: `{"data": [{"id": 1}, {"id": 2}]}`
pub fn extract_field(response: &Value, field: &str) -> Result<RawPayload, BoxError> {
    let value = response
        .get(field)
        .ok_or_else(|| format!("response missing field: {field}"))?;

    RawPayload::try_from(value.clone()).map_err(BoxError::from)
}

/// Return the named `field` of a JSON response envelope if it is present and not `null`.
///
/// Example envelope: `{"error": "Test error"}`
pub fn detect_field<'a>(response: &'a Value, field: &str) -> Option<&'a Value> {
    response.get(field).filter(|value| !value.is_null())
}

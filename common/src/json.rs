use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;

use crate::normalize_string::NormalizeString;

#[derive(Debug, thiserror::Error)]
pub enum JsonError {
    #[error("JSON serialization failed")]
    Serialize(#[source] serde_json::Error),
    #[error("JSON deserialization failed")]
    Deserialize(#[source] serde_json::Error),
    #[error("Invalid UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),
}

pub type JsonResult<T> = Result<T, JsonError>;

/// Pretty JSON with object keys sorted and four-space indentation.
///
/// The value is routed through `serde_json::Value`, whose object map keeps keys
/// ordered, so field declaration order never leaks into the output.
pub fn to_json_pretty<T: Serialize>(value: &T) -> JsonResult<String> {
    let value = serde_json::to_value(value).map_err(JsonError::Serialize)?;

    let mut buffer = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    value
        .serialize(&mut serializer)
        .map_err(JsonError::Serialize)?;

    Ok(String::from_utf8(buffer)?.normalize())
}

pub fn from_json<T: DeserializeOwned>(serialized: &str) -> JsonResult<T> {
    serde_json::from_str(serialized).map_err(JsonError::Deserialize)
}

/// Overlays the keys of `patch` onto `base`. Keys absent from `patch` keep
/// their value in `base`; non-object values replace `base` wholesale.
pub fn merge_objects(base: &mut serde_json::Value, patch: serde_json::Value) {
    match (base, patch) {
        (serde_json::Value::Object(base), serde_json::Value::Object(patch)) => {
            for (key, value) in patch {
                base.insert(key, value);
            }
        }
        (base, patch) => *base = patch,
    }
}

//! Small accessors over `serde_json` objects.
//!
//! Serialized projects are read leniently: a key with the wrong JSON type is
//! treated as absent.

use serde_json::{Map, Value};

pub type JsonObject = Map<String, Value>;

/// Value written to `schemaVersion` on serialized projects.
pub const SCHEMA_VERSION: &str = "2.0";

pub(crate) fn str_field<'a>(obj: &'a JsonObject, key: &str) -> Option<&'a str> {
    obj.get(key).and_then(Value::as_str)
}

pub(crate) fn string_field(obj: &JsonObject, key: &str) -> Option<String> {
    str_field(obj, key).map(str::to_string)
}

pub(crate) fn u32_field(obj: &JsonObject, key: &str) -> Option<u32> {
    obj.get(key)
        .and_then(Value::as_u64)
        .and_then(|n| u32::try_from(n).ok())
}

pub(crate) fn bool_field(obj: &JsonObject, key: &str) -> bool {
    obj.get(key).and_then(Value::as_bool).unwrap_or(false)
}

pub(crate) fn object_field<'a>(obj: &'a JsonObject, key: &str) -> Option<&'a JsonObject> {
    obj.get(key).and_then(Value::as_object)
}

/// Object elements of the array at `key`; non-object elements are skipped.
pub(crate) fn objects<'a>(obj: &'a JsonObject, key: &str) -> impl Iterator<Item = &'a JsonObject> {
    obj.get(key)
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(Value::as_object)
}

/// Unsigned integer elements of the array at `key`.
pub(crate) fn ids<'a>(obj: &'a JsonObject, key: &str) -> impl Iterator<Item = u32> + 'a {
    obj.get(key)
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(Value::as_u64)
        .filter_map(|n| u32::try_from(n).ok())
}

/// JSON type name used in diagnostics.
pub(crate) fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

pub(crate) fn insert_str(obj: &mut JsonObject, key: &str, value: Option<&str>) {
    if let Some(value) = value {
        obj.insert(key.to_string(), Value::from(value));
    }
}

/// Insert `values` as an array unless it is empty.
pub(crate) fn insert_array(obj: &mut JsonObject, key: &str, values: Vec<Value>) {
    if !values.is_empty() {
        obj.insert(key.to_string(), Value::Array(values));
    }
}

pub(crate) fn insert_true(obj: &mut JsonObject, key: &str, value: bool) {
    if value {
        obj.insert(key.to_string(), Value::Bool(true));
    }
}

//! Lenient payload extraction.
//!
//! Producers send collections either as an object keyed by id or as an array
//! of records carrying their own id. Every entry is parsed on its own: a bad
//! entry is reported and skipped, the rest of the collection still lands.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use smart_utilities_types::{FieldAliases, SelectOption};

use crate::errors::DashboardError;

/// Parse a single record.
///
/// Object fields are collapsed onto their canonical spellings first, so a
/// producer sending both `propertyId` and `property_id` still parses.
pub(crate) fn record<T: DeserializeOwned + FieldAliases>(
    data_type: &str,
    value: &Value,
) -> Result<T, DashboardError> {
    let parsed = match value {
        Value::Object(fields) => {
            let mut fields = fields.clone();
            T::canonicalize(&mut fields);
            T::deserialize(Value::Object(fields))
        }
        other => T::deserialize(other),
    };
    parsed.map_err(|e| DashboardError::malformed(data_type, e.to_string()))
}

/// String value of the first present field among `fields`.
///
/// Numeric ids are accepted and stringified.
pub(crate) fn id_field(value: &Value, fields: &[&str]) -> Option<String> {
    fields.iter().find_map(|field| match value.get(*field)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

/// Raw `(id, value)` pairs of a keyed collection.
///
/// Objects yield their keys. Arrays yield the first of `id_fields` found on
/// each element; elements without one are reported and skipped.
pub(crate) fn entries(
    data_type: &str,
    value: &Value,
    id_fields: &[&str],
    errors: &mut Vec<DashboardError>,
) -> Vec<(String, Value)> {
    match value {
        Value::Object(map) => map.iter().map(|(k, v)| (k.clone(), v.clone())).collect(),
        Value::Array(items) => items
            .iter()
            .filter_map(|item| match id_field(item, id_fields) {
                Some(id) => Some((id, item.clone())),
                None => {
                    errors.push(DashboardError::malformed(
                        data_type,
                        format!(
                            "collection entry without `{}`",
                            id_fields.first().unwrap_or(&"id")
                        ),
                    ));
                    None
                }
            })
            .collect(),
        Value::Null => Vec::new(),
        other => {
            errors.push(DashboardError::malformed(
                data_type,
                format!("expected object or array, got {}", kind_of(other)),
            ));
            Vec::new()
        }
    }
}

/// Parse a keyed collection into records.
///
/// When `id_fields` is non-empty and an object entry carries none of them,
/// the key is written into the first one before parsing, so records that
/// carry their own id always agree with the key they are stored under.
pub(crate) fn keyed<T: DeserializeOwned + FieldAliases>(
    data_type: &str,
    value: &Value,
    id_fields: &[&str],
    errors: &mut Vec<DashboardError>,
) -> Vec<(String, T)> {
    entries(data_type, value, id_fields, errors)
        .into_iter()
        .filter_map(|(id, mut raw)| {
            if let (Some(first), Value::Object(fields)) = (id_fields.first(), &mut raw) {
                for field in id_fields {
                    fields.remove(*field);
                }
                fields.insert((*first).to_string(), Value::String(id.clone()));
            }
            match record::<T>(data_type, &raw) {
                Ok(parsed) => Some((id, parsed)),
                Err(err) => {
                    errors.push(err);
                    None
                }
            }
        })
        .collect()
}

/// Admin select options from `[{id, label|name}]` or `{key: {label}}`.
pub(crate) fn select_options(value: &Value) -> Vec<SelectOption> {
    match value {
        Value::Array(items) => items
            .iter()
            .filter_map(|item| {
                let id = id_field(item, &["id"])?;
                let label = label_of(item).unwrap_or_else(|| id.clone());
                Some(SelectOption::new(id, label))
            })
            .collect(),
        Value::Object(map) => map
            .iter()
            .map(|(key, item)| {
                let label = label_of(item).unwrap_or_else(|| key.clone());
                SelectOption::new(key.clone(), label)
            })
            .collect(),
        _ => Vec::new(),
    }
}

fn label_of(item: &Value) -> Option<String> {
    ["label", "name"]
        .iter()
        .find_map(|field| item.get(*field)?.as_str().map(str::to_string))
}

/// Nested lookup, e.g. `path(payload, &["config", "Power", "Zones"])`.
pub(crate) fn path<'a>(value: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().try_fold(value, |current, key| current.get(*key))
}

/// Empty object for payload-less updates.
pub(crate) fn empty() -> Value {
    Value::Object(Map::new())
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

//! Result hydration: raw response graphs back into typed data-mode shapes.

use std::sync::Arc;

use serde_json::Map;
use serde_json::Value;

use crate::error::QueryError;
use crate::schema::Schema;
use crate::shape::Shape;

/// Hydrate a decoded `data` payload.
///
/// Each root key names a registered type; its value is either one record or a
/// list of records, and every hydrated record mirrors exactly the subset of the
/// schema present in the raw response.
pub(crate) fn hydrate(
    schema: &Arc<Schema>,
    data: &Map<String, Value>,
) -> Result<Vec<Shape>, QueryError> {
    let mut shapes = Vec::new();
    for (type_name, value) in data {
        if !schema.is_model_type(type_name) {
            return Err(QueryError::Hydration(format!(
                "root key '{type_name}' does not name a registered type"
            )));
        }
        shapes.extend(hydrate_value(schema, type_name, value)?);
    }
    tracing::trace!(records = shapes.len(), "hydrated response");
    Ok(shapes)
}

/// Hydrate one raw value into zero or more records of `type_name`.
///
/// A JSON array is a list of records; an object whose keys are the contiguous
/// integer sequence from 0 is also a list (some backends encode lists that way);
/// any other object is a single record; null is an absent value.
fn hydrate_value(
    schema: &Arc<Schema>,
    type_name: &str,
    value: &Value,
) -> Result<Vec<Shape>, QueryError> {
    match value {
        Value::Array(items) => items
            .iter()
            .map(|item| hydrate_record(schema, type_name, item))
            .collect(),
        Value::Object(map) if is_indexed(map) => map
            .values()
            .map(|item| hydrate_record(schema, type_name, item))
            .collect(),
        Value::Object(_) => Ok(vec![hydrate_record(schema, type_name, value)?]),
        Value::Null => Ok(Vec::new()),
        other => Err(QueryError::Hydration(format!(
            "expected an object or list for type '{type_name}', got {other}"
        ))),
    }
}

fn hydrate_record(
    schema: &Arc<Schema>,
    type_name: &str,
    value: &Value,
) -> Result<Shape, QueryError> {
    let record = value.as_object().ok_or_else(|| {
        QueryError::Hydration(format!(
            "expected a record for type '{type_name}', got {value}"
        ))
    })?;
    let type_def = schema
        .type_def(type_name)
        .ok_or_else(|| QueryError::UnknownType(type_name.to_string()))?;

    let mut shape = Shape::for_data(schema.clone(), type_name)?;
    for (key, raw) in record {
        let field = type_def.field(key).ok_or_else(|| {
            QueryError::Hydration(format!(
                "response key '{key}' is not declared on type '{type_name}'"
            ))
        })?;
        if schema.is_model_type(&field.field_type) {
            shape.insert_models(key, hydrate_value(schema, &field.field_type, raw)?);
        } else {
            // Scalars are assigned verbatim, nulls and scalar arrays included.
            shape.insert_scalar(key, raw.clone());
        }
    }
    Ok(shape)
}

/// True iff the object's keys are "0", "1", ... with no gaps. An empty object
/// is an empty list, not a record.
fn is_indexed(map: &Map<String, Value>) -> bool {
    map.keys()
        .enumerate()
        .all(|(i, key)| key.as_str() == i.to_string())
}

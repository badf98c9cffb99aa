//! A JSON encoding of [`GraphValue`] that survives a round trip. Plain JSON loses the
//! distinction between strings, enums, dates, uuids and bytes; the tagged form wraps those
//! kinds in `{ "graph__type": ..., "graph__value": ... }` objects.

use crate::{decode_bytes, encode_bytes, parse_datetime, stringify_datetime, ConversionFailure, GraphValue};
use bigdecimal::{BigDecimal, FromPrimitive};
use serde::Serialize;
use std::str::FromStr;

const TYPE_KEY: &str = "graph__type";
const VALUE_KEY: &str = "graph__value";

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct TaggedGraphValue<'a>(pub &'a GraphValue);

impl Serialize for TaggedGraphValue<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self.0 {
            GraphValue::Float(decimal) => {
                serializer.collect_map([(TYPE_KEY, "decimal"), (VALUE_KEY, decimal.to_string().as_str())])
            }
            GraphValue::Enum(e) => serializer.collect_map([(TYPE_KEY, "enum"), (VALUE_KEY, e.as_str())]),
            GraphValue::DateTime(dt) => {
                serializer.collect_map([(TYPE_KEY, "datetime"), (VALUE_KEY, stringify_datetime(dt).as_str())])
            }
            GraphValue::Uuid(uuid) => serializer.collect_map([(TYPE_KEY, "uuid"), (VALUE_KEY, uuid.to_string().as_str())]),
            GraphValue::Bytes(bytes) => serializer.collect_map([(TYPE_KEY, "bytes"), (VALUE_KEY, encode_bytes(bytes).as_str())]),
            GraphValue::List(items) => serializer.collect_seq(items.iter().map(TaggedGraphValue)),
            GraphValue::Object(items) => serializer.collect_map(items.iter().map(|(k, v)| (k, TaggedGraphValue(v)))),
            other => other.serialize(serializer),
        }
    }
}

impl<'a> From<&'a GraphValue> for TaggedGraphValue<'a> {
    fn from(value: &'a GraphValue) -> Self {
        TaggedGraphValue(value)
    }
}

/// Reverses the encoding produced by [`TaggedGraphValue`].
pub fn from_tagged(value: serde_json::Value) -> Result<GraphValue, ConversionFailure> {
    match value {
        serde_json::Value::Null => Ok(GraphValue::Null),
        serde_json::Value::Bool(b) => Ok(GraphValue::Boolean(b)),
        serde_json::Value::String(s) => Ok(GraphValue::String(s)),
        serde_json::Value::Number(num) => match num.as_i64() {
            Some(i) => Ok(GraphValue::Int(i)),
            None => num
                .as_f64()
                .and_then(BigDecimal::from_f64)
                .map(GraphValue::Float)
                .ok_or_else(|| ConversionFailure::new("tagged number", "GraphValue")),
        },
        serde_json::Value::Array(items) => items
            .into_iter()
            .map(from_tagged)
            .collect::<Result<Vec<_>, _>>()
            .map(GraphValue::List),
        serde_json::Value::Object(obj) => {
            if let Some(tag) = obj.get(TYPE_KEY).and_then(|t| t.as_str()) {
                let inner = obj.get(VALUE_KEY).and_then(|v| v.as_str()).unwrap_or_default();

                return match tag {
                    "decimal" => BigDecimal::from_str(inner)
                        .map(GraphValue::Float)
                        .map_err(|_| ConversionFailure::new("tagged decimal", "GraphValue::Float")),
                    "enum" => Ok(GraphValue::Enum(inner.to_owned())),
                    "datetime" => parse_datetime(inner)
                        .map(GraphValue::DateTime)
                        .map_err(|_| ConversionFailure::new("tagged datetime", "GraphValue::DateTime")),
                    "uuid" => uuid::Uuid::parse_str(inner)
                        .map(GraphValue::Uuid)
                        .map_err(|_| ConversionFailure::new("tagged uuid", "GraphValue::Uuid")),
                    "bytes" => decode_bytes(inner).map(GraphValue::Bytes),
                    other => Err(ConversionFailure::new(format!("tagged `{other}`"), "GraphValue")),
                };
            }

            obj.into_iter()
                .map(|(k, v)| from_tagged(v).map(|v| (k, v)))
                .collect::<Result<Vec<_>, _>>()
                .map(GraphValue::Object)
        }
    }
}

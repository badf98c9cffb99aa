mod error;
mod tagged;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use bigdecimal::{BigDecimal, FromPrimitive, ToPrimitive};
use chrono::prelude::*;
use serde::{ser::Serializer, Serialize};
use std::{convert::TryFrom, fmt};
use uuid::Uuid;

pub use error::ConversionFailure;
pub use tagged::{from_tagged, TaggedGraphValue};

pub type GraphValueResult<T> = std::result::Result<T, ConversionFailure>;
pub type GraphListValue = Vec<GraphValue>;

/// A value flowing through the resolver: argument values, column values of fetched rows
/// and the components of a cursor all use this type.
///
/// Values of the same kind are totally ordered and hashable, which the planner relies on
/// for grouping children by join key and for re-sorting merged result lists.
#[derive(Debug, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub enum GraphValue {
    Null,
    Boolean(bool),
    Int(i64),
    Float(BigDecimal),
    String(String),
    Enum(String),
    DateTime(DateTime<FixedOffset>),
    Uuid(Uuid),
    Bytes(Vec<u8>),
    List(GraphListValue),

    /// A collections of key-value pairs constituting an object.
    Object(Vec<(String, GraphValue)>),
}

/// Stringify a date to the following format
/// 1999-05-01T00:00:00.000Z
pub fn stringify_datetime(datetime: &DateTime<FixedOffset>) -> String {
    datetime.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parses an RFC 3339 and ISO 8601 date and time string such as 1996-12-19T16:39:57-08:00,
/// then returns a new DateTime with a parsed FixedOffset.
pub fn parse_datetime(datetime: &str) -> chrono::ParseResult<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(datetime)
}

pub fn encode_bytes(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

pub fn decode_bytes(s: &str) -> GraphValueResult<Vec<u8>> {
    STANDARD
        .decode(s)
        .map_err(|_| ConversionFailure::new("base64 encoded bytes", "GraphValue::Bytes"))
}

impl Serialize for GraphValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            GraphValue::Null => serializer.serialize_none(),
            GraphValue::Boolean(b) => serializer.serialize_bool(*b),
            GraphValue::Int(i) => serializer.serialize_i64(*i),
            GraphValue::Float(decimal) => serialize_decimal(decimal, serializer),
            GraphValue::String(s) | GraphValue::Enum(s) => serializer.serialize_str(s),
            GraphValue::DateTime(dt) => serializer.serialize_str(&stringify_datetime(dt)),
            GraphValue::Uuid(uuid) => serializer.serialize_str(&uuid.to_string()),
            GraphValue::Bytes(bytes) => serializer.serialize_str(&encode_bytes(bytes)),
            GraphValue::List(items) => serializer.collect_seq(items),
            GraphValue::Object(pairs) => serializer.collect_map(pairs.iter().map(|(k, v)| (k, v))),
        }
    }
}

fn serialize_decimal<S>(decimal: &BigDecimal, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match decimal.to_f64() {
        Some(float) => serializer.serialize_f64(float),
        None => Err(serde::ser::Error::custom(format!("{decimal} is not representable as f64"))),
    }
}

impl TryFrom<serde_json::Value> for GraphValue {
    type Error = ConversionFailure;

    fn try_from(v: serde_json::Value) -> GraphValueResult<Self> {
        match v {
            serde_json::Value::String(s) => Ok(GraphValue::String(s)),
            serde_json::Value::Array(v) => {
                let vals: GraphValueResult<Vec<GraphValue>> = v.into_iter().map(GraphValue::try_from).collect();
                Ok(GraphValue::List(vals?))
            }
            serde_json::Value::Null => Ok(GraphValue::Null),
            serde_json::Value::Bool(b) => Ok(GraphValue::Boolean(b)),
            serde_json::Value::Number(num) => match num.as_i64() {
                Some(i) => Ok(GraphValue::Int(i)),
                None => num
                    .as_f64()
                    .and_then(BigDecimal::from_f64)
                    .map(|dec| GraphValue::Float(dec.normalized()))
                    .ok_or_else(|| ConversionFailure::new("JSON number", "GraphValue::Float")),
            },
            serde_json::Value::Object(obj) => {
                let pairs = obj
                    .into_iter()
                    .map(|(k, v)| GraphValue::try_from(v).map(|v| (k, v)))
                    .collect::<GraphValueResult<Vec<_>>>()?;

                Ok(GraphValue::Object(pairs))
            }
        }
    }
}

impl GraphValue {
    pub fn is_null(&self) -> bool {
        matches!(self, GraphValue::Null)
    }

    pub fn as_string(&self) -> Option<&str> {
        match self {
            GraphValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_enum_value(&self) -> Option<&str> {
        match self {
            GraphValue::Enum(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            GraphValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_boolean(&self) -> Option<bool> {
        match self {
            GraphValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[GraphValue]> {
        match self {
            GraphValue::List(l) => Some(l),
            _ => None,
        }
    }

    pub fn into_string(self) -> Option<String> {
        match self {
            GraphValue::String(s) => Some(s),
            GraphValue::Enum(ev) => Some(ev),
            _ => None,
        }
    }

    pub fn into_list(self) -> Option<GraphListValue> {
        match self {
            GraphValue::List(l) => Some(l),
            _ => None,
        }
    }

    /// Name of the value kind, used in conversion error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            GraphValue::Null => "Null",
            GraphValue::Boolean(_) => "Boolean",
            GraphValue::Int(_) => "Int",
            GraphValue::Float(_) => "Float",
            GraphValue::String(_) => "String",
            GraphValue::Enum(_) => "Enum",
            GraphValue::DateTime(_) => "DateTime",
            GraphValue::Uuid(_) => "Uuid",
            GraphValue::Bytes(_) => "Bytes",
            GraphValue::List(_) => "List",
            GraphValue::Object(_) => "Object",
        }
    }

    pub fn new_float(float: f64) -> GraphValueResult<GraphValue> {
        GraphValue::try_from(float)
    }

    pub fn new_datetime(datetime: &str) -> GraphValueResult<GraphValue> {
        parse_datetime(datetime)
            .map(GraphValue::DateTime)
            .map_err(|_| ConversionFailure::new("RFC 3339 string", "GraphValue::DateTime"))
    }
}

impl fmt::Display for GraphValue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            GraphValue::String(x) => x.fmt(f),
            GraphValue::Float(x) => x.fmt(f),
            GraphValue::Boolean(x) => x.fmt(f),
            GraphValue::DateTime(x) => stringify_datetime(x).fmt(f),
            GraphValue::Enum(x) => x.fmt(f),
            GraphValue::Int(x) => x.fmt(f),
            GraphValue::Null => "null".fmt(f),
            GraphValue::Uuid(x) => x.fmt(f),
            GraphValue::Bytes(b) => encode_bytes(b).fmt(f),
            GraphValue::List(items) => {
                let joined = items.iter().map(|v| v.to_string()).collect::<Vec<_>>().join(", ");
                write!(f, "[{joined}]")
            }
            GraphValue::Object(pairs) => {
                let joined = pairs
                    .iter()
                    .map(|(key, value)| format!(r#""{key}": {value}"#))
                    .collect::<Vec<_>>()
                    .join(", ");

                write!(f, "{{ {joined} }}")
            }
        }
    }
}

impl From<&str> for GraphValue {
    fn from(s: &str) -> Self {
        GraphValue::from(s.to_string())
    }
}

impl From<String> for GraphValue {
    fn from(s: String) -> Self {
        GraphValue::String(s)
    }
}

impl TryFrom<f64> for GraphValue {
    type Error = ConversionFailure;

    fn try_from(f: f64) -> GraphValueResult<GraphValue> {
        BigDecimal::from_f64(f)
            .map(GraphValue::Float)
            .ok_or_else(|| ConversionFailure::new("f64", "Decimal"))
    }
}

impl From<bool> for GraphValue {
    fn from(b: bool) -> Self {
        GraphValue::Boolean(b)
    }
}

impl From<i32> for GraphValue {
    fn from(i: i32) -> Self {
        GraphValue::Int(i64::from(i))
    }
}

impl From<i64> for GraphValue {
    fn from(i: i64) -> Self {
        GraphValue::Int(i)
    }
}

impl From<Uuid> for GraphValue {
    fn from(s: Uuid) -> Self {
        GraphValue::Uuid(s)
    }
}

impl From<DateTime<FixedOffset>> for GraphValue {
    fn from(dt: DateTime<FixedOffset>) -> Self {
        GraphValue::DateTime(dt)
    }
}

impl From<GraphListValue> for GraphValue {
    fn from(s: GraphListValue) -> Self {
        GraphValue::List(s)
    }
}

impl<T> From<Option<T>> for GraphValue
where
    T: Into<GraphValue>,
{
    fn from(opt: Option<T>) -> Self {
        match opt {
            Some(value) => value.into(),
            None => GraphValue::Null,
        }
    }
}

impl TryFrom<GraphValue> for i64 {
    type Error = ConversionFailure;

    fn try_from(value: GraphValue) -> GraphValueResult<i64> {
        match value {
            GraphValue::Int(i) => Ok(i),
            other => Err(ConversionFailure::new(other.kind(), "i64")),
        }
    }
}

impl TryFrom<GraphValue> for String {
    type Error = ConversionFailure;

    fn try_from(value: GraphValue) -> GraphValueResult<String> {
        match value {
            GraphValue::String(s) => Ok(s),
            other => Err(ConversionFailure::new(other.kind(), "String")),
        }
    }
}

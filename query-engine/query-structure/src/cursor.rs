use crate::{DomainError, DomainResult};
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use graph_value::{GraphValue, TaggedGraphValue, from_tagged};
use std::fmt;

/// Position of a record within an ordered connection: the values of every order column of the
/// record, primary key last.
///
/// The wire form is URL-safe base64 over the tagged JSON array of those values, so that dates,
/// decimals and enums survive the round trip unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Cursor {
    values: Vec<GraphValue>,
}

impl Cursor {
    pub fn new(values: Vec<GraphValue>) -> Self {
        Self { values }
    }

    pub fn values(&self) -> &[GraphValue] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn encode(&self) -> String {
        let tagged: Vec<TaggedGraphValue<'_>> = self.values.iter().map(TaggedGraphValue).collect();

        // Serializing tagged values into memory has no failure mode.
        let json = serde_json::to_vec(&tagged).unwrap_or_default();

        URL_SAFE_NO_PAD.encode(json)
    }

    pub fn decode(encoded: &str) -> DomainResult<Self> {
        let bytes = URL_SAFE_NO_PAD
            .decode(encoded)
            .map_err(|_| DomainError::InvalidCursor(format!("`{encoded}` is not valid base64")))?;

        let json: serde_json::Value = serde_json::from_slice(&bytes)
            .map_err(|_| DomainError::InvalidCursor(format!("`{encoded}` does not contain JSON")))?;

        let value = from_tagged(json).map_err(|err| DomainError::InvalidCursor(err.to_string()))?;

        match value {
            GraphValue::List(values) if !values.is_empty() => Ok(Self { values }),
            _ => Err(DomainError::InvalidCursor(format!(
                "`{encoded}` does not hold a list of values"
            ))),
        }
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn cursors_round_trip_through_their_wire_form() {
        let cursor = Cursor::new(vec![
            GraphValue::new_datetime("2021-06-01T12:00:00.000Z").unwrap(),
            GraphValue::Enum("DRAFT".into()),
            GraphValue::Int(17),
        ]);

        let encoded = cursor.encode();

        assert!(!encoded.contains('='));
        assert!(!encoded.contains('+'));
        assert_eq!(Cursor::decode(&encoded).unwrap(), cursor);
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(matches!(Cursor::decode("%%%"), Err(DomainError::InvalidCursor(_))));
        assert!(matches!(
            Cursor::decode(&URL_SAFE_NO_PAD.encode("{\"a\": 1}")),
            Err(DomainError::InvalidCursor(_))
        ));
    }
}

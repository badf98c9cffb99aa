use crate::{DomainError, DomainResult};
use graph_value::GraphValue;

/// A fetched row. Values are positional, named by the `field_names` of the enclosing
/// [`ManyRecords`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    pub values: Vec<GraphValue>,
}

impl Record {
    pub fn new(values: Vec<GraphValue>) -> Record {
        Record { values }
    }

    pub fn get(&self, index: usize) -> Option<&GraphValue> {
        self.values.get(index)
    }
}

impl From<Vec<GraphValue>> for Record {
    fn from(values: Vec<GraphValue>) -> Self {
        Record::new(values)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ManyRecords {
    pub records: Vec<Record>,
    pub field_names: Vec<String>,
}

impl ManyRecords {
    pub fn new(field_names: Vec<String>) -> Self {
        Self {
            records: Vec::new(),
            field_names,
        }
    }

    pub fn empty(field_names: &[String]) -> Self {
        Self::new(field_names.to_vec())
    }

    pub fn push(&mut self, record: Record) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn reverse(&mut self) {
        self.records.reverse();
    }

    pub fn index_of(&self, column: &str) -> Option<usize> {
        self.field_names.iter().position(|name| name == column)
    }

    /// Position of `column`, failing with a descriptive error when the connector left it out.
    pub fn require_column(&self, type_name: &str, column: &str) -> DomainResult<usize> {
        self.index_of(column).ok_or_else(|| DomainError::ColumnNotFound {
            type_name: type_name.to_owned(),
            column: column.to_owned(),
        })
    }

    /// Appends the records of `other`, which must have been fetched with the same columns.
    pub fn extend(&mut self, other: ManyRecords) {
        self.records.extend(other.records);
    }
}

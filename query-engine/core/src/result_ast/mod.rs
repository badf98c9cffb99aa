use indexmap::IndexMap;
use query_structure::{DomainError, DomainResult, FieldDescriptor, GraphValue, ObjectTypeRef};
use std::sync::Arc;

#[derive(Debug, Clone)]
pub enum QueryResult {
    Many(ResultSet),
    One(Option<Box<ResultRecord>>),
}

impl QueryResult {
    pub fn as_many(&self) -> Option<&ResultSet> {
        match self {
            QueryResult::Many(set) => Some(set),
            QueryResult::One(_) => None,
        }
    }

    pub fn as_one(&self) -> Option<&ResultRecord> {
        match self {
            QueryResult::One(record) => record.as_deref(),
            QueryResult::Many(_) => None,
        }
    }
}

/// An ordered page of records.
#[derive(Debug, Clone, Default)]
pub struct ResultSet {
    pub records: Vec<ResultRecord>,

    /// Number of records matching the connection, ignoring pagination. `0` unless requested.
    pub total_count: usize,
    pub page_info: Option<PageInfo>,
}

impl ResultSet {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ResultRecord> {
        self.records.iter()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageInfo {
    pub has_next_page: bool,
    pub has_previous_page: bool,
    pub start_cursor: Option<String>,
    pub end_cursor: Option<String>,
}

/// A fetched row of a concrete type, with the results of its requested associations.
#[derive(Debug, Clone)]
pub struct ResultRecord {
    object_type: ObjectTypeRef,
    field_names: Arc<[String]>,
    values: Vec<GraphValue>,
    cursor: Option<String>,

    /// Values of the effective order columns, used to merge lists of several types.
    pub(crate) sort_key: Vec<GraphValue>,

    /// Value of the join column, for records fetched as association children.
    pub(crate) parent_key: Option<GraphValue>,
    pub(crate) associations: IndexMap<String, QueryResult>,
}

impl ResultRecord {
    pub(crate) fn new(object_type: ObjectTypeRef, field_names: Arc<[String]>, values: Vec<GraphValue>) -> Self {
        Self {
            object_type,
            field_names,
            values,
            cursor: None,
            sort_key: Vec::new(),
            parent_key: None,
            associations: IndexMap::new(),
        }
    }

    pub(crate) fn set_cursor(&mut self, cursor: String) {
        self.cursor = Some(cursor);
    }

    pub fn object_type(&self) -> &ObjectTypeRef {
        &self.object_type
    }

    pub fn type_name(&self) -> &str {
        &self.object_type.name
    }

    /// The raw value of a fetched column.
    pub fn get(&self, column: &str) -> Option<&GraphValue> {
        self.field_names
            .iter()
            .position(|name| name == column)
            .and_then(|idx| self.values.get(idx))
    }

    pub fn id(&self) -> Option<&GraphValue> {
        self.get(&self.object_type.primary_key)
    }

    /// The value of an attribute, computing it from its dependent columns if needed. `id` falls
    /// back to the primary key when the type declares no attribute of that name.
    pub fn attribute(&self, name: &str) -> DomainResult<GraphValue> {
        match self.object_type.find_field(name) {
            Some(FieldDescriptor::Attribute(attribute)) => {
                attribute.resolve(&self.object_type.name, |column| self.get(column))
            }
            None if name == "id" => self.id().cloned().ok_or_else(|| DomainError::ColumnNotFound {
                type_name: self.object_type.name.clone(),
                column: self.object_type.primary_key.clone(),
            }),
            _ => Err(DomainError::FieldNotFound {
                type_name: self.object_type.name.clone(),
                field: name.to_owned(),
            }),
        }
    }

    pub fn cursor(&self) -> Option<&str> {
        self.cursor.as_deref()
    }

    pub fn associations(&self) -> &IndexMap<String, QueryResult> {
        &self.associations
    }

    pub fn association(&self, key: &str) -> Option<&QueryResult> {
        self.associations.get(key)
    }

    /// The result set of a many association, by output key.
    pub fn many(&self, key: &str) -> Option<&ResultSet> {
        self.association(key).and_then(QueryResult::as_many)
    }

    /// The record of a to-one association, by output key.
    pub fn one(&self, key: &str) -> Option<&ResultRecord> {
        self.association(key).and_then(QueryResult::as_one)
    }
}

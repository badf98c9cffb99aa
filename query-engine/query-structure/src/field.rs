use crate::{AssociationRef, DomainError, DomainResult};
use graph_value::GraphValue;
use std::{fmt, sync::Arc};

pub type AttributeRef = Arc<Attribute>;

/// Derives a computed attribute from the values of its dependent columns, in declaration order.
pub type ComputeFn = fn(&[GraphValue]) -> GraphValue;

#[derive(Clone, Copy, PartialEq, Debug, Eq, Hash)]
pub enum ScalarKind {
    Id,
    String,
    Int,
    Float,
    Boolean,
    DateTime,
    Enum,
    Json,
}

#[derive(Clone)]
pub enum AttributeSource {
    Column(String),
    Computed {
        dependent_columns: Vec<String>,
        compute: ComputeFn,
    },
}

impl fmt::Debug for AttributeSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Column(column) => f.debug_tuple("Column").field(column).finish(),
            Self::Computed { dependent_columns, .. } => f
                .debug_struct("Computed")
                .field("dependent_columns", dependent_columns)
                .finish_non_exhaustive(),
        }
    }
}

/// A scalar field of an object type.
#[derive(Debug, Clone)]
pub struct Attribute {
    pub name: String,
    pub kind: ScalarKind,
    pub source: AttributeSource,
}

impl Attribute {
    pub fn column(name: impl Into<String>, column: impl Into<String>, kind: ScalarKind) -> Self {
        Self {
            name: name.into(),
            kind,
            source: AttributeSource::Column(column.into()),
        }
    }

    /// An attribute stored in a column of the same name.
    pub fn scalar(name: impl Into<String>, kind: ScalarKind) -> Self {
        let name = name.into();
        Self::column(name.clone(), name, kind)
    }

    pub fn computed(name: impl Into<String>, kind: ScalarKind, dependent_columns: &[&str], compute: ComputeFn) -> Self {
        Self {
            name: name.into(),
            kind,
            source: AttributeSource::Computed {
                dependent_columns: dependent_columns.iter().map(|c| c.to_string()).collect(),
                compute,
            },
        }
    }

    /// All backing columns that must be fetched to produce this attribute.
    pub fn columns(&self) -> Vec<&str> {
        match &self.source {
            AttributeSource::Column(column) => vec![column.as_str()],
            AttributeSource::Computed { dependent_columns, .. } => {
                dependent_columns.iter().map(String::as_str).collect()
            }
        }
    }

    pub fn is_computed(&self) -> bool {
        matches!(self.source, AttributeSource::Computed { .. })
    }

    /// Produces the attribute value from a row, given a lookup from column name to value.
    pub fn resolve<'a, F>(&self, type_name: &str, lookup: F) -> DomainResult<GraphValue>
    where
        F: Fn(&str) -> Option<&'a GraphValue>,
    {
        let fetch = |column: &str| {
            lookup(column).cloned().ok_or_else(|| DomainError::ColumnNotFound {
                type_name: type_name.to_owned(),
                column: column.to_owned(),
            })
        };

        match &self.source {
            AttributeSource::Column(column) => fetch(column),
            AttributeSource::Computed {
                dependent_columns,
                compute,
            } => {
                let inputs = dependent_columns
                    .iter()
                    .map(|c| fetch(c))
                    .collect::<DomainResult<Vec<_>>>()?;

                Ok(compute(&inputs))
            }
        }
    }
}

#[derive(Debug, Clone)]
pub enum FieldDescriptor {
    Attribute(AttributeRef),
    Association(AssociationRef),
}

impl FieldDescriptor {
    pub fn name(&self) -> &str {
        match self {
            FieldDescriptor::Attribute(attribute) => &attribute.name,
            FieldDescriptor::Association(association) => &association.name,
        }
    }

    pub fn as_association(&self) -> Option<&AssociationRef> {
        match self {
            FieldDescriptor::Association(association) => Some(association),
            FieldDescriptor::Attribute(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn join_names(values: &[GraphValue]) -> GraphValue {
        let parts: Vec<String> = values.iter().map(|v| v.to_string()).collect();
        GraphValue::from(parts.join(" "))
    }

    #[test]
    fn computed_attributes_read_all_dependent_columns() {
        let attribute = Attribute::computed("full_name", ScalarKind::String, &["first", "last"], join_names);
        let row = [("first", GraphValue::from("Ada")), ("last", GraphValue::from("Lovelace"))];

        let value = attribute
            .resolve("User", |c| row.iter().find(|(name, _)| *name == c).map(|(_, v)| v))
            .unwrap();

        assert_eq!(attribute.columns(), vec!["first", "last"]);
        assert_eq!(value, GraphValue::from("Ada Lovelace"));
    }

    #[test]
    fn missing_columns_are_reported() {
        let attribute = Attribute::scalar("email", ScalarKind::String);
        let err = attribute.resolve("User", |_| None).unwrap_err();

        assert_eq!(
            err,
            DomainError::ColumnNotFound {
                type_name: "User".into(),
                column: "email".into()
            }
        );
    }
}

use crate::{
    Association, AssociationRef, Attribute, AttributeRef, DeclaredFilter, FieldDescriptor, Filter, OrderExpression,
};
use indexmap::IndexMap;
use std::sync::Arc;

pub type ObjectTypeRef = Arc<ObjectType>;
pub type InterfaceRef = Arc<Interface>;
pub type RootFieldRef = Arc<RootField>;

/// A concrete type backed by one table.
#[derive(Debug, Clone)]
pub struct ObjectType {
    pub name: String,
    pub table: String,
    pub primary_key: String,

    /// Restricts every read of this type, e.g. to rows of one tenant.
    pub scope: Filter,
    fields: IndexMap<String, FieldDescriptor>,
}

impl ObjectType {
    pub fn new(name: impl Into<String>, table: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            table: table.into(),
            primary_key: "id".to_owned(),
            scope: Filter::empty(),
            fields: IndexMap::new(),
        }
    }

    pub fn with_primary_key(mut self, column: impl Into<String>) -> Self {
        self.primary_key = column.into();
        self
    }

    pub fn with_scope(mut self, scope: Filter) -> Self {
        self.scope = scope;
        self
    }

    pub fn with_attribute(mut self, attribute: Attribute) -> Self {
        let name = attribute.name.clone();
        self.fields.insert(name, FieldDescriptor::Attribute(Arc::new(attribute)));
        self
    }

    pub fn with_association(mut self, association: Association) -> Self {
        let name = association.name.clone();
        self.fields.insert(name, FieldDescriptor::Association(Arc::new(association)));
        self
    }

    pub fn find_field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.get(name)
    }

    pub fn fields(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.values()
    }

    pub fn attributes(&self) -> impl Iterator<Item = &AttributeRef> {
        self.fields.values().filter_map(|f| match f {
            FieldDescriptor::Attribute(attribute) => Some(attribute),
            FieldDescriptor::Association(_) => None,
        })
    }

    pub fn associations(&self) -> impl Iterator<Item = &AssociationRef> {
        self.fields.values().filter_map(FieldDescriptor::as_association)
    }
}

/// A named set of concrete types that can be selected together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interface {
    pub name: String,
    pub covered_types: Vec<String>,
}

impl Interface {
    pub fn new<I, S>(name: impl Into<String>, covered_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            covered_types: covered_types.into_iter().map(Into::into).collect(),
        }
    }

    pub fn covers(&self, type_name: &str) -> bool {
        self.covered_types.iter().any(|t| t == type_name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RootFieldKind {
    /// A paginated list of records in the declared order.
    Connection { order: OrderExpression },

    /// At most one record, looked up by the `id` argument.
    Single,
}

/// An entry point of the query root.
#[derive(Debug, Clone)]
pub struct RootField {
    pub name: String,

    /// Name of an object type or of an interface.
    pub target: String,
    pub kind: RootFieldKind,
    pub filters: Vec<DeclaredFilter>,
}

impl RootField {
    pub fn connection(name: impl Into<String>, target: impl Into<String>, order: OrderExpression) -> Self {
        Self {
            name: name.into(),
            target: target.into(),
            kind: RootFieldKind::Connection { order },
            filters: Vec::new(),
        }
    }

    pub fn single(name: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            target: target.into(),
            kind: RootFieldKind::Single,
            filters: Vec::new(),
        }
    }

    pub fn with_filter(mut self, filter: DeclaredFilter) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn find_filter(&self, argument: &str) -> Option<&DeclaredFilter> {
        self.filters.iter().find(|f| f.argument == argument)
    }
}

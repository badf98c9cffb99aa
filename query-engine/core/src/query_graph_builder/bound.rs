use indexmap::IndexMap;
use query_structure::{AssociationRef, AttributeRef, Cursor, Filter, GraphValue, ObjectTypeRef, OrderExpression};

/// A selection bound to one concrete type.
#[derive(Debug, Clone)]
pub enum BoundSelection {
    Field(BoundField),
    Connection(BoundConnection),
    Edge(BoundEdge),
}

impl BoundSelection {
    pub fn object_type(&self) -> &ObjectTypeRef {
        match self {
            BoundSelection::Field(field) => &field.object_type,
            BoundSelection::Connection(connection) => &connection.object_type,
            BoundSelection::Edge(edge) => &edge.object_type,
        }
    }

    pub fn as_field(&self) -> Option<&BoundField> {
        match self {
            BoundSelection::Field(field) => Some(field),
            _ => None,
        }
    }

    pub fn as_connection(&self) -> Option<&BoundConnection> {
        match self {
            BoundSelection::Connection(connection) => Some(connection),
            _ => None,
        }
    }

    /// The record-level selection: the field itself, or the node of a connection's edges.
    pub fn record_selection(&self) -> Option<&BoundField> {
        match self {
            BoundSelection::Field(field) => Some(field),
            BoundSelection::Connection(connection) => connection.node(),
            BoundSelection::Edge(edge) => edge.node.as_ref(),
        }
    }
}

/// Validated subselections of one record, keyed by output key.
#[derive(Debug, Clone)]
pub struct BoundField {
    pub object_type: ObjectTypeRef,
    pub items: IndexMap<String, BoundItem>,
}

impl BoundField {
    pub fn associations(&self) -> impl Iterator<Item = (&str, &BoundAssociation)> {
        self.items.iter().filter_map(|(key, item)| match item {
            BoundItem::Association(association) => Some((key.as_str(), association)),
            _ => None,
        })
    }

    pub fn attributes(&self) -> impl Iterator<Item = &AttributeRef> {
        self.items.values().filter_map(|item| match item {
            BoundItem::Attribute(attribute) => Some(attribute),
            _ => None,
        })
    }
}

#[derive(Debug, Clone)]
pub enum BoundItem {
    /// The primary key of the record.
    Id,
    Attribute(AttributeRef),
    Association(BoundAssociation),
}

/// An association of a bound field, bound in turn to every concrete type it can reach.
/// Many associations hold connections, to-one associations hold fields.
#[derive(Debug, Clone)]
pub struct BoundAssociation {
    pub association: AssociationRef,

    /// Predicates of the declared filters present in the arguments.
    pub filter: Filter,
    pub targets: Vec<BoundSelection>,
}

#[derive(Debug, Clone)]
pub struct BoundConnection {
    pub object_type: ObjectTypeRef,

    /// Declared order of the connection, without the primary key tie-breaker.
    pub order: OrderExpression,
    pub pagination: Pagination,
    pub edges: Option<BoundEdge>,
    pub page_info: Option<PageInfoRequest>,
    pub count: bool,

    /// Cursors end with the type name of their record, for positions merging several concrete
    /// types.
    pub typed_cursors: bool,
}

impl BoundConnection {
    pub fn node(&self) -> Option<&BoundField> {
        self.edges.as_ref().and_then(|edges| edges.node.as_ref())
    }

    /// The order every record of this connection is sorted by, primary key last.
    pub fn effective_order(&self) -> OrderExpression {
        self.order.with_tiebreaker(&self.object_type.primary_key)
    }

    /// Whether the records need their cursor computed.
    pub fn needs_cursors(&self) -> bool {
        self.edges.as_ref().is_some_and(|edges| edges.cursor)
            || self
                .page_info
                .as_ref()
                .is_some_and(|info| info.start_cursor || info.end_cursor)
    }
}

#[derive(Debug, Clone)]
pub struct BoundEdge {
    pub object_type: ObjectTypeRef,
    pub node: Option<BoundField>,
    pub cursor: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageInfoRequest {
    pub has_next_page: bool,
    pub has_previous_page: bool,
    pub start_cursor: bool,
    pub end_cursor: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pagination {
    Forward { first: usize, after: Option<Cursor> },
    Backward { last: usize, before: Option<Cursor> },
}

impl Pagination {
    pub fn limit(&self) -> usize {
        match self {
            Pagination::Forward { first, .. } => *first,
            Pagination::Backward { last, .. } => *last,
        }
    }

    pub fn cursor(&self) -> Option<&Cursor> {
        match self {
            Pagination::Forward { after, .. } => after.as_ref(),
            Pagination::Backward { before, .. } => before.as_ref(),
        }
    }

    pub fn is_backward(&self) -> bool {
        matches!(self, Pagination::Backward { .. })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RootReadKind {
    Many,

    /// Lookup of one record by primary key.
    Single { id: GraphValue },
}

/// A bound entry point of the query root.
#[derive(Debug, Clone)]
pub struct RootRead {
    /// Output key of the root field.
    pub key: String,
    pub filter: Filter,
    pub targets: Vec<BoundSelection>,
    pub kind: RootReadKind,
}

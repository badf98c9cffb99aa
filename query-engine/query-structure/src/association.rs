use crate::{DeclaredFilter, DomainError, DomainResult, OrderExpression};
use std::sync::Arc;

pub type AssociationRef = Arc<Association>;

#[derive(Clone, Copy, PartialEq, Debug, Eq, Hash)]
pub enum Cardinality {
    OneToOne,
    OneToMany,
    ManyToOne,
}

impl Cardinality {
    pub fn is_many(self) -> bool {
        matches!(self, Cardinality::OneToMany)
    }
}

/// A link from one object type to a target type or interface, joined on
/// `local_column = remote_column`.
#[derive(Debug, Clone)]
pub struct Association {
    pub name: String,
    pub cardinality: Cardinality,

    /// Name of an object type or of an interface.
    pub target: String,
    pub local_column: String,
    pub remote_column: String,
    pub nullable: bool,

    /// Default order of the children. Present exactly when the cardinality is many.
    pub order: Option<OrderExpression>,
    pub filters: Vec<DeclaredFilter>,
}

impl Association {
    pub fn new(
        name: impl Into<String>,
        cardinality: Cardinality,
        target: impl Into<String>,
        local_column: impl Into<String>,
        remote_column: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            cardinality,
            target: target.into(),
            local_column: local_column.into(),
            remote_column: remote_column.into(),
            nullable: true,
            order: None,
            filters: Vec::new(),
        }
    }

    pub fn one_to_many(
        name: impl Into<String>,
        target: impl Into<String>,
        local_column: impl Into<String>,
        remote_column: impl Into<String>,
        order: OrderExpression,
    ) -> Self {
        Self::new(name, Cardinality::OneToMany, target, local_column, remote_column).with_order(order)
    }

    pub fn many_to_one(
        name: impl Into<String>,
        target: impl Into<String>,
        local_column: impl Into<String>,
        remote_column: impl Into<String>,
    ) -> Self {
        Self::new(name, Cardinality::ManyToOne, target, local_column, remote_column)
    }

    pub fn one_to_one(
        name: impl Into<String>,
        target: impl Into<String>,
        local_column: impl Into<String>,
        remote_column: impl Into<String>,
    ) -> Self {
        Self::new(name, Cardinality::OneToOne, target, local_column, remote_column)
    }

    pub fn with_order(mut self, order: OrderExpression) -> Self {
        self.order = Some(order);
        self
    }

    pub fn required(mut self) -> Self {
        self.nullable = false;
        self
    }

    pub fn with_filter(mut self, filter: DeclaredFilter) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn is_many(&self) -> bool {
        self.cardinality.is_many()
    }

    pub fn find_filter(&self, argument: &str) -> Option<&DeclaredFilter> {
        self.filters.iter().find(|f| f.argument == argument)
    }

    /// Checks the order/cardinality pairing. Called by the schema builder for every association.
    pub fn validate(&self, type_name: &str) -> DomainResult<()> {
        let invalid = |reason: &str| DomainError::InvalidAssociation {
            type_name: type_name.to_owned(),
            association: self.name.clone(),
            reason: reason.to_owned(),
        };

        match (self.cardinality, &self.order) {
            (Cardinality::OneToMany, None) => Err(invalid("one-to-many associations require a default order")),
            (Cardinality::OneToMany, Some(order)) if order.is_empty() => {
                Err(invalid("one-to-many associations require a non-empty default order"))
            }
            (Cardinality::OneToOne | Cardinality::ManyToOne, Some(_)) => {
                Err(invalid("only one-to-many associations may declare an order"))
            }
            _ => Ok(()),
        }
    }
}

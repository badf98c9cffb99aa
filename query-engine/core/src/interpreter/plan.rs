use super::{
    InterpretationResult, InterpreterError,
    cursor_condition::{SeekDirection, seek_filter},
};
use crate::{BoundField, BoundSelection, Pagination};
use itertools::Itertools;
use query_structure::{Filter, GraphValue, ObjectTypeRef, OrderExpression, ScalarCompare};
use std::fmt;

/// Restricts a read to the children of a set of parent records.
#[derive(Debug, Clone)]
pub(crate) struct JoinSpec {
    pub remote_column: String,

    /// Distinct, non-null join values of the parents.
    pub keys: Vec<GraphValue>,
}

/// Everything needed to read one concrete type at one position of the tree.
#[derive(Debug, Clone)]
pub(crate) struct QueryPlan {
    pub object_type: ObjectTypeRef,
    pub columns: Vec<String>,

    /// Scope, declared filters and caller filter. Used as is for counts.
    pub filter: Filter,

    /// Cursor bound, applied to fetches only.
    pub seek: Option<Filter>,

    /// Order of the fetch. Reversed for backward pagination.
    pub fetch_order: Option<OrderExpression>,

    /// Order the records are merged in, and the columns of their sort keys and cursors.
    pub sort_order: Option<OrderExpression>,
    pub take: Option<usize>,
    pub count: bool,
    pub cursors: bool,

    /// Whether cursors end with the type name of their record.
    pub typed_cursors: bool,
    pub join: Option<JoinSpec>,
}

impl QueryPlan {
    /// Compiles the read of a field or connection bound to one concrete type.
    pub(crate) fn compile(target: &BoundSelection, filter: &Filter, join: Option<JoinSpec>, take: Option<usize>) -> Self {
        let object_type = target.object_type().clone();
        let filter = Filter::and(vec![object_type.scope.clone(), filter.clone()]);

        let mut plan = QueryPlan {
            columns: Vec::new(),
            object_type,
            filter,
            seek: None,
            fetch_order: None,
            sort_order: None,
            take,
            count: false,
            cursors: false,
            typed_cursors: false,
            join,
        };

        if let BoundSelection::Connection(connection) = target {
            let order = connection.effective_order();
            let page_info_requested = connection.page_info.is_some();
            let type_name = connection.typed_cursors.then_some(connection.object_type.name.as_str());

            plan.seek = match &connection.pagination {
                Pagination::Forward { after: Some(cursor), .. } => {
                    Some(seek_filter(&order, cursor, SeekDirection::After, type_name))
                }
                Pagination::Backward { before: Some(cursor), .. } => {
                    Some(seek_filter(&order, cursor, SeekDirection::Before, type_name))
                }
                _ => None,
            };

            // One extra record tells whether there is a page beyond this one.
            plan.take = Some(connection.pagination.limit() + usize::from(page_info_requested));
            plan.fetch_order = Some(if connection.pagination.is_backward() {
                order.reversed()
            } else {
                order.clone()
            });
            plan.sort_order = Some(order);
            plan.count = connection.count;
            plan.cursors = connection.needs_cursors();
            plan.typed_cursors = connection.typed_cursors;
        }

        plan.columns = required_columns(&plan, target.record_selection());
        plan
    }

    pub(crate) fn table(&self) -> &str {
        &self.object_type.table
    }

    /// The fetch filter: the plan filter narrowed by the cursor bound.
    pub(crate) fn fetch_filter(&self) -> Filter {
        match &self.seek {
            Some(seek) => Filter::and(vec![self.filter.clone(), seek.clone()]),
            None => self.filter.clone(),
        }
    }

    /// The fetch filter narrowed to the children of `keys`.
    pub(crate) fn join_filter(&self, keys: &[GraphValue]) -> Filter {
        match &self.join {
            Some(join) => Filter::and(vec![self.filter.clone(), join.remote_column.as_str().is_in(keys.to_vec())]),
            None => self.filter.clone(),
        }
    }
}

impl fmt::Display for QueryPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SELECT {} FROM {} WHERE {}", self.columns.join(", "), self.table(), self.fetch_filter())?;

        if let Some(join) = &self.join {
            write!(f, " AND {} IN <{} keys>", join.remote_column, join.keys.len())?;
        }

        if let Some(order) = &self.fetch_order {
            write!(f, " ORDER BY {order}")?;
        }

        if let Some(take) = self.take {
            write!(f, " LIMIT {take}")?;
        }

        Ok(())
    }
}

/// Primary key, backing columns of the selected attributes, local join columns of the selected
/// associations, the remote join column and the sort columns, without duplicates.
fn required_columns(plan: &QueryPlan, field: Option<&BoundField>) -> Vec<String> {
    let attribute_columns = field
        .into_iter()
        .flat_map(|field| field.attributes().flat_map(|attribute| attribute.columns()));

    let association_columns = field.into_iter().flat_map(|field| {
        field
            .associations()
            .map(|(_, bound)| bound.association.local_column.as_str())
    });

    std::iter::once(plan.object_type.primary_key.as_str())
        .chain(attribute_columns)
        .chain(association_columns)
        .chain(plan.join.iter().map(|join| join.remote_column.as_str()))
        .chain(plan.sort_order.iter().flat_map(|order| order.columns()))
        .unique()
        .map(ToOwned::to_owned)
        .collect()
}

/// The concrete types behind one position must agree on the effective order, or their records
/// cannot be merged into one list.
pub(crate) fn ensure_consistent_order(position: &str, targets: &[BoundSelection]) -> InterpretationResult<()> {
    let orders: Vec<(&str, OrderExpression)> = targets
        .iter()
        .filter_map(BoundSelection::as_connection)
        .map(|connection| (connection.object_type.name.as_str(), connection.effective_order()))
        .collect();

    match orders.split_first() {
        Some(((first_type, first_order), rest)) => match rest.iter().find(|(_, order)| order != first_order) {
            Some((other_type, other_order)) => Err(InterpreterError::DivergentOrder {
                position: position.to_owned(),
                details: format!("`{first_type}` sorts by {first_order}, `{other_type}` by {other_order}"),
            }),
            None => Ok(()),
        },
        None => Ok(()),
    }
}

use super::*;
use crate::{QueryParserError, QueryParserErrorKind, Selection, SelectionPath};
use indexmap::IndexMap;
use query_structure::{FieldDescriptor, GraphValue, ObjectTypeRef, OrderExpression, Schema};
use std::collections::VecDeque;

const TYPENAME: &str = "__typename";
const CLIENT_MUTATION_ID: &str = "clientMutationId";

/// How a selection is entered: as a record, as a paginated list of records, or as one edge of
/// such a list.
#[derive(Debug, Clone, Copy)]
pub enum EntryPoint<'a> {
    Field,
    Connection { order: &'a OrderExpression },
    Edge,
}

/// Binds generic selections to concrete schema types.
pub struct TypeBinder<'s> {
    schema: &'s Schema,
}

impl<'s> TypeBinder<'s> {
    pub fn new(schema: &'s Schema) -> Self {
        Self { schema }
    }

    pub fn schema(&self) -> &'s Schema {
        self.schema
    }

    /// Binds `selection` once per concrete type behind `target`, which names an object type or an
    /// interface.
    pub fn bind_targets(
        &self,
        selection: &Selection,
        target: &str,
        entry: EntryPoint<'_>,
        path: &SelectionPath,
    ) -> QueryGraphBuilderResult<Vec<BoundSelection>> {
        let object_types = self
            .schema
            .covered_types(target)
            .map_err(|_| QueryGraphBuilderError::TypeNotFound {
                name: target.to_owned(),
                path: path.clone(),
            })?;

        let typed_cursors = object_types.len() > 1;

        object_types
            .iter()
            .map(|object_type| match entry {
                EntryPoint::Connection { order } => self
                    .bind_connection(selection, object_type, order, typed_cursors, path)
                    .map(BoundSelection::Connection),
                _ => self.bind(selection, object_type, entry, path),
            })
            .collect()
    }

    pub fn bind(
        &self,
        selection: &Selection,
        object_type: &ObjectTypeRef,
        entry: EntryPoint<'_>,
        path: &SelectionPath,
    ) -> QueryGraphBuilderResult<BoundSelection> {
        match entry {
            EntryPoint::Field => self.bind_field(selection, object_type, path).map(BoundSelection::Field),
            EntryPoint::Connection { order } => self
                .bind_connection(selection, object_type, order, false, path)
                .map(BoundSelection::Connection),
            EntryPoint::Edge => self.bind_edge(selection, object_type, path).map(BoundSelection::Edge),
        }
    }

    fn bind_field(
        &self,
        selection: &Selection,
        object_type: &ObjectTypeRef,
        path: &SelectionPath,
    ) -> QueryGraphBuilderResult<BoundField> {
        let selection = self.apply_fragments(selection, &object_type.name, path)?;
        let mut items = IndexMap::with_capacity(selection.subselections().len());

        for (key, child) in selection.subselections() {
            let child_path = path.add(key.as_str());

            let item = match (child.name(), object_type.find_field(child.name())) {
                (_, Some(FieldDescriptor::Attribute(attribute))) => {
                    ensure_no_arguments(child, &child_path)?;
                    BoundItem::Attribute(attribute.clone())
                }
                (_, Some(FieldDescriptor::Association(association))) => {
                    BoundItem::Association(AssociationDispatcher::new(self).dispatch(association, child, &child_path)?)
                }
                ("id", None) => {
                    ensure_no_arguments(child, &child_path)?;
                    BoundItem::Id
                }
                (TYPENAME | CLIENT_MUTATION_ID, None) => continue,
                (name, None) => {
                    return Err(QueryGraphBuilderError::UnsupportedField {
                        field: name.to_owned(),
                        type_name: object_type.name.clone(),
                        path: child_path,
                    });
                }
            };

            items.insert(key.clone(), item);
        }

        Ok(BoundField {
            object_type: object_type.clone(),
            items,
        })
    }

    fn bind_connection(
        &self,
        selection: &Selection,
        object_type: &ObjectTypeRef,
        order: &OrderExpression,
        typed_cursors: bool,
        path: &SelectionPath,
    ) -> QueryGraphBuilderResult<BoundConnection> {
        let pagination = extract_pagination(selection, path)?;
        let effective_order = order.with_tiebreaker(&object_type.primary_key);

        if let Some(cursor) = pagination.cursor() {
            let expected = effective_order.len() + usize::from(typed_cursors);

            let reason = if cursor.len() != expected {
                Some(format!(
                    "expected {} values for `{}`, got {}",
                    expected,
                    effective_order,
                    cursor.len()
                ))
            } else if typed_cursors && !matches!(cursor.values().last(), Some(GraphValue::String(_))) {
                Some("the last value must name the type of the record".to_owned())
            } else {
                None
            };

            if let Some(reason) = reason {
                return Err(QueryGraphBuilderError::InvalidCursor {
                    field: selection.name().to_owned(),
                    reason,
                    path: path.clone(),
                });
            }
        }

        let selection = splice_all_fragments(selection, path)?;
        let connection_type = format!("{}Connection", object_type.name);

        let mut edges: Option<Selection> = None;
        let mut page_info = None;
        let mut count = false;

        for (key, child) in selection.subselections() {
            let child_path = path.add(key.as_str());

            match child.name() {
                "edges" => merge_into(&mut edges, child, &child_path)?,
                "pageInfo" => {
                    let request = bind_page_info(child, &child_path)?;
                    let existing: &mut PageInfoRequest = page_info.get_or_insert_with(PageInfoRequest::default);

                    existing.has_next_page |= request.has_next_page;
                    existing.has_previous_page |= request.has_previous_page;
                    existing.start_cursor |= request.start_cursor;
                    existing.end_cursor |= request.end_cursor;
                }
                "count" | "totalCount" => count = true,
                TYPENAME => (),
                name => {
                    return Err(QueryGraphBuilderError::UnsupportedField {
                        field: name.to_owned(),
                        type_name: connection_type,
                        path: child_path,
                    });
                }
            }
        }

        let edges = match edges {
            Some(edges) => Some(self.bind_edge(&edges, object_type, &path.add("edges"))?),
            None => None,
        };

        Ok(BoundConnection {
            object_type: object_type.clone(),
            order: order.clone(),
            pagination,
            edges,
            page_info,
            count,
            typed_cursors,
        })
    }

    fn bind_edge(
        &self,
        selection: &Selection,
        object_type: &ObjectTypeRef,
        path: &SelectionPath,
    ) -> QueryGraphBuilderResult<BoundEdge> {
        let selection = splice_all_fragments(selection, path)?;

        let mut node: Option<Selection> = None;
        let mut cursor = false;

        for (key, child) in selection.subselections() {
            let child_path = path.add(key.as_str());

            match child.name() {
                "node" => merge_into(&mut node, child, &child_path)?,
                "cursor" => cursor = true,
                TYPENAME => (),
                name => {
                    return Err(QueryGraphBuilderError::UnsupportedField {
                        field: name.to_owned(),
                        type_name: format!("{}Edge", object_type.name),
                        path: child_path,
                    });
                }
            }
        }

        let node = match node {
            Some(node) => Some(self.bind_field(&node, object_type, &path.add("node"))?),
            None => None,
        };

        Ok(BoundEdge {
            object_type: object_type.clone(),
            node,
            cursor,
        })
    }

    /// Splices every fragment applicable to `type_name` into a copy of `selection`, including
    /// fragments nested in fragments.
    fn apply_fragments(
        &self,
        selection: &Selection,
        type_name: &str,
        path: &SelectionPath,
    ) -> QueryGraphBuilderResult<Selection> {
        let mut applied = selection.without_fragments();
        let mut pending: VecDeque<(&String, &Selection)> = fragments_of(selection).collect();

        while let Some((type_condition, fragment)) = pending.pop_front() {
            let assignable = self
                .schema
                .is_assignable(type_condition, type_name)
                .map_err(|_| QueryGraphBuilderError::TypeNotFound {
                    name: type_condition.clone(),
                    path: path.clone(),
                })?;

            if assignable {
                pending.extend(fragments_of(fragment));
                splice(&mut applied, fragment.without_fragments(), path)?;
            }
        }

        Ok(applied)
    }
}

fn fragments_of(selection: &Selection) -> impl Iterator<Item = (&String, &Selection)> {
    selection
        .fragments()
        .iter()
        .flat_map(|(type_condition, fragments)| fragments.iter().map(move |f| (type_condition, f)))
}

/// Connection and edge positions have no schema type to match fragment conditions against, so
/// every fragment there is spliced in.
fn splice_all_fragments(selection: &Selection, path: &SelectionPath) -> QueryGraphBuilderResult<Selection> {
    let mut applied = selection.without_fragments();
    let mut pending: VecDeque<&Selection> = fragments_of(selection).map(|(_, f)| f).collect();

    while let Some(fragment) = pending.pop_front() {
        pending.extend(fragments_of(fragment).map(|(_, f)| f));
        splice(&mut applied, fragment.without_fragments(), path)?;
    }

    Ok(applied)
}

fn splice(target: &mut Selection, fragment: Selection, path: &SelectionPath) -> QueryGraphBuilderResult<()> {
    target.splice(fragment).map_err(|kind| {
        let path = match &kind {
            QueryParserErrorKind::DuplicateField { field } => path.add(field.as_str()),
            _ => path.clone(),
        };

        QueryParserError::new(path, kind).into()
    })
}

/// Folds repeated invocations of a structural field (`edges`, `node`) into one selection.
fn merge_into(slot: &mut Option<Selection>, selection: &Selection, path: &SelectionPath) -> QueryGraphBuilderResult<()> {
    match slot {
        Some(existing) => existing
            .merge(selection.clone())
            .map_err(|kind| QueryParserError::new(path.clone(), kind).into()),
        None => {
            *slot = Some(selection.clone());
            Ok(())
        }
    }
}

fn bind_page_info(selection: &Selection, path: &SelectionPath) -> QueryGraphBuilderResult<PageInfoRequest> {
    let selection = splice_all_fragments(selection, path)?;
    let mut request = PageInfoRequest::default();

    for (key, child) in selection.subselections() {
        match child.name() {
            "hasNextPage" => request.has_next_page = true,
            "hasPreviousPage" => request.has_previous_page = true,
            "startCursor" => request.start_cursor = true,
            "endCursor" => request.end_cursor = true,
            TYPENAME => (),
            name => {
                return Err(QueryGraphBuilderError::UnsupportedField {
                    field: name.to_owned(),
                    type_name: "PageInfo".to_owned(),
                    path: path.add(key.as_str()),
                });
            }
        }
    }

    Ok(request)
}

fn ensure_no_arguments(selection: &Selection, path: &SelectionPath) -> QueryGraphBuilderResult<()> {
    match selection.arguments().keys().next() {
        Some(argument) => Err(QueryGraphBuilderError::UnknownArgument {
            argument: argument.clone(),
            field: selection.name().to_owned(),
            path: path.clone(),
        }),
        None => Ok(()),
    }
}

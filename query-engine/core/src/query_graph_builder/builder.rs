use super::*;
use crate::{QueryParserError, ROOT_TYPE_NAME, Selection, SelectionPath};
use query_structure::{GraphValue, RootField, RootFieldKind, Schema};
use std::fmt;
use tracing::{info_span, trace};

/// Binds the root selection of a document to the root fields of the schema.
pub struct QueryGraphBuilder<'a> {
    schema: &'a Schema,
}

impl fmt::Debug for QueryGraphBuilder<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryGraphBuilder").finish()
    }
}

impl<'a> QueryGraphBuilder<'a> {
    pub fn new(schema: &'a Schema) -> Self {
        Self { schema }
    }

    /// Maps every field of the root selection to a bound root read, in selection order.
    pub fn build(&self, root: &Selection) -> QueryGraphBuilderResult<Vec<RootRead>> {
        let _span = info_span!("build_query_graph").entered();
        let path = SelectionPath::new(ROOT_TYPE_NAME);
        let root = self.root_selection(root, &path)?;

        let reads = root
            .subselections()
            .iter()
            .filter(|(_, selection)| selection.name() != "__typename")
            .map(|(key, selection)| self.build_root_read(key, selection, &path.add(key.as_str())))
            .collect::<QueryGraphBuilderResult<Vec<_>>>()?;

        trace!(root_fields = reads.len(), "bound root selection");

        Ok(reads)
    }

    /// Fragments on the root can only be conditioned on the root type itself.
    fn root_selection(&self, root: &Selection, path: &SelectionPath) -> QueryGraphBuilderResult<Selection> {
        let mut applied = root.without_fragments();

        for (type_condition, fragments) in root.fragments() {
            if type_condition != ROOT_TYPE_NAME {
                return Err(QueryGraphBuilderError::TypeNotFound {
                    name: type_condition.clone(),
                    path: path.clone(),
                });
            }

            for fragment in fragments {
                let nested = self.root_selection(fragment, path)?;
                applied
                    .splice(nested)
                    .map_err(|kind| QueryParserError::new(path.clone(), kind))?;
            }
        }

        Ok(applied)
    }

    fn build_root_read(&self, key: &str, selection: &Selection, path: &SelectionPath) -> QueryGraphBuilderResult<RootRead> {
        let root_field = self
            .schema
            .find_root_field(selection.name())
            .ok_or_else(|| QueryGraphBuilderError::UnsupportedField {
                field: selection.name().to_owned(),
                type_name: ROOT_TYPE_NAME.to_owned(),
                path: path.clone(),
            })?;

        let binder = TypeBinder::new(self.schema);

        match &root_field.kind {
            RootFieldKind::Connection { order } => {
                let filter = extract_filter(selection, &root_field.filters, &PAGINATION_ARGUMENTS, path)?;
                let targets =
                    binder.bind_targets(selection, &root_field.target, EntryPoint::Connection { order }, path)?;

                Ok(RootRead {
                    key: key.to_owned(),
                    filter,
                    targets,
                    kind: RootReadKind::Many,
                })
            }
            RootFieldKind::Single => {
                let id = single_id(root_field, selection, path)?;
                let filter = extract_filter(selection, &root_field.filters, &["id"], path)?;
                let targets = binder.bind_targets(selection, &root_field.target, EntryPoint::Field, path)?;

                Ok(RootRead {
                    key: key.to_owned(),
                    filter,
                    targets,
                    kind: RootReadKind::Single { id },
                })
            }
        }
    }
}

fn single_id(root_field: &RootField, selection: &Selection, path: &SelectionPath) -> QueryGraphBuilderResult<GraphValue> {
    match selection.argument("id") {
        Some(id) if !id.is_null() => Ok(id.clone()),
        _ => Err(QueryGraphBuilderError::InvalidArgument {
            argument: "id".to_owned(),
            reason: format!("`{}` requires a non-null `id`", root_field.name),
            path: path.clone(),
        }),
    }
}

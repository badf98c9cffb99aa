use super::*;
use crate::{Selection, SelectionPath};
use query_structure::{Cursor, DeclaredFilter, Filter, GraphValue};

pub(crate) const PAGINATION_ARGUMENTS: [&str; 4] = ["first", "last", "after", "before"];

/// Reads `first`/`after` or `last`/`before` off a connection selection. Null arguments count as
/// absent.
pub(crate) fn extract_pagination(selection: &Selection, path: &SelectionPath) -> QueryGraphBuilderResult<Pagination> {
    let invalid = |reason: &str| QueryGraphBuilderError::InvalidPaginationArguments {
        field: selection.name().to_owned(),
        reason: reason.to_owned(),
        path: path.clone(),
    };

    let first = extract_limit(selection, "first", path)?;
    let last = extract_limit(selection, "last", path)?;
    let after = extract_cursor(selection, "after", path)?;
    let before = extract_cursor(selection, "before", path)?;

    match (first, last) {
        (Some(_), Some(_)) => Err(invalid("`first` and `last` cannot be combined")),
        (Some(_), None) if before.is_some() => Err(invalid("`before` requires `last`")),
        (None, Some(_)) if after.is_some() => Err(invalid("`after` requires `first`")),
        (Some(first), None) => Ok(Pagination::Forward { first, after }),
        (None, Some(last)) => Ok(Pagination::Backward { last, before }),
        (None, None) => Err(QueryGraphBuilderError::MissingPaginationArgument {
            field: selection.name().to_owned(),
            path: path.clone(),
        }),
    }
}

fn extract_limit(selection: &Selection, argument: &str, path: &SelectionPath) -> QueryGraphBuilderResult<Option<usize>> {
    match selection.argument(argument) {
        None | Some(GraphValue::Null) => Ok(None),
        Some(GraphValue::Int(i)) if *i >= 0 => Ok(Some(*i as usize)),
        Some(GraphValue::Int(i)) => Err(QueryGraphBuilderError::InvalidPaginationArguments {
            field: selection.name().to_owned(),
            reason: format!("`{argument}` must not be negative, got {i}"),
            path: path.clone(),
        }),
        Some(other) => Err(QueryGraphBuilderError::InvalidArgument {
            argument: argument.to_owned(),
            reason: format!("expected an integer, got `{}`", other.kind()),
            path: path.clone(),
        }),
    }
}

fn extract_cursor(selection: &Selection, argument: &str, path: &SelectionPath) -> QueryGraphBuilderResult<Option<Cursor>> {
    match selection.argument(argument) {
        None | Some(GraphValue::Null) => Ok(None),
        Some(GraphValue::String(encoded)) => {
            Cursor::decode(encoded)
                .map(Some)
                .map_err(|err| QueryGraphBuilderError::InvalidCursor {
                    field: selection.name().to_owned(),
                    reason: err.to_string(),
                    path: path.clone(),
                })
        }
        Some(other) => Err(QueryGraphBuilderError::InvalidCursor {
            field: selection.name().to_owned(),
            reason: format!("expected a string, got `{}`", other.kind()),
            path: path.clone(),
        }),
    }
}

/// Combines the declared filters matching the arguments of `selection`. Arguments that are neither
/// declared filters nor, if `allowed` contains them, one of the listed names fail.
pub(crate) fn extract_filter(
    selection: &Selection,
    declared: &[DeclaredFilter],
    allowed: &[&str],
    path: &SelectionPath,
) -> QueryGraphBuilderResult<Filter> {
    let mut filters = Vec::new();

    for (argument, value) in selection.arguments() {
        if allowed.contains(&argument.as_str()) {
            continue;
        }

        let filter = declared
            .iter()
            .find(|f| &f.argument == argument)
            .ok_or_else(|| QueryGraphBuilderError::UnknownArgument {
                argument: argument.clone(),
                field: selection.name().to_owned(),
                path: path.clone(),
            })?;

        let predicate = filter.apply(value).map_err(|err| QueryGraphBuilderError::InvalidArgument {
            argument: argument.clone(),
            reason: err.to_string(),
            path: path.clone(),
        })?;

        filters.push(predicate);
    }

    Ok(Filter::and(filters))
}

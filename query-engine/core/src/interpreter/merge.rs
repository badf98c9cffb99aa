use super::{InterpretationResult, InterpreterError};
use crate::{BoundConnection, PageInfo, Pagination, ResultRecord, ResultSet};
use query_structure::GraphValue;

/// Merges the records of every concrete type of a connection into one page.
///
/// Records are sorted by their sort keys, ties between types broken by type name, and cut to the
/// page window again. Without a connection the records are returned as they are.
pub(crate) fn merge_many(
    mut records: Vec<ResultRecord>,
    connection: Option<&BoundConnection>,
    total_count: usize,
) -> ResultSet {
    let Some(connection) = connection else {
        return ResultSet {
            records,
            total_count,
            page_info: None,
        };
    };

    let order = connection.effective_order();
    records.sort_by(|a, b| {
        order
            .compare(&a.sort_key, &b.sort_key)
            .then_with(|| a.type_name().cmp(b.type_name()))
    });

    let limit = connection.pagination.limit();
    let overflow = records.len() > limit;

    let (has_next_page, has_previous_page) = match &connection.pagination {
        Pagination::Forward { after, .. } => {
            records.truncate(limit);
            (overflow, after.is_some())
        }
        Pagination::Backward { before, .. } => {
            let excess = records.len().saturating_sub(limit);
            records.drain(..excess);
            (before.is_some(), overflow)
        }
    };

    let page_info = connection.page_info.map(|_| PageInfo {
        has_next_page,
        has_previous_page,
        start_cursor: records.first().and_then(|r| r.cursor()).map(ToOwned::to_owned),
        end_cursor: records.last().and_then(|r| r.cursor()).map(ToOwned::to_owned),
    });

    ResultSet {
        records,
        total_count: if connection.count { total_count } else { 0 },
        page_info,
    }
}

/// Reduces the candidates of a to-one position to at most one record. `required_key` is the join
/// value of a parent whose association must not resolve to nothing.
pub(crate) fn merge_one(
    mut records: Vec<ResultRecord>,
    position: &str,
    required_key: Option<&GraphValue>,
) -> InterpretationResult<Option<Box<ResultRecord>>> {
    match (records.len(), required_key) {
        (0, Some(key)) => Err(InterpreterError::MissingRequiredRecord {
            position: position.to_owned(),
            key: key.to_string(),
        }),
        (0 | 1, _) => Ok(records.pop().map(Box::new)),
        (found, _) => Err(InterpreterError::TooManyRecords {
            position: position.to_owned(),
            found,
        }),
    }
}

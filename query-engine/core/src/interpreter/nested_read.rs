use super::InterpretationResult;
use crate::ResultRecord;
use itertools::Itertools;
use query_structure::{DomainError, GraphValue};
use std::collections::HashMap;

/// Distinct, non-null values of `column` across `records`, in first-seen order.
pub(crate) fn join_keys(records: &[ResultRecord], column: &str) -> InterpretationResult<Vec<GraphValue>> {
    let mut keys = Vec::with_capacity(records.len());

    for record in records {
        let value = record.get(column).ok_or_else(|| DomainError::ColumnNotFound {
            type_name: record.type_name().to_owned(),
            column: column.to_owned(),
        })?;

        if !value.is_null() {
            keys.push(value.clone());
        }
    }

    Ok(keys.into_iter().unique().collect())
}

/// Child records grouped by the join value of the parent they belong to.
///
/// Children are handed out by `take`: the last parent asking for a join value gets the records
/// themselves, earlier parents sharing that value get copies.
#[derive(Debug, Default)]
pub(crate) struct ChildIndex {
    children: HashMap<GraphValue, Vec<ResultRecord>>,
    pending: HashMap<GraphValue, usize>,
}

impl ChildIndex {
    pub(crate) fn new<'a>(children: Vec<ResultRecord>, parent_keys: impl Iterator<Item = &'a GraphValue>) -> Self {
        let mut index = Self::default();

        for child in children {
            if let Some(key) = child.parent_key.clone() {
                index.children.entry(key).or_default().push(child);
            }
        }

        for key in parent_keys {
            *index.pending.entry(key.clone()).or_default() += 1;
        }

        index
    }

    pub(crate) fn take(&mut self, key: &GraphValue) -> Vec<ResultRecord> {
        let remaining = self.pending.get_mut(key).map(|pending| {
            *pending = pending.saturating_sub(1);
            *pending
        });

        match remaining {
            Some(0) => self.children.remove(key).unwrap_or_default(),
            _ => self.children.get(key).cloned().unwrap_or_default(),
        }
    }
}

use query_structure::{Filter, GraphValue, OrderBy, OrderExpression, ScalarCompare};

/// Constraints of one flat read: which rows, in which order, how many.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct QueryArguments {
    pub filter: Filter,
    pub order_by: Vec<OrderBy>,
    pub take: Option<usize>,
}

impl QueryArguments {
    pub fn new(filter: Filter) -> Self {
        Self {
            filter,
            ..Default::default()
        }
    }

    pub fn with_order(mut self, order: &OrderExpression) -> Self {
        self.order_by = order.parts().to_vec();
        self
    }

    pub fn with_take(mut self, take: Option<usize>) -> Self {
        self.take = take;
        self
    }

    /// Splits an `IN` filter on `column` into chunks of at most `chunk_size` values, keeping
    /// every other constraint. Used when a data store caps the number of bind parameters.
    pub fn batched(self, column: &str, values: &[GraphValue], chunk_size: usize) -> Vec<Self> {
        values
            .chunks(chunk_size.max(1))
            .map(|chunk| QueryArguments {
                filter: Filter::and(vec![self.filter.clone(), column.is_in(chunk.to_vec())]),
                order_by: self.order_by.clone(),
                take: self.take,
            })
            .collect()
    }
}

/// Bounds a fetch per partition instead of globally: rows are numbered within each group of equal
/// `partition_by` values, in the query order, and only rows numbered `1..=limit` are returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowNumberWindow {
    pub partition_by: String,
    pub limit: usize,
}

impl RowNumberWindow {
    pub fn new(partition_by: impl Into<String>, limit: usize) -> Self {
        Self {
            partition_by: partition_by.into(),
            limit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batched_splits_the_in_list() {
        let args = QueryArguments::new("published".equals(true)).with_take(Some(3));
        let keys: Vec<GraphValue> = (1..=5).map(GraphValue::Int).collect();

        let batches = args.batched("author_id", &keys, 2);

        assert_eq!(batches.len(), 3);
        assert_eq!(
            batches[2].filter,
            Filter::and(vec!["published".equals(true), "author_id".is_in(vec![GraphValue::Int(5)])])
        );
        assert!(batches.iter().all(|b| b.take == Some(3)));
    }
}

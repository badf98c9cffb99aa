use graph_value::GraphValue;
use std::{cmp, fmt};

#[derive(Clone, Copy, PartialEq, Debug, Eq, Hash)]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl SortOrder {
    pub fn reverse(self) -> Self {
        match self {
            SortOrder::Ascending => SortOrder::Descending,
            SortOrder::Descending => SortOrder::Ascending,
        }
    }

    /// Applies this direction to an ascending comparison result.
    pub fn apply(self, ordering: cmp::Ordering) -> cmp::Ordering {
        match self {
            SortOrder::Ascending => ordering,
            SortOrder::Descending => ordering.reverse(),
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortOrder::Ascending => f.write_str("ASC"),
            SortOrder::Descending => f.write_str("DESC"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OrderBy {
    pub column: String,
    pub sort_order: SortOrder,
}

impl OrderBy {
    pub fn new(column: impl Into<String>, sort_order: SortOrder) -> Self {
        Self {
            column: column.into(),
            sort_order,
        }
    }

    pub fn asc(column: impl Into<String>) -> Self {
        Self::new(column, SortOrder::Ascending)
    }

    pub fn desc(column: impl Into<String>) -> Self {
        Self::new(column, SortOrder::Descending)
    }

    pub fn reversed(&self) -> Self {
        Self::new(self.column.clone(), self.sort_order.reverse())
    }
}

/// An ordered list of sort columns.
///
/// The same expression drives the fetch order, the cursor contents and the in-memory re-sort of
/// merged result lists, so every record of a connection can be compared through it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct OrderExpression {
    parts: Vec<OrderBy>,
}

impl OrderExpression {
    pub fn new(parts: Vec<OrderBy>) -> Self {
        Self { parts }
    }

    pub fn parts(&self) -> &[OrderBy] {
        &self.parts
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> + '_ {
        self.parts.iter().map(|p| p.column.as_str())
    }

    /// Appends the primary key as a final ascending tie-breaker, unless the expression already
    /// sorts by it.
    pub fn with_tiebreaker(&self, primary_key: &str) -> Self {
        let mut parts = self.parts.clone();

        if !parts.iter().any(|p| p.column == primary_key) {
            parts.push(OrderBy::asc(primary_key));
        }

        Self { parts }
    }

    /// The same columns with every direction flipped. Used for backward pagination.
    pub fn reversed(&self) -> Self {
        Self {
            parts: self.parts.iter().map(OrderBy::reversed).collect(),
        }
    }

    /// Compares two rows given as the values of this expression's columns, in column order.
    pub fn compare(&self, left: &[GraphValue], right: &[GraphValue]) -> cmp::Ordering {
        self.parts
            .iter()
            .zip(left.iter().zip(right.iter()))
            .map(|(part, (l, r))| part.sort_order.apply(l.cmp(r)))
            .find(|o| o.is_ne())
            .unwrap_or(cmp::Ordering::Equal)
    }
}

impl From<Vec<OrderBy>> for OrderExpression {
    fn from(parts: Vec<OrderBy>) -> Self {
        Self::new(parts)
    }
}

impl fmt::Display for OrderExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self
            .parts
            .iter()
            .map(|p| format!("{} {}", p.column, p.sort_order))
            .collect();

        f.write_str(&rendered.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn tiebreaker_is_only_added_once() {
        let order = OrderExpression::new(vec![OrderBy::desc("created_at")]);

        assert_eq!(order.with_tiebreaker("id").to_string(), "created_at DESC, id ASC");
        assert_eq!(
            order.with_tiebreaker("id").with_tiebreaker("id").to_string(),
            "created_at DESC, id ASC"
        );
    }

    #[test]
    fn compare_respects_directions() {
        let order = OrderExpression::new(vec![OrderBy::desc("score"), OrderBy::asc("id")]);

        let a = [GraphValue::Int(10), GraphValue::Int(2)];
        let b = [GraphValue::Int(10), GraphValue::Int(1)];
        let c = [GraphValue::Int(3), GraphValue::Int(0)];

        assert_eq!(order.compare(&a, &b), cmp::Ordering::Greater);
        assert_eq!(order.compare(&a, &c), cmp::Ordering::Less);
        assert_eq!(order.reversed().compare(&a, &c), cmp::Ordering::Greater);
    }
}

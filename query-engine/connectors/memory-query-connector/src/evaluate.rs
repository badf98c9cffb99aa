use crate::Row;
use query_structure::{Filter, GraphValue, OrderBy, ScalarCondition, ScalarFilter};
use std::cmp::Ordering;

/// Row-level evaluation of filters, with SQL semantics for nulls: every comparison against a
/// null operand is false, only `IS NULL` matches them.
pub(crate) trait Evaluate {
    fn matches(&self, row: &Row) -> bool;
}

impl Evaluate for Filter {
    fn matches(&self, row: &Row) -> bool {
        match self {
            Filter::And(filters) => filters.iter().all(|f| f.matches(row)),
            Filter::Or(filters) => filters.iter().any(|f| f.matches(row)),
            Filter::Not(filters) => !filters.iter().all(|f| f.matches(row)),
            Filter::Scalar(sf) => sf.matches(row),
            Filter::BoolFilter(b) => *b,
        }
    }
}

impl Evaluate for ScalarFilter {
    fn matches(&self, row: &Row) -> bool {
        let value = row.get(&self.column).unwrap_or(&GraphValue::Null);

        if let ScalarCondition::IsNull(expect_null) = self.condition {
            return value.is_null() == expect_null;
        }

        if value.is_null() {
            return false;
        }

        let compare = |other: &GraphValue| (!other.is_null()).then(|| value.cmp(other));

        match &self.condition {
            ScalarCondition::Equals(v) => compare(v) == Some(Ordering::Equal),
            ScalarCondition::NotEquals(v) => compare(v).is_some_and(Ordering::is_ne),
            ScalarCondition::LessThan(v) => compare(v) == Some(Ordering::Less),
            ScalarCondition::LessThanOrEquals(v) => compare(v).is_some_and(Ordering::is_le),
            ScalarCondition::GreaterThan(v) => compare(v) == Some(Ordering::Greater),
            ScalarCondition::GreaterThanOrEquals(v) => compare(v).is_some_and(Ordering::is_ge),
            ScalarCondition::In(values) => values.iter().any(|v| v == value),
            ScalarCondition::NotIn(values) => values.iter().all(|v| !v.is_null() && v != value),
            ScalarCondition::IsNull(_) => false,
        }
    }
}

pub(crate) fn compare_rows(order_by: &[OrderBy], left: &Row, right: &Row) -> Ordering {
    order_by
        .iter()
        .map(|o| {
            let l = left.get(&o.column).unwrap_or(&GraphValue::Null);
            let r = right.get(&o.column).unwrap_or(&GraphValue::Null);

            o.sort_order.apply(l.cmp(r))
        })
        .find(|o| o.is_ne())
        .unwrap_or(Ordering::Equal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use query_structure::ScalarCompare;

    fn row(pairs: &[(&str, GraphValue)]) -> Row {
        pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
    }

    #[test]
    fn null_columns_only_match_is_null() {
        let r = row(&[("deleted_at", GraphValue::Null)]);

        assert!("deleted_at".is_null().matches(&r));
        assert!(!"deleted_at".equals(GraphValue::Null).matches(&r));
        assert!(!"deleted_at".not_equals(1).matches(&r));
        assert!(!"deleted_at".is_in(vec![GraphValue::Null]).matches(&r));
    }

    #[test]
    fn combinators_compose() {
        let r = row(&[("a", GraphValue::Int(2)), ("b", GraphValue::from("x"))]);
        let filter = Filter::or(vec![
            Filter::and(vec!["a".greater_than(5), "b".equals("x")]),
            Filter::not(vec!["a".less_than_or_equals(1)]),
        ]);

        assert!(filter.matches(&r));
        assert!(!Filter::BoolFilter(false).matches(&r));
    }
}

//! Filtering types to select records from the data store.
//!
//! Scalar filters are created through [`ScalarCompare`] on column names and combined with
//! [`Filter::and`], [`Filter::or`] and [`Filter::not`].

mod compare;
mod condition;
mod declared;

pub use compare::*;
pub use condition::*;
pub use declared::*;

use std::fmt;

#[derive(Debug, Clone, Eq, Hash, PartialEq)]
pub enum Filter {
    And(Vec<Filter>),
    Or(Vec<Filter>),
    Not(Vec<Filter>),
    Scalar(ScalarFilter),
    BoolFilter(bool),
}

impl Filter {
    /// Conjunction of `filters`. Nested conjunctions are flattened and trivially true members
    /// are dropped.
    pub fn and(filters: Vec<Filter>) -> Self {
        let mut flattened = Vec::with_capacity(filters.len());

        for filter in filters {
            match filter {
                Filter::BoolFilter(true) => (),
                Filter::And(inner) => flattened.extend(inner),
                other => flattened.push(other),
            }
        }

        match flattened.len() {
            0 => Self::empty(),
            1 => flattened.pop().unwrap_or_else(Self::empty),
            _ => Filter::And(flattened),
        }
    }

    /// Disjunction of `filters`. An empty disjunction matches nothing.
    pub fn or(filters: Vec<Filter>) -> Self {
        let mut filters = filters;

        match filters.len() {
            0 => Filter::BoolFilter(false),
            1 => filters.pop().unwrap_or(Filter::BoolFilter(false)),
            _ => Filter::Or(filters),
        }
    }

    pub fn not(filters: Vec<Filter>) -> Self {
        Filter::Not(filters)
    }

    pub fn empty() -> Self {
        Filter::BoolFilter(true)
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Filter::BoolFilter(true))
    }

    /// Columns referenced anywhere in the filter.
    pub fn columns(&self) -> Vec<&str> {
        match self {
            Filter::And(filters) | Filter::Or(filters) | Filter::Not(filters) => {
                filters.iter().flat_map(|f| f.columns()).collect()
            }
            Filter::Scalar(sf) => vec![sf.column.as_str()],
            Filter::BoolFilter(_) => Vec::new(),
        }
    }
}

impl From<ScalarFilter> for Filter {
    fn from(sf: ScalarFilter) -> Self {
        Filter::Scalar(sf)
    }
}

impl From<bool> for Filter {
    fn from(b: bool) -> Self {
        Filter::BoolFilter(b)
    }
}

impl Default for Filter {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let join = |filters: &[Filter], sep: &str| {
            filters
                .iter()
                .map(|filter| format!("({filter})"))
                .collect::<Vec<_>>()
                .join(sep)
        };

        match self {
            Filter::And(filters) => f.write_str(&join(filters, " AND ")),
            Filter::Or(filters) => f.write_str(&join(filters, " OR ")),
            Filter::Not(filters) => write!(f, "NOT {}", join(filters, " AND ")),
            Filter::Scalar(sf) => sf.fmt(f),
            Filter::BoolFilter(b) => b.fmt(f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use graph_value::GraphValue;
    use pretty_assertions::assert_eq;

    #[test]
    fn and_flattens_and_drops_trivial_members() {
        let filter = Filter::and(vec![
            Filter::empty(),
            Filter::and(vec!["a".equals(1), "b".equals(2)]),
            "c".is_null(),
        ]);

        assert_eq!(filter, Filter::And(vec!["a".equals(1), "b".equals(2), "c".is_null()]));
    }

    #[test]
    fn single_member_combinations_unwrap() {
        assert_eq!(Filter::and(vec!["a".equals(1)]), "a".equals(1));
        assert_eq!(Filter::or(vec!["a".equals(1)]), "a".equals(1));
        assert!(Filter::and(vec![]).is_empty());
        assert_eq!(Filter::or(vec![]), Filter::BoolFilter(false));
    }

    #[test]
    fn renders_readably() {
        let filter = Filter::and(vec![
            "author_id".is_in(vec![GraphValue::Int(1), GraphValue::Int(2)]),
            "published".equals(true),
        ]);

        assert_eq!(filter.to_string(), "(author_id IN [1, 2]) AND (published = true)");
    }
}

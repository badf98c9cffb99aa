use super::*;
use crate::{DomainError, DomainResult};
use graph_value::GraphValue;

#[derive(Clone, Copy, PartialEq, Debug, Eq, Hash)]
pub enum FilterCondition {
    Equals,
    NotEquals,
    In,
    LessThan,
    LessThanOrEquals,
    GreaterThan,
    GreaterThanOrEquals,

    /// Takes a boolean argument: `true` selects rows where the column is null.
    IsNull,
}

/// Maps a query argument onto a predicate over a column.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DeclaredFilter {
    pub argument: String,
    pub column: String,
    pub condition: FilterCondition,
}

impl DeclaredFilter {
    pub fn new(argument: impl Into<String>, column: impl Into<String>, condition: FilterCondition) -> Self {
        Self {
            argument: argument.into(),
            column: column.into(),
            condition,
        }
    }

    /// Builds the filter for the value supplied to the argument.
    pub fn apply(&self, value: &GraphValue) -> DomainResult<Filter> {
        let column = self.column.as_str();

        let filter = match self.condition {
            FilterCondition::Equals => column.equals(value.clone()),
            FilterCondition::NotEquals => column.not_equals(value.clone()),
            FilterCondition::LessThan => column.less_than(value.clone()),
            FilterCondition::LessThanOrEquals => column.less_than_or_equals(value.clone()),
            FilterCondition::GreaterThan => column.greater_than(value.clone()),
            FilterCondition::GreaterThanOrEquals => column.greater_than_or_equals(value.clone()),
            FilterCondition::In => match value.as_list() {
                Some(values) => column.is_in(values.to_vec()),
                None => return Err(self.invalid_value("a list", value)),
            },
            FilterCondition::IsNull => match value.as_boolean() {
                Some(true) => column.is_null(),
                Some(false) => column.is_not_null(),
                None => return Err(self.invalid_value("a boolean", value)),
            },
        };

        Ok(filter)
    }

    fn invalid_value(&self, expected: &'static str, got: &GraphValue) -> DomainError {
        DomainError::InvalidArgumentValue {
            argument: self.argument.clone(),
            expected,
            got: got.kind().to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn in_filters_require_a_list() {
        let filter = DeclaredFilter::new("ids", "id", FilterCondition::In);

        assert_eq!(
            filter.apply(&GraphValue::List(vec![GraphValue::Int(1)])).unwrap(),
            "id".is_in(vec![GraphValue::Int(1)])
        );
        assert!(matches!(
            filter.apply(&GraphValue::Int(1)),
            Err(DomainError::InvalidArgumentValue { expected: "a list", .. })
        ));
    }

    #[test]
    fn is_null_filters_take_a_boolean() {
        let filter = DeclaredFilter::new("unpublished", "published_at", FilterCondition::IsNull);

        assert_eq!(filter.apply(&GraphValue::Boolean(true)).unwrap(), "published_at".is_null());
        assert_eq!(
            filter.apply(&GraphValue::Boolean(false)).unwrap(),
            "published_at".is_not_null()
        );
    }
}

use super::*;
use graph_value::GraphValue;

/// Comparing methods for columns, addressed by name.
pub trait ScalarCompare {
    fn equals<T>(&self, val: T) -> Filter
    where
        T: Into<GraphValue>;

    fn not_equals<T>(&self, val: T) -> Filter
    where
        T: Into<GraphValue>;

    fn is_in(&self, values: Vec<GraphValue>) -> Filter;

    fn not_in(&self, values: Vec<GraphValue>) -> Filter;

    fn less_than<T>(&self, val: T) -> Filter
    where
        T: Into<GraphValue>;

    fn less_than_or_equals<T>(&self, val: T) -> Filter
    where
        T: Into<GraphValue>;

    fn greater_than<T>(&self, val: T) -> Filter
    where
        T: Into<GraphValue>;

    fn greater_than_or_equals<T>(&self, val: T) -> Filter
    where
        T: Into<GraphValue>;

    fn is_null(&self) -> Filter;

    fn is_not_null(&self) -> Filter;
}

impl<C> ScalarCompare for C
where
    C: AsRef<str> + ?Sized,
{
    fn equals<T>(&self, val: T) -> Filter
    where
        T: Into<GraphValue>,
    {
        scalar(self.as_ref(), ScalarCondition::Equals(val.into()))
    }

    fn not_equals<T>(&self, val: T) -> Filter
    where
        T: Into<GraphValue>,
    {
        scalar(self.as_ref(), ScalarCondition::NotEquals(val.into()))
    }

    fn is_in(&self, values: Vec<GraphValue>) -> Filter {
        scalar(self.as_ref(), ScalarCondition::In(values))
    }

    fn not_in(&self, values: Vec<GraphValue>) -> Filter {
        scalar(self.as_ref(), ScalarCondition::NotIn(values))
    }

    fn less_than<T>(&self, val: T) -> Filter
    where
        T: Into<GraphValue>,
    {
        scalar(self.as_ref(), ScalarCondition::LessThan(val.into()))
    }

    fn less_than_or_equals<T>(&self, val: T) -> Filter
    where
        T: Into<GraphValue>,
    {
        scalar(self.as_ref(), ScalarCondition::LessThanOrEquals(val.into()))
    }

    fn greater_than<T>(&self, val: T) -> Filter
    where
        T: Into<GraphValue>,
    {
        scalar(self.as_ref(), ScalarCondition::GreaterThan(val.into()))
    }

    fn greater_than_or_equals<T>(&self, val: T) -> Filter
    where
        T: Into<GraphValue>,
    {
        scalar(self.as_ref(), ScalarCondition::GreaterThanOrEquals(val.into()))
    }

    fn is_null(&self) -> Filter {
        scalar(self.as_ref(), ScalarCondition::IsNull(true))
    }

    fn is_not_null(&self) -> Filter {
        scalar(self.as_ref(), ScalarCondition::IsNull(false))
    }
}

fn scalar(column: &str, condition: ScalarCondition) -> Filter {
    Filter::Scalar(ScalarFilter {
        column: column.to_owned(),
        condition,
    })
}

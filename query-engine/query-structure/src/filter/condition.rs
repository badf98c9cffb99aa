use graph_value::GraphValue;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ScalarFilter {
    pub column: String,
    pub condition: ScalarCondition,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ScalarCondition {
    Equals(GraphValue),
    NotEquals(GraphValue),
    LessThan(GraphValue),
    LessThanOrEquals(GraphValue),
    GreaterThan(GraphValue),
    GreaterThanOrEquals(GraphValue),
    In(Vec<GraphValue>),
    NotIn(Vec<GraphValue>),
    IsNull(bool),
}

impl ScalarCondition {
    pub fn invert(self, condition: bool) -> Self {
        if !condition {
            return self;
        }

        match self {
            Self::Equals(v) => Self::NotEquals(v),
            Self::NotEquals(v) => Self::Equals(v),
            Self::LessThan(v) => Self::GreaterThanOrEquals(v),
            Self::LessThanOrEquals(v) => Self::GreaterThan(v),
            Self::GreaterThan(v) => Self::LessThanOrEquals(v),
            Self::GreaterThanOrEquals(v) => Self::LessThan(v),
            Self::In(v) => Self::NotIn(v),
            Self::NotIn(v) => Self::In(v),
            Self::IsNull(b) => Self::IsNull(!b),
        }
    }
}

impl fmt::Display for ScalarFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let column = &self.column;

        match &self.condition {
            ScalarCondition::Equals(v) => write!(f, "{column} = {v}"),
            ScalarCondition::NotEquals(v) => write!(f, "{column} <> {v}"),
            ScalarCondition::LessThan(v) => write!(f, "{column} < {v}"),
            ScalarCondition::LessThanOrEquals(v) => write!(f, "{column} <= {v}"),
            ScalarCondition::GreaterThan(v) => write!(f, "{column} > {v}"),
            ScalarCondition::GreaterThanOrEquals(v) => write!(f, "{column} >= {v}"),
            ScalarCondition::In(values) => write!(f, "{column} IN {}", GraphValue::List(values.clone())),
            ScalarCondition::NotIn(values) => write!(f, "{column} NOT IN {}", GraphValue::List(values.clone())),
            ScalarCondition::IsNull(true) => write!(f, "{column} IS NULL"),
            ScalarCondition::IsNull(false) => write!(f, "{column} IS NOT NULL"),
        }
    }
}

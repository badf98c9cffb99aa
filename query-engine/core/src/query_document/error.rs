use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
#[error("Query parsing/validation error at `{}`: {}", path, error_kind)]
pub struct QueryParserError {
    pub path: QueryPath,
    pub error_kind: QueryParserErrorKind,
}

impl QueryParserError {
    pub fn new(path: QueryPath, error_kind: QueryParserErrorKind) -> Self {
        Self { path, error_kind }
    }
}

pub type SelectionPath = QueryPath;

/// Dotted location of a selection inside the query, e.g. `Query.users.edges.node`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryPath {
    segments: Vec<String>,
}

impl QueryPath {
    pub fn new(initial_segment: impl Into<String>) -> Self {
        Self {
            segments: vec![initial_segment.into()],
        }
    }

    pub fn add(&self, segment: impl Into<String>) -> Self {
        let mut path = self.clone();
        path.segments.push(segment.into());
        path
    }

    pub fn last(&self) -> Option<&str> {
        self.segments.last().map(|s| s.as_str())
    }

    pub fn segments(&self) -> Vec<String> {
        self.segments.clone()
    }
}

impl fmt::Display for QueryPath {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.segments.join("."))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryParserErrorKind {
    #[error("Field `{}` is selected more than once with incompatible arguments.", field)]
    DuplicateField { field: String },

    #[error("Argument `{}` is supplied more than once.", argument)]
    DuplicateArgument { argument: String },

    #[error("Fragment `{}` is not defined.", name)]
    UnknownFragment { name: String },

    #[error("Fragment `{}` spreads itself.", name)]
    FragmentCycle { name: String },

    #[error("Variable `${}` is not defined.", name)]
    MissingVariable { name: String },

    #[error("Operation `{}` is not defined.", name)]
    UnknownOperation { name: String },

    #[error("{}", _0)]
    UnsupportedOperation(String),

    #[error("Value conversion error: {}", _0)]
    ValueConversion(String),

    #[error("Syntax error: {}", _0)]
    Syntax(String),
}

use crate::{QueryParserError, SelectionPath};
use query_structure::DomainError;
use thiserror::Error;

/// Errors raised while binding a selection tree to the schema. Everything except `SchemaError`
/// and `DomainError` is caused by the query and reported back to the caller.
#[derive(Debug, Error)]
pub enum QueryGraphBuilderError {
    /// Logic error in the construction of the schema.
    /// Not a user error.
    #[error("Schema error: {}", _0)]
    SchemaError(String),

    #[error("Type `{}` not found (at `{}`).", name, path)]
    TypeNotFound { name: String, path: SelectionPath },

    #[error("Field `{}` is not supported on type `{}` (at `{}`).", field, type_name, path)]
    UnsupportedField {
        field: String,
        type_name: String,
        path: SelectionPath,
    },

    #[error("Argument `{}` is not supported on field `{}` (at `{}`).", argument, field, path)]
    UnknownArgument {
        argument: String,
        field: String,
        path: SelectionPath,
    },

    #[error("Connection field `{}` requires a `first` or `last` argument (at `{}`).", field, path)]
    MissingPaginationArgument { field: String, path: SelectionPath },

    #[error("Invalid pagination arguments on `{}`: {} (at `{}`).", field, reason, path)]
    InvalidPaginationArguments {
        field: String,
        reason: String,
        path: SelectionPath,
    },

    #[error("Invalid cursor on `{}`: {} (at `{}`).", field, reason, path)]
    InvalidCursor {
        field: String,
        reason: String,
        path: SelectionPath,
    },

    #[error("Invalid value for argument `{}` (at `{}`): {}", argument, path, reason)]
    InvalidArgument {
        argument: String,
        reason: String,
        path: SelectionPath,
    },

    /// Wraps the selection tree building stage errors.
    #[error("{}", _0)]
    QueryParserError(QueryParserError),

    /// Wraps transformation errors from the schema structure.
    #[error("{}", _0)]
    DomainError(DomainError),
}

impl QueryGraphBuilderError {
    /// Whether the error was caused by the query rather than by the schema or the engine.
    pub fn is_user_error(&self) -> bool {
        !matches!(self, Self::SchemaError(_) | Self::DomainError(_))
    }
}

impl From<QueryParserError> for QueryGraphBuilderError {
    fn from(err: QueryParserError) -> Self {
        QueryGraphBuilderError::QueryParserError(err)
    }
}

impl From<DomainError> for QueryGraphBuilderError {
    fn from(err: DomainError) -> Self {
        QueryGraphBuilderError::DomainError(err)
    }
}
